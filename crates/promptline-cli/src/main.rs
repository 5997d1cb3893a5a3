//! # promptline-cli
//!
//! Command-line interface for the promptline renderer.
//!
//! Loads a prompt theme document plus an optional context snapshot, renders
//! every block, and prints the result with the configured segment colors.
//! Without a snapshot the built-in mock data is used, so themes can be
//! previewed without touching the live system.

mod errors;

use anyhow::{Context as AnyhowContext, Result};
use clap::{Parser, Subcommand};
use colored::*;
use promptline::{PromptRenderer, RenderedBlock, RenderedPrompt};
use promptline_config::{Alignment, PromptConfig};
use promptline_context::{Context, mock};
use promptline_syntax::{parse_template, span_at};
use std::path::PathBuf;

use errors::{EnhancedError, enhance_render_error};

#[derive(Parser)]
#[command(name = "promptline")]
#[command(about = "Template-driven shell prompt renderer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Render a prompt theme")]
    Render {
        /// Path to the theme document (JSON)
        config: PathBuf,
        /// Context snapshot JSON (defaults to the built-in mock data)
        #[arg(short = 'c', long)]
        context: Option<PathBuf>,
        /// Print collected render diagnostics after the prompt
        #[arg(long)]
        show_errors: bool,
        /// Disable ANSI colors in the output
        #[arg(long)]
        no_color: bool,
    },
    #[command(about = "Parse every template in a theme and report errors")]
    Check {
        /// Path to the theme document (JSON)
        config: PathBuf,
    },
    #[command(about = "Print the built-in mock context snapshot as JSON")]
    Context,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            config,
            context,
            show_errors,
            no_color,
        } => render(config, context, show_errors, no_color),
        Commands::Check { config } => check(config),
        Commands::Context => print_mock_context(),
    }
}

fn render(
    config_path: PathBuf,
    context_path: Option<PathBuf>,
    show_errors: bool,
    no_color: bool,
) -> Result<()> {
    if no_color {
        colored::control::set_override(false);
    }

    let config = PromptConfig::from_path(&config_path)?;
    let snapshot = load_snapshot(context_path)?;

    let prompt = PromptRenderer::new().render(&config, &snapshot);

    for block in &prompt.blocks {
        println!("{}", render_block_line(block));
        if block.newline {
            println!();
        }
    }

    if show_errors {
        report_errors(&prompt);
    }

    if prompt.has_errors() && show_errors {
        std::process::exit(1);
    }

    Ok(())
}

fn load_snapshot(context_path: Option<PathBuf>) -> Result<Context> {
    match context_path {
        Some(path) => Context::from_path(&path)
            .with_context(|| format!("Failed to load context snapshot from {}", path.display())),
        None => Ok(mock()),
    }
}

fn render_block_line(block: &RenderedBlock) -> String {
    let mut line = String::new();

    if block.alignment == Alignment::Right {
        // No terminal-width plumbing here; a spacer marks the right side.
        line.push_str("    ");
    }

    for segment in &block.segments {
        if let Some(diamond) = &segment.leading_diamond {
            line.push_str(&paint(diamond, segment.foreground.as_deref()));
        }
        line.push_str(&paint(&segment.prefix, segment.foreground.as_deref()));
        line.push_str(&paint(&segment.text, segment.foreground.as_deref()));
        line.push_str(&paint(&segment.postfix, segment.foreground.as_deref()));
        if let Some(diamond) = &segment.trailing_diamond {
            line.push_str(&paint(diamond, segment.foreground.as_deref()));
        }
    }

    line
}

/// Applies a named or `#rrggbb` foreground color.
fn paint(text: &str, foreground: Option<&str>) -> String {
    let Some(color) = foreground else {
        return text.to_string();
    };

    if let Some(hex) = color.strip_prefix('#') {
        if let Some((r, g, b)) = parse_hex(hex) {
            return text.truecolor(r, g, b).to_string();
        }
        return text.to_string();
    }

    match color {
        "black" => text.black().to_string(),
        "red" => text.red().to_string(),
        "green" => text.green().to_string(),
        "yellow" => text.yellow().to_string(),
        "blue" => text.blue().to_string(),
        "magenta" => text.magenta().to_string(),
        "cyan" => text.cyan().to_string(),
        "white" => text.white().to_string(),
        _ => text.to_string(),
    }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    // Byte-index slicing below requires ASCII; themes are untrusted input.
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

fn report_errors(prompt: &RenderedPrompt) {
    let errors: Vec<_> = prompt.errors().collect();
    if errors.is_empty() {
        return;
    }

    eprintln!();
    eprintln!(
        "{} {}",
        "⚠".yellow().bold(),
        format!("{} render diagnostic(s):", errors.len()).bold()
    );
    for error in errors {
        enhance_render_error(error).display();
    }
}

fn check(config_path: PathBuf) -> Result<()> {
    let config = PromptConfig::from_path(&config_path)?;

    let mut error_count = 0;
    for (segment_type, template) in config.templates() {
        let ast = parse_template(template);
        for error in &ast.errors {
            error_count += 1;
            EnhancedError::new(error.to_string())
                .with_segment(segment_type)
                .with_file(config_path.display().to_string())
                .with_source(template.to_string())
                .with_span(relocate_span(template, error.span()))
                .display();
        }
    }

    if error_count > 0 {
        eprintln!();
        eprintln!(
            "{} {}",
            "x".red().bold(),
            format!("{} template error(s)", error_count).red().bold()
        );
        std::process::exit(1);
    }

    println!(
        "{} {}",
        "✓".green().bold(),
        "All templates parse cleanly".green()
    );
    Ok(())
}

/// Spans come back relative to the template string; recompute line/col in
/// case the template itself spans multiple lines.
fn relocate_span(template: &str, span: promptline_syntax::Span) -> promptline_syntax::Span {
    span_at(template, span.start, span.end)
}

fn print_mock_context() -> Result<()> {
    let snapshot = mock();
    let json = serde_json::to_string_pretty(&snapshot)
        .context("Failed to serialize the mock context snapshot")?;
    println!("{}", json);
    Ok(())
}
