//! Whole-prompt rendering: walks the configured blocks and segments and
//! produces presentation-ready text plus collected diagnostics.
//!
//! Segments within a block run sequentially because each one may publish
//! facts the next segment reads. Blocks are independent of each other, so
//! they render in parallel, each over its own copy of the snapshot.

use crate::resolver::Resolver;
use crate::segment::{ResolvedSegment, SegmentProcessor};
use promptline_config::{Alignment, Block, PromptConfig};
use promptline_context::Context;
use rayon::prelude::*;

#[derive(Debug, Clone)]
pub struct RenderedBlock {
    pub alignment: Alignment,
    pub newline: bool,
    pub segments: Vec<ResolvedSegment>,
}

impl RenderedBlock {
    /// Concatenated prefix+text+postfix of every segment in order.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push_str(&segment.prefix);
            out.push_str(&segment.text);
            out.push_str(&segment.postfix);
        }
        out
    }
}

#[derive(Debug, Clone)]
pub struct RenderedPrompt {
    pub blocks: Vec<RenderedBlock>,
}

impl RenderedPrompt {
    pub fn errors(&self) -> impl Iterator<Item = &crate::error::RenderError> {
        self.blocks
            .iter()
            .flat_map(|b| &b.segments)
            .flat_map(|s| &s.errors)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }
}

pub struct PromptRenderer {
    resolver: Resolver,
}

impl PromptRenderer {
    pub fn new() -> Self {
        Self {
            resolver: Resolver::new(),
        }
    }

    pub fn with_resolver(resolver: Resolver) -> Self {
        Self { resolver }
    }

    pub fn render(&self, config: &PromptConfig, snapshot: &Context) -> RenderedPrompt {
        let blocks = config
            .blocks
            .par_iter()
            .map(|block| self.render_block(block, snapshot.clone()))
            .collect();

        RenderedPrompt { blocks }
    }

    /// Renders one block, threading the fact-augmented snapshot from each
    /// segment into the next.
    pub fn render_block(&self, block: &Block, snapshot: Context) -> RenderedBlock {
        let processor = SegmentProcessor::new(&self.resolver);

        let mut snapshot = snapshot;
        let mut segments = Vec::with_capacity(block.segments.len());
        for segment in &block.segments {
            let (rendered, next) = processor.process(segment, &snapshot);
            segments.push(rendered);
            snapshot = next;
        }

        RenderedBlock {
            alignment: block.alignment,
            newline: block.newline,
            segments,
        }
    }
}

impl Default for PromptRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptline_context::mock;

    const CONFIG: &str = r#"{
        "blocks": [
            {
                "type": "prompt",
                "alignment": "left",
                "segments": [
                    { "type": "path", "style": "plain", "template": "{{ .Path }}" },
                    {
                        "type": "git",
                        "style": "plain",
                        "template": " {{ .HEAD }}{{ if .Working.Changed }}*{{ .Working.String }}{{ end }}"
                    }
                ]
            },
            {
                "type": "prompt",
                "alignment": "right",
                "newline": false,
                "segments": [
                    { "type": "time", "style": "plain", "template": "{{ .Now | date \"%H:%M\" }}" }
                ]
            }
        ]
    }"#;

    #[test]
    fn renders_blocks_in_document_order() {
        let config = PromptConfig::from_json_str(CONFIG).unwrap();
        let prompt = PromptRenderer::new().render(&config, &mock());

        assert_eq!(prompt.blocks.len(), 2);
        assert_eq!(prompt.blocks[0].text(), "~/projects/my-project main*1");
        assert_eq!(prompt.blocks[1].text(), "09:30");
        assert!(!prompt.has_errors());
    }

    #[test]
    fn blocks_do_not_share_derived_facts() {
        let config = PromptConfig::from_json_str(
            r#"{
                "blocks": [
                    { "segments": [{ "type": "git", "template": "{{ .HEAD }}" }] },
                    { "segments": [{ "type": "text", "properties": { "text": "{{ .Segments.Git.HEAD }}" } }] }
                ]
            }"#,
        )
        .unwrap();

        let prompt = PromptRenderer::new().render(&config, &mock());

        // The second block starts from the original snapshot, so the git
        // facts published in the first block are out of reach.
        assert_eq!(prompt.blocks[1].text(), "");
    }

    #[test]
    fn errors_surface_without_aborting_the_render() {
        let config = PromptConfig::from_json_str(
            r#"{
                "blocks": [
                    {
                        "segments": [
                            { "type": "sysinfo", "template": "{{ round .Precision }}" },
                            { "type": "git", "template": "{{ .HEAD }}" }
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();

        let prompt = PromptRenderer::new().render(&config, &mock());

        assert!(prompt.has_errors());
        assert_eq!(prompt.blocks[0].segments[1].text, "main");
        assert_eq!(
            prompt.errors().next().unwrap().segment.as_deref(),
            Some("sysinfo")
        );
    }
}
