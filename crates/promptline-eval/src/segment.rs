//! Segment processing: turns one configured segment plus a context snapshot
//! into rendered segment text, and derives the per-segment facts that later
//! segments may reference through `.Segments.<Type>.<Fact>`.

use crate::error::RenderError;
use crate::resolver::{Resolved, Resolver};
use crate::scope::{Scope, SegmentScope};
use promptline_config::Segment;
use promptline_context::{Context, Fact, SegmentFacts};

/// A fully rendered segment, ready for a presentation layer.
#[derive(Debug, Clone)]
pub struct ResolvedSegment {
    pub segment_type: String,
    pub style: String,
    pub foreground: Option<String>,
    pub background: Option<String>,
    pub leading_diamond: Option<String>,
    pub trailing_diamond: Option<String>,
    pub prefix: String,
    pub text: String,
    pub postfix: String,
    pub errors: Vec<RenderError>,
}

pub struct SegmentProcessor<'a> {
    resolver: &'a Resolver,
}

impl<'a> SegmentProcessor<'a> {
    pub fn new(resolver: &'a Resolver) -> Self {
        Self { resolver }
    }

    /// Renders one segment. Returns the rendered segment together with the
    /// context snapshot augmented by this segment's derived facts, so the
    /// caller can thread it into the next segment in document order.
    pub fn process(&self, segment: &Segment, snapshot: &Context) -> (ResolvedSegment, Context) {
        let facts = derive_facts(&segment.segment_type, snapshot);
        let snapshot = if facts.is_empty() {
            snapshot.clone()
        } else {
            snapshot.with_segment(type_key(&segment.segment_type), facts)
        };

        let scope = Scope::with_local(&snapshot, scope_for(&segment.segment_type, &snapshot));

        let mut errors = Vec::new();
        let prefix = self.resolve_part(segment.properties.get_str("prefix"), &scope, segment, &mut errors);
        let text = match template_for(segment) {
            Some(template) => self.resolve_part(Some(template), &scope, segment, &mut errors),
            None => format!("[{}]", segment.segment_type),
        };
        let postfix = self.resolve_part(segment.properties.get_str("postfix"), &scope, segment, &mut errors);

        let resolved = ResolvedSegment {
            segment_type: segment.segment_type.clone(),
            style: segment.style.clone(),
            foreground: segment.foreground.clone(),
            background: segment.background.clone(),
            leading_diamond: segment.leading_diamond.clone(),
            trailing_diamond: segment.trailing_diamond.clone(),
            prefix,
            text,
            postfix,
            errors,
        };

        (resolved, snapshot)
    }

    fn resolve_part(
        &self,
        template: Option<&str>,
        scope: &Scope,
        segment: &Segment,
        errors: &mut Vec<RenderError>,
    ) -> String {
        let Some(template) = template else {
            return String::new();
        };

        let Resolved { text, errors: part_errors } = self.resolver.resolve(template, scope);
        errors.extend(
            part_errors
                .into_iter()
                .map(|e| e.for_segment(&segment.segment_type)),
        );
        text
    }
}

/// The template a segment renders: its own `template`, else a `text`
/// property. `None` means the caller shows a bracketed type placeholder.
fn template_for(segment: &Segment) -> Option<&str> {
    segment
        .template
        .as_deref()
        .or_else(|| segment.properties.get_str("text"))
}

fn scope_for<'a>(segment_type: &str, snapshot: &'a Context) -> SegmentScope<'a> {
    match segment_type {
        "git" => SegmentScope::Git(&snapshot.git),
        "sysinfo" => SegmentScope::System(&snapshot.system),
        "path" => SegmentScope::Path(snapshot),
        "time" => SegmentScope::Time(snapshot),
        _ => SegmentScope::None,
    }
}

/// Segment type as it appears under `.Segments`, e.g. "git" -> "Git".
pub fn type_key(segment_type: &str) -> String {
    let mut chars = segment_type.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Facts this segment contributes to the shared snapshot.
fn derive_facts(segment_type: &str, snapshot: &Context) -> SegmentFacts {
    let mut facts = SegmentFacts::new();

    match segment_type {
        "git" => {
            let git = &snapshot.git;
            facts.insert("HEAD".to_string(), Fact::from(git.branch.clone()));
            facts.insert(
                "BranchStatus".to_string(),
                Fact::from(branch_status(git.is_repo, git.ahead, git.behind)),
            );
        }
        "path" => {
            facts.insert("Path".to_string(), Fact::from(snapshot.display_path()));
            let dir = &snapshot.path.current_dir;
            let folder = dir.rsplit('/').next().unwrap_or(dir);
            facts.insert("Folder".to_string(), Fact::from(folder));
        }
        _ => {}
    }

    facts
}

/// Upstream divergence marker: `⇡N` commits ahead, `⇣N` behind, `≡` when
/// level with the remote. Empty outside a repository.
fn branch_status(is_repo: bool, ahead: i64, behind: i64) -> String {
    if !is_repo {
        return String::new();
    }

    let mut status = String::new();
    if ahead > 0 {
        status.push_str(&format!("\u{21e1}{}", ahead));
    }
    if behind > 0 {
        if !status.is_empty() {
            status.push(' ');
        }
        status.push_str(&format!("\u{21e3}{}", behind));
    }
    if status.is_empty() {
        status.push('\u{2261}');
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptline_context::mock;

    fn segment(segment_type: &str, template: &str) -> Segment {
        Segment {
            segment_type: segment_type.to_string(),
            template: Some(template.to_string()),
            ..Segment::default()
        }
    }

    #[test]
    fn git_segment_renders_scoped_fields() {
        let ctx = mock();
        let resolver = Resolver::new();
        let processor = SegmentProcessor::new(&resolver);

        let (rendered, _) = processor.process(
            &segment("git", "{{ .HEAD }}{{ if .Working.Changed }}*{{ .Working.String }}{{ end }}"),
            &ctx,
        );

        assert_eq!(rendered.text, "main*1");
        assert!(rendered.errors.is_empty());
    }

    #[test]
    fn git_segment_augments_snapshot_with_facts() {
        let ctx = mock();
        let resolver = Resolver::new();
        let processor = SegmentProcessor::new(&resolver);

        let (_, augmented) = processor.process(&segment("git", "{{ .HEAD }}"), &ctx);

        let facts = augmented.segments.get("Git").unwrap();
        assert_eq!(facts.get("HEAD"), Some(&Fact::from("main")));
        assert_eq!(facts.get("BranchStatus"), Some(&Fact::from("\u{2261}")));
        // The input snapshot is untouched.
        assert!(ctx.segments.is_empty());
    }

    #[test]
    fn later_segment_sees_earlier_facts() {
        let ctx = mock();
        let resolver = Resolver::new();
        let processor = SegmentProcessor::new(&resolver);

        let (_, ctx) = processor.process(&segment("git", "{{ .HEAD }}"), &ctx);
        let (rendered, _) = processor.process(
            &segment("status", "git:{{ .Segments.Git.HEAD }}"),
            &ctx,
        );

        assert_eq!(rendered.text, "git:main");
    }

    #[test]
    fn branch_status_markers() {
        assert_eq!(branch_status(true, 0, 0), "\u{2261}");
        assert_eq!(branch_status(true, 2, 0), "\u{21e1}2");
        assert_eq!(branch_status(true, 0, 3), "\u{21e3}3");
        assert_eq!(branch_status(true, 2, 3), "\u{21e1}2 \u{21e3}3");
        assert_eq!(branch_status(false, 2, 3), "");
    }

    #[test]
    fn sysinfo_segment_renders_memory() {
        let ctx = mock();
        let resolver = Resolver::new();
        let processor = SegmentProcessor::new(&resolver);

        let template = "MEM: {{ round (div ((sub .PhysicalTotalMemory .PhysicalFreeMemory)|float64) 1000000000.0) .Precision }}/{{ (div (.PhysicalTotalMemory|float64) 1000000000.0) }} GB";
        let (rendered, _) = processor.process(&segment("sysinfo", template), &ctx);

        assert_eq!(rendered.text, "MEM: 8/16 GB");
    }

    #[test]
    fn path_segment_renders_collapsed_path() {
        let ctx = mock();
        let resolver = Resolver::new();
        let processor = SegmentProcessor::new(&resolver);

        let (rendered, augmented) = processor.process(&segment("path", "{{ .Path }}"), &ctx);

        assert_eq!(rendered.text, "~/projects/my-project");
        let facts = augmented.segments.get("Path").unwrap();
        assert_eq!(facts.get("Folder"), Some(&Fact::from("my-project")));
    }

    #[test]
    fn falls_back_to_text_property() {
        let ctx = mock();
        let resolver = Resolver::new();
        let processor = SegmentProcessor::new(&resolver);

        let mut seg = Segment {
            segment_type: "text".to_string(),
            ..Segment::default()
        };
        seg.properties.0.insert(
            "text".to_string(),
            promptline_config::PropertyValue::String("user@{{ .Shell.Name }}".to_string()),
        );

        let (rendered, _) = processor.process(&seg, &ctx);
        assert_eq!(rendered.text, "user@bash");
    }

    #[test]
    fn prefix_and_postfix_resolve_independently() {
        let ctx = mock();
        let resolver = Resolver::new();
        let processor = SegmentProcessor::new(&resolver);

        let mut seg = segment("git", "{{ .HEAD }}");
        seg.properties.0.insert(
            "prefix".to_string(),
            promptline_config::PropertyValue::String(" on ".to_string()),
        );
        seg.properties.0.insert(
            "postfix".to_string(),
            promptline_config::PropertyValue::String(" {{ .Segments.Git.BranchStatus }}".to_string()),
        );

        let (rendered, _) = processor.process(&seg, &ctx);
        assert_eq!(rendered.prefix, " on ");
        assert_eq!(rendered.text, "main");
        assert_eq!(rendered.postfix, " \u{2261}");
    }

    #[test]
    fn errors_are_tagged_with_segment_type() {
        let ctx = mock();
        let resolver = Resolver::new();
        let processor = SegmentProcessor::new(&resolver);

        let (rendered, _) = processor.process(&segment("sysinfo", "{{ round .Precision }}"), &ctx);

        assert_eq!(rendered.errors.len(), 1);
        assert_eq!(rendered.errors[0].segment.as_deref(), Some("sysinfo"));
        // The broken placeholder stays visible in the output.
        assert_eq!(rendered.text, "{{ round .Precision }}");
    }

    #[test]
    fn templateless_segment_shows_type_marker() {
        let ctx = mock();
        let resolver = Resolver::new();
        let processor = SegmentProcessor::new(&resolver);

        let seg = Segment {
            segment_type: "battery".to_string(),
            ..Segment::default()
        };

        let (rendered, _) = processor.process(&seg, &ctx);
        assert_eq!(rendered.text, "[battery]");
        assert!(rendered.errors.is_empty());
    }

    #[test]
    fn type_key_capitalizes() {
        assert_eq!(type_key("git"), "Git");
        assert_eq!(type_key("sysinfo"), "Sysinfo");
        assert_eq!(type_key(""), "");
    }
}
