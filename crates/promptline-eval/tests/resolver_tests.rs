use promptline_context::mock;
use promptline_eval::{RenderErrorKind, Resolver, Scope};

fn resolve(template: &str) -> (String, usize) {
    let ctx = mock();
    let scope = Scope::root(&ctx);
    let resolved = Resolver::new().resolve(template, &scope);
    (resolved.text, resolved.errors.len())
}

#[test]
fn test_plain_text_is_identity() {
    let (text, errors) = resolve("user@host $ ");
    assert_eq!(text, "user@host $ ");
    assert_eq!(errors, 0);
}

#[test]
fn test_empty_template() {
    let (text, errors) = resolve("");
    assert_eq!(text, "");
    assert_eq!(errors, 0);
}

#[test]
fn test_env_placeholder() {
    let (text, _) = resolve("home={{ .Env.HOME }}");
    assert_eq!(text, "home=/home/user");
}

#[test]
fn test_missing_env_renders_empty_without_error() {
    let (text, errors) = resolve("[{{ .Env.DOES_NOT_EXIST }}]");
    assert_eq!(text, "[]");
    assert_eq!(errors, 0);
}

#[test]
fn test_if_else_truthiness() {
    let ctx = mock();
    let scope = Scope::root(&ctx);
    let resolver = Resolver::new();

    let cases = [
        ("{{ if true }}y{{ else }}n{{ end }}", "y"),
        ("{{ if false }}y{{ else }}n{{ end }}", "n"),
        ("{{ if 0 }}y{{ else }}n{{ end }}", "n"),
        ("{{ if 1 }}y{{ else }}n{{ end }}", "y"),
        (r#"{{ if "" }}y{{ else }}n{{ end }}"#, "n"),
        (r#"{{ if "x" }}y{{ else }}n{{ end }}"#, "y"),
        ("{{ if null }}y{{ else }}n{{ end }}", "n"),
        ("{{ if .Env.DOES_NOT_EXIST }}y{{ else }}n{{ end }}", "n"),
    ];

    for (template, expected) in cases {
        let resolved = resolver.resolve(template, &scope);
        assert_eq!(resolved.text, expected, "template: {}", template);
        assert!(resolved.errors.is_empty());
    }
}

#[test]
fn test_if_without_else_renders_nothing_on_false() {
    let (text, errors) = resolve("a{{ if .Git.Staging.Changed }}+{{ end }}b");
    assert_eq!(text, "ab");
    assert_eq!(errors, 0);
}

#[test]
fn test_nested_conditionals() {
    let (text, _) = resolve(
        "{{ if .Git.IsRepo }}{{ .Git.Branch }}{{ if .Git.Working.Changed }}*{{ .Git.Working.String }}{{ end }}{{ end }}",
    );
    assert_eq!(text, "main*1");
}

#[test]
fn test_memory_scenario() {
    let (text, errors) = resolve(
        "MEM: {{ round (div ((sub .System.PhysicalTotalMemory .System.PhysicalFreeMemory)|float64) 1000000000.0) .System.Precision }}/{{ (div (.System.PhysicalTotalMemory|float64) 1000000000.0) }} GB",
    );
    assert_eq!(text, "MEM: 8/16 GB");
    assert_eq!(errors, 0);
}

#[test]
fn test_division_by_zero_renders_empty() {
    let (text, errors) = resolve("[{{ div 1.0 0.0 }}]");
    assert_eq!(text, "[]");
    assert_eq!(errors, 0);
}

#[test]
fn test_number_rendering_is_minimal() {
    let (text, _) = resolve("{{ 2.0 }} {{ 2.5 }} {{ float64 .System.Precision }}");
    assert_eq!(text, "2 2.5 0");
}

#[test]
fn test_pipeline_date_formatting() {
    let (text, _) = resolve(r#"{{ .Time.Now | date "%H:%M" }}"#);
    assert_eq!(text, "09:30");
}

#[test]
fn test_evaluation_error_keeps_raw_tag() {
    let ctx = mock();
    let scope = Scope::root(&ctx);
    let resolved = Resolver::new().resolve("a {{ frob .Env.HOME }} b", &scope);

    assert_eq!(resolved.text, "a {{ frob .Env.HOME }} b");
    assert_eq!(resolved.errors.len(), 1);
    assert_eq!(resolved.errors[0].kind, RenderErrorKind::Evaluation);
    assert_eq!(
        resolved.errors[0].expression.as_deref(),
        Some("frob .Env.HOME")
    );
}

#[test]
fn test_failing_guard_renders_neither_branch() {
    let ctx = mock();
    let scope = Scope::root(&ctx);
    let resolved = Resolver::new().resolve("a{{ if frob 1 }}y{{ else }}n{{ end }}b", &scope);

    assert_eq!(resolved.text, "ab");
    assert_eq!(resolved.errors.len(), 1);
    assert_eq!(resolved.errors[0].kind, RenderErrorKind::Evaluation);
}

#[test]
fn test_parse_error_degrades_to_literal_text() {
    let ctx = mock();
    let scope = Scope::root(&ctx);
    let resolved = Resolver::new().resolve("ok {{ round ) }} after", &scope);

    assert_eq!(resolved.text, "ok {{ round ) }} after");
    assert_eq!(resolved.errors.len(), 1);
    assert_eq!(resolved.errors[0].kind, RenderErrorKind::Parse);
}

#[test]
fn test_unterminated_placeholder_is_literal_plus_error() {
    let ctx = mock();
    let scope = Scope::root(&ctx);
    let resolved = Resolver::new().resolve("{{ .Git.Branch }} {{ .Shell", &scope);

    assert_eq!(resolved.text, "main {{ .Shell");
    assert_eq!(resolved.errors.len(), 1);
    assert_eq!(resolved.errors[0].kind, RenderErrorKind::Parse);
}

#[test]
fn test_one_broken_placeholder_does_not_poison_the_rest() {
    let ctx = mock();
    let scope = Scope::root(&ctx);
    let resolved = Resolver::new().resolve("{{ frob 1 }}|{{ .Git.Branch }}", &scope);

    assert_eq!(resolved.text, "{{ frob 1 }}|main");
    assert_eq!(resolved.errors.len(), 1);
}

#[test]
fn test_resolver_reuses_cached_parse() {
    let ctx = mock();
    let scope = Scope::root(&ctx);
    let resolver = Resolver::new();

    resolver.resolve("{{ .Git.Branch }}", &scope);
    resolver.resolve("{{ .Git.Branch }}", &scope);

    assert_eq!(resolver.cache().stats().entries, 1);
}
