//! エラーハンドリングのテスト
//!
//! 閉じられていないタグの報告、ビルドモードによる抑制、不正な設定を検証する。

use moontpl::{
    BuildMode, CompileOptions, Compiler, Delimiters, Dependencies, ErrorCollector, OutputMode,
    TemplateError,
};
use pretty_assertions::assert_eq;
use test_case::test_case;

fn compiler(build: BuildMode) -> Compiler {
    Compiler::new(CompileOptions {
        delimiters: Delimiters::default(),
        mode: OutputMode::StringLiteral,
        build,
    })
    .expect("default delimiters are valid")
}

#[test]
fn test_unclosed_tag_is_reported_once() {
    let mut deps = Dependencies::new();
    let mut collector = ErrorCollector::new();

    let err = compiler(BuildMode::Development)
        .compile_with("a {{ b", &mut deps, &mut collector)
        .unwrap_err();

    assert_eq!(collector.error_count(), 1);
    assert_eq!(
        collector.first_error().unwrap().message,
        r#"Expected closing delimiter "}}" after "b""#
    );
    assert_eq!(err.to_string(), r#"Expected closing delimiter "}}" after "b""#);
    assert!(deps.is_empty());
}

#[test]
fn test_unclosed_tag_carries_partial_output_and_span() {
    let mut deps = Dependencies::new();
    let mut collector = ErrorCollector::new();

    let err = compiler(BuildMode::Development)
        .compile_with("{{ x }} then {{ y", &mut deps, &mut collector)
        .unwrap_err();

    match err {
        TemplateError::UnclosedTag {
            close,
            tag,
            span,
            partial_output,
        } => {
            assert_eq!(close, "}}");
            assert_eq!(tag, "y");
            assert_eq!((span.start, span.end), (13, 17));
            assert_eq!(partial_output, r#"" + x + " then "#);
        }
        other => panic!("unexpected error: {:?}", other),
    }

    // References from tags before the failure are kept
    assert_eq!(deps.to_vec(), vec!["x"]);
}

#[test]
fn test_production_mode_suppresses_report_but_still_fails() {
    let mut deps = Dependencies::new();
    let mut collector = ErrorCollector::new();

    let result = compiler(BuildMode::Production).compile_with("a {{ b", &mut deps, &mut collector);

    assert!(result.unwrap_err().is_unclosed_tag());
    assert!(!collector.has_errors());
}

#[test_case("{{" ; "bare open")]
#[test_case("{{   " ; "open with whitespace")]
#[test_case("text {{ a }} {{ b + c" ; "second tag")]
#[test_case("{{ a }" ; "half close")]
fn test_unclosed_variants(template: &str) {
    let mut deps = Dependencies::new();
    let mut collector = ErrorCollector::new();

    let result = compiler(BuildMode::Development).compile_with(template, &mut deps, &mut collector);

    assert!(result.unwrap_err().is_unclosed_tag());
    assert_eq!(collector.error_count(), 1);
}

#[test]
fn test_closed_template_reports_nothing() {
    let mut deps = Dependencies::new();
    let mut collector = ErrorCollector::new();

    compiler(BuildMode::Development)
        .compile_with("{{ a }} {{ b }}", &mut deps, &mut collector)
        .unwrap();

    assert!(!collector.has_errors());
}

#[test]
fn test_empty_close_delimiter_is_rejected() {
    let err = Compiler::new(CompileOptions {
        delimiters: Delimiters::new("{{", ""),
        ..CompileOptions::default()
    })
    .unwrap_err();

    assert!(matches!(err, TemplateError::EmptyDelimiter { .. }));
}

#[test]
fn test_diagnostic_points_at_tag() {
    let mut deps = Dependencies::new();
    let mut collector = ErrorCollector::new();
    collector.set_file(0);

    let _ = compiler(BuildMode::Development).compile_with("ok {{ oops", &mut deps, &mut collector);

    let diagnostic = collector.errors()[0].to_diagnostic();
    assert_eq!(diagnostic.labels[0].range, 3..10);
}
