//! コンパイラのメイン処理モジュール
//!
//! デリミタの設定、パターンのコンパイル、テンプレート本体の実行、
//! そして複数テンプレートをまとめて処理するパイプラインを提供します。

use crate::error::{ErrorCollector, LogReporter, Reporter, TemplateError, TemplateResult};
use crate::expression::Dependencies;
use crate::output::OutputMode;
use crate::scanner::{Patterns, ScanState, WHITESPACE_CLASS};
use crate::template::compile_template_body;
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// ビルドモードを切り替える環境変数
pub const ENV_VAR: &str = "MOONTPL_ENV";

/// 開き・閉じデリミタとそのパターン
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    pub open: String,
    pub close: String,
    pub open_pattern: String,
    pub close_pattern: String,
}

impl Delimiters {
    /// リテラルのデリミタからパターンをエスケープして作成
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        let open = open.into();
        let close = close.into();
        let open_pattern = regex::escape(&open);
        let close_pattern = regex::escape(&close);
        Self {
            open,
            close,
            open_pattern,
            close_pattern,
        }
    }

    /// パターンを明示的に指定して作成
    pub fn with_patterns(
        open: impl Into<String>,
        close: impl Into<String>,
        open_pattern: impl Into<String>,
        close_pattern: impl Into<String>,
    ) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
            open_pattern: open_pattern.into(),
            close_pattern: close_pattern.into(),
        }
    }

    /// パターンをコンパイル
    pub fn compile_patterns(&self) -> TemplateResult<Patterns> {
        if self.open.is_empty() {
            return Err(TemplateError::EmptyDelimiter { which: "開き" });
        }
        if self.close.is_empty() {
            return Err(TemplateError::EmptyDelimiter { which: "閉じ" });
        }

        let open = build_regex(&self.open_pattern)?;
        let close = build_regex(&format!("{}*(?:{})", WHITESPACE_CLASS, self.close_pattern))?;

        Ok(Patterns {
            close_delimiter: self.close.clone(),
            open_len: self.open.len(),
            close_len: self.close.len(),
            open,
            close,
        })
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::new("{{", "}}")
    }
}

fn build_regex(pattern: &str) -> TemplateResult<Regex> {
    Regex::new(pattern).map_err(|source| TemplateError::InvalidPattern {
        pattern: pattern.to_owned(),
        source,
    })
}

/// エラー報告の有無を決めるビルドモード
///
/// どちらのモードでも、閉じられていないタグでコンパイルは停止しエラーを返します。
/// `Production` はレポーターの呼び出しだけを抑制します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    #[default]
    Development,
    Production,
}

impl BuildMode {
    /// `MOONTPL_ENV` から読み取る（`production` 以外は開発モード）
    pub fn from_env() -> Self {
        match std::env::var(ENV_VAR) {
            Ok(value) => Self::parse(&value),
            Err(_) => BuildMode::Development,
        }
    }

    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            BuildMode::Production
        } else {
            BuildMode::Development
        }
    }

    pub fn reports_errors(self) -> bool {
        matches!(self, BuildMode::Development)
    }
}

/// コンパイルオプション
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    pub delimiters: Delimiters,
    pub mode: OutputMode,
    pub build: BuildMode,
}

/// パターンをコンパイル済みのテンプレートコンパイラ
///
/// 同じ設定で複数のテンプレートを処理する場合に再利用できます。
#[derive(Debug, Clone)]
pub struct Compiler {
    patterns: Patterns,
    mode: OutputMode,
    build: BuildMode,
}

impl Compiler {
    /// 新しいコンパイラを作成
    pub fn new(options: CompileOptions) -> TemplateResult<Self> {
        Ok(Self {
            patterns: options.delimiters.compile_patterns()?,
            mode: options.mode,
            build: options.build,
        })
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// テンプレートをコンパイルし、エラーは `log` に報告
    pub fn compile(&self, template: &str, dependencies: &mut Dependencies) -> TemplateResult<String> {
        self.compile_with(template, dependencies, &mut LogReporter)
    }

    /// レポーターを指定してコンパイル
    pub fn compile_with(
        &self,
        template: &str,
        dependencies: &mut Dependencies,
        reporter: &mut dyn Reporter,
    ) -> TemplateResult<String> {
        log::debug!(
            "compiling template ({} bytes, {:?} mode)",
            template.len(),
            self.mode
        );

        let mut state = ScanState::new(template, &self.patterns, dependencies);
        match compile_template_body(&mut state, self.mode) {
            Ok(()) => Ok(state.output),
            Err(e) => {
                if self.build.reports_errors() {
                    reporter.report(&e);
                }
                Err(e)
            }
        }
    }
}

/// 単発のコンパイル
///
/// `delimiters` はカーソルを進めるためのリテラル、`escaped_delimiters` は
/// マッチングに使う正規表現のソースです。`dependencies` には参照された
/// 識別子が追記されます。
pub fn compile(
    template: &str,
    delimiters: [&str; 2],
    escaped_delimiters: [&str; 2],
    dependencies: &mut Dependencies,
    mode: OutputMode,
) -> TemplateResult<String> {
    let [open, close] = delimiters;
    let [open_pattern, close_pattern] = escaped_delimiters;
    let compiler = Compiler::new(CompileOptions {
        delimiters: Delimiters::with_patterns(open, close, open_pattern, close_pattern),
        mode,
        build: BuildMode::from_env(),
    })?;
    compiler.compile(template, dependencies)
}

/// 1ファイル分のコンパイル結果
#[derive(Debug, Clone, Serialize)]
pub struct CompiledFile {
    pub name: String,
    /// ホスト言語の式として完結した出力
    pub output: Option<String>,
    pub error: Option<String>,
}

/// 複数ファイルのコンパイル結果
#[derive(Debug, Clone, Serialize)]
pub struct CompileReport {
    pub outputs: Vec<CompiledFile>,
    pub dependencies: Vec<String>,
}

impl CompileReport {
    pub fn has_failures(&self) -> bool {
        self.outputs.iter().any(|file| file.error.is_some())
    }
}

struct SourceFile {
    name: String,
    source: String,
    file_id: usize,
}

/// 複数のテンプレートで依存リストを共有するコンパイル状態
pub struct CompilationState {
    files: SimpleFiles<String, String>,
    sources: Vec<SourceFile>,
    pub error_collector: ErrorCollector,
    pub dependencies: Dependencies,
}

impl CompilationState {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            sources: Vec::new(),
            error_collector: ErrorCollector::new(),
            dependencies: Dependencies::new(),
        }
    }

    /// ファイルを読み込んで追加
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P) -> TemplateResult<usize> {
        let name = path.as_ref().display().to_string();
        let source = fs::read_to_string(path.as_ref())
            .map_err(|e| TemplateError::Io(format!("Failed to read {}: {}", name, e)))?;
        Ok(self.add_source(name, source))
    }

    /// 文字列から追加（テスト用）
    pub fn add_source(&mut self, name: impl Into<String>, source: String) -> usize {
        let name = name.into();
        let file_id = self.files.add(name.clone(), source.clone());
        self.sources.push(SourceFile {
            name,
            source,
            file_id,
        });
        file_id
    }

    /// 追加されたすべてのテンプレートをコンパイル
    ///
    /// 閉じられていないタグがあっても残りのファイルの処理は続けます。
    pub fn run(&mut self, compiler: &Compiler) -> CompileReport {
        let mut outputs = Vec::with_capacity(self.sources.len());

        for file in &self.sources {
            log::info!("Compiling {}", file.name);
            self.error_collector.set_file(file.file_id);

            let result = compiler.compile_with(
                &file.source,
                &mut self.dependencies,
                &mut self.error_collector,
            );
            let compiled = match result {
                Ok(output) => CompiledFile {
                    name: file.name.clone(),
                    output: Some(compiler.mode().wrap(&output)),
                    error: None,
                },
                Err(e) => CompiledFile {
                    name: file.name.clone(),
                    output: None,
                    error: Some(e.to_string()),
                },
            };
            outputs.push(compiled);
        }

        CompileReport {
            outputs,
            dependencies: self.dependencies.to_vec(),
        }
    }

    /// 診断情報を報告
    pub fn report_diagnostics(&self) -> TemplateResult<()> {
        let writer = StandardStream::stderr(ColorChoice::Auto);
        let config = codespan_reporting::term::Config::default();

        for error in self.error_collector.errors() {
            let diagnostic = error.to_diagnostic();
            codespan_reporting::term::emit(&mut writer.lock(), &config, &self.files, &diagnostic)
                .map_err(|e| TemplateError::Io(format!("Failed to emit diagnostic: {}", e)))?;
        }

        Ok(())
    }

    /// エラー数を取得
    pub fn error_count(&self) -> usize {
        self.error_collector.error_count()
    }
}

impl Default for CompilationState {
    fn default() -> Self {
        Self::new()
    }
}
