//! 統一的なエラーハンドリングモジュール
//!
//! このモジュールは、テンプレートコンパイラ全体で使用されるエラー型と
//! エラー報告フック（`Reporter`）を提供します。

use crate::scanner::Span;
use codespan_reporting::diagnostic::{Diagnostic, Label};
use thiserror::Error;

/// テンプレートコンパイラの統一エラー型
#[derive(Error, Debug)]
pub enum TemplateError {
    /// 閉じデリミタが見つからないタグ
    #[error("Expected closing delimiter \"{close}\" after \"{tag}\"")]
    UnclosedTag {
        close: String,
        tag: String,
        span: Span,
        /// 失敗したタグより前に生成された出力
        partial_output: String,
    },

    /// デリミタのパターンが正規表現としてコンパイルできない
    #[error("不正なデリミタパターン '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// 空のデリミタ
    #[error("{which}デリミタが空です")]
    EmptyDelimiter { which: &'static str },

    /// ファイルI/Oエラー
    #[error("ファイル操作エラー: {0}")]
    Io(String),
}

impl TemplateError {
    /// エラー位置（存在する場合）
    pub fn span(&self) -> Option<Span> {
        match self {
            TemplateError::UnclosedTag { span, .. } => Some(*span),
            _ => None,
        }
    }

    pub fn is_unclosed_tag(&self) -> bool {
        matches!(self, TemplateError::UnclosedTag { .. })
    }
}

/// Result型のエイリアス
pub type TemplateResult<T> = Result<T, TemplateError>;

/// 不正な入力を受け取ったときに呼び出されるエラー報告フック
pub trait Reporter {
    fn report(&mut self, error: &TemplateError);
}

/// `log` にエラーを流すデフォルトのレポーター
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&mut self, error: &TemplateError) {
        log::error!("{}", error);
    }
}

/// エラー情報とファイルIDを含むエラー
#[derive(Debug, Clone)]
pub struct DiagnosticError {
    pub message: String,
    pub span: Option<Span>,
    pub file_id: usize,
}

impl DiagnosticError {
    pub fn new(error: &TemplateError, file_id: usize) -> Self {
        Self {
            message: error.to_string(),
            span: error.span(),
            file_id,
        }
    }

    /// codespan-reportingのDiagnosticに変換
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        let labels = match self.span {
            Some(span) => vec![Label::primary(self.file_id, span.start..span.end)
                .with_message("このタグは閉じられていません")],
            None => vec![],
        };

        Diagnostic::error()
            .with_message(&self.message)
            .with_labels(labels)
    }
}

/// 複数のエラーを蓄積するためのコレクター
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<DiagnosticError>,
    file_id: usize,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以降のエラーを指定したファイルに紐づける
    pub fn set_file(&mut self, file_id: usize) {
        self.file_id = file_id;
    }

    /// エラーを追加
    pub fn add_error(&mut self, error: &TemplateError, file_id: usize) {
        self.errors.push(DiagnosticError::new(error, file_id));
    }

    /// エラーがあるかどうか
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// エラーの数
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// すべてのエラーを取得
    pub fn errors(&self) -> &[DiagnosticError] {
        &self.errors
    }

    /// 最初のエラーを取得
    pub fn first_error(&self) -> Option<&DiagnosticError> {
        self.errors.first()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }
}

impl Reporter for ErrorCollector {
    fn report(&mut self, error: &TemplateError) {
        let file_id = self.file_id;
        self.add_error(error, file_id);
    }
}
