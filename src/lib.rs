//! Moon Template Compiler Library
//!
//! Compiles templates with delimiter-marked tags (`{{ expr }}`) into a host
//! expression and collects the free identifiers each tag reads.
//!
//! ```
//! use moontpl::{compile, Dependencies, OutputMode};
//!
//! let mut deps = Dependencies::new();
//! let output = compile(
//!     "Hi {{ name }}!",
//!     ["{{", "}}"],
//!     [r"\{\{", r"\}\}"],
//!     &mut deps,
//!     OutputMode::StringLiteral,
//! )
//! .unwrap();
//!
//! assert_eq!(output, r#"Hi " + name + "!"#);
//! assert_eq!(deps.to_vec(), vec!["name"]);
//! ```

pub mod compiler;
pub mod error;
pub mod expression;
pub mod output;
pub mod scanner;
pub mod template;

// Re-export commonly used types
pub use compiler::{
    compile, BuildMode, CompilationState, CompileOptions, CompileReport, Compiler, Delimiters,
};
pub use error::{ErrorCollector, LogReporter, Reporter, TemplateError, TemplateResult};
pub use expression::{extract_dependencies, Dependencies, GLOBALS};
pub use output::OutputMode;
