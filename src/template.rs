//! Two-mode (text / tag) driver over the scanner.

use crate::error::{TemplateError, TemplateResult};
use crate::expression::extract_dependencies;
use crate::output::OutputMode;
use crate::scanner::{scan_until, scan_whitespace, ScanState, Span};

/// Alternates between literal text and tags until the input is consumed,
/// appending to `state.output` and recording dependencies as it goes.
///
/// Stops at the first tag with no closing delimiter and returns
/// [`TemplateError::UnclosedTag`]; nothing after that tag is emitted.
pub fn compile_template_body(state: &mut ScanState<'_>, mode: OutputMode) -> TemplateResult<()> {
    while !state.is_at_end() {
        // Text up to the next tag
        let open = state.open;
        let text = scan_until(state, open);
        if !text.is_empty() {
            state.output.push_str(&mode.render_text(text));
        }

        if state.is_at_end() {
            break;
        }

        let tag_start = state.cursor;
        state.advance(state.open_len);
        scan_whitespace(state);

        let close = state.close;
        let name = scan_until(state, close);

        if state.is_at_end() {
            return Err(TemplateError::UnclosedTag {
                close: state.close_delimiter.to_owned(),
                tag: name.to_owned(),
                span: Span::new(tag_start, state.cursor),
                partial_output: state.output.clone(),
            });
        }

        if !name.is_empty() {
            log::trace!("tag `{}` at {}", name, tag_start);
            extract_dependencies(name, &mut *state.dependencies);
            state.output.push_str(&mode.render_expression(name));
        }

        scan_whitespace(state);
        state.advance(state.close_len);
    }

    Ok(())
}
