//! Output rendering for compiled templates.

use std::borrow::Cow;

/// How interpolated expressions are written into the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Output lives inside a host string literal; each expression is spliced
    /// in with concatenation: `" + expr + "`.
    #[default]
    StringLiteral,
    /// Expression text is inserted verbatim.
    Code,
}

impl OutputMode {
    /// Literal text between tags. Escaped in both modes.
    pub fn render_text(self, text: &str) -> Cow<'_, str> {
        escape_string(text)
    }

    pub fn render_expression(self, expression: &str) -> Cow<'_, str> {
        match self {
            OutputMode::StringLiteral => Cow::Owned(format!("\" + {} + \"", expression)),
            OutputMode::Code => Cow::Borrowed(expression),
        }
    }

    /// Turns compiled output into a complete host expression. String mode
    /// adds the surrounding quotes; code mode returns the output untouched.
    pub fn wrap(self, output: &str) -> String {
        match self {
            OutputMode::StringLiteral => format!("\"{}\"", output),
            OutputMode::Code => output.to_owned(),
        }
    }
}

/// Escapes characters that would break a double-quoted host string literal.
pub fn escape_string(text: &str) -> Cow<'_, str> {
    if !text.contains(['\\', '"', '\n', '\r']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_string() {
        assert_eq!(escape_string("plain"), "plain");
        assert_eq!(escape_string("say \"hi\"\n"), "say \\\"hi\\\"\\n");
        assert_eq!(escape_string(r"C:\dir"), r"C:\\dir");
    }

    #[test]
    fn test_render_expression() {
        assert_eq!(OutputMode::StringLiteral.render_expression("a + 1"), "\" + a + 1 + \"");
        assert_eq!(OutputMode::Code.render_expression("a + 1"), "a + 1");
    }

    #[test]
    fn test_wrap() {
        assert_eq!(OutputMode::StringLiteral.wrap("Hi \" + name + \"!"), "\"Hi \" + name + \"!\"");
        assert_eq!(OutputMode::Code.wrap("a.b"), "a.b");
    }
}
