//! Rich error reporting using codespan-reporting.

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream, WriteColor};

use crate::dts::ParseError;

/// Build a diagnostic for a parse error in `source`.
fn parse_diagnostic(file_id: usize, source: &str, error: &ParseError) -> Diagnostic<usize> {
    let start = error.pos.min(source.len());
    let end = source[start..]
        .char_indices()
        .nth(1)
        .map_or(source.len(), |(offset, _)| start + offset);

    Diagnostic::error()
        .with_message(&error.message)
        .with_labels(vec![
            Label::primary(file_id, start..end).with_message("error occurs here")
        ])
}

/// Write a parse error with source context to `writer`.
pub fn write_parse_error(
    writer: &mut dyn WriteColor,
    name: &str,
    source: &str,
    error: &ParseError,
) -> Result<(), codespan_reporting::files::Error> {
    let mut files = SimpleFiles::new();
    let file_id = files.add(name, source);
    let diagnostic = parse_diagnostic(file_id, source, error);
    term::emit(writer, &term::Config::default(), &files, &diagnostic)
}

/// Report a parse error to stderr.
pub fn report_parse_error(name: &str, source: &str, error: &ParseError) {
    let writer = StandardStream::stderr(ColorChoice::Auto);
    let _ = write_parse_error(&mut writer.lock(), name, source, error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use codespan_reporting::term::termcolor::NoColor;

    #[test]
    fn test_parse_error_rendering() {
        let source = "declare namespace ts {\n    interface A { x: ; }\n}\n";
        let error = crate::dts::parse(source).unwrap_err();

        let mut out = NoColor::new(Vec::new());
        write_parse_error(&mut out, "typescript.d.ts", source, &error).unwrap();
        let rendered = String::from_utf8(out.into_inner()).unwrap();

        assert!(rendered.contains("error"));
        assert!(rendered.contains("typescript.d.ts:2:22"));
        assert!(rendered.contains("interface A { x: ; }"));
    }

    #[test]
    fn test_error_at_end_of_input() {
        let source = "interface A {";
        let error = crate::dts::parse(source).unwrap_err();

        let mut out = NoColor::new(Vec::new());
        assert!(write_parse_error(&mut out, "a.d.ts", source, &error).is_ok());
    }
}
