use std::path::Path;

pub use logos::Logos;
use logos::Span;

/// Lexical shape of the prefs dotfile. Section headers and entries both run
/// to end of line, so the stream needs no newline token; blank lines and
/// `#`/`;` comment lines are skipped.
#[derive(Logos, Debug, PartialEq, Clone, Copy)]
#[logos(skip r"([ \t\r\n\f]+|[#;][^\n]*)")]
pub enum Line<'i> {
    #[regex(r"\[[^\]\r\n]*\]", |lex| { let s = lex.slice(); s[1..s.len() - 1].trim() })]
    Section(&'i str),

    #[regex(r"[A-Za-z_][A-Za-z0-9_.\-]*[ \t]*=[^\n]*", entry)]
    Entry((&'i str, &'i str)),
}

fn entry<'i>(lex: &mut logos::Lexer<'i, Line<'i>>) -> (&'i str, &'i str) {
    let (key, value) = lex.slice().split_once('=').expect("the pattern has an '='");
    (key.trim_end(), value.trim())
}

/// Pieces of a value string under `%(key)s` interpolation. `%%` is a literal
/// percent; a stray `%` matches nothing and surfaces as a lexer error.
#[derive(Logos, Debug, PartialEq, Clone, Copy)]
pub enum Piece<'i> {
    #[regex(r"%\([A-Za-z_][A-Za-z0-9_.\-]*\)s", |lex| { let s = lex.slice(); &s[2..s.len() - 2] })]
    Reference(&'i str),

    #[token("%%")]
    Escape,

    #[regex(r"[^%]+")]
    Text(&'i str),
}

pub fn line_col(inp: &str, span: &Span) -> (usize, usize) {
    let upto = &inp[..span.start];
    let line = upto.matches('\n').count() + 1;
    let col = span.start - upto.rfind('\n').map_or(0, |i| i + 1) + 1;
    (line, col)
}

pub fn get_line(inp: &str, line: usize) -> &str {
    inp.lines().nth(line - 1).unwrap_or("")
}

/// Render a diagnostic pointing at `span`, with the offending line quoted.
pub fn span_error(msg: &str, path: &Path, inp: &str, span: &Span) -> String {
    let (line, col) = line_col(inp, span);
    format!(
        "{msg}\n    {path}:{line}:{col} {contents}",
        path = path.display(),
        contents = get_line(inp, line)
    )
}

#[cfg(test)]
mod tests {
    use super::{Line, Logos, Piece};

    #[test]
    fn tokenize() {
        use Line::*;

        let inp = "\
# defaults for everyone
[DEFAULT]
author = Joel ; inline
keywords = base

[plone3_theme]
license_name = BSD
";

        let tokens = Line::lexer(inp)
            .map(std::result::Result::unwrap)
            .collect::<Vec<_>>();

        assert_eq!(
            tokens.as_slice(),
            &[
                Section("DEFAULT"),
                Entry(("author", "Joel ; inline")),
                Entry(("keywords", "base")),
                Section("plone3_theme"),
                Entry(("license_name", "BSD")),
            ]
        );
    }

    #[test]
    fn garbage_line_is_a_lexer_error() {
        let mut lexer = Line::lexer("[DEFAULT]\n!!!\n");
        assert!(lexer.next().unwrap().is_ok());
        assert!(lexer.next().unwrap().is_err());
    }

    #[test]
    fn pieces() {
        use Piece::*;

        let tokens = Piece::lexer("100%% of %(keywords)s here")
            .map(std::result::Result::unwrap)
            .collect::<Vec<_>>();

        assert_eq!(
            tokens.as_slice(),
            &[
                Text("100"),
                Escape,
                Text(" of "),
                Reference("keywords"),
                Text(" here"),
            ]
        );
    }

    #[test]
    fn stray_percent_is_a_lexer_error() {
        assert!(Piece::lexer("100% sure").any(|t| t.is_err()));
    }
}
