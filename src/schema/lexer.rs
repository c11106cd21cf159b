//! Logos-based lexer for the definition-file grammar (§6 "Definition-file
//! grammar (bit-exact)").

use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*[^/])*\*/")]
pub enum Token {
    #[token("type")]
    KwType,
    #[token("def")]
    KwDef,
    #[token("shared")]
    KwShared,
    #[token("extends")]
    KwExtends,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[regex(r#""([^"\\]|\\[ntr"\\])*""#, |lex| unescape(lex.slice()))]
    StringLit(String),

    // Numeric literals are permitted and skipped (§6): still lexed as a
    // token so the parser can step over them without special-casing.
    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    #[token("@")]
    At,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
}

/// Unquote a string literal, interpreting `\n \t \" \\` escapes (§6).
fn unescape(raw: &str) -> String {
    let inner = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => out.push(other),
                None => {}
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Tokenize an entire definition file, tracking 1-based line numbers for
/// per-line parse diagnostics (§4.A, §7).
pub fn tokenize(input: &str) -> Vec<(Token, usize)> {
    let mut line = 1usize;
    let mut out = Vec::new();
    let mut lexer = Token::lexer(input);
    let mut consumed = 0usize;
    while let Some(result) = lexer.next() {
        let slice_start = lexer.span().start;
        line += input[consumed..slice_start].matches('\n').count();
        consumed = slice_start;
        if let Ok(tok) = result {
            out.push((tok, line));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unescapes_common_sequences() {
        assert_eq!(unescape(r#""a\nb\tc\"d\\e""#), "a\nb\tc\"d\\e");
    }

    #[test]
    fn tracks_line_numbers_across_newlines() {
        let tokens = tokenize("type A {\n  def foo(): int\n}\n");
        let foo_line = tokens
            .iter()
            .find(|(t, _)| matches!(t, Token::Ident(n) if n == "foo"))
            .map(|(_, l)| *l);
        assert_eq!(foo_line, Some(2));
    }

    #[test]
    fn skips_comments() {
        let tokens = tokenize("// comment\ntype A {}\n/* block */");
        assert!(matches!(tokens[0].0, Token::KwType));
    }
}
