//! Recursive-descent parser for the definition-file grammar (§6).
//!
//! Parse errors are per-declaration: a malformed `type` block is skipped
//! (by brace-balancing back to its closing `}`) and parsing resumes at
//! the next top-level declaration, matching §4.A's "parse errors are
//! reported per-line but do not abort the load".

use super::error::SchemaError;
use super::lexer::{self, Token};
use super::model::{MappingKind, MethodEntry, ParamEntry, SchemaType};

pub struct ParseOutcome {
    pub types: Vec<SchemaType>,
    pub errors: Vec<SchemaError>,
}

pub fn parse_file(file_name: &str, source: &str) -> ParseOutcome {
    let tokens = lexer::tokenize(source);
    let mut parser = Parser {
        file: file_name.to_string(),
        tokens,
        pos: 0,
        errors: Vec::new(),
    };
    let types = parser.parse_file();
    ParseOutcome {
        types,
        errors: parser.errors,
    }
}

struct Parser {
    file: String,
    tokens: Vec<(Token, usize)>,
    pos: usize,
    errors: Vec<SchemaError>,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, l)| *l)
            .unwrap_or_else(|| self.tokens.last().map(|(_, l)| *l).unwrap_or(1))
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, want: &Token) -> bool {
        if self.peek() == Some(want) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(SchemaError::Parse {
            file: self.file.clone(),
            line: self.line(),
            message: message.into(),
        });
    }

    fn ident(&mut self) -> Option<String> {
        match self.peek() {
            Some(Token::Ident(_)) => match self.advance() {
                Some(Token::Ident(s)) => Some(s),
                _ => unreachable!(),
            },
            _ => None,
        }
    }

    fn parse_file(&mut self) -> Vec<SchemaType> {
        let mut types = Vec::new();
        while self.peek().is_some() {
            let before = self.pos;
            match self.parse_type_decl() {
                Some(ty) => types.push(ty),
                None => {
                    if self.pos == before {
                        // Could not make progress: skip one token to avoid
                        // an infinite loop, and keep scanning the file.
                        self.advance();
                    }
                }
            }
        }
        types
    }

    /// Consume `@name` or `@name("value")` annotations, returning
    /// (name, optional string value) pairs.
    fn parse_annotations(&mut self) -> Vec<(String, Option<String>)> {
        let mut out = Vec::new();
        while self.eat(&Token::At) {
            let Some(name) = self.ident() else {
                self.error("expected annotation name after '@'");
                break;
            };
            let mut value = None;
            if self.eat(&Token::LParen) {
                if let Some(Token::StringLit(s)) = self.peek().cloned() {
                    self.advance();
                    value = Some(s);
                } else {
                    self.error("expected string literal in annotation argument");
                }
                if !self.eat(&Token::RParen) {
                    self.error("expected ')' closing annotation argument");
                }
            }
            out.push((name, value));
        }
        out
    }

    /// `Type` or `Type<T[,N]>` — a generic suffix is accepted and
    /// discarded; only the base name is kept (§6 grammar).
    fn parse_type_ref(&mut self) -> Option<String> {
        let name = self.ident()?;
        if self.eat(&Token::Lt) {
            let _ = self.ident();
            if self.eat(&Token::Comma) {
                let _ = self.advance(); // numeric literal
            }
            if !self.eat(&Token::Gt) {
                self.error("expected '>' closing generic parameter list");
            }
        }
        Some(name)
    }

    fn parse_type_decl(&mut self) -> Option<SchemaType> {
        let annotations = self.parse_annotations();
        if !self.eat(&Token::KwType) {
            if !annotations.is_empty() {
                self.error("expected 'type' after annotations");
            }
            return None;
        }
        let Some(name) = self.ident() else {
            self.error("expected type name after 'type'");
            self.recover_to_brace_close();
            return None;
        };
        let mut ty = SchemaType::new(name);
        for (ann, value) in &annotations {
            match ann.as_str() {
                "builtin" => ty.builtin = true,
                "nocopy" => ty.nocopy = true,
                "alias" => ty.alias_of = value.clone(),
                other => self.error(format!("unknown type-level annotation '{other}'")),
            }
        }

        // Optional generic parameter list on the declaration itself.
        if self.eat(&Token::Lt) {
            let _ = self.ident();
            if self.eat(&Token::Comma) {
                let _ = self.advance();
            }
            if !self.eat(&Token::Gt) {
                self.error("expected '>' closing generic parameter list");
            }
        }

        if self.eat(&Token::KwExtends) {
            match self.ident() {
                Some(base) => ty.extends = Some(base),
                None => self.error("expected base type name after 'extends'"),
            }
        }

        if !self.eat(&Token::LBrace) {
            self.error("expected '{' opening type body");
            self.recover_to_brace_close();
            return Some(ty);
        }

        loop {
            match self.peek() {
                Some(Token::RBrace) => {
                    self.advance();
                    break;
                }
                None => {
                    self.error("unexpected end of file inside type body");
                    break;
                }
                _ => {
                    if let Some(method) = self.parse_member() {
                        ty.methods.push(method);
                    } else {
                        // Could not parse a member; skip to the next `;`-free
                        // boundary by eating one token to make progress.
                        self.advance();
                    }
                }
            }
        }
        Some(ty)
    }

    fn parse_member(&mut self) -> Option<MethodEntry> {
        let annotations = self.parse_annotations();
        let shared = self.eat(&Token::KwShared);
        if !self.eat(&Token::KwDef) {
            if shared || !annotations.is_empty() {
                self.error("expected 'def' after member annotations");
            }
            return None;
        }
        let Some(name) = self.ident() else {
            self.error("expected method name after 'def'");
            return None;
        };
        if !self.eat(&Token::LParen) {
            self.error("expected '(' after method name");
            return None;
        }
        let mut params = Vec::new();
        if self.peek() != Some(&Token::RParen) {
            loop {
                let Some(ty) = self.parse_type_ref() else {
                    self.error("expected parameter type");
                    break;
                };
                let Some(pname) = self.ident() else {
                    self.error("expected parameter name");
                    break;
                };
                params.push(ParamEntry { ty, name: pname });
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
        }
        if !self.eat(&Token::RParen) {
            self.error("expected ')' closing parameter list");
        }

        let mut return_ty = "void".to_string();
        if self.eat(&Token::Colon) {
            match self.parse_type_ref() {
                Some(t) => return_ty = t,
                None => self.error("expected return type after ':'"),
            }
        }

        let mut mapping = MappingKind::None;
        for (ann, value) in annotations {
            match ann.as_str() {
                "map" => mapping = MappingKind::Map(value.unwrap_or_default()),
                "inline" => mapping = MappingKind::Inline(value.unwrap_or_default()),
                "intrinsic" => mapping = MappingKind::Intrinsic(value.unwrap_or_default()),
                other => self.error(format!("unknown method-level annotation '{other}'")),
            }
        }

        // Optional body: tokenized and discarded (§6).
        if self.eat(&Token::LBrace) {
            self.skip_balanced_braces();
        }

        Some(MethodEntry {
            name,
            return_ty,
            shared,
            mapping,
            params,
        })
    }

    /// Consume tokens until the matching `}` for a `{` already consumed.
    fn skip_balanced_braces(&mut self) {
        let mut depth = 1usize;
        while depth > 0 {
            match self.advance() {
                Some(Token::LBrace) => depth += 1,
                Some(Token::RBrace) => depth -= 1,
                Some(_) => {}
                None => break,
            }
        }
    }

    /// Error recovery: skip forward to (and past) the next `}` at brace
    /// depth zero, or end of file.
    fn recover_to_brace_close(&mut self) {
        let mut depth = 0i32;
        loop {
            match self.peek() {
                Some(Token::LBrace) => {
                    depth += 1;
                    self.advance();
                }
                Some(Token::RBrace) => {
                    self.advance();
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                }
                Some(_) => {
                    self.advance();
                }
                None => return,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_handle_type_with_methods() {
        let src = r#"
            @builtin @nocopy
            type Canvas extends Resource {
                @map("canvas::create")
                def create(): Canvas
                shared def width(Canvas self): int
            }
        "#;
        let outcome = parse_file("runtime.def", src);
        assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
        assert_eq!(outcome.types.len(), 1);
        let ty = &outcome.types[0];
        assert_eq!(ty.name, "Canvas");
        assert!(ty.builtin);
        assert!(ty.nocopy);
        assert_eq!(ty.extends.as_deref(), Some("Resource"));
        assert_eq!(ty.methods.len(), 2);
        assert_eq!(ty.methods[0].mapped_identifier(), Some("canvas::create"));
        assert!(ty.methods[1].shared);
    }

    #[test]
    fn recovers_from_a_malformed_declaration_and_keeps_parsing() {
        let src = r#"
            type Broken {
                def oops(
            }
            type Fine {
                def ok(): int
            }
        "#;
        let outcome = parse_file("runtime.def", src);
        assert!(!outcome.errors.is_empty());
        assert!(outcome.types.iter().any(|t| t.name == "Fine"));
    }

    #[test]
    fn discards_method_bodies() {
        let src = r#"
            type Thing {
                def compute(): int { if (true) { return 1; } return 0; }
            }
        "#;
        let outcome = parse_file("runtime.def", src);
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.types[0].methods[0].name, "compute");
    }
}
