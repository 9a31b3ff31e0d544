//! Recursive-descent parser for manifest declarations.
//!
//! A manifest is a sequence of keyword-argument calls. The parser accepts
//! the four declaration forms (`target`, `python_library`, `python_binary`,
//! `python_tests`), with keyword arguments in any order and optional
//! trailing commas.

use thiserror::Error;

use crate::core::address::{Address, AddressError};
use crate::core::target::{DepRef, Target, TargetKind};
use crate::syntax::lexer::{LexError, Lexer, Token, TokenKind};
use crate::syntax::Span;

/// A manifest syntax error with the offending span.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected}, found {found}")]
    Unexpected {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("unknown declaration form `{form}`")]
    UnknownForm { form: String, span: Span },

    #[error("`{form}` does not accept the `{attr}` attribute")]
    UnknownAttribute {
        form: &'static str,
        attr: String,
        span: Span,
    },

    #[error("`{attr}` takes {expected}")]
    AttributeType {
        attr: String,
        expected: &'static str,
        span: Span,
    },

    #[error("duplicate `{attr}` attribute")]
    DuplicateAttribute { attr: String, span: Span },

    #[error("`{form}` declaration is missing its `name`")]
    MissingName { form: &'static str, span: Span },

    #[error("`python_binary` takes either `source` or `entry_point`, not both")]
    AmbiguousEntryPoint { span: Span },

    #[error("invalid dependency reference `{spec}`: {source}")]
    BadDependency {
        spec: String,
        span: Span,
        source: AddressError,
    },

    #[error("invalid target name: {source}")]
    BadName { span: Span, source: AddressError },
}

impl SyntaxError {
    /// The span where the error occurred.
    pub fn span(&self) -> Span {
        match self {
            SyntaxError::Lex(e) => e.span(),
            SyntaxError::Unexpected { span, .. }
            | SyntaxError::UnknownForm { span, .. }
            | SyntaxError::UnknownAttribute { span, .. }
            | SyntaxError::AttributeType { span, .. }
            | SyntaxError::DuplicateAttribute { span, .. }
            | SyntaxError::MissingName { span, .. }
            | SyntaxError::AmbiguousEntryPoint { span }
            | SyntaxError::BadDependency { span, .. }
            | SyntaxError::BadName { span, .. } => *span,
        }
    }
}

/// Parse a manifest's text into its declared targets.
///
/// `package` is the manifest's directory relative to the workspace root;
/// relative dependency references (`:name`) resolve against it.
pub fn parse_build_file(package: &str, text: &str) -> Result<Vec<Target>, SyntaxError> {
    let tokens = Lexer::new(text).tokenize()?;
    Parser {
        package,
        tokens,
        pos: 0,
    }
    .parse_all()
}

struct Parser<'a> {
    package: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

/// One keyword argument's parsed value.
enum Value {
    Str(String, Span),
    List(Vec<(String, Span)>),
}

impl<'a> Parser<'a> {
    fn parse_all(mut self) -> Result<Vec<Target>, SyntaxError> {
        let mut targets = Vec::new();
        while !self.at_eof() {
            targets.push(self.parse_declaration()?);
        }
        Ok(targets)
    }

    fn parse_declaration(&mut self) -> Result<Target, SyntaxError> {
        let (form, form_span) = self.expect_ident()?;
        let Some(kind) = TargetKind::from_declaration_form(&form) else {
            return Err(SyntaxError::UnknownForm {
                form,
                span: form_span,
            });
        };
        let form = kind.declaration_form();

        self.expect(TokenKind::LParen)?;

        let mut name: Option<(String, Span)> = None;
        let mut sources: Option<Vec<(String, Span)>> = None;
        let mut dependencies: Option<Vec<(String, Span)>> = None;
        let mut tags: Option<Vec<(String, Span)>> = None;
        let mut entry_point: Option<(String, Span)> = None;
        let mut source: Option<(String, Span)> = None;

        while !self.check(&TokenKind::RParen) {
            let (attr, attr_span) = self.expect_ident()?;
            self.expect(TokenKind::Equals)?;
            let value = self.parse_value()?;

            let dup = |attr: &str, span| SyntaxError::DuplicateAttribute {
                attr: attr.to_string(),
                span,
            };
            let mismatch = |attr: &str, expected, span| SyntaxError::AttributeType {
                attr: attr.to_string(),
                expected,
                span,
            };

            match (attr.as_str(), value) {
                ("name", Value::Str(v, s)) => {
                    if name.replace((v, s)).is_some() {
                        return Err(dup("name", attr_span));
                    }
                }
                ("dependencies", Value::List(v)) => {
                    if dependencies.replace(v).is_some() {
                        return Err(dup("dependencies", attr_span));
                    }
                }
                ("sources", Value::List(v)) if kind.has_sources() => {
                    if sources.replace(v).is_some() {
                        return Err(dup("sources", attr_span));
                    }
                }
                ("tags", Value::List(v)) if kind == TargetKind::Tests => {
                    if tags.replace(v).is_some() {
                        return Err(dup("tags", attr_span));
                    }
                }
                ("entry_point", Value::Str(v, s)) if kind == TargetKind::Binary => {
                    if entry_point.replace((v, s)).is_some() {
                        return Err(dup("entry_point", attr_span));
                    }
                }
                ("source", Value::Str(v, s)) if kind == TargetKind::Binary => {
                    if source.replace((v, s)).is_some() {
                        return Err(dup("source", attr_span));
                    }
                }
                // A known attribute with the wrong value shape reads better
                // as a type error than as an unknown attribute.
                ("name", Value::List(_)) => {
                    return Err(mismatch("name", "a string", attr_span));
                }
                ("dependencies", Value::Str(..)) => {
                    return Err(mismatch("dependencies", "a list of strings", attr_span));
                }
                ("sources", Value::Str(..)) if kind.has_sources() => {
                    return Err(mismatch("sources", "a list of strings", attr_span));
                }
                ("tags", Value::Str(..)) if kind == TargetKind::Tests => {
                    return Err(mismatch("tags", "a list of strings", attr_span));
                }
                ("entry_point", Value::List(_)) if kind == TargetKind::Binary => {
                    return Err(mismatch("entry_point", "a string", attr_span));
                }
                ("source", Value::List(_)) if kind == TargetKind::Binary => {
                    return Err(mismatch("source", "a string", attr_span));
                }
                _ => {
                    return Err(SyntaxError::UnknownAttribute {
                        form,
                        attr,
                        span: attr_span,
                    });
                }
            }

            // Commas separate arguments; a trailing one is fine.
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;

        let Some((name, name_span)) = name else {
            return Err(SyntaxError::MissingName {
                form,
                span: form_span,
            });
        };

        if entry_point.is_some() && source.is_some() {
            return Err(SyntaxError::AmbiguousEntryPoint { span: form_span });
        }

        let address = Address::parse_relative(self.package, &format!(":{}", name)).map_err(
            |source| SyntaxError::BadName {
                span: name_span,
                source,
            },
        )?;

        let dependencies = dependencies
            .unwrap_or_default()
            .into_iter()
            .map(|(spec, span)| {
                let address = Address::parse_relative(self.package, &spec).map_err(|source| {
                    SyntaxError::BadDependency {
                        spec: spec.clone(),
                        span,
                        source,
                    }
                })?;
                Ok(DepRef {
                    spec,
                    address,
                    span,
                })
            })
            .collect::<Result<Vec<_>, SyntaxError>>()?;

        // python_binary's single `source` is carried as a one-element
        // sources list; `entry_point` stays separate.
        let mut sources: Vec<String> =
            sources.unwrap_or_default().into_iter().map(|(s, _)| s).collect();
        if let Some((src, _)) = source {
            sources.push(src);
        }

        Ok(Target {
            address,
            kind,
            sources,
            dependencies,
            tags: tags.unwrap_or_default().into_iter().map(|(t, _)| t).collect(),
            entry_point: entry_point.map(|(e, _)| e),
            span: form_span,
        })
    }

    fn parse_value(&mut self) -> Result<Value, SyntaxError> {
        if self.eat(&TokenKind::LBracket) {
            let mut items = Vec::new();
            while !self.check(&TokenKind::RBracket) {
                let (s, span) = self.expect_str()?;
                items.push((s, span));
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RBracket)?;
            Ok(Value::List(items))
        } else {
            let (s, span) = self.expect_str()?;
            Ok(Value::Str(s, span))
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn at_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), SyntaxError> {
        if self.eat(&kind) {
            Ok(())
        } else {
            let found = self.peek();
            Err(SyntaxError::Unexpected {
                expected: kind.describe(),
                found: found.kind.describe(),
                span: found.span,
            })
        }
    }

    fn expect_ident(&mut self) -> Result<(String, Span), SyntaxError> {
        let token = self.peek().clone();
        if let TokenKind::Ident(name) = token.kind {
            self.pos += 1;
            Ok((name, token.span))
        } else {
            Err(SyntaxError::Unexpected {
                expected: "identifier".to_string(),
                found: token.kind.describe(),
                span: token.span,
            })
        }
    }

    fn expect_str(&mut self) -> Result<(String, Span), SyntaxError> {
        let token = self.peek().clone();
        if let TokenKind::Str(s) = token.kind {
            self.pos += 1;
            Ok((s, token.span))
        } else {
            Err(SyntaxError::Unexpected {
                expected: "string literal".to_string(),
                found: token.kind.describe(),
                span: token.span,
            })
        }
    }
}
