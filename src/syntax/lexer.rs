//! Tokenizer for the manifest DSL.
//!
//! The surface is deliberately small: identifiers, quoted strings, the
//! punctuation of call syntax, and `#` line comments. Offsets are byte
//! positions into the original text so errors can carry spans.

use thiserror::Error;

use crate::syntax::Span;

/// Lexical error with position information.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unterminated string literal")]
    UnterminatedString { span: Span },

    #[error("unexpected character `{ch}`")]
    UnexpectedChar { ch: char, span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnterminatedString { span } => *span,
            LexError::UnexpectedChar { span, .. } => *span,
        }
    }
}

/// Kinds of tokens in the manifest DSL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Declaration form or keyword-argument name
    Ident(String),

    /// Quoted string literal (quotes stripped)
    Str(String),

    LParen,
    RParen,
    LBracket,
    RBracket,
    Equals,
    Comma,

    /// End of input
    Eof,
}

impl TokenKind {
    /// Human-readable description for error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("identifier `{}`", name),
            TokenKind::Str(_) => "string literal".to_string(),
            TokenKind::LParen => "`(`".to_string(),
            TokenKind::RParen => "`)`".to_string(),
            TokenKind::LBracket => "`[`".to_string(),
            TokenKind::RBracket => "`]`".to_string(),
            TokenKind::Equals => "`=`".to_string(),
            TokenKind::Comma => "`,`".to_string(),
            TokenKind::Eof => "end of file".to_string(),
        }
    }
}

/// A token with its source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Streaming tokenizer over manifest text.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { input, pos: 0 }
    }

    /// Tokenize the whole input, ending with an Eof token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia();

        let start = self.pos;
        let Some(ch) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                span: Span::new(start, 0),
            });
        };

        let kind = match ch {
            '(' => {
                self.bump();
                TokenKind::LParen
            }
            ')' => {
                self.bump();
                TokenKind::RParen
            }
            '[' => {
                self.bump();
                TokenKind::LBracket
            }
            ']' => {
                self.bump();
                TokenKind::RBracket
            }
            '=' => {
                self.bump();
                TokenKind::Equals
            }
            ',' => {
                self.bump();
                TokenKind::Comma
            }
            '\'' | '"' => self.lex_string(ch)?,
            c if c.is_ascii_alphabetic() || c == '_' => self.lex_ident(),
            c => {
                return Err(LexError::UnexpectedChar {
                    ch: c,
                    span: Span::new(start, c.len_utf8()),
                });
            }
        };

        Ok(Token {
            kind,
            span: Span::new(start, self.pos - start),
        })
    }

    fn lex_string(&mut self, quote: char) -> Result<TokenKind, LexError> {
        let start = self.pos;
        self.bump(); // opening quote
        let content_start = self.pos;
        while let Some(ch) = self.peek() {
            if ch == quote {
                let content = self.input[content_start..self.pos].to_string();
                self.bump(); // closing quote
                return Ok(TokenKind::Str(content));
            }
            if ch == '\n' {
                break;
            }
            self.bump();
        }
        Err(LexError::UnterminatedString {
            span: Span::new(start, self.pos - start),
        })
    }

    fn lex_ident(&mut self) -> TokenKind {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.bump();
            } else {
                break;
            }
        }
        TokenKind::Ident(self.input[start..self.pos].to_string())
    }

    fn skip_trivia(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.bump();
            } else if ch == '#' {
                while let Some(ch) = self.peek() {
                    if ch == '\n' {
                        break;
                    }
                    self.bump();
                }
            } else {
                break;
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(ch) = self.peek() {
            self.pos += ch.len_utf8();
        }
    }
}
