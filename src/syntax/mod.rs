//! The BUILD manifest format: lexing, parsing, rendering.
//!
//! Manifests are written in a small declarative DSL of keyword-argument
//! calls:
//!
//! ```text
//! python_library(
//!   name = 'lib',
//!   sources = ['handlers.py'],
//!   dependencies = [
//!     ':util',
//!     'service/http/src/main/java:lib',
//!   ],
//! )
//! ```

pub mod lexer;
pub mod parser;
pub mod render;

pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{parse_build_file, SyntaxError};
pub use render::render_build_file;

/// A half-open byte range in a manifest's source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub offset: usize,
    pub len: usize,
}

impl Span {
    pub fn new(offset: usize, len: usize) -> Self {
        Span { offset, len }
    }
}
