//! Tokenizer for the Visual Format Language

pub mod ast;
mod grammar;
pub mod lexer;

pub use ast::*;
pub use grammar::{referenced_views, tokenize};
