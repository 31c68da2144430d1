/*!
# Rust Language Module

This Rust module provides lexical analysis of the Lox language
and the diagnostics shared by the compiler and the virtual machine.

*/

pub type LineNumber = usize;

#[macro_use]
mod error;
mod lex;
mod token;

pub use error::Error;
pub use error::ErrorCode;
pub use error::Location;
pub use lex::lex;
pub use lex::Lexer;
pub use token::Token;
pub use token::TokenKind;
