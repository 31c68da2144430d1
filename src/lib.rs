//! # Lox
//!
//! A single-pass compiler and stack virtual machine for a small subset
//! of the Lox language: expressions, `print`, `var`, blocks and `if`.
//!
//! Source text is scanned on demand and compiled straight to bytecode
//! without building a syntax tree. The resulting chunk runs on a value
//! stack; globals persist between chunks so a REPL can feed the same
//! runtime one line at a time.
//!
//! ```
//! use lox::mach::Runtime;
//!
//! let mut runtime = Runtime::default();
//! let chunk = runtime.compile("var a = \"lo\"; print a + \"x\";").unwrap();
//! let mut out = Vec::new();
//! runtime.run(chunk, &mut out).unwrap();
//! assert_eq!(out, b"lox\n");
//! ```

pub mod lang;
pub mod mach;
