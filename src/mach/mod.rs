/*!
## Rust Machine Module

This Rust module is a single-pass compiler and virtual machine for Lox.

*/

pub type Address = usize;

/// Capacity of the value stack and of the compile-time local table.
pub const STACK_MAX: usize = 256;

mod chunk;
mod compile;
mod config;
mod listing;
mod object;
mod opcode;
mod operation;
mod rules;
mod runtime;
mod stack;
mod val;

pub use chunk::Chunk;
pub use compile::compile;
pub use config::Config;
pub use listing::disassemble;
pub use listing::disassemble_instruction;
pub use object::Heap;
pub use object::Object;
pub use opcode::Opcode;
pub use runtime::Event;
pub use runtime::Runtime;
pub use stack::Stack;
pub use val::Val;

#[cfg(test)]
mod tests;
