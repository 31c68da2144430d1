use super::{Address, Chunk, Opcode};
use std::convert::TryFrom;
use std::fmt::Write;

/// Human readable listing of every instruction in `chunk`.
pub fn disassemble(chunk: &Chunk) -> String {
    let mut out = format!("== {} ==\n", chunk.name());
    let mut addr = 0;
    while addr < chunk.len() {
        let (line, next) = disassemble_instruction(chunk, addr);
        out.push_str(&line);
        out.push('\n');
        addr = next;
    }
    out
}

/// Formats the instruction at `addr` and returns the address of the next one.
///
/// Columns are byte offset, source line (`|` when unchanged from the
/// previous byte), mnemonic, then operands.
pub fn disassemble_instruction(chunk: &Chunk, addr: Address) -> (String, Address) {
    let mut s = format!("{:04} ", addr);
    if addr > 0 && chunk.line(addr) == chunk.line(addr - 1) {
        s.push_str("   | ");
    } else {
        let _ = write!(s, "{:4} ", chunk.line(addr));
    }
    let byte = match chunk.byte(addr) {
        Some(byte) => byte,
        None => return (s, addr + 1),
    };
    let op = match Opcode::try_from(byte) {
        Ok(op) => op,
        Err(byte) => {
            let _ = write!(s, "UNKNOWN {}", byte);
            return (s, addr + 1);
        }
    };
    use Opcode::*;
    match op {
        Constant | GetGlobal | DefineGlobal | SetGlobal => {
            let index = chunk.byte(addr + 1).unwrap_or(0);
            let _ = write!(s, "{:<16} {:4} '", op.to_string(), index);
            if let Some(val) = chunk.constant(index) {
                let _ = write!(s, "{}", val);
            }
            s.push('\'');
        }
        GetLocal | SetLocal => {
            let slot = chunk.byte(addr + 1).unwrap_or(0);
            let _ = write!(s, "{:<16} {:4}", op.to_string(), slot);
        }
        Jump | JumpIfFalse => {
            let distance = chunk.read_u16(addr + 1).unwrap_or(0) as usize;
            let _ = write!(s, "{:<16} {:4} -> {}", op.to_string(), addr, addr + 3 + distance);
        }
        _ => {
            let _ = write!(s, "{}", op);
        }
    }
    (s, addr + 1 + op.operand_len())
}
