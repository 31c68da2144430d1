use super::{Address, Opcode, Val};
use crate::error;
use crate::lang::{Error, LineNumber};

type Result<T> = std::result::Result<T, Error>;

/// ## Compiled bytecode
///
/// Append-only instruction bytes with a constant pool and one source
/// line recorded per byte. Only jump operands are rewritten in place.
#[derive(Debug, Clone, Default)]
pub struct Chunk {
    name: String,
    code: Vec<u8>,
    constants: Vec<Val>,
    lines: Vec<LineNumber>,
}

impl Chunk {
    pub fn new(name: &str) -> Chunk {
        Chunk {
            name: name.to_string(),
            ..Chunk::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &[u8] {
        &self.code
    }

    pub fn constants(&self) -> &[Val] {
        &self.constants
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn write(&mut self, byte: u8, line: LineNumber) {
        self.code.push(byte);
        self.lines.push(line);
    }

    pub fn write_op(&mut self, op: Opcode, line: LineNumber) {
        self.write(op.into(), line)
    }

    pub fn add_constant(&mut self, val: Val) -> Result<u8> {
        if self.constants.len() > u8::max_value() as usize {
            return Err(error!(TooManyConstants; "Too many constants in one chunk"));
        }
        self.constants.push(val);
        Ok((self.constants.len() - 1) as u8)
    }

    pub fn constant(&self, index: u8) -> Option<&Val> {
        self.constants.get(index as usize)
    }

    pub fn byte(&self, addr: Address) -> Option<u8> {
        self.code.get(addr).copied()
    }

    pub fn read_u16(&self, addr: Address) -> Option<u16> {
        let high = self.byte(addr)? as u16;
        let low = self.byte(addr + 1)? as u16;
        Some((high << 8) | low)
    }

    pub fn patch_u16(&mut self, addr: Address, value: u16) {
        debug_assert!(addr + 1 < self.code.len());
        self.code[addr] = (value >> 8) as u8;
        self.code[addr + 1] = value as u8;
    }

    /// Source line of the byte at `addr`. Offsets past the end report the last line.
    pub fn line(&self, addr: Address) -> LineNumber {
        match self.lines.get(addr) {
            Some(line) => *line,
            None => self.lines.last().copied().unwrap_or(0),
        }
    }
}

impl std::fmt::Display for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", super::disassemble(self))
    }
}
