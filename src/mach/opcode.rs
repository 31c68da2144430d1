use std::convert::TryFrom;

/// ## Virtual machine instruction set
///
/// The Lox virtual machine has no registers.
/// Every operation is performed on the stack.
///
/// For example: `var a = 3 * b;` compiles to
/// `[CONSTANT 3, GET_GLOBAL b, MULTIPLY, DEFINE_GLOBAL a]`
///
/// Each opcode is one byte, followed by `operand_len()` operand bytes.

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    // *** Stack manipulation
    /// Push constant pool entry named by the operand byte.
    Constant,
    Nil,
    True,
    False,
    Pop,

    // *** Variables
    /// Operand is the absolute stack slot of the local.
    GetLocal,
    SetLocal,
    /// Operand is the constant pool index of the variable name.
    GetGlobal,
    DefineGlobal,
    SetGlobal,

    // *** Expression operations
    Equal,
    Greater,
    Less,
    Add,
    Subtract,
    Multiply,
    Divide,
    Not,
    Negate,

    // *** Statements
    Print,

    // *** Branch control
    /// Unconditional forward branch by a big-endian u16 operand.
    Jump,
    /// Branch if the top of the stack is falsey. Does not pop.
    JumpIfFalse,
    Return,
}

const OPCODES: [Opcode; 23] = [
    Opcode::Constant,
    Opcode::Nil,
    Opcode::True,
    Opcode::False,
    Opcode::Pop,
    Opcode::GetLocal,
    Opcode::SetLocal,
    Opcode::GetGlobal,
    Opcode::DefineGlobal,
    Opcode::SetGlobal,
    Opcode::Equal,
    Opcode::Greater,
    Opcode::Less,
    Opcode::Add,
    Opcode::Subtract,
    Opcode::Multiply,
    Opcode::Divide,
    Opcode::Not,
    Opcode::Negate,
    Opcode::Print,
    Opcode::Jump,
    Opcode::JumpIfFalse,
    Opcode::Return,
];

impl Opcode {
    pub fn operand_len(self) -> usize {
        use Opcode::*;
        match self {
            Constant | GetLocal | SetLocal | GetGlobal | DefineGlobal | SetGlobal => 1,
            Jump | JumpIfFalse => 2,
            _ => 0,
        }
    }
}

impl From<Opcode> for u8 {
    fn from(op: Opcode) -> u8 {
        op as u8
    }
}

impl TryFrom<u8> for Opcode {
    type Error = u8;
    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        OPCODES.get(byte as usize).copied().ok_or(byte)
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Opcode::*;
        match self {
            Constant => write!(f, "CONSTANT"),
            Nil => write!(f, "NIL"),
            True => write!(f, "TRUE"),
            False => write!(f, "FALSE"),
            Pop => write!(f, "POP"),

            GetLocal => write!(f, "GET_LOCAL"),
            SetLocal => write!(f, "SET_LOCAL"),
            GetGlobal => write!(f, "GET_GLOBAL"),
            DefineGlobal => write!(f, "DEFINE_GLOBAL"),
            SetGlobal => write!(f, "SET_GLOBAL"),

            Equal => write!(f, "EQUAL"),
            Greater => write!(f, "GREATER"),
            Less => write!(f, "LESS"),
            Add => write!(f, "ADD"),
            Subtract => write!(f, "SUBTRACT"),
            Multiply => write!(f, "MULTIPLY"),
            Divide => write!(f, "DIVIDE"),
            Not => write!(f, "NOT"),
            Negate => write!(f, "NEGATE"),

            Print => write!(f, "PRINT"),

            Jump => write!(f, "JUMP"),
            JumpIfFalse => write!(f, "JUMP_IF_FALSE"),
            Return => write!(f, "RETURN"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_discriminants() {
        for (index, op) in OPCODES.iter().enumerate() {
            assert_eq!(*op as usize, index);
            assert_eq!(Opcode::try_from(index as u8), Ok(*op));
        }
        assert_eq!(Opcode::try_from(OPCODES.len() as u8), Err(OPCODES.len() as u8));
    }
}
