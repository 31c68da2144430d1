use crate::lang::TokenKind;

/// Binding power, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    None,
    Assignment,
    Or,
    And,
    Equality,
    Comparison,
    Term,
    Factor,
    Unary,
    Call,
    Primary,
}

impl Precedence {
    /// One level tighter; used for the right operand of left-associative operators.
    pub fn next(self) -> Precedence {
        use Precedence::*;
        match self {
            None => Assignment,
            Assignment => Or,
            Or => And,
            And => Equality,
            Equality => Comparison,
            Comparison => Term,
            Term => Factor,
            Factor => Unary,
            Unary => Call,
            Call | Primary => Primary,
        }
    }
}

/// Parse actions the compiler knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFn {
    Grouping,
    Unary,
    Binary,
    Number,
    String,
    Literal,
    Variable,
    And,
    Or,
}

#[derive(Debug, Clone, Copy)]
pub struct ParseRule {
    pub prefix: Option<ParseFn>,
    pub infix: Option<ParseFn>,
    pub precedence: Precedence,
}

const fn rule(prefix: Option<ParseFn>, infix: Option<ParseFn>, precedence: Precedence) -> ParseRule {
    ParseRule {
        prefix,
        infix,
        precedence,
    }
}

const NONE: ParseRule = rule(None, None, Precedence::None);

// Indexed by `TokenKind as usize`; order must follow the enum.
const RULES: [ParseRule; TokenKind::COUNT] = [
    rule(Some(ParseFn::Grouping), None, Precedence::None), // LeftParen
    NONE,                                                  // RightParen
    NONE,                                                  // LeftBrace
    NONE,                                                  // RightBrace
    NONE,                                                  // Comma
    NONE,                                                  // Dot
    rule(Some(ParseFn::Unary), Some(ParseFn::Binary), Precedence::Term), // Minus
    rule(None, Some(ParseFn::Binary), Precedence::Term),   // Plus
    NONE,                                                  // Semicolon
    rule(None, Some(ParseFn::Binary), Precedence::Factor), // Slash
    rule(None, Some(ParseFn::Binary), Precedence::Factor), // Star
    rule(Some(ParseFn::Unary), None, Precedence::None),    // Bang
    rule(None, Some(ParseFn::Binary), Precedence::Equality), // BangEqual
    NONE,                                                  // Equal
    rule(None, Some(ParseFn::Binary), Precedence::Equality), // EqualEqual
    rule(None, Some(ParseFn::Binary), Precedence::Comparison), // Greater
    rule(None, Some(ParseFn::Binary), Precedence::Comparison), // GreaterEqual
    rule(None, Some(ParseFn::Binary), Precedence::Comparison), // Less
    rule(None, Some(ParseFn::Binary), Precedence::Comparison), // LessEqual
    rule(Some(ParseFn::Variable), None, Precedence::None), // Identifier
    rule(Some(ParseFn::String), None, Precedence::None),   // String
    rule(Some(ParseFn::Number), None, Precedence::None),   // Number
    rule(None, Some(ParseFn::And), Precedence::And),       // And
    NONE,                                                  // Class
    NONE,                                                  // Else
    rule(Some(ParseFn::Literal), None, Precedence::None),  // False
    NONE,                                                  // For
    NONE,                                                  // Fun
    NONE,                                                  // If
    rule(Some(ParseFn::Literal), None, Precedence::None),  // Nil
    rule(None, Some(ParseFn::Or), Precedence::Or),         // Or
    NONE,                                                  // Print
    NONE,                                                  // Return
    NONE,                                                  // Super
    NONE,                                                  // This
    rule(Some(ParseFn::Literal), None, Precedence::None),  // True
    NONE,                                                  // Var
    NONE,                                                  // While
    NONE,                                                  // Error
    NONE,                                                  // Eof
];

pub fn get_rule(kind: TokenKind) -> &'static ParseRule {
    &RULES[kind as usize]
}
