use super::LineNumber;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: &'a str,
    pub line: LineNumber,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, lexeme: &'a str, line: LineNumber) -> Token<'a> {
        Token { kind, lexeme, line }
    }

    /// Placeholder used before the first token has been scanned.
    pub fn synthetic() -> Token<'static> {
        Token::new(TokenKind::Eof, "", 0)
    }
}

impl<'a> std::fmt::Display for Token<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.lexeme)
    }
}

/// Discriminants are dense so the compiler can index its rule table by `kind as usize`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Single-character tokens.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,
    // One or two character tokens.
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    // Literals.
    Identifier,
    String,
    Number,
    // Keywords.
    And,
    Class,
    Else,
    False,
    For,
    Fun,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    Error,
    Eof,
}

impl TokenKind {
    pub const COUNT: usize = TokenKind::Eof as usize + 1;

    /// True for keywords that begin a declaration or statement.
    pub fn starts_statement(self) -> bool {
        use TokenKind::*;
        match self {
            Class | Fun | Var | For | If | While | Print | Return => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_covers_every_kind() {
        assert_eq!(TokenKind::COUNT, 40);
        assert_eq!(TokenKind::LeftParen as usize, 0);
    }

    #[test]
    fn test_starts_statement() {
        assert!(TokenKind::Var.starts_statement());
        assert!(TokenKind::Print.starts_statement());
        assert!(!TokenKind::Else.starts_statement());
        assert!(!TokenKind::Identifier.starts_statement());
    }
}
