use super::{token::*, LineNumber};

pub fn lex(s: &str) -> Vec<Token<'_>> {
    Lexer::new(s).collect()
}

fn is_lox_digit(c: u8) -> bool {
    c.is_ascii_digit()
}

fn is_lox_alphabetic(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

/// ## On-demand tokenizer
///
/// Tokens borrow their lexemes from the source; nothing is copied.
/// Once the end of input is reached every further call yields `Eof`.
pub struct Lexer<'a> {
    source: &'a str,
    start: usize,
    current: usize,
    line: LineNumber,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Lexer<'a> {
        Lexer {
            source,
            start: 0,
            current: 0,
            line: 1,
            finished: false,
        }
    }

    pub fn scan_token(&mut self) -> Token<'a> {
        self.skip_whitespace();
        self.start = self.current;
        if self.is_at_end() {
            return self.make_token(TokenKind::Eof);
        }
        let c = self.advance();
        if is_lox_alphabetic(c) {
            return self.identifier();
        }
        if is_lox_digit(c) {
            return self.number();
        }
        use TokenKind::*;
        match c {
            b'(' => self.make_token(LeftParen),
            b')' => self.make_token(RightParen),
            b'{' => self.make_token(LeftBrace),
            b'}' => self.make_token(RightBrace),
            b';' => self.make_token(Semicolon),
            b',' => self.make_token(Comma),
            b'.' => self.make_token(Dot),
            b'-' => self.make_token(Minus),
            b'+' => self.make_token(Plus),
            b'/' => self.make_token(Slash),
            b'*' => self.make_token(Star),
            b'!' => self.either(b'=', BangEqual, Bang),
            b'=' => self.either(b'=', EqualEqual, Equal),
            b'<' => self.either(b'=', LessEqual, Less),
            b'>' => self.either(b'=', GreaterEqual, Greater),
            b'"' => self.string(),
            _ => {
                self.skip_char_remainder();
                self.error_token("Unexpected character")
            }
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> u8 {
        let c = self.source.as_bytes()[self.current];
        self.current += 1;
        c
    }

    // Keeps `current` on a char boundary after consuming a non-ASCII lead byte.
    fn skip_char_remainder(&mut self) {
        while !self.is_at_end() && !self.source.is_char_boundary(self.current) {
            self.current += 1;
        }
    }

    fn peek(&self) -> u8 {
        self.source.as_bytes().get(self.current).copied().unwrap_or(b'\0')
    }

    fn peek_next(&self) -> u8 {
        self.source
            .as_bytes()
            .get(self.current + 1)
            .copied()
            .unwrap_or(b'\0')
    }

    fn matches(&mut self, expected: u8) -> bool {
        if self.is_at_end() || self.peek() != expected {
            return false;
        }
        self.current += 1;
        true
    }

    fn either(&mut self, expected: u8, matched: TokenKind, otherwise: TokenKind) -> Token<'a> {
        let kind = if self.matches(expected) {
            matched
        } else {
            otherwise
        };
        self.make_token(kind)
    }

    fn make_token(&self, kind: TokenKind) -> Token<'a> {
        Token::new(kind, &self.source[self.start..self.current], self.line)
    }

    fn error_token(&self, message: &'static str) -> Token<'a> {
        Token::new(TokenKind::Error, message, self.line)
    }

    fn skip_whitespace(&mut self) {
        loop {
            match self.peek() {
                b' ' | b'\r' | b'\t' => {
                    self.current += 1;
                }
                b'\n' => {
                    self.line += 1;
                    self.current += 1;
                }
                b'/' if self.peek_next() == b'/' => {
                    while self.peek() != b'\n' && !self.is_at_end() {
                        self.current += 1;
                    }
                }
                _ => return,
            }
        }
    }

    fn string(&mut self) -> Token<'a> {
        while self.peek() != b'"' && !self.is_at_end() {
            if self.peek() == b'\n' {
                self.line += 1;
            }
            self.current += 1;
        }
        if self.is_at_end() {
            return self.error_token("Unterminated string");
        }
        self.current += 1;
        self.make_token(TokenKind::String)
    }

    fn number(&mut self) -> Token<'a> {
        while is_lox_digit(self.peek()) {
            self.current += 1;
        }
        if self.peek() == b'.' && is_lox_digit(self.peek_next()) {
            self.current += 1;
            while is_lox_digit(self.peek()) {
                self.current += 1;
            }
        }
        self.make_token(TokenKind::Number)
    }

    fn identifier(&mut self) -> Token<'a> {
        while is_lox_alphabetic(self.peek()) || is_lox_digit(self.peek()) {
            self.current += 1;
        }
        let kind = identifier_kind(&self.source[self.start..self.current]);
        self.make_token(kind)
    }
}

fn identifier_kind(text: &str) -> TokenKind {
    fn keyword(text: &str, word: &str, kind: TokenKind) -> TokenKind {
        if text == word {
            kind
        } else {
            TokenKind::Identifier
        }
    }
    use TokenKind::*;
    let bytes = text.as_bytes();
    match bytes[0] {
        b'a' => keyword(text, "and", And),
        b'c' => keyword(text, "class", Class),
        b'e' => keyword(text, "else", Else),
        b'f' => match bytes.get(1) {
            Some(b'a') => keyword(text, "false", False),
            Some(b'o') => keyword(text, "for", For),
            Some(b'u') => keyword(text, "fun", Fun),
            _ => Identifier,
        },
        b'i' => keyword(text, "if", If),
        b'n' => keyword(text, "nil", Nil),
        b'o' => keyword(text, "or", Or),
        b'p' => keyword(text, "print", Print),
        b'r' => keyword(text, "return", Return),
        b's' => keyword(text, "super", Super),
        b't' => match bytes.get(1) {
            Some(b'h') => keyword(text, "this", This),
            Some(b'r') => keyword(text, "true", True),
            _ => Identifier,
        },
        b'v' => keyword(text, "var", Var),
        b'w' => keyword(text, "while", While),
        _ => Identifier,
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.scan_token();
        if token.kind == TokenKind::Eof {
            self.finished = true;
        }
        Some(token)
    }
}
