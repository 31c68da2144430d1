use super::rules::{get_rule, ParseFn, Precedence};
use super::{Chunk, Heap, Opcode, Stack, Val, STACK_MAX};
use crate::error;
use crate::lang::{Error, Lexer, LineNumber, Token, TokenKind};
use tracing::debug;

type Result<T> = std::result::Result<T, Vec<Error>>;

/// Compiles `source` straight to bytecode. String constants are registered in `heap`.
/// Every diagnostic found in the single pass is returned on failure.
pub fn compile(source: &str, heap: &mut Heap) -> Result<Chunk> {
    Compiler::new(source, heap).compile()
}

/// A block-scoped variable. `depth` is `None` until its initializer has been compiled.
#[derive(Debug)]
struct Local<'a> {
    name: Token<'a>,
    depth: Option<usize>,
}

struct Compiler<'a, 'h> {
    lexer: Lexer<'a>,
    heap: &'h mut Heap,
    chunk: Chunk,
    current: Token<'a>,
    previous: Token<'a>,
    panic_mode: bool,
    errors: Vec<Error>,
    locals: Stack<Local<'a>>,
    scope_depth: usize,
}

impl<'a, 'h> Compiler<'a, 'h> {
    fn new(source: &'a str, heap: &'h mut Heap) -> Compiler<'a, 'h> {
        Compiler {
            lexer: Lexer::new(source),
            heap,
            chunk: Chunk::new("script"),
            current: Token::synthetic(),
            previous: Token::synthetic(),
            panic_mode: false,
            errors: vec![],
            locals: Stack::new(STACK_MAX, "Too many local variables in function"),
            scope_depth: 0,
        }
    }

    fn compile(mut self) -> Result<Chunk> {
        self.advance();
        while !self.matches(TokenKind::Eof) {
            self.declaration();
        }
        self.emit_op(Opcode::Return);
        if self.errors.is_empty() {
            debug!(
                bytes = self.chunk.len(),
                constants = self.chunk.constants().len(),
                "compiled chunk"
            );
            Ok(self.chunk)
        } else {
            debug!(errors = self.errors.len(), "compile failed");
            Err(self.errors)
        }
    }

    // *** Token stream

    fn advance(&mut self) {
        self.previous = self.current;
        loop {
            self.current = self.lexer.scan_token();
            if self.current.kind != TokenKind::Error {
                break;
            }
            let message = self.current.lexeme;
            self.error_at_current(message);
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if !self.check(kind) {
            return false;
        }
        self.advance();
        true
    }

    fn consume(&mut self, kind: TokenKind, message: &str) {
        if self.check(kind) {
            self.advance();
            return;
        }
        self.error_at_current(message);
    }

    // *** Diagnostics

    fn error_at_current(&mut self, message: &str) {
        let token = self.current;
        self.error_at(token, message);
    }

    fn error(&mut self, message: &str) {
        let token = self.previous;
        self.error_at(token, message);
    }

    fn error_at(&mut self, token: Token<'a>, message: &str) {
        let error = error!(SyntaxError, token.line; message);
        self.report(error, token);
    }

    fn report(&mut self, error: Error, token: Token<'a>) {
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;
        let error = match token.kind {
            TokenKind::Eof => error.at_end(),
            TokenKind::Error => error,
            _ => error.at_lexeme(token.lexeme),
        };
        self.errors.push(error);
    }

    fn synchronize(&mut self) {
        self.panic_mode = false;
        while !self.check(TokenKind::Eof) {
            if self.previous.kind == TokenKind::Semicolon || self.current.kind.starts_statement() {
                return;
            }
            self.advance();
        }
    }

    // *** Emitters

    fn line(&self) -> LineNumber {
        self.previous.line
    }

    fn emit_byte(&mut self, byte: u8) {
        let line = self.line();
        self.chunk.write(byte, line);
    }

    fn emit_op(&mut self, op: Opcode) {
        let line = self.line();
        self.chunk.write_op(op, line);
    }

    fn emit_op_byte(&mut self, op: Opcode, byte: u8) {
        self.emit_op(op);
        self.emit_byte(byte);
    }

    fn make_constant(&mut self, val: Val) -> u8 {
        match self.chunk.add_constant(val) {
            Ok(index) => index,
            Err(error) => {
                let token = self.previous;
                let error = error.in_line_number(token.line);
                self.report(error, token);
                0
            }
        }
    }

    fn emit_constant(&mut self, val: Val) {
        let index = self.make_constant(val);
        self.emit_op_byte(Opcode::Constant, index);
    }

    /// Emits `op` with a placeholder operand and returns the operand's address.
    fn emit_jump(&mut self, op: Opcode) -> usize {
        self.emit_op(op);
        self.emit_byte(0xff);
        self.emit_byte(0xff);
        self.chunk.len() - 2
    }

    fn patch_jump(&mut self, operand: usize) {
        let distance = self.chunk.len() - operand - 2;
        if distance > u16::max_value() as usize {
            let token = self.previous;
            let error = error!(JumpTooLarge, token.line; "Too much code to jump over");
            self.report(error, token);
            return;
        }
        self.chunk.patch_u16(operand, distance as u16);
    }

    // *** Declarations and statements

    fn declaration(&mut self) {
        if self.matches(TokenKind::Var) {
            self.var_declaration();
        } else {
            self.statement();
        }
        if self.panic_mode {
            self.synchronize();
        }
    }

    fn var_declaration(&mut self) {
        let global = self.parse_variable("Expect variable name");
        if self.matches(TokenKind::Equal) {
            self.expression();
        } else {
            self.emit_op(Opcode::Nil);
        }
        self.consume(
            TokenKind::Semicolon,
            "Expect ';' after variable declaration",
        );
        self.define_variable(global);
    }

    fn statement(&mut self) {
        if self.matches(TokenKind::Print) {
            self.print_statement();
        } else if self.matches(TokenKind::If) {
            self.if_statement();
        } else if self.matches(TokenKind::LeftBrace) {
            self.begin_scope();
            self.block();
            self.end_scope();
        } else {
            self.expression_statement();
        }
    }

    fn print_statement(&mut self) {
        self.expression();
        self.consume(TokenKind::Semicolon, "Expect ';' after value");
        self.emit_op(Opcode::Print);
    }

    fn if_statement(&mut self) {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'if'");
        self.expression();
        self.consume(TokenKind::RightParen, "Expect ')' after condition");

        let then_jump = self.emit_jump(Opcode::JumpIfFalse);
        self.emit_op(Opcode::Pop);
        self.statement();
        let else_jump = self.emit_jump(Opcode::Jump);

        // The false path lands on this pop so the condition leaves the stack either way.
        self.patch_jump(then_jump);
        self.emit_op(Opcode::Pop);
        if self.matches(TokenKind::Else) {
            self.statement();
        }
        self.patch_jump(else_jump);
    }

    fn block(&mut self) {
        while !self.check(TokenKind::RightBrace) && !self.check(TokenKind::Eof) {
            self.declaration();
        }
        self.consume(TokenKind::RightBrace, "Expect '}' after block");
    }

    fn expression_statement(&mut self) {
        self.expression();
        self.consume(TokenKind::Semicolon, "Expect ';' after expression");
        self.emit_op(Opcode::Pop);
    }

    // *** Scope

    fn begin_scope(&mut self) {
        self.scope_depth += 1;
    }

    fn end_scope(&mut self) {
        self.scope_depth -= 1;
        loop {
            let depth = self.scope_depth;
            match self.locals.last() {
                Some(local) if local.depth.map_or(true, |d| d > depth) => {}
                _ => break,
            }
            if self.locals.pop().is_err() {
                break;
            }
            self.emit_op(Opcode::Pop);
        }
    }

    fn parse_variable(&mut self, message: &str) -> u8 {
        self.consume(TokenKind::Identifier, message);
        self.declare_variable();
        if self.scope_depth > 0 {
            return 0;
        }
        let name = self.previous;
        self.identifier_constant(name)
    }

    fn identifier_constant(&mut self, name: Token<'a>) -> u8 {
        let val = self.heap.alloc_string(name.lexeme.to_string());
        self.make_constant(val)
    }

    fn declare_variable(&mut self) {
        if self.scope_depth == 0 {
            return;
        }
        let name = self.previous;
        let mut duplicate = false;
        for local in self.locals.iter().rev() {
            if let Some(depth) = local.depth {
                if depth < self.scope_depth {
                    break;
                }
            }
            if identifiers_equal(&name, &local.name) {
                duplicate = true;
                break;
            }
        }
        if duplicate {
            self.error("Variable with this name already declared in this scope");
        }
        self.add_local(name);
    }

    fn add_local(&mut self, name: Token<'a>) {
        if self.locals.is_full() {
            let error = error!(TooManyLocals, name.line; "Too many local variables in function");
            self.report(error, name);
            return;
        }
        let local = Local { name, depth: None };
        if let Err(error) = self.locals.push(local) {
            self.report(error.in_line_number(name.line), name);
        }
    }

    fn define_variable(&mut self, global: u8) {
        if self.scope_depth > 0 {
            self.mark_initialized();
            return;
        }
        self.emit_op_byte(Opcode::DefineGlobal, global);
    }

    fn mark_initialized(&mut self) {
        let depth = self.scope_depth;
        if let Some(local) = self.locals.last_mut() {
            local.depth = Some(depth);
        }
    }

    fn resolve_local(&mut self, name: &Token<'a>) -> Option<u8> {
        let mut found = None;
        for (slot, local) in self.locals.iter().enumerate().rev() {
            if identifiers_equal(name, &local.name) {
                found = Some((slot, local.depth.is_none()));
                break;
            }
        }
        let (slot, uninitialized) = found?;
        if uninitialized {
            self.error("Cannot read local variable in its own initializer");
        }
        Some(slot as u8)
    }

    // *** Expressions

    fn expression(&mut self) {
        self.parse_precedence(Precedence::Assignment);
    }

    fn parse_precedence(&mut self, precedence: Precedence) {
        self.advance();
        let prefix = match get_rule(self.previous.kind).prefix {
            Some(prefix) => prefix,
            None => {
                self.error("Expect expression");
                return;
            }
        };
        let can_assign = precedence <= Precedence::Assignment;
        self.dispatch(prefix, can_assign);

        while precedence <= get_rule(self.current.kind).precedence {
            self.advance();
            if let Some(infix) = get_rule(self.previous.kind).infix {
                self.dispatch(infix, can_assign);
            }
        }

        if can_assign && self.matches(TokenKind::Equal) {
            self.error("Invalid assignment target");
        }
    }

    fn dispatch(&mut self, parse_fn: ParseFn, can_assign: bool) {
        match parse_fn {
            ParseFn::Grouping => self.grouping(),
            ParseFn::Unary => self.unary(),
            ParseFn::Binary => self.binary(),
            ParseFn::Number => self.number(),
            ParseFn::String => self.string(),
            ParseFn::Literal => self.literal(),
            ParseFn::Variable => self.variable(can_assign),
            ParseFn::And => self.and(),
            ParseFn::Or => self.or(),
        }
    }

    fn grouping(&mut self) {
        self.expression();
        self.consume(TokenKind::RightParen, "Expect ')' after expression");
    }

    fn number(&mut self) {
        match self.previous.lexeme.parse::<f64>() {
            Ok(n) => self.emit_constant(Val::Number(n)),
            Err(_) => self.error("Invalid number literal"),
        }
    }

    fn string(&mut self) {
        let lexeme = self.previous.lexeme;
        let text = &lexeme[1..lexeme.len() - 1];
        let val = self.heap.alloc_string(text.to_string());
        self.emit_constant(val);
    }

    fn literal(&mut self) {
        match self.previous.kind {
            TokenKind::False => self.emit_op(Opcode::False),
            TokenKind::Nil => self.emit_op(Opcode::Nil),
            TokenKind::True => self.emit_op(Opcode::True),
            _ => {}
        }
    }

    fn unary(&mut self) {
        let operator = self.previous.kind;
        self.parse_precedence(Precedence::Unary);
        match operator {
            TokenKind::Bang => self.emit_op(Opcode::Not),
            TokenKind::Minus => self.emit_op(Opcode::Negate),
            _ => {}
        }
    }

    fn binary(&mut self) {
        let operator = self.previous.kind;
        let precedence = get_rule(operator).precedence;
        self.parse_precedence(precedence.next());
        use TokenKind::*;
        match operator {
            BangEqual => {
                self.emit_op(Opcode::Equal);
                self.emit_op(Opcode::Not);
            }
            EqualEqual => self.emit_op(Opcode::Equal),
            Greater => self.emit_op(Opcode::Greater),
            GreaterEqual => {
                self.emit_op(Opcode::Less);
                self.emit_op(Opcode::Not);
            }
            Less => self.emit_op(Opcode::Less),
            LessEqual => {
                self.emit_op(Opcode::Greater);
                self.emit_op(Opcode::Not);
            }
            Plus => self.emit_op(Opcode::Add),
            Minus => self.emit_op(Opcode::Subtract),
            Star => self.emit_op(Opcode::Multiply),
            Slash => self.emit_op(Opcode::Divide),
            _ => {}
        }
    }

    fn and(&mut self) {
        let end_jump = self.emit_jump(Opcode::JumpIfFalse);
        self.emit_op(Opcode::Pop);
        self.parse_precedence(Precedence::And);
        self.patch_jump(end_jump);
    }

    fn or(&mut self) {
        let else_jump = self.emit_jump(Opcode::JumpIfFalse);
        let end_jump = self.emit_jump(Opcode::Jump);
        self.patch_jump(else_jump);
        self.emit_op(Opcode::Pop);
        self.parse_precedence(Precedence::Or);
        self.patch_jump(end_jump);
    }

    fn variable(&mut self, can_assign: bool) {
        let name = self.previous;
        self.named_variable(name, can_assign);
    }

    fn named_variable(&mut self, name: Token<'a>, can_assign: bool) {
        let (get_op, set_op, operand) = match self.resolve_local(&name) {
            Some(slot) => (Opcode::GetLocal, Opcode::SetLocal, slot),
            None => {
                let global = self.identifier_constant(name);
                (Opcode::GetGlobal, Opcode::SetGlobal, global)
            }
        };
        if can_assign && self.matches(TokenKind::Equal) {
            self.expression();
            self.emit_op_byte(set_op, operand);
        } else {
            self.emit_op_byte(get_op, operand);
        }
    }
}

fn identifiers_equal(a: &Token, b: &Token) -> bool {
    a.lexeme.len() == b.lexeme.len() && a.lexeme.as_bytes() == b.lexeme.as_bytes()
}
