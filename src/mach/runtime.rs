use super::{disassemble_instruction, Address, Chunk, Config, Heap, Opcode, Stack, Val};
use super::operation::Operation;
use crate::error;
use crate::lang::Error;
use std::collections::HashMap;
use std::convert::TryFrom;
use std::io::Write;
use std::rc::Rc;
use tracing::{debug, trace};

type Result<T> = std::result::Result<T, Error>;

/// What the runtime needs the terminal to do next.
#[derive(Debug)]
pub enum Event {
    /// Nothing is loaded or the chunk returned. Ready for the next program.
    Stopped,
    /// The cycle budget ran out; call `execute` again.
    Running,
    /// Output from a `print` statement, newline included.
    Print(String),
    /// Compile errors, or the single runtime error that ended the chunk.
    Errors(Rc<Vec<Error>>),
}

#[derive(Debug)]
enum State {
    Stopped,
    Running,
    Errors(Rc<Vec<Error>>),
}

/// ## Virtual machine
///
/// Globals and the heap registry survive from one chunk to the next.
/// The chunk and value stack are replaced on every `load`.
pub struct Runtime {
    config: Config,
    chunk: Chunk,
    ip: Address,
    stack: Stack<Val>,
    globals: HashMap<String, Val>,
    heap: Heap,
    state: State,
}

impl Default for Runtime {
    fn default() -> Runtime {
        Runtime::new(Config::default())
    }
}

impl Runtime {
    pub fn new(config: Config) -> Runtime {
        Runtime {
            chunk: Chunk::default(),
            ip: 0,
            stack: Stack::new(config.stack_max, "Stack overflow"),
            globals: HashMap::new(),
            heap: Heap::new(),
            state: State::Stopped,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn chunk(&self) -> &Chunk {
        &self.chunk
    }

    pub fn global(&self, name: &str) -> Option<&Val> {
        self.globals.get(name)
    }

    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    pub fn object_count(&self) -> usize {
        self.heap.len()
    }

    /// Bulk teardown of every object registered since the last call.
    pub fn free_objects(&mut self) -> usize {
        self.heap.free_objects()
    }

    /// Compiles `source`, registering its string constants in this runtime's heap.
    pub fn compile(&mut self, source: &str) -> std::result::Result<Chunk, Vec<Error>> {
        super::compile(source, &mut self.heap)
    }

    /// Replaces the current chunk and readies it for `execute`.
    pub fn load(&mut self, chunk: Chunk) {
        self.chunk = chunk;
        self.ip = 0;
        self.stack.clear();
        self.state = State::Running;
    }

    /// Compiles and loads `source`. On failure the errors are reported by the next `execute`.
    pub fn enter(&mut self, source: &str) -> bool {
        match self.compile(source) {
            Ok(chunk) => {
                self.load(chunk);
                true
            }
            Err(errors) => {
                self.state = State::Errors(Rc::new(errors));
                false
            }
        }
    }

    pub fn interrupt(&mut self) {
        if let State::Running = self.state {
            let line = self.chunk.line(self.ip);
            self.halt();
            self.state = State::Errors(Rc::new(vec![error!(Interrupted, line; "Interrupted")]));
        }
    }

    /// Loads `chunk` and runs it to completion, writing printed output to `out`.
    pub fn run<W: Write>(&mut self, chunk: Chunk, out: &mut W) -> Result<()> {
        self.load(chunk);
        loop {
            match self.execute(usize::max_value()) {
                Event::Stopped => return Ok(()),
                Event::Running => {}
                Event::Print(s) => {
                    if let Err(e) = out.write_all(s.as_bytes()) {
                        self.halt();
                        return Err(error!(InternalError; e.to_string()));
                    }
                }
                Event::Errors(errors) => {
                    return match errors.first() {
                        Some(error) => Err(error.clone()),
                        None => Ok(()),
                    }
                }
            }
        }
    }

    /// Runs at most `cycles` instructions, stopping early at the first event.
    pub fn execute(&mut self, cycles: usize) -> Event {
        match std::mem::replace(&mut self.state, State::Stopped) {
            State::Stopped => return Event::Stopped,
            State::Errors(errors) => return Event::Errors(errors),
            State::Running => self.state = State::Running,
        }
        for _ in 0..cycles {
            match self.step() {
                Ok(None) => {}
                Ok(Some(Event::Stopped)) => {
                    self.state = State::Stopped;
                    return Event::Stopped;
                }
                Ok(Some(event)) => return event,
                Err(error) => {
                    debug!(%error, "runtime error");
                    self.halt();
                    return Event::Errors(Rc::new(vec![error]));
                }
            }
        }
        Event::Running
    }

    fn halt(&mut self) {
        self.stack.clear();
        self.state = State::Stopped;
    }

    fn step(&mut self) -> Result<Option<Event>> {
        let addr = self.ip;
        if self.config.trace {
            self.trace(addr);
        }
        let result = self.instruction();
        result.map_err(|error| error.in_line_number(self.chunk.line(addr)))
    }

    fn trace(&self, addr: Address) {
        let stack: String = self.stack.iter().map(|v| format!("[ {} ]", v)).collect();
        let (instruction, _) = disassemble_instruction(&self.chunk, addr);
        trace!(stack = %stack, "{}", instruction);
    }

    fn read_byte(&mut self) -> Result<u8> {
        match self.chunk.byte(self.ip) {
            Some(byte) => {
                self.ip += 1;
                Ok(byte)
            }
            None => Err(error!(InternalError; "Instruction pointer out of range")),
        }
    }

    fn read_u16(&mut self) -> Result<u16> {
        match self.chunk.read_u16(self.ip) {
            Some(word) => {
                self.ip += 2;
                Ok(word)
            }
            None => Err(error!(InternalError; "Instruction pointer out of range")),
        }
    }

    fn read_constant(&mut self) -> Result<Val> {
        let index = self.read_byte()?;
        match self.chunk.constant(index) {
            Some(val) => Ok(val.clone()),
            None => Err(error!(InternalError; "Constant index out of range")),
        }
    }

    fn name_of(constant: &Val) -> Result<&str> {
        constant
            .as_str()
            .ok_or_else(|| error!(InternalError; "Variable name is not a string"))
    }

    fn undefined(name: &str) -> Error {
        error!(UndefinedVariable; format!("Undefined variable '{}'", name))
    }

    fn binary(&mut self, op: fn(&Val, &Val) -> Result<Val>) -> Result<()> {
        let val = op(self.stack.peek(1)?, self.stack.peek(0)?)?;
        self.stack.pop_2()?;
        self.stack.push(val)
    }

    fn instruction(&mut self) -> Result<Option<Event>> {
        let byte = self.read_byte()?;
        let op = Opcode::try_from(byte)
            .map_err(|byte| error!(InternalError; format!("Unknown opcode {}", byte)))?;
        match op {
            Opcode::Constant => {
                let val = self.read_constant()?;
                self.stack.push(val)?;
            }
            Opcode::Nil => self.stack.push(Val::Nil)?,
            Opcode::True => self.stack.push(Val::Bool(true))?,
            Opcode::False => self.stack.push(Val::Bool(false))?,
            Opcode::Pop => {
                self.stack.pop()?;
            }

            Opcode::GetLocal => {
                let slot = self.read_byte()? as usize;
                let val = match self.stack.get(slot) {
                    Some(val) => val.clone(),
                    None => return Err(error!(InternalError; "Local slot out of range")),
                };
                self.stack.push(val)?;
            }
            Opcode::SetLocal => {
                let slot = self.read_byte()? as usize;
                let val = self.stack.peek(0)?.clone();
                match self.stack.get_mut(slot) {
                    Some(local) => *local = val,
                    None => return Err(error!(InternalError; "Local slot out of range")),
                }
            }
            Opcode::GetGlobal => {
                let constant = self.read_constant()?;
                let name = Runtime::name_of(&constant)?;
                let val = match self.globals.get(name) {
                    Some(val) => val.clone(),
                    None => return Err(Runtime::undefined(name)),
                };
                self.stack.push(val)?;
            }
            Opcode::DefineGlobal => {
                let constant = self.read_constant()?;
                let name = Runtime::name_of(&constant)?;
                let val = self.stack.peek(0)?.clone();
                self.globals.insert(name.to_string(), val);
                self.stack.pop()?;
            }
            Opcode::SetGlobal => {
                let constant = self.read_constant()?;
                let name = Runtime::name_of(&constant)?;
                let val = self.stack.peek(0)?.clone();
                match self.globals.get_mut(name) {
                    Some(global) => *global = val,
                    None => return Err(Runtime::undefined(name)),
                }
            }

            Opcode::Equal => {
                let (lhs, rhs) = self.stack.pop_2()?;
                self.stack.push(Operation::equal(&lhs, &rhs))?;
            }
            Opcode::Greater => self.binary(Operation::greater)?,
            Opcode::Less => self.binary(Operation::less)?,
            Opcode::Add => {
                let val = Operation::sum(&mut self.heap, self.stack.peek(1)?, self.stack.peek(0)?)?;
                self.stack.pop_2()?;
                self.stack.push(val)?;
            }
            Opcode::Subtract => self.binary(Operation::subtract)?,
            Opcode::Multiply => self.binary(Operation::multiply)?,
            Opcode::Divide => self.binary(Operation::divide)?,
            Opcode::Not => {
                let val = self.stack.pop()?;
                self.stack.push(Operation::not(&val))?;
            }
            Opcode::Negate => {
                let val = Operation::negate(self.stack.peek(0)?)?;
                self.stack.pop()?;
                self.stack.push(val)?;
            }

            Opcode::Print => {
                let val = self.stack.pop()?;
                return Ok(Some(Event::Print(format!("{}\n", val))));
            }

            Opcode::Jump => {
                let distance = self.read_u16()?;
                self.ip += distance as usize;
            }
            Opcode::JumpIfFalse => {
                let distance = self.read_u16()?;
                if self.stack.peek(0)?.is_falsey() {
                    self.ip += distance as usize;
                }
            }
            Opcode::Return => return Ok(Some(Event::Stopped)),
        }
        Ok(None)
    }
}
