use super::LineNumber;

#[derive(Clone)]
pub struct Error {
    code: ErrorCode,
    line_number: Option<LineNumber>,
    location: Location,
    message: String,
}

/// Where in the source a compile error was detected.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    Unknown,
    Lexeme(String),
    End,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, $line:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_line_number($line)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, $line:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_line_number($line)
            .message($msg)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code,
            line_number: None,
            location: Location::Unknown,
            message: String::new(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn line_number(&self) -> Option<LineNumber> {
        self.line_number
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn text(&self) -> &str {
        &self.message
    }

    pub fn is_runtime(&self) -> bool {
        self.code.is_runtime()
    }

    pub fn in_line_number(self, line: LineNumber) -> Error {
        debug_assert!(self.line_number.is_none());
        Error {
            line_number: Some(line),
            ..self
        }
    }

    pub fn at_lexeme(self, lexeme: &str) -> Error {
        debug_assert_eq!(self.location, Location::Unknown);
        Error {
            location: Location::Lexeme(lexeme.to_string()),
            ..self
        }
    }

    pub fn at_end(self) -> Error {
        debug_assert_eq!(self.location, Location::Unknown);
        Error {
            location: Location::End,
            ..self
        }
    }

    pub fn message<S: Into<String>>(self, message: S) -> Error {
        debug_assert_eq!(self.message.len(), 0);
        Error {
            message: message.into(),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    SyntaxError,
    TooManyConstants,
    TooManyLocals,
    JumpTooLarge,
    UndefinedVariable,
    TypeMismatch,
    StackOverflow,
    Interrupted,
    InternalError,
}

impl ErrorCode {
    pub fn is_runtime(self) -> bool {
        use ErrorCode::*;
        match self {
            SyntaxError | TooManyConstants | TooManyLocals | JumpTooLarge => false,
            UndefinedVariable | TypeMismatch | StackOverflow | Interrupted | InternalError => true,
        }
    }

    fn describe(self) -> &'static str {
        use ErrorCode::*;
        match self {
            SyntaxError => "Syntax error",
            TooManyConstants => "Too many constants in one chunk",
            TooManyLocals => "Too many local variables in function",
            JumpTooLarge => "Too much code to jump over",
            UndefinedVariable => "Undefined variable",
            TypeMismatch => "Type mismatch",
            StackOverflow => "Stack overflow",
            Interrupted => "Interrupted",
            InternalError => "Internal error",
        }
    }
}

impl std::error::Error for Error {}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let message = if self.message.is_empty() {
            self.code.describe()
        } else {
            self.message.as_str()
        };
        if self.is_runtime() {
            return match self.line_number {
                Some(line) => write!(f, "{}\n[line {}] in script", message, line),
                None => write!(f, "{}", message),
            };
        }
        if let Some(line) = self.line_number {
            write!(f, "[line {}] ", line)?;
        }
        match &self.location {
            Location::Unknown => write!(f, "Error: {}", message),
            Location::Lexeme(lexeme) => write!(f, "Error at '{}': {}", lexeme, message),
            Location::End => write!(f, "Error at end: {}", message),
        }
    }
}
