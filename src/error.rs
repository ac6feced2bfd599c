use crate::object::Object;
use crate::token::{Token, Type};

static mut HAD_ERROR: bool = false;
static mut HAD_RUNTIME_ERROR: bool = false;

/// True if any scan, parse, resolve, or runtime error has been reported.
pub fn did_error() -> bool {
    unsafe { HAD_ERROR || HAD_RUNTIME_ERROR }
}

/// True if a runtime error specifically (as opposed to a lex/parse/resolve error) has been
/// reported; used by tests that need to distinguish the two, though both collapse to exit 65.
pub fn did_runtime_error() -> bool {
    unsafe { HAD_RUNTIME_ERROR }
}

/// Clears both latches. Called between REPL inputs.
pub fn reset_error() {
    unsafe {
        HAD_ERROR = false;
        HAD_RUNTIME_ERROR = false;
    }
}

/// Every diagnostic type implements this to format and report itself.
pub trait Error {
    fn throw(&self);
}

fn report(token: &Token, kind: &str, message: &str) {
    if token.r#type == Type::EOF {
        eprintln!(
            "[line {line}] {kind} at end: {message}",
            line = token.location.line,
        );
    } else {
        eprintln!(
            "[line {line}] {kind} at '{lexeme}': {message}",
            line = token.location.line,
            lexeme = token.lexeme,
        );
    }
}

#[derive(Debug)]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

impl Error for ScanError {
    fn throw(&self) {
        eprintln!("[line {line}] Error: {message}", line = self.line, message = self.message);
        unsafe {
            HAD_ERROR = true;
        }
    }
}

#[derive(Debug)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl Error for ParseError {
    fn throw(&self) {
        report(&self.token, "Error", &self.message);
        unsafe {
            HAD_ERROR = true;
        }
    }
}

#[derive(Debug)]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

impl Error for ResolveError {
    fn throw(&self) {
        report(&self.token, "Error", &self.message);
        unsafe {
            HAD_ERROR = true;
        }
    }
}

/// Reported at scope close for a declared-but-unread local. Never sets either latch.
#[derive(Debug)]
pub struct ResolveWarning {
    pub token: Token,
    pub message: String,
}

impl Error for ResolveWarning {
    fn throw(&self) {
        report(&self.token, "Warn", &self.message);
    }
}

#[derive(Debug)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl Error for RuntimeError {
    fn throw(&self) {
        report(&self.token, "Error", &self.message);
        unsafe {
            HAD_RUNTIME_ERROR = true;
        }
    }
}

/// Non-error control signal carrying a `return` value up to the enclosing function call.
/// Kept separate from `RuntimeError` so `?` on `Result<_, RuntimeError>` never conflates
/// "a return happened" with "evaluation failed".
#[derive(Debug, Clone)]
pub enum Signal {
    Return(Object),
}
