#![allow(clippy::needless_return)]

//! Rocks is a programming language written in Rust. It is a dynamically typed language with
//! lexical scoping, single-inheritance classes, and first-class functions. Rocks is a
//! tree-walk interpreter with a hand-written recursive descent parser.
//!
//! ## Scanning
//! The first step in the interpreter is scanning. Scanning is the process of converting a string
//! of characters into a list of tokens. A token is a single unit of a programming language. For
//! example, the string `1 + 2` would be converted into the following tokens:
//! ```text
//! [Number(1), Plus, Number(2)]
//! ```
//! The scanner is implemented in the [`scanner`](scanner) module as an iterator over the
//! characters in the source code. It reports syntax errors as a [`ScanError`](error::ScanError)
//! and keeps scanning past them so multiple mistakes surface in one pass.
//!
//! ## Parsing
//! The second step is parsing: a list of tokens becomes an abstract syntax tree. The parser is
//! implemented in the [`parser`](parser) module as a recursive descent parser with one token of
//! lookahead. [`Expressions`](expr::Expr) produce a value ([`Object`](object::Object));
//! [`statements`](stmt::Stmt) perform an action. The parser reports syntax errors as a
//! [`ParseError`](error::ParseError) and synchronizes at statement boundaries to keep going.
//!
//! ## Resolving
//! The third step is resolving: a static pre-pass over the AST that assigns every variable,
//! `this`, and `super` reference the lexical scope distance where it will be found at runtime.
//! The resolver is implemented in the [`resolver`](resolver) module and reports semantic
//! mistakes (duplicate declarations, `return` outside a function, `this` outside a class, and
//! so on) as a [`ResolveError`](error::ResolveError), plus non-fatal
//! [`ResolveWarning`](error::ResolveWarning)s for unused locals.
//!
//! ## Interpreting
//! The final step is interpreting: walking the AST, using the resolution map built above to look
//! up variables at their known scope distance. The interpreter is implemented in the
//! [`interpreter`](interpreter) module and reports errors as a
//! [`RuntimeError`](error::RuntimeError). The active environment is a parent-linked chain of
//! scopes, implemented in the [`environment`](environment) module.

use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// Process-level exit codes, matching the convention `sysexits.h` popularized for CLI tools.
pub mod exit_code {
    pub const OK: u8 = 0;
    pub const USAGE: u8 = 64;
    /// Covers every reported problem in file mode: lex, parse, resolve, and runtime
    /// errors all collapse to this single code, per the language's exit-code contract.
    pub const DATA_ERROR: u8 = 65;
}

/// Ties the scanner, parser, resolver, and interpreter into a single runnable pipeline.
/// One instance persists across REPL inputs so globals and closures survive between lines.
pub struct Rocks {
    interpreter: Interpreter,
}

impl Rocks {
    pub fn new() -> Self {
        Rocks::with_output(Box::new(io::stdout()))
    }

    /// Builds a pipeline that writes `print` output to `output` instead of stdout. Tests use
    /// this to capture program output without touching the process's real stdout.
    pub fn with_output(output: Box<dyn Write>) -> Self {
        Rocks { interpreter: Interpreter::new(output) }
    }

    pub fn run_file(&mut self, path: &str) -> ExitCode {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                log::error!("couldn't read {path}: {err}");
                return ExitCode::from(exit_code::DATA_ERROR);
            }
        };

        self.run(&contents);

        if error::did_error() {
            ExitCode::from(exit_code::DATA_ERROR)
        } else {
            ExitCode::from(exit_code::OK)
        }
    }

    /// Runs one line of REPL input, then resets the interpreter's resolution map and the
    /// error latches so one bad line doesn't poison the next. Use [`Rocks::run`] directly
    /// when the error latches need to be inspected before they're cleared.
    pub fn run_line(&mut self, source: &str) {
        self.run(source);
        error::reset_error();
        self.interpreter.reset();
    }

    /// Runs `source` as a whole program, pipelining scanner → parser → resolver → interpreter.
    /// Leaves the error latches set on return; callers that run multiple programs in sequence
    /// (the REPL, test harnesses) are responsible for resetting them between runs.
    pub fn run(&mut self, source: &str) {
        log::debug!("scanning {} bytes", source.len());
        let mut scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens();

        if error::did_error() {
            return;
        }

        let mut parser = Parser::new(tokens);
        let statements = parser.parse();

        if error::did_error() {
            return;
        }

        {
            let mut resolver = Resolver::new(&mut self.interpreter);
            resolver.resolve(&statements);
        }

        if error::did_error() {
            return;
        }

        self.interpreter.interpret(&statements);
    }
}

impl Default for Rocks {
    fn default() -> Self {
        Self::new()
    }
}
