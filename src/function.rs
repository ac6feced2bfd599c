use std::cell::RefCell;
use std::fmt::{Debug, Display};
use std::rc::Rc;

use crate::environment::Environment;
use crate::error::{RuntimeError, Signal};
use crate::interpreter::Interpreter;
use crate::object::{Callable, Object};
use crate::stmt::{FunModifier, FunStmt};
use crate::token::Token;

#[derive(Debug, Clone)]
pub struct Function {
    pub declaration: FunStmt,
    pub closure: Rc<RefCell<Environment>>,
    pub is_initializer: bool,
}

impl Function {
    pub fn new(declaration: FunStmt, closure: Rc<RefCell<Environment>>) -> Self {
        let is_initializer = declaration.name.lexeme == "init";
        Function { declaration, closure, is_initializer }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }

    pub fn modifier(&self) -> FunModifier {
        self.declaration.modifier
    }

    /// Returns a copy of this function whose closure wraps the original one with
    /// `this` bound to `instance`. A fresh environment, not a mutation of the shared
    /// closure, so distinct bindings of the same method never stomp on each other.
    pub fn bind(&self, instance: Object) -> Function {
        let mut environment = Environment::new(Some(Rc::clone(&self.closure)));
        environment.define("this", instance);
        Function {
            declaration: self.declaration.clone(),
            closure: Rc::new(RefCell::new(environment)),
            is_initializer: self.is_initializer,
        }
    }
}

impl Callable for Function {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        let environment = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.closure)))));

        for (param, arg) in self.declaration.params.iter().zip(arguments.into_iter()) {
            environment.borrow_mut().define(&param.lexeme, arg);
        }

        let signal = interpreter.execute_block(&self.declaration.body, environment)?;

        if self.is_initializer {
            return self.closure.borrow().get_at(0, &Token::from("this"));
        }

        match signal {
            Some(Signal::Return(value)) => Ok(value),
            None => Ok(Object::Nil),
        }
    }

    fn arity(&self) -> usize {
        self.declaration.params.len()
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<function {}>", self.name())
    }
}

pub struct NativeFunction {
    pub name: String,
    pub arity: usize,
    pub function: fn(&mut Interpreter, Vec<Object>) -> Result<Object, RuntimeError>,
}

impl Callable for NativeFunction {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        (self.function)(interpreter, arguments)
    }

    fn arity(&self) -> usize {
        self.arity
    }
}

impl NativeFunction {
    /// The built-ins seeded into the global environment: `clock()` and `count()`.
    pub fn globals() -> Vec<(&'static str, NativeFunction)> {
        vec![
            ("clock", NativeFunction {
                name: "clock".to_owned(),
                arity: 0,
                function: |_, _| {
                    let now = std::time::SystemTime::now()
                        .duration_since(std::time::UNIX_EPOCH)
                        .unwrap_or_default()
                        .as_millis();
                    Ok(Object::Number(now as f64))
                },
            }),
            ("count", NativeFunction {
                name: "count".to_owned(),
                arity: 0,
                function: |interpreter, _| {
                    let value = interpreter.next_count();
                    Ok(Object::Number(value as f64))
                },
            }),
        ]
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<native function {}>", self.name)
    }
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<native function {}>", self.name)
    }
}
