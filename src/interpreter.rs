use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use crate::class::{Class, Instance};
use crate::environment::Environment;
use crate::error::{RuntimeError, Signal};
use crate::expr::{Expr, ExprId};
use crate::function::{Function, NativeFunction};
use crate::object::{Callable, Object};
use crate::stmt::{ClassAttributes, FunModifier, Stmt};
use crate::token::{Token, Type};

/// Tree-walking evaluator. Holds the process-wide global environment, the currently
/// active environment, the resolver's distance map, and the output sink programs print to.
pub struct Interpreter {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    resolution: HashMap<ExprId, usize>,
    count: i64,
    output: Box<dyn Write>,
}

impl Interpreter {
    pub fn new(output: Box<dyn Write>) -> Self {
        let globals = Rc::new(RefCell::new(Environment::default()));

        for (name, native) in NativeFunction::globals() {
            globals.borrow_mut().define(name, Object::from(native));
        }

        Interpreter {
            environment: Rc::clone(&globals),
            globals,
            resolution: HashMap::new(),
            count: 0,
            output,
        }
    }

    /// Clears per-run state. Called between REPL inputs; the global environment
    /// and the `count()` counter persist across calls (they're process-scoped).
    pub fn reset(&mut self) {
        self.resolution.clear();
        self.environment = Rc::clone(&self.globals);
    }

    pub fn resolve(&mut self, id: ExprId, distance: usize) {
        self.resolution.insert(id, distance);
    }

    pub fn next_count(&mut self) -> i64 {
        let value = self.count;
        self.count += 1;
        value
    }

    pub fn interpret(&mut self, statements: &[Stmt]) {
        for statement in statements {
            if let Err(error) = self.execute(statement) {
                use crate::error::Error;
                error.throw();
                return;
            }
        }
    }

    // --- statements ---------------------------------------------------------

    fn execute(&mut self, stmt: &Stmt) -> Result<Option<Signal>, RuntimeError> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(None)
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.output, "{value}").ok();
                Ok(None)
            }
            Stmt::Var(var) => {
                let value = match &var.initializer {
                    Some(initializer) => self.evaluate(initializer)?,
                    None => Object::Nil,
                };
                self.environment.borrow_mut().define(&var.name.lexeme, value);
                Ok(None)
            }
            Stmt::Block(statements) => {
                let block_env = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.environment)))));
                self.execute_block(statements, block_env)
            }
            Stmt::If(condition, then_branch, else_branch) => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(None)
                }
            }
            Stmt::While(condition, body) => {
                while self.evaluate(condition)?.is_truthy() {
                    if let Some(signal) = self.execute(body)? {
                        return Ok(Some(signal));
                    }
                }
                Ok(None)
            }
            Stmt::Return(_, value) => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Object::Nil,
                };
                Ok(Some(Signal::Return(value)))
            }
            Stmt::Fun(fun) => {
                let function = Function::new(fun.clone(), Rc::clone(&self.environment));
                self.environment.borrow_mut().define(&fun.name.lexeme, Object::from(function));
                Ok(None)
            }
            Stmt::Class { name, superclass, instance, statics } => {
                self.execute_class(name, superclass.as_ref(), instance, statics)?;
                Ok(None)
            }
        }
    }

    /// Runs `statements` in `environment`, restoring the previously active environment
    /// on every exit path: normal completion, a propagated `return`, or an error.
    pub fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: Rc<RefCell<Environment>>,
    ) -> Result<Option<Signal>, RuntimeError> {
        let previous = Rc::clone(&self.environment);
        self.environment = environment;

        let mut result = Ok(None);
        for statement in statements {
            match self.execute(statement) {
                Ok(Some(signal)) => {
                    result = Ok(Some(signal));
                    break;
                }
                Ok(None) => continue,
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }

        self.environment = previous;
        result
    }

    fn execute_class(
        &mut self,
        name: &Token,
        superclass_expr: Option<&Expr>,
        instance: &ClassAttributes,
        statics: &ClassAttributes,
    ) -> Result<(), RuntimeError> {
        let superclass = match superclass_expr {
            Some(expr) => {
                let value = self.evaluate(expr)?;
                match value {
                    Object::Class(class) => Some(class),
                    _ => {
                        return Err(RuntimeError {
                            token: name.clone(),
                            message: "Superclass must be a class.".to_string(),
                        });
                    }
                }
            }
            None => None,
        };

        self.environment.borrow_mut().define(&name.lexeme, Object::Nil);

        let mut closure = Rc::clone(&self.environment);
        if let Some(superclass) = &superclass {
            let mut super_env = Environment::new(Some(Rc::clone(&closure)));
            super_env.define("super", Object::Class(Rc::clone(superclass)));
            closure = Rc::new(RefCell::new(super_env));
        }

        let mut methods = HashMap::new();
        let mut getters = HashMap::new();
        let mut setters = HashMap::new();
        for method in &instance.methods {
            let function = Function::new(method.clone(), Rc::clone(&closure));
            match method.modifier {
                FunModifier::Getter => {
                    getters.insert(method.name.lexeme.clone(), function);
                }
                FunModifier::Setter => {
                    setters.insert(method.name.lexeme.clone(), function);
                }
                _ => {
                    methods.insert(method.name.lexeme.clone(), function);
                }
            }
        }

        let class = Rc::new(RefCell::new(Class::new(
            name.lexeme.clone(),
            superclass,
            methods,
            getters,
            setters,
            instance.variables.clone(),
            Rc::clone(&closure),
        )));

        self.environment.borrow_mut().assign(name, Object::Class(Rc::clone(&class)))?;

        let previous = Rc::clone(&self.environment);
        self.environment = closure;
        for var in &statics.variables {
            let value = match &var.initializer {
                Some(initializer) => self.evaluate(initializer)?,
                None => Object::Nil,
            };
            class.borrow().set_static(&var.name, value);
        }
        for method in &statics.methods {
            let function = Function::new(method.clone(), Rc::clone(&self.environment));
            class.borrow().set_static(&method.name, Object::from(function));
        }
        self.environment = previous;

        Ok(())
    }

    /// Evaluates every instance-variable initializer in the class's own closure and
    /// stores each result as a field on `instance`, restoring the active environment
    /// even if an initializer errors.
    pub fn initialize_instance_variables(
        &mut self,
        class: &Rc<RefCell<Class>>,
        instance: &Rc<RefCell<Instance>>,
    ) -> Result<(), RuntimeError> {
        let (closure, variables) = {
            let class = class.borrow();
            (Rc::clone(&class.closure), class.instance_variables.clone())
        };

        let previous = Rc::clone(&self.environment);
        self.environment = closure;

        let mut result = Ok(());
        for var in &variables {
            match &var.initializer {
                Some(initializer) => match self.evaluate(initializer) {
                    Ok(value) => instance.borrow_mut().set(&var.name, value),
                    Err(error) => {
                        result = Err(error);
                        break;
                    }
                },
                None => instance.borrow_mut().set(&var.name, Object::Nil),
            }
        }

        self.environment = previous;
        result
    }

    // --- expressions ---------------------------------------------------------

    fn evaluate(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        match expr {
            Expr::Literal(_, value) => Ok(value.clone()),
            Expr::Grouping(_, inner) => self.evaluate(inner),
            Expr::Unary(_, op, right) => self.evaluate_unary(op, right),
            Expr::Binary(_, left, op, right) => self.evaluate_binary(left, op, right),
            Expr::Logical(_, left, op, right) => self.evaluate_logical(left, op, right),
            Expr::Variable(id, name) => self.lookup_variable(*id, name),
            Expr::Assign(id, name, value, return_original) => {
                self.evaluate_assign(*id, name, value, *return_original)
            }
            Expr::Call(_, callee, paren, arguments) => self.evaluate_call(callee, paren, arguments),
            Expr::Get(_, object, name) => self.evaluate_get(object, name),
            Expr::Set(_, object, name, value, return_original) => {
                self.evaluate_set(object, name, value, *return_original)
            }
            Expr::This(id, keyword) => self.lookup_variable(*id, keyword),
            Expr::Super(id, keyword, method) => self.evaluate_super(*id, keyword, method),
        }
    }

    fn lookup_variable(&self, id: ExprId, name: &Token) -> Result<Object, RuntimeError> {
        match self.resolution.get(&id) {
            Some(&distance) => self.environment.borrow().get_at(distance, name),
            None => self.globals.borrow().get(name),
        }
    }

    fn evaluate_assign(
        &mut self,
        id: ExprId,
        name: &Token,
        value_expr: &Expr,
        return_original: bool,
    ) -> Result<Object, RuntimeError> {
        let new_value = self.evaluate(value_expr)?;

        let original = if return_original {
            Some(self.lookup_variable(id, name)?)
        } else {
            None
        };

        match self.resolution.get(&id) {
            Some(&distance) => self.environment.borrow_mut().assign_at(distance, name, new_value.clone()),
            None => self.globals.borrow_mut().assign(name, new_value.clone())?,
        }

        Ok(original.unwrap_or(new_value))
    }

    fn evaluate_unary(&mut self, op: &Token, right: &Expr) -> Result<Object, RuntimeError> {
        let right = self.evaluate(right)?;

        match op.r#type {
            Type::Bang => Ok(Object::Bool(!right.is_truthy())),
            Type::Minus => match right {
                Object::Number(n) => Ok(Object::Number(-n)),
                _ => Err(RuntimeError { token: op.clone(), message: "Operand must be a number.".to_string() }),
            },
            Type::Plus => match right {
                Object::Number(n) => Ok(Object::Number(n)),
                _ => Err(RuntimeError { token: op.clone(), message: "Operand must be a number.".to_string() }),
            },
            _ => unreachable!("unary operator {:?}", op.r#type),
        }
    }

    fn evaluate_binary(&mut self, left: &Expr, op: &Token, right: &Expr) -> Result<Object, RuntimeError> {
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;

        let number_pair = |token: &Token| -> Result<(f64, f64), RuntimeError> {
            match (&left, &right) {
                (Object::Number(a), Object::Number(b)) => Ok((*a, *b)),
                _ => Err(RuntimeError { token: token.clone(), message: "Operands must be two numbers.".to_string() }),
            }
        };

        match op.r#type {
            Type::Minus => number_pair(op).map(|(a, b)| Object::Number(a - b)),
            Type::Star => number_pair(op).map(|(a, b)| Object::Number(a * b)),
            Type::StarStar => number_pair(op).map(|(a, b)| Object::Number(a.powf(b))),
            Type::Slash => {
                let (a, b) = number_pair(op)?;
                if b == 0.0 {
                    return Err(RuntimeError { token: op.clone(), message: "Division by zero.".to_string() });
                }
                Ok(Object::Number(a / b))
            }
            Type::Greater => number_pair(op).map(|(a, b)| Object::Bool(a > b)),
            Type::GreaterEqual => number_pair(op).map(|(a, b)| Object::Bool(a >= b)),
            Type::Less => number_pair(op).map(|(a, b)| Object::Bool(a < b)),
            Type::LessEqual => number_pair(op).map(|(a, b)| Object::Bool(a <= b)),
            Type::Plus => match (&left, &right) {
                (Object::Number(a), Object::Number(b)) => Ok(Object::Number(a + b)),
                (Object::String(a), Object::String(b)) => Ok(Object::String(format!("{a}{b}"))),
                _ => Err(RuntimeError {
                    token: op.clone(),
                    message: "Operands must be two numbers or two strings.".to_string(),
                }),
            },
            Type::BangEqual => Ok(Object::Bool(!left.is_equal(&right))),
            Type::EqualEqual => Ok(Object::Bool(left.is_equal(&right))),
            _ => unreachable!("binary operator {:?}", op.r#type),
        }
    }

    fn evaluate_logical(&mut self, left: &Expr, op: &Token, right: &Expr) -> Result<Object, RuntimeError> {
        let left = self.evaluate(left)?;

        match op.r#type {
            Type::Or if left.is_truthy() => Ok(left),
            Type::And if !left.is_truthy() => Ok(left),
            _ => self.evaluate(right),
        }
    }

    fn evaluate_call(&mut self, callee: &Expr, paren: &Token, arguments: &[Expr]) -> Result<Object, RuntimeError> {
        let callee = self.evaluate(callee)?;

        let mut args = Vec::with_capacity(arguments.len());
        for argument in arguments {
            args.push(self.evaluate(argument)?);
        }

        match callee {
            Object::Function(function) => {
                check_arity(paren, function.arity(), args.len())?;
                function.call(self, args)
            }
            Object::NativeFunction(function) => {
                check_arity(paren, function.arity(), args.len())?;
                function.call(self, args)
            }
            Object::Class(class) => {
                let arity = class.borrow().arity();
                check_arity(paren, arity, args.len())?;
                Class::construct(&class, self, args)
            }
            _ => Err(RuntimeError {
                token: paren.clone(),
                message: "Can only call functions and classes.".to_string(),
            }),
        }
    }

    fn evaluate_get(&mut self, object: &Expr, name: &Token) -> Result<Object, RuntimeError> {
        let object = self.evaluate(object)?;

        let value = match &object {
            Object::Instance(instance) => instance.borrow().get(name, instance)?,
            Object::Class(class) => class.borrow().get_static(name)?,
            _ => {
                return Err(RuntimeError {
                    token: name.clone(),
                    message: "Only instances have properties.".to_string(),
                });
            }
        };

        // A getter method is invoked immediately; everything else (fields, plain
        // bound methods, static values) is returned as-is.
        if let Object::Function(function) = &value {
            if function.modifier() == FunModifier::Getter {
                return function.call(self, vec![]);
            }
        }

        Ok(value)
    }

    fn evaluate_set(
        &mut self,
        object: &Expr,
        name: &Token,
        value_expr: &Expr,
        return_original: bool,
    ) -> Result<Object, RuntimeError> {
        let object = self.evaluate(object)?;
        let new_value = self.evaluate(value_expr)?;

        match &object {
            Object::Instance(instance) => {
                let has_field = instance.borrow().fields.contains_key(&name.lexeme);
                if !has_field {
                    if let Some(setter) = instance.borrow().find_setter(&name.lexeme) {
                        let original = if return_original {
                            instance.borrow().get(name, instance).unwrap_or(Object::Nil)
                        } else {
                            Object::Nil
                        };
                        let bound = setter.bind(Object::Instance(Rc::clone(instance)));
                        bound.call(self, vec![new_value.clone()])?;
                        return Ok(if return_original { original } else { new_value });
                    }
                }

                let original = instance.borrow().fields.get(&name.lexeme).cloned();
                instance.borrow_mut().set(name, new_value.clone());
                Ok(if return_original { original.unwrap_or(Object::Nil) } else { new_value })
            }
            Object::Class(class) => {
                let original = class.borrow().fields.borrow().get(&name.lexeme).cloned();
                class.borrow().set_static(name, new_value.clone());
                Ok(if return_original { original.unwrap_or(Object::Nil) } else { new_value })
            }
            _ => Err(RuntimeError {
                token: name.clone(),
                message: "Only instances have fields.".to_string(),
            }),
        }
    }

    fn evaluate_super(&mut self, id: ExprId, keyword: &Token, method: &Token) -> Result<Object, RuntimeError> {
        let distance = *self.resolution.get(&id).expect("super to always resolve locally");
        let superclass = self.environment.borrow().get_at(distance, keyword)?;
        let Object::Class(superclass) = superclass else {
            unreachable!("'super' must resolve to a class");
        };

        // `this` lives one scope closer than `super`, by construction of the class
        // resolution sequence (super-scope wraps this-scope).
        let this_token = Token::from("this");
        let instance = self.environment.borrow().get_at(distance - 1, &this_token)?;

        let found = superclass.borrow().find_method(&method.lexeme);
        match found {
            Some(bound_method) => Ok(Object::Function(Rc::new(bound_method.bind(instance)))),
            None => Err(RuntimeError {
                token: method.clone(),
                message: format!("Undefined property '{}'.", method.lexeme),
            }),
        }
    }
}

fn check_arity(paren: &Token, expected: usize, got: usize) -> Result<(), RuntimeError> {
    if expected != got {
        return Err(RuntimeError {
            token: paren.clone(),
            message: format!("Expected {expected} arguments but got {got}."),
        });
    }
    Ok(())
}
