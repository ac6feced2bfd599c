use std::collections::HashMap;
use std::mem;

use crate::error::{Error, ResolveError, ResolveWarning};
use crate::expr::Expr;
use crate::interpreter::Interpreter;
use crate::stmt::{FunModifier, FunStmt, Stmt};
use crate::token::Token;

#[derive(Clone, Copy, PartialEq, Eq)]
enum FunctionType {
    None,
    Function,
    Method,
    Initializer,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ClassType {
    None,
    Class,
    Subclass,
}

struct ScopeEntry {
    token: Token,
    defined: bool,
    used: bool,
}

/// Static analysis pass: computes lexical scope distances ahead of evaluation and
/// enforces the language's compile-time rules (self-read, bad `return`, bad `this`/`super`).
pub struct Resolver<'a> {
    interpreter: &'a mut Interpreter,
    scopes: Vec<HashMap<String, ScopeEntry>>,
    current_function: FunctionType,
    current_class: ClassType,
    /// True while resolving the body of a static method/variable initializer.
    in_static: bool,
}

impl<'a> Resolver<'a> {
    pub fn new(interpreter: &'a mut Interpreter) -> Self {
        Resolver {
            interpreter,
            scopes: vec![],
            current_function: FunctionType::None,
            current_class: ClassType::None,
            in_static: false,
        }
    }

    pub fn resolve(&mut self, statements: &[Stmt]) {
        for statement in statements {
            self.resolve_stmt(statement);
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expression(expr) | Stmt::Print(expr) => self.resolve_expr(expr),
            Stmt::Return(keyword, value) => self.resolve_return(keyword, value.as_ref()),
            Stmt::Var(var) => self.resolve_var(&var.name, var.initializer.as_ref()),
            Stmt::Block(statements) => {
                self.begin_scope();
                self.resolve(statements);
                self.end_scope();
            }
            Stmt::If(condition, then_branch, else_branch) => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_stmt(else_branch);
                }
            }
            Stmt::While(condition, body) => {
                self.resolve_expr(condition);
                self.resolve_stmt(body);
            }
            Stmt::Fun(fun) => {
                if fun.modifier != FunModifier::None && self.current_class == ClassType::None {
                    ResolveError {
                        token: fun.name.clone(),
                        message: "Modifiers can only be used inside a class.".to_string(),
                    }
                    .throw();
                }
                self.declare(&fun.name);
                self.define(&fun.name);
                self.resolve_function(fun, FunctionType::Function);
            }
            Stmt::Class { name, superclass, instance, statics } => {
                self.resolve_class(name, superclass.as_ref(), instance, statics);
            }
        }
    }

    fn resolve_var(&mut self, name: &Token, initializer: Option<&Expr>) {
        self.declare(name);
        if let Some(initializer) = initializer {
            self.resolve_expr(initializer);
        }
        self.define(name);
    }

    fn resolve_return(&mut self, keyword: &Token, value: Option<&Expr>) {
        if self.current_function == FunctionType::None {
            ResolveError {
                token: keyword.clone(),
                message: "Can't return from top-level code.".to_string(),
            }
            .throw();
        }

        if let Some(value) = value {
            if self.current_function == FunctionType::Initializer {
                ResolveError {
                    token: keyword.clone(),
                    message: "Can't return a value from an initializer.".to_string(),
                }
                .throw();
                return;
            }

            self.resolve_expr(value);
        }
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(..) => {}
            Expr::Variable(id, name) => self.resolve_variable(*id, name),
            Expr::Assign(id, name, value, _) => {
                self.resolve_expr(value);
                self.resolve_local(*id, name);
            }
            Expr::Logical(_, left, _, right) | Expr::Binary(_, left, _, right) => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }
            Expr::Unary(_, _, right) => self.resolve_expr(right),
            Expr::Grouping(_, inner) => self.resolve_expr(inner),
            Expr::Call(_, callee, _, arguments) => {
                self.resolve_expr(callee);
                for argument in arguments {
                    self.resolve_expr(argument);
                }
            }
            Expr::Get(_, object, _) => self.resolve_expr(object),
            Expr::Set(_, object, _, value, _) => {
                self.resolve_expr(value);
                self.resolve_expr(object);
            }
            Expr::This(id, keyword) => self.resolve_this(*id, keyword),
            Expr::Super(id, keyword, _) => self.resolve_super(*id, keyword),
        }
    }

    fn resolve_variable(&mut self, id: u32, name: &Token) {
        if let Some(scope) = self.scopes.last() {
            if let Some(entry) = scope.get(&name.lexeme) {
                if !entry.defined {
                    ResolveError {
                        token: name.clone(),
                        message: "Can't read local variable in its own initializer.".to_string(),
                    }
                    .throw();
                }
            }
        }

        self.resolve_local(id, name);
    }

    fn resolve_this(&mut self, id: u32, keyword: &Token) {
        if self.current_class == ClassType::None {
            ResolveError {
                token: keyword.clone(),
                message: "Can't use 'this' outside of a class.".to_string(),
            }
            .throw();
            return;
        }

        if self.in_static {
            ResolveError {
                token: keyword.clone(),
                message: "Can't use 'this' in a static member.".to_string(),
            }
            .throw();
            return;
        }

        self.resolve_local(id, keyword);
    }

    fn resolve_super(&mut self, id: u32, keyword: &Token) {
        match self.current_class {
            ClassType::Subclass => {}
            ClassType::None => ResolveError {
                token: keyword.clone(),
                message: "Can't use 'super' outside of a class.".to_string(),
            }
            .throw(),
            ClassType::Class => ResolveError {
                token: keyword.clone(),
                message: "Can't use 'super' in a class with no superclass.".to_string(),
            }
            .throw(),
        }

        self.resolve_local(id, keyword);
    }

    fn resolve_function(&mut self, function: &FunStmt, kind: FunctionType) {
        let enclosing_function = mem::replace(&mut self.current_function, kind);

        self.begin_scope();
        for param in &function.params {
            self.declare(param);
            self.define(param);
        }
        self.resolve(&function.body);
        self.end_scope();

        self.current_function = enclosing_function;
    }

    fn resolve_class(
        &mut self,
        name: &Token,
        superclass: Option<&Expr>,
        instance: &crate::stmt::ClassAttributes,
        statics: &crate::stmt::ClassAttributes,
    ) {
        let enclosing_class = mem::replace(&mut self.current_class, ClassType::Class);

        self.declare(name);
        self.define(name);

        let mut pushed_super_scope = false;

        if let Some(superclass_expr) = superclass {
            if let Expr::Variable(_, super_name) = superclass_expr {
                if name.lexeme == super_name.lexeme {
                    ResolveError {
                        token: super_name.clone(),
                        message: "A class can't inherit from itself.".to_string(),
                    }
                    .throw();
                }
            }

            self.current_class = ClassType::Subclass;
            self.resolve_expr(superclass_expr);

            self.begin_scope();
            self.define_exempt("super");
            pushed_super_scope = true;
        }

        self.begin_scope();
        self.define_exempt("this");

        for var in &instance.variables {
            if let Some(initializer) = &var.initializer {
                self.resolve_expr(initializer);
            }
        }

        for method in &instance.methods {
            let kind = if method.name.lexeme == "init" {
                FunctionType::Initializer
            } else {
                FunctionType::Method
            };
            self.resolve_function(method, kind);
        }

        self.end_scope();

        if pushed_super_scope {
            self.end_scope();
        }

        let enclosing_static = mem::replace(&mut self.in_static, true);
        for var in &statics.variables {
            if let Some(initializer) = &var.initializer {
                self.resolve_expr(initializer);
            }
        }
        for method in &statics.methods {
            self.resolve_function(method, FunctionType::Method);
        }
        self.in_static = enclosing_static;

        self.current_class = enclosing_class;
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        if let Some(scope) = self.scopes.pop() {
            for entry in scope.into_values() {
                if !entry.used {
                    ResolveWarning {
                        token: entry.token,
                        message: "Variable unused.".to_string(),
                    }
                    .throw();
                }
            }
        }
    }

    fn declare(&mut self, name: &Token) {
        if self.scopes.is_empty() {
            return;
        }

        let scope = self.scopes.last_mut().expect("stack to be not empty");
        if scope.contains_key(&name.lexeme) {
            ResolveError {
                token: name.clone(),
                message: format!("Already a variable with name '{}' in this scope.", name.lexeme),
            }
            .throw();
        }
        scope.insert(name.lexeme.clone(), ScopeEntry { token: name.clone(), defined: false, used: false });
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            if let Some(entry) = scope.get_mut(&name.lexeme) {
                entry.defined = true;
            } else {
                scope.insert(name.lexeme.clone(), ScopeEntry { token: name.clone(), defined: true, used: false });
            }
        }
    }

    /// Defines a name already marked used, for compiler-injected bindings (`this`, `super`)
    /// that should never trigger the unused-variable warning.
    fn define_exempt(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), ScopeEntry { token: Token::from(name), defined: true, used: true });
        }
    }

    fn resolve_local(&mut self, id: u32, name: &Token) {
        for (i, scope) in self.scopes.iter_mut().rev().enumerate() {
            if let Some(entry) = scope.get_mut(&name.lexeme) {
                entry.used = true;
                self.interpreter.resolve(id, i);
                return;
            }
        }
    }
}
