use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::rc::Rc;

use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::function::Function;
use crate::interpreter::Interpreter;
use crate::object::Object;
use crate::stmt::VarStmt;
use crate::token::Token;

#[derive(Debug)]
pub struct Class {
    pub name: String,
    pub superclass: Option<Rc<RefCell<Class>>>,
    pub methods: HashMap<String, Function>,
    /// Keyed separately from `methods` so a getter and a setter sharing a name (a
    /// common property-accessor pattern) don't overwrite each other.
    pub getters: HashMap<String, Function>,
    pub setters: HashMap<String, Function>,
    pub instance_variables: Vec<VarStmt>,
    pub closure: Rc<RefCell<Environment>>,
    /// Static variables and methods, stored as ordinary fields on the class itself.
    pub fields: RefCell<HashMap<String, Object>>,
}

impl Class {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        superclass: Option<Rc<RefCell<Class>>>,
        methods: HashMap<String, Function>,
        getters: HashMap<String, Function>,
        setters: HashMap<String, Function>,
        instance_variables: Vec<VarStmt>,
        closure: Rc<RefCell<Environment>>,
    ) -> Self {
        Class {
            name,
            superclass,
            methods,
            getters,
            setters,
            instance_variables,
            closure,
            fields: RefCell::new(HashMap::new()),
        }
    }

    /// Walks the superclass chain looking for a plain (non-getter, non-setter) method.
    pub fn find_method(&self, name: &str) -> Option<Function> {
        if let Some(method) = self.methods.get(name) {
            return Some(method.clone());
        }
        self.superclass.as_ref().and_then(|sup| sup.borrow().find_method(name))
    }

    /// Walks the superclass chain looking for a getter by name.
    pub fn find_getter(&self, name: &str) -> Option<Function> {
        if let Some(getter) = self.getters.get(name) {
            return Some(getter.clone());
        }
        self.superclass.as_ref().and_then(|sup| sup.borrow().find_getter(name))
    }

    /// Walks the superclass chain looking for a setter by name.
    pub fn find_setter(&self, name: &str) -> Option<Function> {
        if let Some(setter) = self.setters.get(name) {
            return Some(setter.clone());
        }
        self.superclass.as_ref().and_then(|sup| sup.borrow().find_setter(name))
    }

    pub fn get_static(&self, name: &Token) -> Result<Object, RuntimeError> {
        if let Some(value) = self.fields.borrow().get(&name.lexeme) {
            return Ok(value.clone());
        }
        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined property '{}'.", name.lexeme),
        })
    }

    pub fn set_static(&self, name: &Token, value: Object) {
        self.fields.borrow_mut().insert(name.lexeme.clone(), value);
    }
}

impl Display for Class {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<class {}>", self.name)
    }
}

impl Class {
    pub fn arity(&self) -> usize {
        self.find_method("init").map(|init| init.arity()).unwrap_or(0)
    }

    /// Constructs a new instance: runs `init` (if any) bound to it, then evaluates every
    /// instance variable initializer in the class's own closure and stores the results
    /// as fields. `class_ref` is the same `Rc` this `Class` lives behind, needed so the
    /// new `Instance` can share ownership of it.
    pub fn construct(
        class_ref: &Rc<RefCell<Class>>,
        interpreter: &mut Interpreter,
        arguments: Vec<Object>,
    ) -> Result<Object, RuntimeError> {
        let instance = Rc::new(RefCell::new(Instance::new(Rc::clone(class_ref))));

        let init = class_ref.borrow().find_method("init");
        if let Some(init) = init {
            let bound = init.bind(Object::Instance(Rc::clone(&instance)));
            bound.call(interpreter, arguments)?;
        }

        interpreter.initialize_instance_variables(class_ref, &instance)?;

        Ok(Object::Instance(instance))
    }
}

#[derive(Debug)]
pub struct Instance {
    pub class: Rc<RefCell<Class>>,
    pub fields: HashMap<String, Object>,
}

impl Instance {
    pub fn new(class: Rc<RefCell<Class>>) -> Self {
        Instance { class, fields: HashMap::new() }
    }

    /// Returns the field if one is set, else a getter or plain method bound to this
    /// instance (checked in that order, since a getter takes priority over a same-named
    /// plain method). Getter invocation happens one layer up, in the interpreter, since
    /// only it knows how to evaluate a call.
    pub fn get(&self, name: &Token, self_ref: &Rc<RefCell<Instance>>) -> Result<Object, RuntimeError> {
        if let Some(field) = self.fields.get(&name.lexeme) {
            return Ok(field.clone());
        }

        let class = self.class.borrow();
        let method = class.find_getter(&name.lexeme).or_else(|| class.find_method(&name.lexeme));
        if let Some(method) = method {
            return Ok(Object::Function(Rc::new(method.bind(Object::Instance(Rc::clone(self_ref))))));
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined property '{}'.", name.lexeme),
        })
    }

    pub fn find_setter(&self, name: &str) -> Option<Function> {
        self.class.borrow().find_setter(name)
    }

    pub fn set(&mut self, name: &Token, value: Object) {
        self.fields.insert(name.lexeme.clone(), value);
    }
}

impl Display for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<instance of {}>", self.class.borrow().name)
    }
}
