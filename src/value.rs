use std::{fmt, rc::Rc};

use crate::{
    ast::Stmt, diagnostics::CalyxError, environment::EnvironmentRef, marshal::CallFrame,
};

/// A script value. Values are immutable; cloning shares the allocation.
#[derive(Clone)]
pub struct Value(pub Rc<ValueKind>);

impl Value {
    pub fn new(kind: ValueKind) -> Self {
        Self(Rc::new(kind))
    }

    /// The "no value" result, produced by natives that return nothing.
    pub fn unit() -> Self {
        Self::new(ValueKind::Unit)
    }

    pub fn bool(value: bool) -> Self {
        Self::new(ValueKind::Bool(value))
    }

    pub fn int(value: i64) -> Self {
        Self::new(ValueKind::Int(value))
    }

    pub fn float(value: f64) -> Self {
        Self::new(ValueKind::Float(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(ValueKind::String(value.into()))
    }

    pub fn is_truthy(&self) -> bool {
        match &*self.0 {
            ValueKind::Unit => false,
            ValueKind::Bool(b) => *b,
            ValueKind::Int(n) => *n != 0,
            ValueKind::Float(f) => *f != 0.0,
            ValueKind::String(s) => !s.is_empty(),
            ValueKind::Function(_) | ValueKind::NativeFunction(_) => true,
        }
    }

    /// The dynamic type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match &*self.0 {
            ValueKind::Unit => "Unit",
            ValueKind::Bool(_) => "Bool",
            ValueKind::Int(_) => "Int",
            ValueKind::Float(_) => "Float",
            ValueKind::String(_) => "String",
            ValueKind::Function(_) | ValueKind::NativeFunction(_) => "Function",
        }
    }

    pub fn is_int(&self) -> bool {
        matches!(&*self.0, ValueKind::Int(_))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            ValueKind::Unit => write!(f, "Unit"),
            ValueKind::Bool(b) => write!(f, "{b}"),
            ValueKind::Int(n) => write!(f, "{n}"),
            ValueKind::Float(n) => write!(f, "{n}"),
            ValueKind::String(s) => write!(f, "\"{s}\""),
            ValueKind::Function(fun) => write!(f, "<fn {}>", fun.name),
            ValueKind::NativeFunction(fun) => write!(f, "<native fn {}>", fun.name),
        }
    }
}

/// Display is total: every value renders as some text, including the
/// placeholder forms for functions. That totality is what lets the
/// variadic printer accept any argument without failing.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            ValueKind::Unit => write!(f, "unit"),
            ValueKind::Bool(b) => write!(f, "{b}"),
            ValueKind::Int(n) => write!(f, "{n}"),
            ValueKind::Float(n) => write!(f, "{n}"),
            ValueKind::String(s) => write!(f, "{s}"),
            ValueKind::Function(fun) => write!(f, "<fn {}>", fun.name),
            ValueKind::NativeFunction(fun) => write!(f, "<native fn {}>", fun.name),
        }
    }
}

#[derive(Clone)]
pub enum ValueKind {
    Unit,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Function(UserFunction),
    NativeFunction(NativeFunction),
}

/// A function declared in script code, closing over its defining scope.
#[derive(Clone)]
pub struct UserFunction {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
    pub env: EnvironmentRef,
}

/// How many arguments a native function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many arguments. Any other count is rejected before
    /// the callback runs.
    Fixed(usize),
    /// Any number of arguments, including zero.
    Variadic,
}

/// Signature shared by every native callback. The marshaling layer
/// hands the callback an arity-checked frame; typed accessors on the
/// frame perform the per-argument conversions.
pub type NativeCallback = fn(&CallFrame<'_>) -> Result<Value, CalyxError>;

/// A natively-implemented function bound into the global namespace:
/// the name script code sees, its arity contract, and the callback.
#[derive(Clone)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: Arity,
    pub callback: NativeCallback,
}
