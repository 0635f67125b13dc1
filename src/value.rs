use std::{cmp, error, fmt, rc::Rc};

use crate::{ast::FunDecl, interp::Chain};

/// Runtime values.
#[derive(Clone)]
#[non_exhaustive]
pub enum Value {
    Nil,
    Boolean(bool),
    Int(i64),
    Closure(Rc<Closure>),
    NativeFun(Rc<Native>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Int(v) => write!(f, "{}", v),
            Self::Closure(c) => write!(f, "{}", c),
            Self::NativeFun(n) => write!(f, "#<native fun {}>", n.name),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "Nil"),
            Self::Boolean(b) => write!(f, "Boolean({})", b),
            Self::Int(v) => write!(f, "Int({})", v),
            Self::Closure(c) => write!(f, "Closure({}, {:?})", c.decl, c.chain),
            Self::NativeFun(n) => write!(f, "NativeFun({})", n.name),
        }
    }
}

impl cmp::PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Closure(a), Self::Closure(b)) => Rc::ptr_eq(a, b),
            (Self::NativeFun(a), Self::NativeFun(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl Value {
    pub(crate) fn is_falsey(&self) -> bool {
        matches!(self, Self::Nil | Self::Boolean(false) | Self::Int(0))
    }

    pub fn as_int(&self) -> Option<i64> {
        if let Self::Int(n) = self {
            Some(*n)
        } else {
            None
        }
    }

    pub fn as_closure(&self) -> Option<&Rc<Closure>> {
        if let Self::Closure(c) = self {
            Some(c)
        } else {
            None
        }
    }
}

/// A function value: a declaration paired with the chain that was visible where it was declared.
///
/// The chain is fixed at construction. Re-entering the enclosing function builds a new
/// `Closure` for the same declaration rather than updating this one.
pub struct Closure {
    pub(crate) decl: Rc<FunDecl>,
    pub(crate) chain: Chain,
}

impl Closure {
    pub(crate) fn new(decl: Rc<FunDecl>, chain: Chain) -> Self {
        Self { decl, chain }
    }

    pub fn name(&self) -> &str {
        &self.decl.name
    }

    pub fn arity(&self) -> usize {
        self.decl.arity()
    }

    /// The chain captured when this closure was built.
    pub fn chain(&self) -> &Chain {
        &self.chain
    }
}

impl fmt::Display for Closure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.decl)
    }
}

/// A natively-implemented function that can be called from interpreted code.
///
/// Natives are ordinary function references: calling one creates no activation record.
///
/// ## Example
///
/// ```
/// # use {std::{error::Error, fmt}, lexenv::{ast::*, Interpreter, Value}};
/// # #[derive(Debug)]
/// # struct MyError;
/// # impl fmt::Display for MyError {
/// #     fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
/// #         write!(f, "wrong types")
/// #     }
/// # }
/// # impl Error for MyError {}
/// let mut interp = Interpreter::default();
/// interp.define_native("square", |args: &[Value]| match args {
///     [Value::Int(n)] => Ok(Value::Int(n * n)),
///     _ => Err(Box::new(MyError) as Box<dyn Error>),
/// });
///
/// let result = interp.interpret(&Program::new(vec![
///     expr(call("square", vec![int(12)])),
/// ]));
///
/// assert_eq!(result.unwrap(), Value::Int(144));
/// ```
pub struct Native {
    pub(crate) name: Box<str>,
    pub(crate) fun: NativeFun,
}

impl Native {
    pub fn new<T: ToString>(name: T, fun: NativeFun) -> Self {
        Self {
            name: name.to_string().into_boxed_str(),
            fun,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

pub type NativeFun = Box<dyn Fn(&[Value]) -> Result<Value, Box<dyn error::Error>>>;
