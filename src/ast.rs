//! Syntax tree consumed by the interpreter.
//!
//! There is no parser in this crate: programs arrive already built, either from an external
//! front end or from the builder functions at the bottom of this module.
//!
//! ### Example
//!
//! ```
//! use lexenv::ast::*;
//!
//! // fun double(n) { return n + n; }
//! // double(21);
//! let program = Program::new(vec![
//!     fun("double", &["n"], vec![ret(add(ident("n"), ident("n")))]),
//!     expr(call("double", vec![int(21)])),
//! ]);
//!
//! assert_eq!(program.items().len(), 2);
//! ```

use std::{fmt, rc::Rc};

pub use crate::ops::{BinaryOp, LogicalOp, UnaryOp};

/// A whole program: top-level statements executed against the global record.
#[derive(Clone, Debug)]
pub struct Program {
    items: Vec<Stmt>,
}

impl Program {
    pub fn new(items: Vec<Stmt>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Stmt] {
        &self.items
    }
}

#[derive(Clone, Debug)]
pub enum Stmt {
    /// `var name = init;` Always introduces a new binding.
    Var { name: Box<str>, init: Expr },
    /// A function declaration. The declaration is shared by every closure built from it.
    Fun(Rc<FunDecl>),
    /// `name = value;` Writes through the binding that `name` resolves to.
    Assign { name: Box<str>, value: Expr },
    If {
        cond: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Vec<Stmt>,
    },
    Return(Expr),
    Expr(Expr),
}

#[derive(Debug)]
pub struct FunDecl {
    pub name: Box<str>,
    pub params: Vec<Box<str>>,
    pub body: Vec<Stmt>,
}

impl FunDecl {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for FunDecl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#<fun {}/{}>", self.name, self.arity())
    }
}

#[derive(Clone, Debug)]
pub enum Expr {
    Nil,
    Boolean(bool),
    Int(i64),
    Ident(Box<str>),
    Call {
        callee: Box<str>,
        args: Vec<Expr>,
    },
    Unary {
        op: UnaryOp,
        rhs: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Logical {
        op: LogicalOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

// builders

pub fn var<T: ToString>(name: T, init: Expr) -> Stmt {
    Stmt::Var {
        name: name.to_string().into_boxed_str(),
        init,
    }
}

pub fn fun<T: ToString>(name: T, params: &[&str], body: Vec<Stmt>) -> Stmt {
    Stmt::Fun(Rc::new(FunDecl {
        name: name.to_string().into_boxed_str(),
        params: params.iter().map(|&p| p.into()).collect(),
        body,
    }))
}

pub fn assign<T: ToString>(name: T, value: Expr) -> Stmt {
    Stmt::Assign {
        name: name.to_string().into_boxed_str(),
        value,
    }
}

pub fn if_then(cond: Expr, then_branch: Vec<Stmt>) -> Stmt {
    if_else(cond, then_branch, Vec::new())
}

pub fn if_else(cond: Expr, then_branch: Vec<Stmt>, else_branch: Vec<Stmt>) -> Stmt {
    Stmt::If {
        cond,
        then_branch,
        else_branch,
    }
}

pub fn ret(value: Expr) -> Stmt {
    Stmt::Return(value)
}

pub fn expr(value: Expr) -> Stmt {
    Stmt::Expr(value)
}

pub fn int(value: i64) -> Expr {
    Expr::Int(value)
}

pub fn boolean(value: bool) -> Expr {
    Expr::Boolean(value)
}

pub fn nil() -> Expr {
    Expr::Nil
}

pub fn ident<T: ToString>(name: T) -> Expr {
    Expr::Ident(name.to_string().into_boxed_str())
}

pub fn call<T: ToString>(callee: T, args: Vec<Expr>) -> Expr {
    Expr::Call {
        callee: callee.to_string().into_boxed_str(),
        args,
    }
}

pub fn unary(op: UnaryOp, rhs: Expr) -> Expr {
    Expr::Unary {
        op,
        rhs: Box::new(rhs),
    }
}

pub fn binary(lhs: Expr, op: BinaryOp, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

pub fn add(lhs: Expr, rhs: Expr) -> Expr {
    binary(lhs, BinaryOp::Add, rhs)
}

pub fn sub(lhs: Expr, rhs: Expr) -> Expr {
    binary(lhs, BinaryOp::Subtract, rhs)
}

pub fn mul(lhs: Expr, rhs: Expr) -> Expr {
    binary(lhs, BinaryOp::Multiply, rhs)
}

pub fn eq(lhs: Expr, rhs: Expr) -> Expr {
    binary(lhs, BinaryOp::Equal, rhs)
}

pub fn less(lhs: Expr, rhs: Expr) -> Expr {
    binary(lhs, BinaryOp::Less, rhs)
}

pub fn or(lhs: Expr, rhs: Expr) -> Expr {
    Expr::Logical {
        op: LogicalOp::Or,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

pub fn and(lhs: Expr, rhs: Expr) -> Expr {
    Expr::Logical {
        op: LogicalOp::And,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}
