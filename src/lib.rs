//! Lexical closures over chained activation records.
//!
//! A function declared inside another function captures the chain of records that was visible
//! where it was declared. Its free identifiers always resolve along that chain, never along the
//! chain of callers, and a fresh chain is built every time the enclosing function is entered.
//!
//! ```
//! use lexenv::{programs, Interpreter, Value};
//!
//! let mut interp = Interpreter::default();
//! let result = interp.interpret(&programs::function_closures()).unwrap();
//! assert_eq!(result, Value::Int(21));
//! ```

pub mod ast;
mod error;
mod interp;
mod ops;
pub mod programs;
mod scope_table;
mod value;

pub use {
    error::{Error, ErrorCategory},
    interp::{
        lookup, resolve, ActivationRecord, Binding, Chain, Interpreter, Lookup, RuntimeError,
        Stats,
    },
    scope_table::{DeclKind, Declaration, Reference, Resolution, Scope, ScopeId, ScopeTable},
    value::{Closure, Native, NativeFun, Value},
};
