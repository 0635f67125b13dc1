use std::{error, fmt};

/// Failures raised while evaluating a program.
///
/// Every kind is fatal to the call that raised it and unwinds to the entry point unchanged.
#[derive(Debug)]
#[non_exhaustive]
pub enum RuntimeError {
    UnboundIdentifier(String),
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    NotCallable(String),
    ArgumentTypes(String),
    DivideByZero,
    Overflow(String),
    CallStackOverflow(usize),
    ReleasedRecord(String),
    TopLevelReturn,
    NativeFunError(Box<dyn error::Error>),
}

impl error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::NativeFunError(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::UnboundIdentifier(name) => {
                write!(f, "tried to access unbound identifier `{}`", name)
            }
            Self::ArityMismatch {
                name,
                expected,
                got,
            } => write!(
                f,
                "`{}` expected {} arguments but got {}",
                name, expected, got
            ),
            Self::NotCallable(name) => write!(f, "tried to call non-callable value `{}`", name),
            Self::ArgumentTypes(op) => write!(f, "incompatible types for operator `{}`", op),
            Self::DivideByZero => write!(f, "division by zero"),
            Self::Overflow(op) => write!(f, "integer overflow in operator `{}`", op),
            Self::CallStackOverflow(limit) => {
                write!(f, "call stack overflowed (limit {} frames)", limit)
            }
            Self::ReleasedRecord(name) => write!(
                f,
                "tried to assign `{}` in a frame that has already returned",
                name
            ),
            Self::TopLevelReturn => write!(f, "return statement outside a function body"),
            Self::NativeFunError(inner) => {
                write!(f, "native function returned an error: {}", inner)
            }
        }
    }
}
