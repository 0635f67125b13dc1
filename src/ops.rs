use std::fmt;

use crate::{RuntimeError, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
}

/// Operators whose right-hand side is only evaluated when needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

type OpResult = Result<Value, RuntimeError>;

impl UnaryOp {
    pub(crate) fn apply(self, value: Value) -> OpResult {
        match (self, value) {
            (Self::Not, v) => Ok(Value::Boolean(v.is_falsey())),
            (Self::Negate, Value::Int(n)) => n
                .checked_neg()
                .map(Value::Int)
                .ok_or(RuntimeError::Overflow(self.to_string())),
            (Self::Negate, _) => Err(RuntimeError::ArgumentTypes(self.to_string())),
        }
    }
}

impl BinaryOp {
    pub(crate) fn apply(self, lhs: Value, rhs: Value) -> OpResult {
        macro_rules! compare {
            ($op: tt) => {
                match (&lhs, &rhs) {
                    (Value::Int(a), Value::Int(b)) => Ok(Value::Boolean(a $op b)),
                    _ => Err(RuntimeError::ArgumentTypes(self.to_string())),
                }
            };
        }

        macro_rules! arith {
            ($method: ident) => {
                match (&lhs, &rhs) {
                    (Value::Int(a), Value::Int(b)) => a
                        .$method(*b)
                        .map(Value::Int)
                        .ok_or(RuntimeError::Overflow(self.to_string())),
                    _ => Err(RuntimeError::ArgumentTypes(self.to_string())),
                }
            };
        }

        match self {
            Self::Equal => Ok(Value::Boolean(lhs == rhs)),
            Self::NotEqual => Ok(Value::Boolean(lhs != rhs)),
            Self::Greater => compare!(>),
            Self::GreaterEqual => compare!(>=),
            Self::Less => compare!(<),
            Self::LessEqual => compare!(<=),
            Self::Add => arith!(checked_add),
            Self::Subtract => arith!(checked_sub),
            Self::Multiply => arith!(checked_mul),
            Self::Divide | Self::Remainder => {
                if let Value::Int(0) = rhs {
                    return Err(RuntimeError::DivideByZero);
                }

                if let Self::Divide = self {
                    arith!(checked_div)
                } else {
                    arith!(checked_rem)
                }
            }
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Negate => write!(f, "-"),
            Self::Not => write!(f, "!"),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Equal => "==",
                Self::NotEqual => "!=",
                Self::Greater => ">",
                Self::GreaterEqual => ">=",
                Self::Less => "<",
                Self::LessEqual => "<=",
                Self::Add => "+",
                Self::Subtract => "-",
                Self::Multiply => "*",
                Self::Divide => "/",
                Self::Remainder => "%",
            }
        )
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::And => write!(f, "&&"),
            Self::Or => write!(f, "||"),
        }
    }
}
