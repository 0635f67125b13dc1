use std::{error, fmt};

use crate::RuntimeError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A name could not be resolved or written along its chain.
    Resolution,
    Runtime,
}

/// An error that aborted a program, with the calls that were active when it was raised.
#[derive(Debug)]
pub struct Error {
    err: RuntimeError,
    backtrace: Vec<Box<str>>,
}

impl Error {
    pub(crate) fn new(err: RuntimeError, backtrace: Vec<Box<str>>) -> Self {
        Self { err, backtrace }
    }

    pub fn category(&self) -> ErrorCategory {
        match self.err {
            RuntimeError::UnboundIdentifier(_) | RuntimeError::ReleasedRecord(_) => {
                ErrorCategory::Resolution
            }
            _ => ErrorCategory::Runtime,
        }
    }

    pub fn kind(&self) -> &RuntimeError {
        &self.err
    }

    /// Names of the functions that were executing, innermost first.
    pub fn backtrace(&self) -> &[Box<str>] {
        &self.backtrace
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.err)?;
        for name in &self.backtrace {
            write!(f, "\n=>> in `{}`", name)?;
        }
        Ok(())
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        Some(&self.err)
    }
}
