use std::rc::Rc;

mod errors;
mod frame;
mod record;
mod resolve;
mod run;

pub use {
    errors::RuntimeError,
    record::{ActivationRecord, Binding, Chain},
    resolve::{lookup, resolve, Lookup},
};

use {
    crate::{ast::Program, Error, Native, NativeFun, ScopeTable, Value},
    frame::CallFrame,
    run::Flow,
};

/// Counters for the objects an interpreter has built so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// Activation records created for calls (the global record is not counted).
    pub records: usize,
    /// Closures built from function declarations, including top-level ones.
    pub closures: usize,
}

/// Evaluates programs against one global record.
///
/// ### Example
///
/// ```
/// use lexenv::{ast::*, Interpreter, Value};
///
/// let mut interp = Interpreter::default();
/// let result = interp.interpret(&Program::new(vec![
///     var("x", int(1)),
///     fun("get", &[], vec![ret(ident("x"))]),
///     expr(call("get", vec![])),
/// ]));
///
/// assert_eq!(result.unwrap(), Value::Int(1));
/// ```
pub struct Interpreter {
    globals: Rc<ActivationRecord>,
    frames: Vec<CallFrame>,
    max_depth: usize,
    stats: Stats,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self {
            globals: ActivationRecord::create(None),
            frames: Vec::with_capacity(Self::DEFAULT_MAX_DEPTH),
            max_depth: Self::DEFAULT_MAX_DEPTH,
            stats: Stats::default(),
        }
    }
}

impl Interpreter {
    pub const DEFAULT_MAX_DEPTH: usize = 256;

    /// Limit how many calls may be active at once. Exceeding it raises
    /// [`RuntimeError::CallStackOverflow`].
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Run a program's top-level statements in the global record.
    ///
    /// Returns the value of the final top-level statement if it is an expression statement,
    /// `nil` otherwise. Identifiers the [`ScopeTable`] cannot resolve are reported as warnings
    /// before evaluation starts; they only fail if evaluation actually reaches them.
    ///
    /// ### Errors
    ///
    /// The first runtime error aborts the program. The returned [`Error`] carries a backtrace of
    /// the calls that were active when it was raised.
    pub fn interpret(&mut self, program: &Program) -> Result<Value, Error> {
        for reference in self.scope_table(program).unbound() {
            log::warn!("{}", reference);
        }

        let chain = Chain::open(Rc::clone(&self.globals));
        match self.exec_block(program.items(), &chain) {
            Ok(Flow::Next(value)) => Ok(value),
            Ok(Flow::Return(_)) => Err(self.unwind(RuntimeError::TopLevelReturn)),
            Err(e) => Err(self.unwind(e)),
        }
    }

    /// Static scopes of `program`, counting globals already defined in this interpreter.
    pub fn scope_table(&self, program: &Program) -> ScopeTable {
        ScopeTable::with_host_globals(program, self.globals.names())
    }

    /// Call a global function by name from the host.
    pub fn call_global(&mut self, name: &str, args: Vec<Value>) -> Result<Value, Error> {
        let result = self
            .resolve_global(name)
            .and_then(|callee| self.call_value(name, callee.get(), args));

        result.map_err(|e| self.unwind(e))
    }

    /// Define a global variable inside the runtime.
    ///
    /// Functions declared before this call still see the value if they reference a name that had
    /// no binding when they were built. Redefining an existing global leaves functions that
    /// already see the old binding reading the old one.
    pub fn define_global<T: ?Sized + ToString>(&mut self, name: &T, value: Value) {
        self.globals.declare(&name.to_string(), value);
    }

    /// Register a host function as a global. Calls to it receive their arguments directly.
    pub fn define_native<T, F>(&mut self, name: &T, fun: F)
    where
        T: ?Sized + ToString,
        F: Fn(&[Value]) -> Result<Value, Box<dyn std::error::Error>> + 'static,
    {
        let name = name.to_string();
        let native = Native::new(&name, Box::new(fun) as NativeFun);
        self.globals.declare(&name, Value::NativeFun(Rc::new(native)));
    }

    /// Current value of a global, if one is declared.
    pub fn global(&self, name: &str) -> Option<Value> {
        self.globals.lookup_local(name).map(|b| b.get())
    }

    pub fn resolve_global(&self, name: &str) -> Result<Rc<Binding>, RuntimeError> {
        resolve(name, &Chain::open(Rc::clone(&self.globals)))
    }

    pub fn globals(&self) -> &Rc<ActivationRecord> {
        &self.globals
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Turn a runtime error into the public error type, recording and releasing every frame
    /// that was active when it was raised.
    fn unwind(&mut self, err: RuntimeError) -> Error {
        let mut backtrace = Vec::with_capacity(self.frames.len());
        let mut message = format!("{}", err);

        while let Some(frame) = self.frames.pop() {
            message += &format!("\n=>> in `{}`", frame.name);
            backtrace.push(frame.name);
            frame.record.release();
        }

        log::error!("{}", message);

        Error::new(err, backtrace)
    }
}

impl Drop for Interpreter {
    fn drop(&mut self) {
        // global closures capture the global record, which in turn owns them
        self.globals.clear();
    }
}
