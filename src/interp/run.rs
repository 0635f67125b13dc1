use std::rc::Rc;

use {
    super::{
        frame::CallFrame,
        record::{ActivationRecord, Chain},
        resolve::{lookup, resolve},
        RuntimeError,
    },
    crate::{
        ast::{Expr, FunDecl, LogicalOp, Stmt},
        Closure, Value,
    },
};

type RunResult<T> = Result<T, RuntimeError>;

/// How a statement finished.
pub(super) enum Flow {
    Next(Value),
    Return(Value),
}

impl super::Interpreter {
    /// Run statements in order against `chain`. Without an explicit `return`, the block's value
    /// is that of its final statement when that is an expression statement, `nil` otherwise.
    pub(super) fn exec_block(&mut self, stmts: &[Stmt], chain: &Chain) -> RunResult<Flow> {
        let mut last = Value::Nil;

        for stmt in stmts {
            match self.exec(stmt, chain)? {
                Flow::Next(value) => last = value,
                ret @ Flow::Return(_) => return Ok(ret),
            }
        }

        Ok(Flow::Next(last))
    }

    fn exec(&mut self, stmt: &Stmt, chain: &Chain) -> RunResult<Flow> {
        match stmt {
            Stmt::Var { name, init } => {
                let value = self.eval(init, chain)?;
                chain.record().declare(name, value);
            }
            Stmt::Fun(decl) => self.define_function(decl, chain),
            Stmt::Assign { name, value } => {
                let value = self.eval(value, chain)?;
                self.assign(name, value, chain)?;
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                return if self.eval(cond, chain)?.is_falsey() {
                    self.exec_block(else_branch, chain)
                } else {
                    self.exec_block(then_branch, chain)
                };
            }
            Stmt::Return(value) => return Ok(Flow::Return(self.eval(value, chain)?)),
            Stmt::Expr(value) => return Ok(Flow::Next(self.eval(value, chain)?)),
        }

        Ok(Flow::Next(Value::Nil))
    }

    /// Bind the function's name first so the closure's own chain can see it, then capture.
    fn define_function(&mut self, decl: &Rc<FunDecl>, chain: &Chain) {
        let binding = chain.record().declare(&decl.name, Value::Nil);
        let closure = Closure::new(Rc::clone(decl), chain.capture());

        #[cfg(feature = "trace-execution")]
        log::debug!("closure {} over {:?}", closure, closure.chain);

        self.stats.closures += 1;
        binding.set(Value::Closure(Rc::new(closure)));
    }

    fn assign(&mut self, name: &str, value: Value, chain: &Chain) -> RunResult<()> {
        let found = lookup(name, chain)?;

        if found.record.is_live() {
            found.binding.set(value);
            Ok(())
        } else {
            Err(RuntimeError::ReleasedRecord(name.to_string()))
        }
    }

    fn eval(&mut self, expr: &Expr, chain: &Chain) -> RunResult<Value> {
        match expr {
            Expr::Nil => Ok(Value::Nil),
            Expr::Boolean(b) => Ok(Value::Boolean(*b)),
            Expr::Int(n) => Ok(Value::Int(*n)),
            Expr::Ident(name) => Ok(resolve(name, chain)?.get()),
            Expr::Call { callee, args } => {
                let target = resolve(callee, chain)?.get();

                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval(arg, chain)?);
                }

                self.call_value(callee, target, values)
            }
            Expr::Unary { op, rhs } => {
                let rhs = self.eval(rhs, chain)?;
                op.apply(rhs)
            }
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.eval(lhs, chain)?;
                let rhs = self.eval(rhs, chain)?;
                op.apply(lhs, rhs)
            }
            Expr::Logical { op, lhs, rhs } => {
                let lhs = self.eval(lhs, chain)?;
                match op {
                    LogicalOp::Or if !lhs.is_falsey() => Ok(lhs),
                    LogicalOp::And if lhs.is_falsey() => Ok(lhs),
                    _ => self.eval(rhs, chain),
                }
            }
        }
    }

    pub(super) fn call_value(
        &mut self,
        name: &str,
        callee: Value,
        args: Vec<Value>,
    ) -> RunResult<Value> {
        match callee {
            Value::Closure(c) => self.call(c, args),
            Value::NativeFun(n) => (n.fun)(&args).map_err(RuntimeError::NativeFunError),
            _ => Err(RuntimeError::NotCallable(name.to_string())),
        }
    }

    fn call(&mut self, callee: Rc<Closure>, args: Vec<Value>) -> RunResult<Value> {
        if args.len() != callee.arity() {
            return Err(RuntimeError::ArityMismatch {
                name: callee.name().to_string(),
                expected: callee.arity(),
                got: args.len(),
            });
        }

        if self.frames.len() >= self.max_depth {
            return Err(RuntimeError::CallStackOverflow(self.max_depth));
        }

        let record = ActivationRecord::create(Some(callee.chain.clone()));
        for (param, arg) in callee.decl.params.iter().zip(args) {
            record.declare(param, arg);
        }
        self.stats.records += 1;

        #[cfg(feature = "trace-execution")]
        log::debug!(
            "enter {} :: depth {} :: {:?}",
            callee,
            self.frames.len() + 1,
            record
        );

        self.frames
            .push(CallFrame::new(&callee, Rc::clone(&record)));
        let chain = Chain::open(record);

        // on error the frame is left in place for the backtrace; see `Interpreter::unwind`
        let flow = self.exec_block(&callee.decl.body, &chain)?;

        self.frames.pop();
        chain.into_record().release();

        let value = match flow {
            Flow::Next(value) | Flow::Return(value) => value,
        };

        #[cfg(feature = "trace-execution")]
        log::debug!("leave {} :: {}", callee, value);

        Ok(value)
    }
}
