mod utils;

use {
    lexenv::{ast::*, programs, ErrorCategory, Interpreter, RuntimeError, Value},
    std::{error::Error, fmt},
};

#[test]
fn sum() -> utils::Result {
    run!(
        Program::new(vec![
            fun(
                "sum",
                &["a", "b", "c"],
                vec![ret(add(add(ident("a"), ident("b")), ident("c")))],
            ),
            expr(add(int(4), call("sum", vec![int(5), int(6), int(7)]))),
        ]) => Value::Int(22)
    )
}

#[test]
fn last_expression_is_the_result() -> utils::Result {
    run!(
        Program::new(vec![
            fun("two", &[], vec![expr(int(1)), expr(int(2))]),
            expr(call("two", vec![])),
        ]) => Value::Int(2)
    )
}

#[test]
fn no_return() -> utils::Result {
    run!(
        Program::new(vec![
            fun("noReturn", &[], vec![var("unused", int(1))]),
            expr(call("noReturn", vec![])),
        ]) => Value::Nil
    )
}

#[test]
fn return_skips_rest_of_body() -> utils::Result {
    run!(
        Program::new(vec![
            fun(
                "early",
                &["n"],
                vec![
                    if_else(
                        less(ident("n"), int(0)),
                        vec![ret(int(-1))],
                        vec![ret(int(1))],
                    ),
                    expr(call("missing", vec![])),
                ],
            ),
            expr(add(
                mul(call("early", vec![int(-5)]), int(10)),
                call("early", vec![int(5)]),
            )),
        ]) => Value::Int(-9)
    )
}

#[test]
fn logical_operators_short_circuit() -> utils::Result {
    run!(
        Program::new(vec![
            fun("boom", &[], vec![ret(ident("missing"))]),
            var("a", and(boolean(false), call("boom", vec![]))),
            var("b", or(int(7), call("boom", vec![]))),
            expr(binary(
                unary(UnaryOp::Not, ident("a")),
                BinaryOp::Equal,
                eq(ident("b"), int(7)),
            )),
        ]) => Value::Boolean(true)
    )
}

#[test]
fn unbound_identifier() {
    let err = run_err!(programs::unbound());

    assert!(matches!(err.kind(), RuntimeError::UnboundIdentifier(name) if name == "hidden"));
    assert_eq!(err.category(), ErrorCategory::Resolution);
    let trace: Vec<&str> = err.backtrace().iter().map(|n| &**n).collect();
    assert_eq!(trace, vec!["inner", "outer"]);
}

#[test]
fn arity_mismatch() {
    let err = run_err!(Program::new(vec![
        fun("pair", &["a", "b"], vec![ret(ident("a"))]),
        fun("caller", &[], vec![ret(call("pair", vec![int(1)]))]),
        expr(call("caller", vec![])),
    ]));

    match err.kind() {
        RuntimeError::ArityMismatch {
            name,
            expected,
            got,
        } => {
            assert_eq!(name, "pair");
            assert_eq!((*expected, *got), (2, 1));
        }
        other => panic!("unexpected error {}", other),
    }
    assert_eq!(err.category(), ErrorCategory::Runtime);
    assert_eq!(err.backtrace().len(), 1);
}

#[test]
fn not_a_function() {
    let err = run_err!(Program::new(vec![
        var("notAFunction", int(123)),
        expr(call("notAFunction", vec![])),
    ]));

    assert!(matches!(err.kind(), RuntimeError::NotCallable(name) if name == "notAFunction"));
}

#[test]
fn top_level_return() {
    let err = run_err!(Program::new(vec![ret(int(1))]));
    assert!(matches!(err.kind(), RuntimeError::TopLevelReturn));
}

#[test]
fn divide_by_zero() {
    let err = run_err!(Program::new(vec![expr(binary(
        int(1),
        BinaryOp::Divide,
        int(0)
    ))]));
    assert!(matches!(err.kind(), RuntimeError::DivideByZero));
}

#[test]
fn call_stack_overflow() {
    let mut interp = Interpreter::default().with_max_depth(16);
    let err = interp
        .interpret(&Program::new(vec![
            fun(
                "forever",
                &["n"],
                vec![ret(call("forever", vec![add(ident("n"), int(1))]))],
            ),
            expr(call("forever", vec![int(0)])),
        ]))
        .unwrap_err();

    assert!(matches!(err.kind(), RuntimeError::CallStackOverflow(16)));
    assert_eq!(err.backtrace().len(), 16);
}

#[test]
fn interpreter_recovers_after_error() -> utils::Result {
    let mut interp = Interpreter::default();
    assert!(interp.interpret(&programs::unbound()).is_err());

    let value = interp.interpret(&programs::function_closures())?;
    assert_eq!(value, Value::Int(21));
    Ok(())
}

#[test]
fn late_bound_host_global() -> utils::Result {
    let mut interp = Interpreter::default();
    interp.interpret(&Program::new(vec![fun(
        "hello",
        &[],
        vec![ret(ident("world"))],
    )]))?;

    let program = Program::new(vec![expr(call("hello", vec![]))]);
    assert_eq!(interp.scope_table(&program).unbound().count(), 0);

    interp.define_global("world", Value::Int(42));
    assert_eq!(interp.call_global("hello", vec![])?, Value::Int(42));
    Ok(())
}

#[derive(Debug)]
struct WrongTypes;

impl fmt::Display for WrongTypes {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "wrong types")
    }
}

impl Error for WrongTypes {}

#[test]
fn native_function() -> utils::Result {
    let mut interp = Interpreter::default();
    interp.define_native("twice", |args: &[Value]| match args {
        [Value::Int(n)] => Ok(Value::Int(n * 2)),
        _ => Err(Box::new(WrongTypes) as Box<dyn Error>),
    });

    let value = interp.interpret(&Program::new(vec![
        var("k", int(4)),
        fun("apply", &[], vec![ret(call("twice", vec![ident("k")]))]),
        expr(call("apply", vec![])),
    ]))?;

    assert_eq!(value, Value::Int(8));
    Ok(())
}

#[test]
fn native_function_error() {
    let mut interp = Interpreter::default();
    interp.define_native("twice", |_: &[Value]| {
        Err(Box::new(WrongTypes) as Box<dyn Error>)
    });

    let err = interp
        .interpret(&Program::new(vec![expr(call("twice", vec![nil()]))]))
        .unwrap_err();

    assert!(matches!(err.kind(), RuntimeError::NativeFunError(_)));
    let source = err.source().and_then(|s| s.source()).unwrap();
    assert_eq!(source.to_string(), "wrong types");
}

#[test]
fn display_values() -> utils::Result {
    let mut interp = Interpreter::default();
    interp.interpret(&programs::function_closures())?;

    assert_eq!(interp.global("foo").unwrap().to_string(), "#<fun foo/2>");
    assert_eq!(Value::Nil.to_string(), "nil");
    Ok(())
}
