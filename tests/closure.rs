mod utils;

use {
    lexenv::{ast::*, programs, Interpreter, RuntimeError, Value},
    std::rc::Rc,
};

#[test]
fn function_closures_fixture() -> utils::Result {
    // utils::setup_logger();
    // frame foo(0, 1) returns 0; frame foo(1, 2): bar(3) = 10 + 3 + 3, then + 0 + 5
    run!(programs::function_closures() => Value::Int(21))
}

#[test]
fn function_closures_deeper() -> utils::Result {
    // foo(2, 3): x = 5, temp = foo(1, 2) = 21, bar(5) = 20; 20 + 21 + 5
    run!(programs::function_closures_with(2, 3) => Value::Int(46))
}

#[test]
fn function_closures_three_frames() -> utils::Result {
    // foo(1, 1) = 19, foo(2, 2) = 18 + 19 + 5, foo(3, 3) = 22 + 42 + 5
    run!(programs::function_closures_with(3, 3) => Value::Int(69))
}

#[test]
fn fixture_builds_one_closure_per_entered_frame() -> utils::Result {
    let mut interp = Interpreter::default();
    interp.interpret(&programs::function_closures())?;

    let stats = interp.stats();
    // foo(1, 2), foo(0, 1), bar(3)
    assert_eq!(stats.records, 3);
    // the global foo, plus one bar for the frame that got past the guard
    assert_eq!(stats.closures, 2);
    Ok(())
}

#[test]
fn short_circuit_builds_no_closure() -> utils::Result {
    let mut interp = Interpreter::default();
    let value = interp.interpret(&programs::function_closures_with(0, 7))?;

    assert_eq!(value, Value::Int(0));
    assert_eq!(interp.stats().records, 1);
    assert_eq!(interp.stats().closures, 1);
    Ok(())
}

#[test]
fn shadow_after_capture() -> utils::Result {
    run!(programs::shadow_after_capture() => Value::Int(12))
}

#[test]
fn lexical_not_dynamic() -> utils::Result {
    run!(
        Program::new(vec![
            var("z", int(10)),
            fun("reader", &[], vec![ret(ident("z"))]),
            fun(
                "shadower",
                &["n"],
                vec![var("z", ident("n")), ret(call("reader", vec![]))],
            ),
            expr(call("shadower", vec![int(99)])),
        ]) => Value::Int(10)
    )
}

#[test]
fn inner_outer() -> utils::Result {
    run!(
        Program::new(vec![
            var("x", int(1)),
            fun(
                "outer",
                &[],
                vec![
                    var("x", int(2)),
                    fun("inner", &[], vec![ret(ident("x"))]),
                    ret(call("inner", vec![])),
                ],
            ),
            expr(call("outer", vec![])),
        ]) => Value::Int(2)
    )
}

#[test]
fn counter_shares_binding() -> utils::Result {
    run!(programs::counter() => Value::Int(3))
}

#[test]
fn escaping_closure() -> utils::Result {
    run!(programs::escaping_closure() => Value::Int(608))
}

#[test]
fn deep_nesting() -> utils::Result {
    run!(programs::deep_nesting() => Value::Int(1123))
}

#[test]
fn nested_function_calls_itself() -> utils::Result {
    run!(
        Program::new(vec![
            fun(
                "outer",
                &["n"],
                vec![
                    fun(
                        "count",
                        &["k"],
                        vec![
                            if_then(eq(ident("k"), int(0)), vec![ret(int(0))]),
                            ret(add(int(1), call("count", vec![sub(ident("k"), int(1))]))),
                        ],
                    ),
                    ret(call("count", vec![ident("n")])),
                ],
            ),
            expr(call("outer", vec![int(5)])),
        ]) => Value::Int(5)
    )
}

#[test]
fn recursive_frames_build_distinct_closures() -> utils::Result {
    // each frame of `rec` stores its own `peek` into a global before recursing
    let program = Program::new(vec![
        var("first", nil()),
        var("second", nil()),
        fun(
            "rec",
            &["n"],
            vec![
                var("x", mul(ident("n"), int(10))),
                fun("peek", &[], vec![ret(ident("x"))]),
                if_then(eq(ident("n"), int(2)), vec![assign("first", ident("peek"))]),
                if_then(eq(ident("n"), int(1)), vec![assign("second", ident("peek"))]),
                if_then(
                    less(int(0), ident("n")),
                    vec![expr(call("rec", vec![sub(ident("n"), int(1))]))],
                ),
            ],
        ),
        expr(call("rec", vec![int(2)])),
    ]);

    let mut interp = Interpreter::default();
    interp.interpret(&program)?;

    let first = interp.global("first").unwrap();
    let second = interp.global("second").unwrap();
    let (a, b) = (first.as_closure().unwrap(), second.as_closure().unwrap());

    assert!(!Rc::ptr_eq(a, b));
    assert!(!Rc::ptr_eq(a.chain().record(), b.chain().record()));
    assert_eq!(interp.call_global("first", vec![])?, Value::Int(20));
    assert_eq!(interp.call_global("second", vec![])?, Value::Int(10));
    Ok(())
}

#[test]
fn closures_from_separate_calls() -> utils::Result {
    let mut interp = Interpreter::default();
    interp.interpret(&Program::new(vec![
        fun(
            "make",
            &["value"],
            vec![fun("get", &[], vec![ret(ident("value"))]), ret(ident("get"))],
        ),
        var("doughnut", call("make", vec![int(1)])),
        var("bagel", call("make", vec![int(2)])),
    ]))?;

    assert_eq!(interp.call_global("doughnut", vec![])?, Value::Int(1));
    assert_eq!(interp.call_global("bagel", vec![])?, Value::Int(2));
    assert_ne!(interp.global("doughnut"), interp.global("bagel"));
    Ok(())
}

#[test]
fn assignment_after_return_is_rejected() {
    let err = run_err!(Program::new(vec![
        fun(
            "make",
            &[],
            vec![
                var("count", int(0)),
                fun(
                    "bump",
                    &[],
                    vec![
                        assign("count", add(ident("count"), int(1))),
                        ret(ident("count")),
                    ],
                ),
                ret(ident("bump")),
            ],
        ),
        var("bump", call("make", vec![])),
        expr(call("bump", vec![])),
    ]));

    assert!(matches!(err.kind(), RuntimeError::ReleasedRecord(name) if name == "count"));
    assert_eq!(err.backtrace().len(), 1);
    assert_eq!(&*err.backtrace()[0], "bump");
}

#[test]
fn global_assignment_is_seen_by_closures() -> utils::Result {
    run!(
        Program::new(vec![
            var("g", int(1)),
            fun("read", &[], vec![ret(ident("g"))]),
            assign("g", int(2)),
            expr(call("read", vec![])),
        ]) => Value::Int(2)
    )
}

#[test]
fn resolve_is_idempotent() -> utils::Result {
    let mut interp = Interpreter::default();
    interp.interpret(&programs::function_closures())?;

    let a = interp.resolve_global("z").unwrap();
    let b = interp.resolve_global("z").unwrap();
    assert!(Rc::ptr_eq(&a, &b));
    assert_eq!(a.get(), Value::Int(10));
    Ok(())
}

#[test]
fn global_redeclaration_after_capture() -> utils::Result {
    run!(
        Program::new(vec![
            var("z", int(10)),
            fun("read", &[], vec![ret(ident("z"))]),
            var("z", int(20)),
            expr(add(mul(call("read", vec![]), int(100)), ident("z"))),
        ]) => Value::Int(1020)
    )
}

#[test]
fn host_redeclaration_after_capture() -> utils::Result {
    let mut interp = Interpreter::default();
    interp.interpret(&Program::new(vec![
        var("z", int(10)),
        fun("read", &[], vec![ret(ident("z"))]),
    ]))?;

    interp.define_global("z", Value::Int(99));
    assert_eq!(interp.call_global("read", vec![])?, Value::Int(10));
    assert_eq!(interp.global("z"), Some(Value::Int(99)));
    // both `z` bindings are kept
    assert_eq!(interp.globals().len(), 3);
    Ok(())
}

#[test]
fn globals_declared_later_are_still_found() -> utils::Result {
    run!(
        Program::new(vec![
            fun(
                "is_even",
                &["n"],
                vec![
                    if_then(eq(ident("n"), int(0)), vec![ret(boolean(true))]),
                    ret(call("is_odd", vec![sub(ident("n"), int(1))])),
                ],
            ),
            fun(
                "is_odd",
                &["n"],
                vec![
                    if_then(eq(ident("n"), int(0)), vec![ret(boolean(false))]),
                    ret(call("is_even", vec![sub(ident("n"), int(1))])),
                ],
            ),
            expr(call("is_even", vec![int(10)])),
        ]) => Value::Boolean(true)
    )
}

#[test]
fn nested_siblings_cannot_see_each_other() {
    let err = run_err!(Program::new(vec![
        fun(
            "outer",
            &[],
            vec![
                fun("first", &[], vec![ret(call("second", vec![]))]),
                fun("second", &[], vec![ret(int(2))]),
                ret(call("first", vec![])),
            ],
        ),
        expr(call("outer", vec![])),
    ]));

    assert!(matches!(err.kind(), RuntimeError::UnboundIdentifier(name) if name == "second"));
}
