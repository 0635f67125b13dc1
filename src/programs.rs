//! Ready-made programs exercising closure capture, runnable from the `lexi` binary.

use crate::ast::*;

/// A named program and a one-line description of what it shows.
pub struct Demo {
    pub name: &'static str,
    pub about: &'static str,
    pub build: fn() -> Program,
}

pub const ALL: &[Demo] = &[
    Demo {
        name: "function-closures",
        about: "recursive frames each build their own `bar`; global `z` outlives local shadows",
        build: function_closures,
    },
    Demo {
        name: "shadow-after-capture",
        about: "a closure keeps seeing the binding that existed when it was built",
        build: shadow_after_capture,
    },
    Demo {
        name: "counter",
        about: "closures share a captured binding and observe assignments to it",
        build: counter,
    },
    Demo {
        name: "escaping-closure",
        about: "a returned closure keeps its frame's parameter alive",
        build: escaping_closure,
    },
    Demo {
        name: "deep-nesting",
        about: "an innermost function reads one binding from every enclosing frame",
        build: deep_nesting,
    },
    Demo {
        name: "unbound",
        about: "a free identifier with no declaration on the lexical chain",
        build: unbound,
    },
];

pub fn find(name: &str) -> Option<&'static Demo> {
    ALL.iter().find(|d| d.name == name)
}

/// ```text
/// var z = 10;
/// fun foo(a, b) {
///     if (a == 0 || b == 0) return 0;
///     var x = a + b;
///     fun bar(c) { return z + x + c; }
///     var z = 5;
///     var temp = foo(a - 1, b - 1);
///     bar(x) + temp + z
/// }
/// foo(1, 2);
/// ```
pub fn function_closures() -> Program {
    function_closures_with(1, 2)
}

pub fn function_closures_with(a: i64, b: i64) -> Program {
    Program::new(vec![
        var("z", int(10)),
        foo_decl(),
        expr(call("foo", vec![int(a), int(b)])),
    ])
}

fn foo_decl() -> Stmt {
    fun(
        "foo",
        &["a", "b"],
        vec![
            if_then(
                or(eq(ident("a"), int(0)), eq(ident("b"), int(0))),
                vec![ret(int(0))],
            ),
            var("x", add(ident("a"), ident("b"))),
            fun(
                "bar",
                &["c"],
                vec![ret(add(add(ident("z"), ident("x")), ident("c")))],
            ),
            var("z", int(5)),
            var(
                "temp",
                call("foo", vec![sub(ident("a"), int(1)), sub(ident("b"), int(1))]),
            ),
            expr(add(
                add(call("bar", vec![ident("x")]), ident("temp")),
                ident("z"),
            )),
        ],
    )
}

/// ```text
/// fun outer() {
///     var x = 1;
///     fun read() { return x; }
///     var x = 2;
///     read() * 10 + x
/// }
/// outer();
/// ```
pub fn shadow_after_capture() -> Program {
    Program::new(vec![
        fun(
            "outer",
            &[],
            vec![
                var("x", int(1)),
                fun("read", &[], vec![ret(ident("x"))]),
                var("x", int(2)),
                expr(add(mul(call("read", vec![]), int(10)), ident("x"))),
            ],
        ),
        expr(call("outer", vec![])),
    ])
}

/// ```text
/// fun make() {
///     var count = 0;
///     fun bump() { count = count + 1; return count; }
///     bump(); bump();
///     bump()
/// }
/// make();
/// ```
pub fn counter() -> Program {
    Program::new(vec![
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
                expr(call("bump", vec![])),
                expr(call("bump", vec![])),
                expr(call("bump", vec![])),
            ],
        ),
        expr(call("make", vec![])),
    ])
}

/// ```text
/// fun adder(n) {
///     fun add(m) { return n + m; }
///     return add;
/// }
/// var add5 = adder(5);
/// var add7 = adder(7);
/// add5(1) * 100 + add7(1)
/// ```
pub fn escaping_closure() -> Program {
    Program::new(vec![
        fun(
            "adder",
            &["n"],
            vec![
                fun("add", &["m"], vec![ret(add(ident("n"), ident("m")))]),
                ret(ident("add")),
            ],
        ),
        var("add5", call("adder", vec![int(5)])),
        var("add7", call("adder", vec![int(7)])),
        expr(add(
            mul(call("add5", vec![int(1)]), int(100)),
            call("add7", vec![int(1)]),
        )),
    ])
}

/// ```text
/// var g = 1000;
/// fun l1(a) {
///     fun l2(b) {
///         fun l3(c) { return g + a * 100 + b * 10 + c; }
///         return l3(3);
///     }
///     return l2(2);
/// }
/// l1(1);
/// ```
pub fn deep_nesting() -> Program {
    Program::new(vec![
        var("g", int(1000)),
        fun(
            "l1",
            &["a"],
            vec![
                fun(
                    "l2",
                    &["b"],
                    vec![
                        fun(
                            "l3",
                            &["c"],
                            vec![ret(add(
                                add(
                                    add(ident("g"), mul(ident("a"), int(100))),
                                    mul(ident("b"), int(10)),
                                ),
                                ident("c"),
                            ))],
                        ),
                        ret(call("l3", vec![int(3)])),
                    ],
                ),
                ret(call("l2", vec![int(2)])),
            ],
        ),
        expr(call("l1", vec![int(1)])),
    ])
}

/// ```text
/// fun outer() {
///     fun inner() { return hidden; }
///     var hidden = 1;
///     inner()
/// }
/// outer();
/// ```
pub fn unbound() -> Program {
    Program::new(vec![
        fun(
            "outer",
            &[],
            vec![
                fun("inner", &[], vec![ret(ident("hidden"))]),
                var("hidden", int(1)),
                expr(call("inner", vec![])),
            ],
        ),
        expr(call("outer", vec![])),
    ])
}
