//! Unit tests for node execution.

use pretty_assertions::assert_eq;

use crate::{
    parse_tree::{
        parse_tree::{ParseKind, ParseNode},
        testing::*,
    },
    runtime::{
        function::Function,
        pointer::{Pointer, Variable},
        ret::{Return, ReturnKind},
        scope::Scope,
    },
    Position,
};

use super::node::{Node, NodeKind};

fn run(statements: Vec<ParseNode>) -> (Return, Scope) {
    let mut scope = Scope::new();
    let result = run_statements(statements, &mut scope);
    (result, scope)
}

fn integer_result(result: &Return) -> Option<i64> {
    result.pointer.as_ref().and_then(|pointer| pointer.as_integer())
}

fn integer_in(scope: &Scope, name: &str) -> Option<i64> {
    scope.get(name).ok().and_then(|pointer| pointer.as_integer())
}

fn plus(left: ParseNode, right: ParseNode) -> ParseNode {
    binary(ParseKind::Summation, "+", left, right)
}

fn minus(left: ParseNode, right: ParseNode) -> ParseNode {
    binary(ParseKind::Subtraction, "-", left, right)
}

fn less(left: ParseNode, right: ParseNode) -> ParseNode {
    binary(ParseKind::Less, "<", left, right)
}

#[test]
fn test_division() {
    let (result, _) = run(vec![binary(ParseKind::Divide, "/", integer(5), integer(0))]);
    assert_eq!(result.kind, ReturnKind::Exception);
    assert_eq!(result.message.as_deref(), Some("division by zero"));
    assert!(result.pointer.is_none());

    let (result, _) = run(vec![binary(ParseKind::Divide, "/", integer(5), integer(1))]);
    assert_eq!(result.kind, ReturnKind::Nothing);
    assert_eq!(integer_result(&result), Some(5));
}

#[test]
fn test_arithmetic_and_strings() {
    let (result, _) = run(vec![minus(integer(3), integer(5))]);
    assert_eq!(integer_result(&result), Some(-2));

    let (result, _) = run(vec![negate(integer(5))]);
    assert_eq!(integer_result(&result), Some(-5));

    let (result, _) = run(vec![plus(string("ab"), string("cd"))]);
    assert_eq!(
        result.pointer.and_then(|pointer| pointer.as_string()),
        Some("abcd".to_string())
    );

    let (result, _) = run(vec![binary(ParseKind::Greater, ">", integer(2), integer(1))]);
    assert_eq!(result.pointer.and_then(|pointer| pointer.as_boolean()), Some(true));
}

#[test]
fn test_assignment_copies_value() {
    let (_, mut scope) = run(vec![
        gets(variable("x"), integer(1)),
        gets(variable("y"), variable("x")),
    ]);
    let x = scope.get("x").unwrap();
    let y = scope.get("y").unwrap();
    assert!(!Pointer::ptr_eq(&x, &y));

    let reassign = ParseNode::chain(vec![gets(variable("y"), integer(2))]);
    crate::compile(reassign.as_ref(), &scope)
        .unwrap()
        .run_in(&mut scope);
    assert_eq!(integer_in(&scope, "x"), Some(1));
    assert_eq!(integer_in(&scope, "y"), Some(2));
}

#[test]
fn test_while_break() {
    let (result, scope) = run(vec![
        gets(variable("x"), integer(0)),
        while_(
            less(variable("x"), integer(10)),
            vec![
                gets(variable("x"), plus(variable("x"), integer(1))),
                if_(
                    gets(variable("x"), integer(3)),
                    vec![ParseNode::new(ParseKind::Break, token("break"))],
                ),
            ],
        ),
    ]);

    assert_eq!(result, Return::nothing());
    assert_eq!(integer_in(&scope, "x"), Some(3));
    assert_eq!(scope.depth(), 1);
}

#[test]
fn test_while_continue_skips_rest_of_iteration() {
    let (result, scope) = run(vec![
        gets(variable("x"), integer(0)),
        gets(variable("counted"), integer(0)),
        while_(
            less(variable("x"), integer(6)),
            vec![
                gets(variable("x"), plus(variable("x"), integer(1))),
                if_(
                    gets(variable("x"), integer(3)),
                    vec![ParseNode::new(ParseKind::Continue, token("continue"))],
                ),
                gets(variable("counted"), plus(variable("counted"), integer(1))),
            ],
        ),
    ]);

    assert_eq!(result.kind, ReturnKind::Nothing);
    assert_eq!(integer_in(&scope, "x"), Some(6));
    assert_eq!(integer_in(&scope, "counted"), Some(5));
}

#[test]
fn test_typed_call_returns_value() {
    let (result, _) = run(vec![
        function(
            Some("double"),
            &[("int", "n")],
            Some("int"),
            vec![ret(Some(plus(variable("n"), variable("n"))))],
        ),
        call("double", vec![integer(4)]),
    ]);

    assert_eq!(result.kind, ReturnKind::Return);
    assert_eq!(integer_result(&result), Some(8));
}

#[test]
fn test_parameters_alias_arguments() {
    let bump = function(
        Some("bump"),
        &[("int", "n")],
        None,
        vec![gets(variable("n"), plus(variable("n"), integer(1)))],
    );
    let (_, scope) = run(vec![
        bump,
        gets(variable("x"), integer(1)),
        call("bump", vec![variable("x")]),
        call("bump", vec![plus(variable("x"), integer(0))]),
    ]);

    assert_eq!(integer_in(&scope, "x"), Some(2));
}

#[test]
fn test_tail_recursion() {
    let sum = function(
        Some("sum"),
        &[("int", "n"), ("int", "total")],
        Some("int"),
        vec![
            if_(
                gets(variable("n"), integer(0)),
                vec![ret(Some(variable("total")))],
            ),
            ret(Some(call(
                "sum",
                vec![
                    minus(variable("n"), integer(1)),
                    plus(variable("total"), variable("n")),
                ],
            ))),
        ],
    );
    let (result, _) = run(vec![sum, call("sum", vec![integer(4), integer(0)])]);

    assert_eq!(result.kind, ReturnKind::Return);
    assert_eq!(integer_result(&result), Some(10));
}

#[test]
fn test_return_passes_through_loop() {
    let first_over = function(
        Some("first_over"),
        &[("int", "limit")],
        Some("int"),
        vec![
            gets(variable("i"), integer(0)),
            while_(
                boolean(true),
                vec![
                    gets(variable("i"), plus(variable("i"), integer(1))),
                    if_(
                        binary(ParseKind::Greater, ">", variable("i"), variable("limit")),
                        vec![ret(Some(variable("i")))],
                    ),
                ],
            ),
            ret(Some(integer(0))),
        ],
    );
    let (result, scope) = run(vec![first_over, call("first_over", vec![integer(3)])]);

    assert_eq!(result.kind, ReturnKind::Return);
    assert_eq!(integer_result(&result), Some(4));
    assert_eq!(scope.depth(), 1);
}

#[test]
fn test_lambda_is_a_value() {
    let lambda = function(
        None,
        &[("int", "a")],
        Some("int"),
        vec![ret(Some(plus(variable("a"), integer(1))))],
    );
    let (result, scope) = run(vec![
        gets(variable("increment"), lambda),
        call("increment", vec![integer(1)]),
    ]);

    assert_eq!(integer_result(&result), Some(2));
    let Some(Variable::Function(increment)) = scope.get("increment").unwrap().get() else {
        panic!("expected a function value");
    };
    assert_eq!(increment.get_type().to_string(), "function<int, int>");
}

#[test]
fn test_closure_shares_defining_scope() {
    let tick = function(
        Some("tick"),
        &[],
        None,
        vec![gets(variable("counter"), plus(variable("counter"), integer(1)))],
    );
    let (_, scope) = run(vec![
        gets(variable("counter"), integer(0)),
        tick,
        call("tick", vec![]),
        call("tick", vec![]),
    ]);

    assert_eq!(integer_in(&scope, "counter"), Some(2));
}

#[test]
fn test_exception_stops_the_program() {
    let boom = function(
        Some("boom"),
        &[],
        Some("int"),
        vec![ret(Some(binary(ParseKind::Divide, "/", integer(1), integer(0))))],
    );
    let (result, scope) = run(vec![
        boom,
        gets(variable("x"), call("boom", vec![])),
        gets(variable("after"), integer(1)),
    ]);

    assert_eq!(result.kind, ReturnKind::Exception);
    assert!(scope.must_get("after").is_none());
}

#[test]
fn test_empty_variable_read_is_an_exception() {
    let (result, _) = run(vec![
        declaration("int", "x"),
        gets(variable("y"), plus(variable("x"), integer(1))),
    ]);

    assert_eq!(result.kind, ReturnKind::Exception);
    assert_eq!(result.message.as_deref(), Some("expected an integer value"));
}

#[test]
fn test_csv_builds_set() {
    let (result, _) = run(vec![gets(
        variable("list"),
        csv(vec![integer(1), string("two")]),
    )]);

    let Some(Variable::Set(elements)) = result.pointer.and_then(|pointer| pointer.get()) else {
        panic!("expected a set");
    };
    assert_eq!(elements.len(), 2);
    assert_eq!(elements[0].as_integer(), Some(1));
    assert_eq!(elements[1].as_string(), Some("two".to_string()));
}

#[test]
fn test_unresolved_name_is_an_exception() {
    let node = Node::new(
        NodeKind::Variable {
            name: "ghost".to_string(),
        },
        Position::null(),
    );
    let result = node.execute(&mut Scope::new());

    assert_eq!(result.kind, ReturnKind::Exception);
    assert_eq!(result.message.as_deref(), Some("ghost is not declared"));
}

#[test]
fn test_if_body_block_is_released() {
    let (result, scope) = run(vec![if_(
        boolean(true),
        vec![gets(variable("inner"), integer(1))],
    )]);

    assert_eq!(result, Return::nothing());
    assert!(scope.must_get("inner").is_none());
    assert_eq!(scope.depth(), 1);
}

fn failing_loop() -> ParseNode {
    let zero = minus(integer(1), integer(1));
    while_(
        boolean(true),
        vec![if_(
            boolean(true),
            vec![gets(
                variable("z"),
                binary(ParseKind::Divide, "/", integer(1), zero),
            )],
        )],
    )
}

#[test]
fn test_exception_unwinds_nested_blocks() {
    let (result, scope) = run(vec![failing_loop()]);

    assert_eq!(result.kind, ReturnKind::Exception);
    assert_eq!(result.message.as_deref(), Some("division by zero"));
    assert_eq!(scope.depth(), 1);
    assert!(scope.must_get("z").is_none());
}

#[test]
fn test_exception_leaves_call_frame() {
    let boom = function(Some("boom"), &[], None, vec![failing_loop()]);
    let (result, scope) = run(vec![boom, call("boom", vec![])]);

    assert_eq!(result.kind, ReturnKind::Exception);
    assert_eq!(result.message.as_deref(), Some("division by zero"));
    assert_eq!(scope.depth(), 1);
}
