use crate::error::CompileError;
use crate::lexer::lex;
use crate::parser::cursor::SubCursor;
use crate::parser::gform::*;

use super::Matcher;

fn matcher_for(tokens: &[crate::lexer::Token]) -> Matcher<'_> {
    Matcher::new(SubCursor::new(tokens, 0))
}

fn match_stmt(source: &str) -> GStmt {
    let tokens = lex(source).expect("lexes");
    let mut matcher = matcher_for(&tokens);
    matcher
        .match_statement()
        .expect("no grammar error")
        .expect("matches a statement")
}

fn match_expr(source: &str) -> GExpr {
    let tokens = lex(source).expect("lexes");
    let mut matcher = matcher_for(&tokens);
    matcher
        .match_expression()
        .expect("no grammar error")
        .expect("matches an expression")
}

fn expr_error(source: &str) -> CompileError {
    let tokens = lex(source).expect("lexes");
    let mut matcher = matcher_for(&tokens);
    matcher.match_expression().expect_err("grammar error")
}

fn v() -> GExpr {
    GExpr::V
}

/// Grammar forms are shape-only, so their serialized form is the whole
/// story; snapshot it as pretty JSON.
fn shape(form: &impl serde::Serialize) -> String {
    serde_json::to_string_pretty(form).expect("grammar forms serialize")
}

#[test]
fn let_with_type() {
    assert_eq!(
        match_stmt("let x : I32 = 1"),
        GStmt::Let {
            modifiers: 0,
            has_type: true,
            expr: v(),
        }
    );
}

#[test]
fn let_with_modifiers_no_type() {
    assert_eq!(
        match_stmt("let @mut @pub counter = #T"),
        GStmt::Let {
            modifiers: 2,
            has_type: false,
            expr: v(),
        }
    );
}

#[test]
fn let_with_function_type() {
    assert_eq!(
        match_stmt("let f : Fn<I32 I32; I32> = g"),
        GStmt::Let {
            modifiers: 0,
            has_type: true,
            expr: v(),
        }
    );
}

#[test]
fn reassign() {
    assert_eq!(match_stmt("x := 2"), GStmt::Reassign { expr: v() });
}

#[test]
fn import_plain_and_aliased() {
    assert_eq!(match_stmt("import geometry"), GStmt::Import { has_alias: false });
    assert_eq!(
        match_stmt("import geometry as geo"),
        GStmt::Import { has_alias: true }
    );
}

#[test]
fn no_match_leaves_cursor_untouched() {
    let tokens = lex("(+ 1 2)").unwrap();
    let mut matcher = matcher_for(&tokens);
    let before = matcher.cur.index();
    assert!(matcher.match_statement().unwrap().is_none());
    assert_eq!(matcher.cur.index(), before);
}

#[test]
fn operator_s_expression() {
    assert_eq!(
        match_expr("(+ a b)"),
        GExpr::S {
            operation: Box::new(GOperation::Op),
            operands: vec![v(), v()],
        }
    );
}

#[test]
fn nested_s_expression() {
    assert_eq!(
        match_expr("(+ (* a b) c)"),
        GExpr::S {
            operation: Box::new(GOperation::Op),
            operands: vec![
                GExpr::S {
                    operation: Box::new(GOperation::Op),
                    operands: vec![v(), v()],
                },
                v(),
            ],
        }
    );
}

#[test]
fn word_operator_head() {
    assert_eq!(
        match_expr("(and p q)"),
        GExpr::S {
            operation: Box::new(GOperation::Op),
            operands: vec![v(), v()],
        }
    );
}

#[test]
fn block_with_statements_and_expression() {
    assert_eq!(
        match_expr("{ let a : I32 = 1  let b : I32 = 2  (+ a b) }"),
        GExpr::Block {
            members: vec![
                GNode::Stmt(GStmt::Let {
                    modifiers: 0,
                    has_type: true,
                    expr: v(),
                }),
                GNode::Stmt(GStmt::Let {
                    modifiers: 0,
                    has_type: true,
                    expr: v(),
                }),
                GNode::Expr(GExpr::S {
                    operation: Box::new(GOperation::Op),
                    operands: vec![v(), v()],
                }),
            ],
        }
    );
}

#[test]
fn statement_only_block() {
    let block = match_expr("{ let a : I32 = 1 }");
    let GExpr::Block { members } = block else {
        panic!("expected block");
    };
    assert_eq!(members.len(), 1);
    assert!(matches!(members[0], GNode::Stmt(_)));
}

#[test]
fn conditional_both_arms() {
    assert_eq!(
        match_expr("(p -> t : e)"),
        GExpr::Cond {
            predicate: Box::new(v()),
            form: GPredicateForm {
                then: Some(Box::new(v())),
                otherwise: Some(Box::new(v())),
            },
        }
    );
}

#[test]
fn conditional_else_only() {
    assert_eq!(
        match_expr("(p : e)"),
        GExpr::Cond {
            predicate: Box::new(v()),
            form: GPredicateForm {
                then: None,
                otherwise: Some(Box::new(v())),
            },
        }
    );
}

#[test]
fn conditional_compound_predicate_then_only() {
    assert_eq!(
        match_expr("((> x 1) -> a)"),
        GExpr::Cond {
            predicate: Box::new(GExpr::S {
                operation: Box::new(GOperation::Op),
                operands: vec![v(), v()],
            }),
            form: GPredicateForm {
                then: Some(Box::new(v())),
                otherwise: None,
            },
        }
    );
}

#[test]
fn bare_identifier_then_arm_reads_as_member_access() {
    // `(p -> t)` is indistinguishable from a namespace hop; the member
    // interpretation wins.
    assert_eq!(
        match_expr("(p -> t)"),
        GExpr::S {
            operation: Box::new(GOperation::Expr(GExpr::M {
                namespace_depth: 1,
                accessors: vec![GAccess::Identifier],
            })),
            operands: vec![],
        }
    );
}

#[test]
fn conditional_with_literal_arms() {
    // The arrow cannot start a namespace hop here (`1` continues no
    // chain), so it reads as the then-marker.
    assert_eq!(
        match_expr("(p -> 1 : 2)"),
        GExpr::Cond {
            predicate: Box::new(GExpr::M {
                namespace_depth: 0,
                accessors: vec![GAccess::Identifier],
            }),
            form: GPredicateForm {
                then: Some(Box::new(v())),
                otherwise: Some(Box::new(v())),
            },
        }
    );
}

#[test]
fn predicate_form_after_operator_head_is_an_error() {
    let err = expr_error("(+ a -> b : c)");
    assert!(matches!(err, CompileError::InvalidGrammar { .. }));
}

#[test]
fn member_expression_with_namespace_and_call() {
    assert_eq!(
        match_expr("(greet -> name::upper[])"),
        GExpr::S {
            operation: Box::new(GOperation::Expr(GExpr::M {
                namespace_depth: 1,
                accessors: vec![
                    GAccess::Identifier,
                    GAccess::FuncCall { arguments: vec![] },
                ],
            })),
            operands: vec![],
        }
    );
}

#[test]
fn call_with_arguments() {
    assert_eq!(
        match_expr("vec::scale[2 (+ a b)]"),
        GExpr::M {
            namespace_depth: 0,
            accessors: vec![
                GAccess::Identifier,
                GAccess::FuncCall {
                    arguments: vec![
                        GArg {
                            modifiers: 0,
                            expr: v(),
                        },
                        GArg {
                            modifiers: 0,
                            expr: GExpr::S {
                                operation: Box::new(GOperation::Op),
                                operands: vec![v(), v()],
                            },
                        },
                    ],
                },
            ],
        }
    );
}

#[test]
fn field_then_call_chain() {
    assert_eq!(
        match_expr("point:.x::abs[]"),
        GExpr::M {
            namespace_depth: 0,
            accessors: vec![
                GAccess::Identifier,
                GAccess::Identifier,
                GAccess::FuncCall { arguments: vec![] },
            ],
        }
    );
}

#[test]
fn identity_call_is_terminal() {
    assert_eq!(
        match_expr("point::norm"),
        GExpr::M {
            namespace_depth: 0,
            accessors: vec![GAccess::Identifier, GAccess::FuncAccess],
        }
    );
    let err = expr_error("point::norm::again[]");
    assert!(matches!(err, CompileError::InvalidGrammar { .. }));
}

#[test]
fn indexing_is_rejected() {
    let err = expr_error("xs[0]");
    assert!(matches!(err, CompileError::InvalidGrammar { .. }));
}

#[test]
fn lambda_expression_with_type() {
    assert_eq!(
        match_expr("(=> : I32 | x: I32 | x)"),
        GExpr::Lambda {
            has_type: true,
            form: GLambdaForm {
                parameters: vec![GParam {
                    modifiers: 0,
                    has_type: true,
                }],
                expr: Box::new(v()),
            },
        }
    );
}

#[test]
fn nested_lambdas() {
    assert_eq!(
        match_expr("(=> :Fn<I32;I32> | x: I32 | (=> | y: I32 | (+ x y)))"),
        GExpr::Lambda {
            has_type: true,
            form: GLambdaForm {
                parameters: vec![GParam {
                    modifiers: 0,
                    has_type: true,
                }],
                expr: Box::new(GExpr::Lambda {
                    has_type: false,
                    form: GLambdaForm {
                        parameters: vec![GParam {
                            modifiers: 0,
                            has_type: true,
                        }],
                        expr: Box::new(GExpr::S {
                            operation: Box::new(GOperation::Op),
                            operands: vec![v(), v()],
                        }),
                    },
                }),
            },
        }
    );
}

#[test]
fn bare_lambda_form() {
    assert_eq!(
        match_expr("| a b | (+ a b)"),
        GExpr::LambdaForm {
            form: GLambdaForm {
                parameters: vec![
                    GParam {
                        modifiers: 0,
                        has_type: false,
                    },
                    GParam {
                        modifiers: 0,
                        has_type: false,
                    },
                ],
                expr: Box::new(GExpr::S {
                    operation: Box::new(GOperation::Op),
                    operands: vec![v(), v()],
                }),
            },
        }
    );
}

#[test]
fn grouping_yields_expression_head_with_no_operands() {
    assert_eq!(
        match_expr("(x)"),
        GExpr::S {
            operation: Box::new(GOperation::Expr(v())),
            operands: vec![],
        }
    );
}

#[test]
fn let_shape_snapshot() {
    insta::assert_snapshot!(shape(&match_stmt("let x : I32 = 1")), @r#"
    {
      "Let": {
        "modifiers": 0,
        "has_type": true,
        "expr": "V"
      }
    }
    "#);
}

#[test]
fn member_call_shape_snapshot() {
    insta::assert_snapshot!(shape(&match_expr("(greet -> name::upper[])")), @r#"
    {
      "S": {
        "operation": {
          "Expr": {
            "M": {
              "namespace_depth": 1,
              "accessors": [
                "Identifier",
                {
                  "FuncCall": {
                    "arguments": []
                  }
                }
              ]
            }
          }
        },
        "operands": []
      }
    }
    "#);
}

#[test]
fn conditional_shape_snapshot() {
    insta::assert_snapshot!(shape(&match_expr("(p -> t : e)")), @r#"
    {
      "Cond": {
        "predicate": "V",
        "form": {
          "then": "V",
          "otherwise": "V"
        }
      }
    }
    "#);

    insta::assert_snapshot!(shape(&match_expr("((> x 1) -> a)")), @r#"
    {
      "Cond": {
        "predicate": {
          "S": {
            "operation": "Op",
            "operands": [
              "V",
              "V"
            ]
          }
        },
        "form": {
          "then": "V",
          "otherwise": null
        }
      }
    }
    "#);
}

#[test]
fn nested_lambda_shape_snapshot() {
    let form = match_expr("(=> :Fn<I32;I32> | x: I32 | (=> | y: I32 | (+ x y)))");
    insta::assert_snapshot!(shape(&form), @r#"
    {
      "Lambda": {
        "has_type": true,
        "form": {
          "parameters": [
            {
              "modifiers": 0,
              "has_type": true
            }
          ],
          "expr": {
            "Lambda": {
              "has_type": false,
              "form": {
                "parameters": [
                  {
                    "modifiers": 0,
                    "has_type": true
                  }
                ],
                "expr": {
                  "S": {
                    "operation": "Op",
                    "operands": [
                      "V",
                      "V"
                    ]
                  }
                }
              }
            }
          }
        }
      }
    }
    "#);
}

#[test]
fn block_shape_snapshot() {
    insta::assert_snapshot!(shape(&match_expr("{ x := 1  (+ x 2) }")), @r#"
    {
      "Block": {
        "members": [
          {
            "Stmt": {
              "Reassign": {
                "expr": "V"
              }
            }
          },
          {
            "Expr": {
              "S": {
                "operation": "Op",
                "operands": [
                  "V",
                  "V"
                ]
              }
            }
          }
        ]
      }
    }
    "#);
}

#[test]
fn matching_is_deterministic() {
    let source = "{ let a : I32 = (p -> t : e) (+ a greet -> f::call[1]) }";
    let tokens = lex(source).unwrap();
    let first = matcher_for(&tokens).match_expression().unwrap().unwrap();
    let second = matcher_for(&tokens).match_expression().unwrap().unwrap();
    assert_eq!(first, second);
}

#[test]
fn reserved_match_form() {
    assert_eq!(match_expr("match"), GExpr::Match);
}

#[test]
fn unclosed_block_is_an_error() {
    let err = expr_error("{ let a : I32 = 1");
    assert!(matches!(err, CompileError::InvalidGrammar { .. }));
}
