use super::{Token, TokenKind, TokenPayload, lex};
use crate::error::CompileError;
use laurel_core::SourcePos;

/// Compact `Kind` / `Kind(payload)` rendering for snapshots.
fn dump(tokens: &[Token]) -> Vec<String> {
    tokens
        .iter()
        .map(|t| match &t.payload {
            TokenPayload::Empty => format!("{:?}", t.kind),
            TokenPayload::Str(s) => format!("{:?}({s})", t.kind),
            TokenPayload::Int(v) => format!("{:?}({v})", t.kind),
            TokenPayload::Float(v) => format!("{:?}({v})", t.kind),
        })
        .collect()
}

fn lex_ok(source: &str) -> Vec<Token> {
    lex(source).expect("lexes")
}

#[test]
fn empty_source_is_eof_only() {
    let tokens = lex_ok("");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
    assert_eq!(tokens[0].pos, SourcePos::new(1, 1));
}

#[test]
fn let_statement() {
    let tokens = lex_ok("let x : I32 = 1");
    insta::assert_yaml_snapshot!(dump(&tokens), @r"
    - Let
    - Identifier(x)
    - Colon
    - Identifier(I32)
    - Equals
    - Int(1)
    - Eof
    ");
}

#[test]
fn double_character_tokens() {
    let tokens = lex_ok("-> :: :. := == != >= <= ++ -- =>");
    insta::assert_yaml_snapshot!(dump(&tokens), @r"
    - Arrow
    - ColonColon
    - ColonDot
    - ColonEquals
    - EqualsEquals
    - BangEquals
    - GreaterEquals
    - LessEquals
    - PlusPlus
    - MinusMinus
    - FatArrow
    - Eof
    ");
}

#[test]
fn word_operators_and_keywords() {
    let tokens = lex_ok("and or nor xor xnor nand not let func class struct import match as Fn Array");
    insta::assert_yaml_snapshot!(dump(&tokens), @r"
    - And
    - Or
    - Nor
    - Xor
    - Xnor
    - Nand
    - Not
    - Let
    - Func
    - Class
    - Struct
    - Import
    - Match
    - As
    - Fn
    - Array
    - Eof
    ");
}

#[test]
fn literals() {
    let tokens = lex_ok("#T #F #NIL 42 3.25 x_1");
    insta::assert_yaml_snapshot!(dump(&tokens), @r"
    - True
    - False
    - Nil
    - Int(42)
    - Float(3.25)
    - Identifier(x_1)
    - Eof
    ");
}

#[test]
fn modifiers() {
    let tokens = lex_ok("@mut @pub @const @opt");
    insta::assert_yaml_snapshot!(dump(&tokens), @r"
    - Mut
    - Pub
    - Const
    - Opt
    - Eof
    ");
}

#[test]
fn trailing_dot_float() {
    let tokens = lex_ok("3.");
    assert_eq!(tokens[0].kind, TokenKind::Float);
    assert_eq!(tokens[0].payload, TokenPayload::Float(3.0));
}

#[test]
fn leading_dot_float() {
    let tokens = lex_ok(".5");
    assert_eq!(tokens[0].payload, TokenPayload::Float(0.5));
}

#[test]
fn negative_number_binds_the_minus() {
    let tokens = lex_ok("-5 -.5 -2.");
    insta::assert_yaml_snapshot!(dump(&tokens), @r"
    - Int(-5)
    - Float(-0.5)
    - Float(-2)
    - Eof
    ");
}

#[test]
fn lone_minus_is_an_operator() {
    let tokens = lex_ok("- x");
    assert_eq!(tokens[0].kind, TokenKind::Minus);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
}

#[test]
fn bare_dot_is_not_a_number() {
    let tokens = lex_ok(". .");
    assert_eq!(tokens[0].kind, TokenKind::Dot);
    assert_eq!(tokens[1].kind, TokenKind::Dot);
}

#[test]
fn commas_are_separators() {
    let tokens = lex_ok("a, b,, c");
    insta::assert_yaml_snapshot!(dump(&tokens), @r"
    - Identifier(a)
    - Identifier(b)
    - Identifier(c)
    - Eof
    ");
}

#[test]
fn string_literal_payload_excludes_quotes() {
    let tokens = lex_ok(r#""hello there""#);
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].str_payload(), Some("hello there"));
}

#[test]
fn positions_track_lines_and_columns() {
    let tokens = lex_ok("let x = 1\nlet y = 2");
    assert_eq!(tokens[0].pos, SourcePos::new(1, 1));
    assert_eq!(tokens[1].pos, SourcePos::new(1, 5));
    assert_eq!(tokens[4].pos, SourcePos::new(2, 1));
    assert_eq!(tokens[5].pos, SourcePos::new(2, 5));
}

#[test]
fn unexpected_character_is_a_lex_error() {
    let err = lex("let ? = 1").unwrap_err();
    match err {
        CompileError::Lex { pos, message } => {
            assert_eq!(pos, SourcePos::new(1, 5));
            assert!(message.contains('?'), "{message}");
        }
        other => panic!("expected lex error, got {other:?}"),
    }
}

#[test]
fn round_trip_through_token_text() {
    let source = "let add : Fn<I32 I32; I32> = (=> | a: I32, b: I32 | (+ a b))";
    let tokens = lex_ok(source);
    let rendered: Vec<&str> = tokens.iter().map(|t| t.text(source)).collect();
    let squashed: String = source
        .chars()
        .filter(|c| !matches!(c, ' ' | '\t' | '\r' | '\n' | ','))
        .collect();
    assert_eq!(rendered.concat(), squashed);
}

#[test]
fn lambda_tokens() {
    let tokens = lex_ok("(=> : I32 | x | x)");
    insta::assert_yaml_snapshot!(dump(&tokens), @r"
    - ParenOpen
    - FatArrow
    - Colon
    - Identifier(I32)
    - Pipe
    - Identifier(x)
    - Pipe
    - Identifier(x)
    - ParenClose
    - Eof
    ");
}
