use indoc::indoc;
use laurel_core::{LangType, Primitive};

use crate::ast::{AstNode, Expression, Resolution, Statement};
use crate::env::ScopeId;
use crate::error::{AccessViolationKind, ResolutionError};
use crate::pipeline::{CompileReport, Pipeline};
use crate::unit::{UnitId, UnitState};
use crate::{Environment, MemoryLoader};

fn compile(loader: MemoryLoader) -> (Environment, CompileReport) {
    let mut env = Environment::new();
    env.load_tree(&loader).expect("memory loader never fails");
    let report = env.compile_with(&Pipeline::full());
    (env, report)
}

fn compile_main(source: &str) -> (Environment, CompileReport) {
    compile(MemoryLoader::new().with_unit("main", "main.lr", source))
}

fn main_unit(env: &Environment) -> UnitId {
    UnitId {
        namespace: env.root(),
        index: 0,
    }
}

fn resolution_errors(report: &CompileReport) -> Vec<ResolutionError> {
    report.diagnostics.iter().map(|d| d.error.clone()).collect()
}

#[test]
fn empty_unit_compiles() {
    let (env, report) = compile_main("");
    assert!(report.is_success(), "{report:?}");
    let unit = env.unit(main_unit(&env));
    assert_eq!(unit.state(), UnitState::FullyResolved);
    assert!(unit.ast.as_ref().unwrap().members.is_empty());
}

#[test]
fn typed_let_narrows_the_literal() {
    let (env, report) = compile_main("let x : I32 = 1");
    assert!(report.is_success(), "{report:?}");

    let unit = env.unit(main_unit(&env));
    let AstNode::Stmt(Statement::Let { value, meta, .. }) =
        &unit.ast.as_ref().unwrap().members[0]
    else {
        panic!("expected let");
    };
    assert_eq!(meta.ty(), LangType::Primitive(Primitive::I32));
    // The literal adopted the declared type, with the conversion recorded.
    assert_eq!(value.meta().ty(), LangType::Primitive(Primitive::I32));
    let conversion = value.meta().conversion().expect("conversion recorded");
    assert_eq!(conversion.from, Primitive::I64);
    assert_eq!(conversion.to, Primitive::I32);

    let binding = env
        .namespace(env.root())
        .symbols
        .get(ScopeId::ROOT, "x")
        .expect("binding exists");
    assert_eq!(binding.ty(), LangType::Primitive(Primitive::I32));
}

#[test]
fn lambda_parameters_resolve_in_their_scope() {
    let (env, report) =
        compile_main("let add : Fn<I32 I32; I32> = (=> | a: I32, b: I32 | (+ a b))");
    assert!(report.is_success(), "{report:?}");

    let unit = env.unit(main_unit(&env));
    let AstNode::Stmt(Statement::Let { value, .. }) = &unit.ast.as_ref().unwrap().members[0]
    else {
        panic!("expected let");
    };
    let Expression::LExpr { body, meta, .. } = value else {
        panic!("expected lambda");
    };
    assert_eq!(
        meta.ty(),
        LangType::function(
            vec![
                LangType::Primitive(Primitive::I32),
                LangType::Primitive(Primitive::I32)
            ],
            LangType::Primitive(Primitive::I32),
        )
    );
    let lambda_scope = meta.scope().expect("lambda scope recorded");
    assert_ne!(lambda_scope, ScopeId::ROOT);

    let Expression::OExpr { operands, .. } = body.as_ref() else {
        panic!("expected operator body");
    };
    for operand in operands {
        let Expression::VExpr {
            value: crate::ast::Value::Identifier(symbol),
            meta,
        } = operand
        else {
            panic!("expected identifier operand");
        };
        let Resolution::Resolved(loc) = symbol.resolution() else {
            panic!("parameter reference not resolved");
        };
        assert_eq!(loc.scope, lambda_scope);
        assert_eq!(meta.ty(), LangType::Primitive(Primitive::I32));
        assert!(meta.is_resolved());
    }
}

#[test]
fn block_takes_its_trailing_expression_type() {
    let (env, report) = compile_main("{ let a : I32 = 1  let b : I32 = 2  (+ a b) }");
    assert!(report.is_success(), "{report:?}");
    let unit = env.unit(main_unit(&env));
    let member = &unit.ast.as_ref().unwrap().members[0];
    assert_eq!(member.meta().ty(), LangType::Primitive(Primitive::I32));
}

#[test]
fn statement_only_block_is_nil() {
    let (env, report) = compile_main("{ let a : I32 = 1 }");
    assert!(report.is_success(), "{report:?}");
    let unit = env.unit(main_unit(&env));
    let member = &unit.ast.as_ref().unwrap().members[0];
    assert_eq!(member.meta().ty(), LangType::Primitive(Primitive::Nil));
}

#[test]
fn conditional_types_to_its_arms() {
    let source = indoc! {"
        let p : Bool = #T
        let t : I32 = 1
        let e : I32 = 2
        (p -> t : e)
    "};
    let (env, report) = compile_main(source);
    assert!(report.is_success(), "{report:?}");
    let unit = env.unit(main_unit(&env));
    let member = &unit.ast.as_ref().unwrap().members[3];
    assert_eq!(member.meta().ty(), LangType::Primitive(Primitive::I32));
}

#[test]
fn non_bool_predicate_is_a_type_mismatch() {
    let source = indoc! {"
        let p : I32 = 1
        (p -> 1 : 2)
    "};
    let (_env, report) = compile_main(source);
    assert!(!report.is_success());
    assert!(matches!(
        resolution_errors(&report).as_slice(),
        [ResolutionError::TypeMismatch { expected, .. }]
            if *expected == LangType::Primitive(Primitive::Bool)
    ));
}

#[test]
fn nested_lambdas_synthesize_curried_types() {
    let source = "let make : Fn<I32; Fn<I32; I32>> = (=> :Fn<I32;I32> | x: I32 | (=> | y: I32 | (+ x y)))";
    let (env, report) = compile_main(source);
    assert!(report.is_success(), "{report:?}");

    let binding = env
        .namespace(env.root())
        .symbols
        .get(ScopeId::ROOT, "make")
        .unwrap();
    let inner = LangType::function(
        vec![LangType::Primitive(Primitive::I32)],
        LangType::Primitive(Primitive::I32),
    );
    assert_eq!(
        binding.ty(),
        LangType::function(vec![LangType::Primitive(Primitive::I32)], inner)
    );
}

#[test]
fn application_checks_arity_and_narrows_literal_arguments() {
    let source = indoc! {"
        let double : Fn<I32; I32> = (=> | x: I32 | (+ x x))
        let y : I32 = (double 3)
    "};
    let (_env, report) = compile_main(source);
    assert!(report.is_success(), "{report:?}");

    let bad = indoc! {"
        let double : Fn<I32; I32> = (=> | x: I32 | (+ x x))
        let y : I32 = (double 3 4)
    "};
    let (_env, report) = compile_main(bad);
    assert!(matches!(
        resolution_errors(&report).as_slice(),
        [ResolutionError::TypeMismatch { .. }]
    ));
}

#[test]
fn member_call_resolves_locally() {
    let source = indoc! {"
        let double : Fn<I32; I32> = (=> | x: I32 | (+ x x))
        let n : I32 = 3
        n::double[2]
    "};
    let (env, report) = compile_main(source);
    assert!(report.is_success(), "{report:?}");
    let unit = env.unit(main_unit(&env));
    let member = &unit.ast.as_ref().unwrap().members[2];
    assert_eq!(member.meta().ty(), LangType::Primitive(Primitive::I32));
}

#[test]
fn undefined_symbol_suggests_close_names() {
    let source = indoc! {"
        let counter : I32 = 1
        (+ countr 1)
    "};
    let (_env, report) = compile_main(source);
    assert!(!report.is_success());
    let errors = resolution_errors(&report);
    let [ResolutionError::UndefinedSymbol {
        name, suggestions, ..
    }] = errors.as_slice()
    else {
        panic!("expected one undefined symbol, got {errors:?}");
    };
    assert_eq!(name, "countr");
    assert_eq!(suggestions, &["counter".to_owned()]);
}

#[test]
fn unresolved_namespace_prefix_is_reported() {
    let (_env, report) = compile_main("(greet -> name::upper[])");
    assert!(!report.is_success());
    assert!(matches!(
        resolution_errors(&report).as_slice(),
        [ResolutionError::UnresolvedImport { path, .. }] if path == "greet"
    ));
}

#[test]
fn reassignment_requires_mut() {
    let source = indoc! {"
        let x : I32 = 1
        x := 2
    "};
    let (_env, report) = compile_main(source);
    assert!(matches!(
        resolution_errors(&report).as_slice(),
        [ResolutionError::AccessibilityViolation {
            kind: AccessViolationKind::NotMutable,
            ..
        }]
    ));

    let ok = indoc! {"
        let @mut x : I32 = 1
        x := 2
    "};
    let (_env, report) = compile_main(ok);
    assert!(report.is_success(), "{report:?}");
}

#[test]
fn reassigning_a_parameter_is_rejected() {
    let source = "let f = (=> | a: I32 | { a := 1  a })";
    let (_env, report) = compile_main(source);
    assert!(matches!(
        resolution_errors(&report).as_slice(),
        [ResolutionError::AccessibilityViolation {
            kind: AccessViolationKind::AssignToParameter,
            ..
        }]
    ));
}

#[test]
fn lambdas_cannot_reassign_enclosing_locals() {
    let source = indoc! {"
        let @mut counter : I32 = 0
        let f = (=> | x: I32 | { counter := x  x })
    "};
    let (_env, report) = compile_main(source);
    assert!(matches!(
        resolution_errors(&report).as_slice(),
        [ResolutionError::ScopeViolation { symbol, .. }] if symbol == "counter"
    ));
}

#[test]
fn duplicate_symbols_across_units_of_one_namespace() {
    let loader = MemoryLoader::new()
        .with_unit("main", "one.lr", "let x : I32 = 1")
        .with_unit("main", "two.lr", "let x : I32 = 2");
    let (env, report) = compile(loader);
    assert!(!report.is_success());
    assert!(matches!(
        resolution_errors(&report).as_slice(),
        [ResolutionError::DuplicateSymbol { name, .. }] if name == "x"
    ));

    // The first unit is unaffected; the colliding unit froze before
    // reaching full resolution.
    let first = env.unit(UnitId {
        namespace: env.root(),
        index: 0,
    });
    let second = env.unit(UnitId {
        namespace: env.root(),
        index: 1,
    });
    assert_eq!(first.state(), UnitState::FullyResolved);
    assert_eq!(second.state(), UnitState::Parsed);
}

#[test]
fn imports_expose_public_symbols_only() {
    let loader = MemoryLoader::new()
        .with_unit(
            "main.util",
            "util.lr",
            indoc! {"
                let @pub helper : I32 = 5
                let hidden : I32 = 1
            "},
        )
        .with_unit(
            "main",
            "main.lr",
            indoc! {"
                import util
                let a : I32 = (util -> helper)
                let b : I32 = (util -> hidden)
            "},
        );
    let (_env, report) = compile(loader);
    assert!(!report.is_success());
    assert!(matches!(
        resolution_errors(&report).as_slice(),
        [ResolutionError::AccessibilityViolation {
            symbol,
            kind: AccessViolationKind::NotPublic,
            ..
        }] if symbol == "hidden"
    ));
}

#[test]
fn import_alias_reaches_the_target() {
    let loader = MemoryLoader::new()
        .with_unit("main.geometry", "geo.lr", "let @pub pi : F64 = 3.14159")
        .with_unit(
            "main",
            "main.lr",
            indoc! {"
                import geometry as geo
                let tau : F64 = (* 2 geo -> pi)
            "},
        );
    let (_env, report) = compile(loader);
    assert!(report.is_success(), "{report:?}");
}

#[test]
fn missing_import_target_is_reported_in_stage_1() {
    let (_env, report) = compile_main("import nowhere");
    assert!(!report.is_success());
    assert!(matches!(
        resolution_errors(&report).as_slice(),
        [ResolutionError::UnresolvedImport { path, .. }] if path == "nowhere"
    ));
}

#[test]
fn import_cycles_are_detected_and_broken() {
    let loader = MemoryLoader::new()
        .with_unit(
            "main.alpha",
            "alpha.lr",
            indoc! {"
                import beta
                let @pub av : I32 = 1
                let use_beta : I32 = (beta -> bv)
            "},
        )
        .with_unit(
            "main.beta",
            "beta.lr",
            indoc! {"
                import alpha
                let @pub bv : I32 = 2
                let use_alpha : I32 = (alpha -> av)
            "},
        );
    let (_env, report) = compile(loader);

    let errors = resolution_errors(&report);
    let cycles: Vec<_> = errors
        .iter()
        .filter(|e| matches!(e, ResolutionError::CircularDependency { .. }))
        .collect();
    assert_eq!(cycles.len(), 1, "{errors:?}");
    let ResolutionError::CircularDependency { cycle } = cycles[0] else {
        unreachable!()
    };
    assert_eq!(cycle.len(), 2);
    assert!(cycle.contains(&"main.alpha".to_owned()));
    assert!(cycle.contains(&"main.beta".to_owned()));

    // Forward declaration lets both sides resolve; the only error is the
    // cycle itself.
    assert!(
        errors
            .iter()
            .all(|e| matches!(e, ResolutionError::CircularDependency { .. })),
        "{errors:?}"
    );
}

#[test]
fn lex_error_freezes_only_its_unit() {
    let loader = MemoryLoader::new()
        .with_unit("main", "good.lr", "let a : I32 = 1")
        .with_unit("main", "bad.lr", "let b = ?");
    let (env, report) = compile(loader);
    assert!(!report.is_success());
    assert_eq!(report.errors.len(), 1);
    let (unit, error) = &report.errors[0];
    assert_eq!(unit.index, 1);
    assert!(matches!(error, crate::error::CompileError::Lex { .. }));

    let good = env.unit(UnitId {
        namespace: env.root(),
        index: 0,
    });
    let bad = env.unit(UnitId {
        namespace: env.root(),
        index: 1,
    });
    assert_eq!(good.state(), UnitState::FullyResolved);
    assert_eq!(bad.state(), UnitState::Read);
}

#[test]
fn stage_two_is_idempotent_on_state() {
    let (mut env, report) = {
        let loader = MemoryLoader::new().with_unit("main", "main.lr", "let x : I32 = 1");
        let mut env = Environment::new();
        env.load_tree(&loader).unwrap();
        let report = env.compile_with(&Pipeline::full());
        (env, report)
    };
    assert!(report.is_success());

    // Re-running the pipeline finds nothing in a runnable state and
    // changes nothing.
    let again = env.compile_with(&Pipeline::full());
    assert!(again.errors.is_empty());
    assert!(!again.diagnostics.has_errors());
    let unit = env.unit(main_unit(&env));
    assert_eq!(unit.state(), UnitState::FullyResolved);
}

#[test]
fn stage_two_adds_no_symbols_or_scopes() {
    let source = indoc! {"
        let x : I32 = 1
        let f = (=> | a: I32 | { let b : I32 = 2  (+ a b) })
    "};
    let loader = MemoryLoader::new().with_unit("main", "main.lr", source);
    let mut env = Environment::new();
    env.load_tree(&loader).unwrap();

    let upto_stage_1 = Pipeline::new()
        .then(crate::pipeline::Read)
        .then(crate::pipeline::Lex)
        .then(crate::pipeline::Parse)
        .then(crate::ResolveStage1);
    let report = env.compile_with(&upto_stage_1);
    assert!(report.is_success(), "{report:?}");

    let root = env.root();
    let scopes_before = env.namespace(root).symbols.scope_count();
    let names_before: Vec<String> = env
        .namespace(root)
        .symbols
        .names_in(ScopeId::ROOT)
        .map(str::to_owned)
        .collect();

    let report = env.compile_with(&Pipeline::new().then(crate::ResolveStage2));
    assert!(report.is_success(), "{report:?}");
    assert_eq!(env.namespace(root).symbols.scope_count(), scopes_before);
    let names_after: Vec<String> = env
        .namespace(root)
        .symbols
        .names_in(ScopeId::ROOT)
        .map(str::to_owned)
        .collect();
    assert_eq!(names_after, names_before);
}

#[test]
fn syntax_pipeline_stops_after_parse() {
    let (env, report) = {
        let loader = MemoryLoader::new().with_unit("main", "main.lr", "let x : I32 = 1");
        let mut env = Environment::new();
        env.load_tree(&loader).unwrap();
        let report = env.compile_with(&Pipeline::syntax());
        (env, report)
    };
    assert!(report.is_success(), "{report:?}");
    assert_eq!(env.unit(main_unit(&env)).state(), UnitState::Parsed);
}

#[test]
fn fs_loader_mirrors_a_directory_tree() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("main.lr"), "import util\nlet a : I32 = (util -> helper)").unwrap();
    std::fs::create_dir(dir.path().join("util")).unwrap();
    std::fs::write(
        dir.path().join("util").join("util.lr"),
        "let @pub helper : I32 = 7",
    )
    .unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not a unit").unwrap();

    let loader = crate::FsLoader::new(dir.path());
    let mut env = Environment::new();
    env.load_tree(&loader).unwrap();
    let report = env.compile_with(&Pipeline::full());
    assert!(report.is_success(), "{report:?}");
    assert_eq!(env.len(), 2);
    assert_eq!(env.path_of(crate::NamespaceId(1)), "main.util");
}
