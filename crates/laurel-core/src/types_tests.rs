use crate::types::{LangType, Modifier, ModifierSet, Primitive};

#[test]
fn primitive_names_round_trip() {
    for p in [
        Primitive::I8,
        Primitive::I16,
        Primitive::I32,
        Primitive::I64,
        Primitive::F32,
        Primitive::F64,
        Primitive::Bool,
        Primitive::Nil,
    ] {
        assert_eq!(Primitive::from_name(p.name()), Some(p));
    }
}

#[test]
fn primitive_lookup_is_case_sensitive() {
    assert_eq!(Primitive::from_name("i32"), None);
    assert_eq!(Primitive::from_name("bool"), None);
    assert_eq!(Primitive::from_name("I32"), Some(Primitive::I32));
}

#[test]
fn function_type_display() {
    let ty = LangType::function(
        vec![
            LangType::Primitive(Primitive::I32),
            LangType::Primitive(Primitive::I32),
        ],
        LangType::Primitive(Primitive::I32),
    );
    assert_eq!(ty.to_string(), "Fn<I32 I32; I32>");
}

#[test]
fn nested_function_type_display() {
    let inner = LangType::function(
        vec![LangType::Primitive(Primitive::I32)],
        LangType::Primitive(Primitive::I32),
    );
    let outer = LangType::function(vec![LangType::Primitive(Primitive::I32)], inner);
    assert_eq!(outer.to_string(), "Fn<I32; Fn<I32; I32>>");
}

#[test]
fn array_type_display() {
    let ty = LangType::Array(Box::new(LangType::Primitive(Primitive::F64)));
    assert_eq!(ty.to_string(), "Array<F64>");
}

#[test]
fn modifier_set_operations() {
    let set = ModifierSet::EMPTY
        .with(Modifier::Mutable)
        .with(Modifier::Public);
    assert!(set.contains(Modifier::Mutable));
    assert!(set.contains(Modifier::Public));
    assert!(!set.contains(Modifier::Const));
    assert_eq!(set.iter().count(), 2);

    let collected: ModifierSet = [Modifier::Optional].into_iter().collect();
    assert!(collected.contains(Modifier::Optional));
    assert!(!collected.contains(Modifier::Mutable));
    assert!(ModifierSet::EMPTY.is_empty());
}
