//! Type compatibility and operator result rules.
//!
//! `Undefined` acts as a wildcard: anything involving a not-yet-known type
//! passes silently, so forward-declared and errored symbols do not cascade
//! into spurious mismatches.

use laurel_core::{LangType, Primitive};

use crate::ast::{Conversion, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compat {
    Equal,
    /// Compatible via an implicit widening conversion.
    Widen(Conversion),
    Incompatible,
}

/// Can a value of `actual` flow into a slot of `expected`?
pub fn check(expected: &LangType, actual: &LangType) -> Compat {
    if expected.is_undefined() || actual.is_undefined() {
        return Compat::Equal;
    }
    if expected == actual {
        return Compat::Equal;
    }
    match (expected, actual) {
        (LangType::Primitive(e), LangType::Primitive(a)) => widen(*e, *a),
        _ => Compat::Incompatible,
    }
}

fn widen(expected: Primitive, actual: Primitive) -> Compat {
    let conversion = Conversion {
        from: actual,
        to: expected,
    };
    if expected.is_integer() && actual.is_integer() && expected.width() > actual.width() {
        Compat::Widen(conversion)
    } else if expected.is_float() && actual.is_float() && expected.width() > actual.width() {
        Compat::Widen(conversion)
    } else if expected.is_float()
        && actual.is_integer()
        && expected.width() >= actual.width()
    {
        // An integer only widens into a float wide enough to hold it;
        // I64 -> F32 would drop range and must be explicit.
        Compat::Widen(conversion)
    } else {
        Compat::Incompatible
    }
}

/// Narrowing exception for bare literals: an integer literal fits any
/// integer slot, a float literal fits `F32`. Everything else narrows only
/// at an explicit site.
pub fn literal_fit(expected: &LangType, literal: &Value) -> Option<Conversion> {
    let LangType::Primitive(target) = expected else {
        return None;
    };
    match literal {
        Value::I64(_) if target.is_integer() && *target != Primitive::I64 => Some(Conversion {
            from: Primitive::I64,
            to: *target,
        }),
        Value::F64(_) if *target == Primitive::F32 => Some(Conversion {
            from: Primitive::F64,
            to: Primitive::F32,
        }),
        _ => None,
    }
}

/// Result type of combining two numeric operands: identical stays,
/// differing widths widen, mixed int/float takes a float wide enough for
/// both.
pub fn merge_numeric(a: Primitive, b: Primitive) -> Option<Primitive> {
    if !a.is_numeric() || !b.is_numeric() {
        return None;
    }
    if a == b {
        return Some(a);
    }
    Some(match (a.is_float(), b.is_float()) {
        (true, true) => {
            if a.width() >= b.width() {
                a
            } else {
                b
            }
        }
        (false, false) => {
            if a.width() >= b.width() {
                a
            } else {
                b
            }
        }
        _ => {
            if a.width() == 64 || b.width() == 64 {
                Primitive::F64
            } else {
                Primitive::F32
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prim(p: Primitive) -> LangType {
        LangType::Primitive(p)
    }

    #[test]
    fn equal_types_are_compatible() {
        assert_eq!(
            check(&prim(Primitive::I32), &prim(Primitive::I32)),
            Compat::Equal
        );
    }

    #[test]
    fn undefined_is_a_wildcard() {
        assert_eq!(check(&LangType::Undefined, &prim(Primitive::Bool)), Compat::Equal);
        assert_eq!(check(&prim(Primitive::Bool), &LangType::Undefined), Compat::Equal);
    }

    #[test]
    fn integer_widening_is_implicit() {
        let Compat::Widen(conv) = check(&prim(Primitive::I64), &prim(Primitive::I16)) else {
            panic!("expected widening");
        };
        assert_eq!(conv.from, Primitive::I16);
        assert_eq!(conv.to, Primitive::I64);
    }

    #[test]
    fn narrowing_is_rejected() {
        assert_eq!(
            check(&prim(Primitive::I16), &prim(Primitive::I64)),
            Compat::Incompatible
        );
        assert_eq!(
            check(&prim(Primitive::F32), &prim(Primitive::F64)),
            Compat::Incompatible
        );
        assert_eq!(
            check(&prim(Primitive::I32), &prim(Primitive::F32)),
            Compat::Incompatible
        );
    }

    #[test]
    fn int_to_float_is_widening() {
        assert!(matches!(
            check(&prim(Primitive::F64), &prim(Primitive::I32)),
            Compat::Widen(_)
        ));
    }

    #[test]
    fn int_to_float_requires_sufficient_width() {
        assert_eq!(
            check(&prim(Primitive::F32), &prim(Primitive::I64)),
            Compat::Incompatible
        );
        assert!(matches!(
            check(&prim(Primitive::F32), &prim(Primitive::I32)),
            Compat::Widen(_)
        ));
        assert!(matches!(
            check(&prim(Primitive::F64), &prim(Primitive::I64)),
            Compat::Widen(_)
        ));
    }

    #[test]
    fn bool_and_numeric_do_not_mix() {
        assert_eq!(
            check(&prim(Primitive::Bool), &prim(Primitive::I32)),
            Compat::Incompatible
        );
    }

    #[test]
    fn function_types_compare_structurally() {
        let f1 = LangType::function(vec![prim(Primitive::I32)], prim(Primitive::I32));
        let f2 = LangType::function(vec![prim(Primitive::I32)], prim(Primitive::I32));
        let f3 = LangType::function(vec![prim(Primitive::I64)], prim(Primitive::I32));
        assert_eq!(check(&f1, &f2), Compat::Equal);
        assert_eq!(check(&f1, &f3), Compat::Incompatible);
    }

    #[test]
    fn literal_fit_narrows_int_literals() {
        let conv = literal_fit(&prim(Primitive::I32), &Value::I64(1)).unwrap();
        assert_eq!(conv.to, Primitive::I32);
        assert!(literal_fit(&prim(Primitive::I32), &Value::F64(1.0)).is_none());
        assert!(literal_fit(&prim(Primitive::Bool), &Value::I64(1)).is_none());
    }

    #[test]
    fn merge_prefers_the_wider_operand() {
        assert_eq!(
            merge_numeric(Primitive::I32, Primitive::I64),
            Some(Primitive::I64)
        );
        assert_eq!(
            merge_numeric(Primitive::F32, Primitive::F64),
            Some(Primitive::F64)
        );
        assert_eq!(
            merge_numeric(Primitive::I32, Primitive::F32),
            Some(Primitive::F32)
        );
        assert_eq!(
            merge_numeric(Primitive::I64, Primitive::F32),
            Some(Primitive::F64)
        );
        assert_eq!(merge_numeric(Primitive::Bool, Primitive::I32), None);
    }
}
