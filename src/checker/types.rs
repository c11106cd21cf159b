//! Type compatibility and inference rules (§4.C "Type inference" and
//! "Compatibility rules").

use crate::ast::expr::BinOp;
use crate::ast::ty::Ty;
use crate::schema::SchemaStore;

/// Identity, `unknown` on either side, qualified/bare enum by name match,
/// array element-wise with fixed-size equality, `unknown[]` matches any
/// array, handle up/downcast through inheritance, numeric widenings, and
/// enum<->int conversions for a known enum (§4.C "Compatibility rules").
pub fn is_compatible(expected: &Ty, found: &Ty, schema: &SchemaStore) -> bool {
    if expected == found {
        return true;
    }
    match (expected, found) {
        (Ty::Unknown, _) | (_, Ty::Unknown) => true,
        (Ty::Array { elem: e1, size: s1 }, Ty::Array { elem: e2, size: s2 }) => {
            let size_ok = match (s1, s2) {
                (None, _) | (_, None) => true,
                (Some(a), Some(b)) => a == b,
            };
            size_ok && is_compatible(e1, e2, schema)
        }
        (Ty::Tuple(a), Ty::Tuple(b)) => {
            a.len() == b.len()
                && a.iter()
                    .zip(b.iter())
                    .all(|(x, y)| is_compatible(x, y, schema))
        }
        (Ty::Handle(a), Ty::Handle(b)) => {
            schema.inherits_from(b, a) || schema.inherits_from(a, b)
        }
        (Ty::Enum(_), Ty::Int32 | Ty::UInt32) | (Ty::Int32 | Ty::UInt32, Ty::Enum(_)) => true,
        (a, b) if a.is_numeric() && b.is_numeric() => is_numeric_widening(a, b) || is_numeric_widening(b, a),
        _ => false,
    }
}

/// `int32 -> float32/float64/uint32`, `float32 <-> float64` narrow/widen
/// both ways (§4.C): numeric compatibility is intentionally permissive,
/// the emitter decides whether a cast is a widen or narrow.
fn is_numeric_widening(from: &Ty, to: &Ty) -> bool {
    matches!(
        (from, to),
        (Ty::Int32, Ty::Float32)
            | (Ty::Int32, Ty::Float64)
            | (Ty::Int32, Ty::UInt32)
            | (Ty::Float32, Ty::Float64)
            | (Ty::Float64, Ty::Float32)
            | (Ty::UInt32, Ty::Int32)
            | (Ty::UInt32, Ty::Float32)
            | (Ty::UInt32, Ty::Float64)
    )
}

/// The wider of two numeric operands for binary arithmetic; mixed
/// `int32 x float*` widens to float (§4.C inference table).
pub fn widen_numeric(lhs: &Ty, rhs: &Ty) -> Option<Ty> {
    if !lhs.is_numeric() || !rhs.is_numeric() {
        return None;
    }
    if lhs == rhs {
        return Some(lhs.clone());
    }
    if lhs.is_float() || rhs.is_float() {
        return Some(if matches!(lhs, Ty::Float64) || matches!(rhs, Ty::Float64) {
            Ty::Float64
        } else {
            Ty::Float32
        });
    }
    // int32 / uint32 mix, neither float: widen to int32.
    Some(Ty::Int32)
}

/// Result type of a binary operator application, or `None` if the operand
/// types are incompatible for this operator.
pub fn infer_binary(op: BinOp, lhs: &Ty, rhs: &Ty, schema: &SchemaStore) -> Option<Ty> {
    if op.is_comparison_or_logical() {
        if matches!(op, BinOp::Eq | BinOp::Ne) {
            return is_compatible(lhs, rhs, schema).then_some(Ty::Bool);
        }
        if matches!(op, BinOp::And | BinOp::Or) {
            return (matches!(lhs, Ty::Bool) && matches!(rhs, Ty::Bool)).then_some(Ty::Bool);
        }
        // Lt/Le/Gt/Ge: numeric ordering only.
        return widen_numeric(lhs, rhs).map(|_| Ty::Bool);
    }
    widen_numeric(lhs, rhs)
}

/// Common type of two branches (ternary/match), or `None` if incompatible
/// (§4.C ternary/match rows).
pub fn common_type(a: &Ty, b: &Ty, schema: &SchemaStore) -> Option<Ty> {
    if a == b {
        return Some(a.clone());
    }
    if matches!(a, Ty::Unknown) {
        return Some(b.clone());
    }
    if matches!(b, Ty::Unknown) {
        return Some(a.clone());
    }
    if let Some(widened) = widen_numeric(a, b) {
        return Some(widened);
    }
    if is_compatible(a, b, schema) {
        return Some(a.clone());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_store() -> SchemaStore {
        SchemaStore::new()
    }

    #[test]
    fn identity_is_compatible() {
        let s = empty_store();
        assert!(is_compatible(&Ty::Int32, &Ty::Int32, &s));
    }

    #[test]
    fn unknown_matches_anything() {
        let s = empty_store();
        assert!(is_compatible(&Ty::Unknown, &Ty::String, &s));
        assert!(is_compatible(&Ty::Bool, &Ty::Unknown, &s));
    }

    #[test]
    fn unknown_array_matches_any_array() {
        let s = empty_store();
        let unknown_arr = Ty::array(Ty::Unknown);
        let int_arr = Ty::array(Ty::Int32);
        assert!(is_compatible(&int_arr, &unknown_arr, &s));
    }

    #[test]
    fn fixed_array_size_must_match() {
        let s = empty_store();
        let a = Ty::fixed_array(Ty::Int32, 3);
        let b = Ty::fixed_array(Ty::Int32, 4);
        assert!(!is_compatible(&a, &b, &s));
    }

    #[test]
    fn int_widens_to_float() {
        assert_eq!(widen_numeric(&Ty::Int32, &Ty::Float64), Some(Ty::Float64));
    }

    #[test]
    fn binary_eq_on_bools_is_bool() {
        let s = empty_store();
        assert_eq!(
            infer_binary(BinOp::Eq, &Ty::Bool, &Ty::Bool, &s),
            Some(Ty::Bool)
        );
    }
}
