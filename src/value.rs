//! Concrete values and the "pattern matches value" relation.
use crate::pattern::Pattern;
use crate::sem::error::PatternError;
use crate::ty::Type;
use itertools::Itertools;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Value<'tcx> {
    ctor: &'tcx Type<'tcx>,
    fields: Vec<Value<'tcx>>,
}

impl<'tcx> Value<'tcx> {
    pub fn new(
        ctor: &'tcx Type<'tcx>,
        fields: Vec<Value<'tcx>>,
    ) -> Result<Self, PatternError<'tcx>> {
        let expected = ctor.arity().ok_or(PatternError::NotAConstructor { ty: ctor })?;
        if expected != fields.len() {
            return Err(PatternError::ArityMismatch {
                ctor,
                expected,
                actual: fields.len(),
            });
        }
        Ok(Self { ctor, fields })
    }

    pub fn ctor(&self) -> &'tcx Type<'tcx> {
        self.ctor
    }

    pub fn fields(&self) -> &[Value<'tcx>] {
        &self.fields
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ctor.name())?;
        if !self.fields.is_empty() {
            write!(f, "({})", self.fields.iter().join(", "))?;
        }
        Ok(())
    }
}

/// Returns whether `pattern` matches `value`, both of type `ty`.
///
/// A constructor outside `ty`'s signature, in the pattern or in the value, is
/// a type error rather than a failed match.
pub fn instance<'tcx>(
    ty: &'tcx Type<'tcx>,
    pattern: &Pattern<'tcx>,
    value: &Value<'tcx>,
) -> Result<bool, PatternError<'tcx>> {
    let signature = ty.signature();
    if !signature.contains(&value.ctor) {
        return Err(PatternError::type_mismatch(ty, value.ctor));
    }

    match pattern {
        Pattern::Wildcard => Ok(true),
        Pattern::Or(pat) => {
            for alt in pat.alternatives() {
                if instance(ty, alt, value)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        Pattern::Constructed(pat) => {
            if !signature.contains(&pat.ctor()) {
                return Err(PatternError::type_mismatch(ty, pat.ctor()));
            }
            if pat.ctor() != value.ctor {
                return Ok(false);
            }
            for ((field_ty, field_pat), field_value) in value
                .ctor
                .terms()
                .iter()
                .copied()
                .zip(pat.fields())
                .zip(&value.fields)
            {
                if !instance(field_ty, field_pat, field_value)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ListTypes;
    use crate::ty::TypeContext;
    use typed_arena::Arena;

    #[test]
    fn wildcard_and_constructor_matching() {
        let arena = Arena::new();
        let t = ListTypes::new(TypeContext::new(&arena));
        let zero = Value::new(t.int, vec![]).unwrap();
        let nil = Value::new(t.nil, vec![]).unwrap();
        let one = Value::new(t.one, vec![zero.clone()]).unwrap();
        let list = Value::new(t.cons, vec![zero, one]).unwrap();

        assert!(instance(t.list, &Pattern::Wildcard, &list).unwrap());
        assert!(instance(t.list, &t.cons_pat(), &list).unwrap());
        assert!(!instance(t.list, &t.nil_pat(), &list).unwrap());
        assert!(instance(t.list, &t.nil_pat(), &nil).unwrap());

        let cons_one = Pattern::constructed(t.cons, vec![Pattern::Wildcard, t.one_pat()]).unwrap();
        let cons_nil = Pattern::constructed(t.cons, vec![Pattern::Wildcard, t.nil_pat()]).unwrap();
        assert!(instance(t.list, &cons_one, &list).unwrap());
        assert!(!instance(t.list, &cons_nil, &list).unwrap());
        assert_eq!(list.to_string(), "Cons(int, One(int))");
    }

    #[test]
    fn or_pattern_matches_any_alternative() {
        let arena = Arena::new();
        let t = ListTypes::new(TypeContext::new(&arena));
        let nil = Value::new(t.nil, vec![]).unwrap();

        let one_or_nil = Pattern::or(vec![t.one_pat(), t.nil_pat()]).unwrap();
        let one_or_cons = Pattern::or(vec![t.one_pat(), t.cons_pat()]).unwrap();
        assert!(instance(t.list, &one_or_nil, &nil).unwrap());
        assert!(!instance(t.list, &one_or_cons, &nil).unwrap());
    }

    #[test]
    fn foreign_constructors_are_type_errors() {
        let arena = Arena::new();
        let t = ListTypes::new(TypeContext::new(&arena));
        let zero = Value::new(t.int, vec![]).unwrap();
        let nil = Value::new(t.nil, vec![]).unwrap();

        assert!(matches!(
            instance(t.list, &Pattern::Wildcard, &zero),
            Err(PatternError::TypeMismatch { .. })
        ));
        assert!(matches!(
            instance(t.list, &t.int_pat(), &nil),
            Err(PatternError::TypeMismatch { .. })
        ));
        assert!(matches!(
            Value::new(t.one, vec![]),
            Err(PatternError::ArityMismatch { .. })
        ));
    }
}
