use crate::ty::Type;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct FormatSymbols {
    pub names: Vec<String>,
}

impl FormatSymbols {
    pub fn of<'a, 'tcx: 'a>(types: impl IntoIterator<Item = &'a Type<'tcx>>) -> Self {
        Self {
            names: types.into_iter().map(|ty| ty.name().to_string()).collect(),
        }
    }
}

impl fmt::Display for FormatSymbols {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut it = self.names.iter().peekable();

        while let Some(name) = it.next() {
            write!(f, "`{}`", name)?;
            if it.peek().is_some() {
                write!(f, ", ")?;
            }
        }

        Ok(())
    }
}

/// Malformed types, patterns or matrices, and internal defects of the
/// algorithm. None of them is recoverable.
#[derive(Error, Debug, Clone)]
pub enum PatternError<'tcx> {
    #[error("constructor `{}` expects {expected} sub-patterns, found {actual}", ctor.name())]
    ArityMismatch {
        ctor: &'tcx Type<'tcx>,
        expected: usize,
        actual: usize,
    },
    #[error("sum type `{}` cannot be used as a constructor", ty.name())]
    NotAConstructor { ty: &'tcx Type<'tcx> },
    #[error("constructor `{}` does not build a value of `{}`, expected one of {expected}", actual.name(), ty.name())]
    TypeMismatch {
        ty: &'tcx Type<'tcx>,
        actual: &'tcx Type<'tcx>,
        expected: FormatSymbols,
    },
    #[error("or-pattern needs at least one alternative")]
    EmptyOrPattern,
    #[error("sum type `{name}` needs at least two terms, found {actual}")]
    TooFewTerms { name: String, actual: usize },
    #[error("`{}` cannot be a term of sum type `{name}`", ty.name())]
    InvalidSumTerm { name: String, ty: &'tcx Type<'tcx> },
    #[error("row {row} has {actual} columns, expected {expected}")]
    RowLengthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("cannot join a matrix of {left} rows with one of {right} rows")]
    RowCountMismatch { left: usize, right: usize },
    #[error("column {column} is out of range for a matrix of {columns} columns")]
    ColumnOutOfRange { column: usize, columns: usize },
    #[error("internal error: {0}")]
    InvariantViolation(String),
}

impl<'tcx> PatternError<'tcx> {
    pub fn type_mismatch(ty: &'tcx Type<'tcx>, actual: &'tcx Type<'tcx>) -> Self {
        PatternError::TypeMismatch {
            ty,
            actual,
            expected: FormatSymbols::of(ty.signature()),
        }
    }
}

/// Diagnostics produced by checking a whole match.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchWarning {
    #[error("unreachable pattern: `{pattern}`")]
    UnreachablePattern { row: usize, pattern: String },
    #[error("unreachable alternative `{alternative}` in pattern `{pattern}`")]
    UnreachableAlternative {
        row: usize,
        pattern: String,
        alternative: String,
    },
    #[error("non-exhaustive pattern: `{pattern}` not covered")]
    NonExhaustivePattern { pattern: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ListTypes;
    use crate::ty::TypeContext;
    use typed_arena::Arena;

    #[test]
    fn format_symbols() {
        let symbols = FormatSymbols {
            names: vec!["Nil".to_string(), "Cons".to_string()],
        };
        assert_eq!(symbols.to_string(), "`Nil`, `Cons`");
        assert_eq!(FormatSymbols { names: vec![] }.to_string(), "");
    }

    #[test]
    fn type_mismatch_lists_the_signature() {
        let arena = Arena::new();
        let t = ListTypes::new(TypeContext::new(&arena));

        let err = PatternError::type_mismatch(t.list, t.int);
        assert_eq!(
            err.to_string(),
            "constructor `int` does not build a value of `list`, expected one of `Nil`, `One`, `Cons`"
        );
    }
}
