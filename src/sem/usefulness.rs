//! Usefulness, exhaustiveness and witnesses, after Maranget's "Warnings for
//! pattern matching" (JFP 2007):
//! - http://moscova.inria.fr/~maranget/papers/warn/index.html
//!
//! A row `q` is useful with respect to a matrix `P` if some value is matched
//! by `q` and by no row of `P`. Everything else reduces to that question:
//! a match is exhaustive iff a row of wildcards is useless after all its
//! clauses, and a clause is dead iff it is useless after the clauses above it.
//!
//! The algorithm looks at the first column only. Assuming the scrutinee was
//! built by some constructor `c`, the matrix is *specialized* by `c`: rows
//! that cannot match a `c` value vanish and `c`'s sub-patterns become new
//! columns. When the first column does not mention every constructor of its
//! type, a value built by a missing constructor is only matched by the rows
//! with a wildcard there, which form the *default matrix*.
use super::error::PatternError;
use crate::matrix::{Matrix, Row};
use crate::pattern::Pattern;
use crate::ty::{Type, TypeSet};
use std::iter;
use tracing::trace;

/// Witnesses with more unused constructors than this name only the first one.
const EXAMPLE_OR_CUTOFF: usize = 3;

/// This computes `S(ctor, matrix)`.
pub fn specialized<'tcx>(
    ctor: &'tcx Type<'tcx>,
    matrix: &Matrix<'tcx>,
) -> Result<Matrix<'tcx>, PatternError<'tcx>> {
    let head_ty = head_type(matrix)?;
    if !head_ty.signature().contains(&ctor) {
        return Err(PatternError::type_mismatch(head_ty, ctor));
    }
    let arity = ctor
        .arity()
        .ok_or(PatternError::NotAConstructor { ty: ctor })?;

    let mut rows: Vec<Row<'tcx>> = vec![];
    for row in matrix.rows() {
        // Or-patterns are expanded in place, so keep a stack to preserve
        // alternative order.
        let mut pending = vec![row.clone()];
        while let Some(row) = pending.pop() {
            let Some((head, rest)) = row.split_first() else {
                continue;
            };
            match head {
                Pattern::Constructed(pat) if pat.ctor() == ctor => {
                    rows.push(pat.fields().iter().chain(rest).cloned().collect());
                }
                Pattern::Constructed(_) => {}
                Pattern::Wildcard => {
                    rows.push(
                        Pattern::wildcards(arity)
                            .into_iter()
                            .chain(rest.iter().cloned())
                            .collect(),
                    );
                }
                Pattern::Or(pat) => {
                    pending.extend(pat.alternatives().iter().rev().map(|alt| with_head(alt, rest)));
                }
            }
        }
    }

    let types = ctor
        .terms()
        .iter()
        .chain(&matrix.types()[1..])
        .copied()
        .collect();
    trace!(ctor = ctor.name(), rows = rows.len(), "specialized");
    Matrix::new(types, rows)
}

/// This computes `D(matrix)`: the rows that still apply when the first
/// column holds a constructor none of the rows mention.
pub fn default_matrix<'tcx>(matrix: &Matrix<'tcx>) -> Result<Matrix<'tcx>, PatternError<'tcx>> {
    head_type(matrix)?;

    let mut rows: Vec<Row<'tcx>> = vec![];
    for row in matrix.rows() {
        let mut pending = vec![row.clone()];
        while let Some(row) = pending.pop() {
            let Some((head, rest)) = row.split_first() else {
                continue;
            };
            match head {
                Pattern::Constructed(_) => {}
                Pattern::Wildcard => rows.push(rest.to_vec()),
                Pattern::Or(pat) => {
                    pending.extend(pat.alternatives().iter().rev().map(|alt| with_head(alt, rest)));
                }
            }
        }
    }

    Matrix::new(matrix.types()[1..].to_vec(), rows)
}

/// Whether `row` matches some value that no row of `matrix` matches.
pub fn useful<'tcx>(matrix: &Matrix<'tcx>, row: &[Pattern<'tcx>]) -> Result<bool, PatternError<'tcx>> {
    if matrix.is_empty() {
        return Ok(true);
    }
    check_row(matrix, row)?;
    if matrix.column_count() == 0 {
        return Ok(false);
    }

    let (head, rest) = (&row[0], &row[1..]);
    match head {
        Pattern::Constructed(pat) => useful_specialized(matrix, row, pat.ctor()),
        Pattern::Wildcard => {
            let sigma = matrix.root_constructors();
            let signature = head_signature(matrix, &sigma)?;
            if sigma == signature {
                for &ctor in &sigma {
                    if useful_specialized(matrix, row, ctor)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            } else {
                useful(&default_matrix(matrix)?, rest)
            }
        }
        Pattern::Or(pat) => {
            for alt in pat.alternatives() {
                if useful(matrix, &with_head(alt, rest))? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

/// Whether every value is matched by some row of `matrix`.
pub fn exhaustive<'tcx>(matrix: &Matrix<'tcx>) -> Result<bool, PatternError<'tcx>> {
    Ok(!useful(matrix, &Pattern::wildcards(matrix.column_count()))?)
}

/// A row of patterns matching values no row of `matrix` matches, or `None`
/// when `matrix` is exhaustive.
pub fn counter_example<'tcx>(
    matrix: &Matrix<'tcx>,
) -> Result<Option<Row<'tcx>>, PatternError<'tcx>> {
    if matrix.is_empty() {
        return Ok(Some(Pattern::wildcards(matrix.column_count())));
    }
    if matrix.column_count() == 0 {
        return Ok(None);
    }

    let sigma = matrix.root_constructors();
    let signature = head_signature(matrix, &sigma)?;
    if sigma == signature {
        // Every constructor has to be tried before concluding exhaustiveness.
        for &ctor in &signature {
            let Some(mut witness) = counter_example(&specialized(ctor, matrix)?)? else {
                continue;
            };
            let arity = ctor
                .arity()
                .ok_or(PatternError::NotAConstructor { ty: ctor })?;
            if witness.len() < arity {
                return Err(PatternError::InvariantViolation(format!(
                    "witness of {} patterns cannot fill the {} fields of `{}`",
                    witness.len(),
                    arity,
                    ctor.name()
                )));
            }
            let rest = witness.split_off(arity);
            let head = Pattern::constructed(ctor, witness)?;
            return Ok(Some(iter::once(head).chain(rest).collect()));
        }
        return Ok(None);
    }

    let Some(witness) = counter_example(&default_matrix(matrix)?)? else {
        return Ok(None);
    };
    let head = if sigma.is_empty() {
        Pattern::Wildcard
    } else {
        let unused = signature.subtract(&sigma);
        match unused.as_slice() {
            [] => {
                return Err(PatternError::InvariantViolation(
                    "incomplete signature without an unused constructor".to_string(),
                ))
            }
            [ctor] => Pattern::constructed_wild(*ctor)?,
            ctors if ctors.len() <= EXAMPLE_OR_CUTOFF => Pattern::or(
                ctors
                    .iter()
                    .map(|&ctor| Pattern::constructed_wild(ctor))
                    .collect::<Result<_, _>>()?,
            )?,
            [ctor, ..] => Pattern::constructed_wild(*ctor)?,
        }
    };
    Ok(Some(iter::once(head).chain(witness).collect()))
}

/// Index of the first row shadowed by the rows above it.
pub fn useless_clause<'tcx>(matrix: &Matrix<'tcx>) -> Result<Option<usize>, PatternError<'tcx>> {
    for (i, row) in matrix.rows().iter().enumerate().skip(1) {
        if !useful(&matrix.slice_rows(..i as isize), row)? {
            return Ok(Some(i));
        }
    }
    Ok(None)
}

/// Usefulness of `row` assuming its head was built by `ctor`.
fn useful_specialized<'tcx>(
    matrix: &Matrix<'tcx>,
    row: &[Pattern<'tcx>],
    ctor: &'tcx Type<'tcx>,
) -> Result<bool, PatternError<'tcx>> {
    let specialized_row = specialize_row(ctor, matrix.types(), row)?;
    useful(&specialized(ctor, matrix)?, &specialized_row)
}

/// Specializes a single row, which must yield exactly one row.
fn specialize_row<'tcx>(
    ctor: &'tcx Type<'tcx>,
    types: &[&'tcx Type<'tcx>],
    row: &[Pattern<'tcx>],
) -> Result<Row<'tcx>, PatternError<'tcx>> {
    let single = Matrix::new(types.to_vec(), vec![row.to_vec()])?;
    match <[Row<'tcx>; 1]>::try_from(specialized(ctor, &single)?.into_rows()) {
        Ok([row]) => Ok(row),
        Err(rows) => Err(PatternError::InvariantViolation(format!(
            "specializing one row by `{}` produced {} rows",
            ctor.name(),
            rows.len()
        ))),
    }
}

/// `alt` followed by `rest`.
pub(super) fn with_head<'tcx>(alt: &Pattern<'tcx>, rest: &[Pattern<'tcx>]) -> Row<'tcx> {
    iter::once(alt).chain(rest).cloned().collect()
}

fn head_type<'tcx>(matrix: &Matrix<'tcx>) -> Result<&'tcx Type<'tcx>, PatternError<'tcx>> {
    matrix.types().first().copied().ok_or_else(|| {
        PatternError::InvariantViolation("matrix has no column to decompose".to_string())
    })
}

/// The signature of the first column, checking that `sigma` belongs to it.
fn head_signature<'tcx>(
    matrix: &Matrix<'tcx>,
    sigma: &TypeSet<'tcx, 'tcx>,
) -> Result<TypeSet<'tcx, 'tcx>, PatternError<'tcx>> {
    let head_ty = head_type(matrix)?;
    let signature = head_ty.signature();
    if let Some(&ctor) = sigma.iter().find(|&&ctor| !signature.contains(&ctor)) {
        return Err(PatternError::type_mismatch(head_ty, ctor));
    }
    Ok(signature)
}

fn check_row<'tcx>(matrix: &Matrix<'tcx>, row: &[Pattern<'tcx>]) -> Result<(), PatternError<'tcx>> {
    if row.len() == matrix.column_count() {
        Ok(())
    } else {
        Err(PatternError::RowLengthMismatch {
            row: matrix.len(),
            expected: matrix.column_count(),
            actual: row.len(),
        })
    }
}
