//! Redundant alternatives of or-patterns.
//!
//! A row may be useful while some of the alternatives of its or-patterns are
//! not: in `One(_) | Nil` after a row matching `One(_)`, only `Nil` still
//! matters. Finding them follows section 5 of Maranget's "Warnings for
//! pattern matching". Columns of the row are moved one at a time out of `P`:
//! wildcards into the `Q` context and or-patterns into the `R` context. Once
//! `P` has no columns left, each deferred or-pattern is split into its first
//! alternative and the rest, and both halves are checked against the rows
//! above.
use super::error::PatternError;
use super::usefulness::{specialized, useful, with_head};
use crate::matrix::{Matrix, Row};
use crate::pattern::{Pattern, PatternSet};
use std::iter;
use tracing::trace;

/// Indicates whether or not a row is reachable.
#[derive(Clone, Debug, PartialEq)]
pub enum Redundancy<'tcx> {
    /// The row is reachable; the set holds its alternatives that are not.
    Reachable(PatternSet<'tcx>),
    /// The row is unreachable.
    Unreachable,
}

impl<'tcx> Redundancy<'tcx> {
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Redundancy::Unreachable)
    }

    /// Unreachable alternatives of a reachable row.
    pub fn patterns(&self) -> Option<&PatternSet<'tcx>> {
        match self {
            Redundancy::Reachable(patterns) => Some(patterns),
            Redundancy::Unreachable => None,
        }
    }
}

/// Checks `row` against the rows of `matrix` above it.
pub fn useless_patterns<'tcx>(
    matrix: &Matrix<'tcx>,
    row: &[Pattern<'tcx>],
) -> Result<Redundancy<'tcx>, PatternError<'tcx>> {
    if row.len() != matrix.column_count() {
        return Err(PatternError::RowLengthMismatch {
            row: matrix.len(),
            expected: matrix.column_count(),
            actual: row.len(),
        });
    }

    let cx = Context {
        p: matrix.clone(),
        p_row: row.to_vec(),
        q: Matrix::blank(matrix.len()),
        q_row: vec![],
        r: Matrix::blank(matrix.len()),
        r_row: vec![],
    };
    Ok(match compute(cx)? {
        Some(patterns) => Redundancy::Reachable(patterns),
        None => Redundancy::Unreachable,
    })
}

/// The three row-aligned matrices of the algorithm, each with the part of the
/// checked row for its columns.
struct Context<'tcx> {
    p: Matrix<'tcx>,
    p_row: Row<'tcx>,
    /// Columns where the row had a wildcard.
    q: Matrix<'tcx>,
    q_row: Row<'tcx>,
    /// Columns where the row had an or-pattern.
    r: Matrix<'tcx>,
    r_row: Row<'tcx>,
}

/// `None` if the row is useless, its useless alternatives otherwise.
fn compute<'tcx>(cx: Context<'tcx>) -> Result<Option<PatternSet<'tcx>>, PatternError<'tcx>> {
    if cx.p.column_count() == 0 {
        if cx.r_row.is_empty() {
            return Ok(useful(&cx.q, &cx.q_row)?.then(PatternSet::new));
        }

        let mut useless = PatternSet::new();
        for j in 0..cx.r_row.len() {
            match redundant_alternatives(&cx, j)? {
                Some(patterns) => useless.add_set(patterns),
                None if j == 0 => return Ok(None),
                None => {
                    return Err(PatternError::InvariantViolation(format!(
                        "or-pattern column {} is useless but column 0 is not",
                        j
                    )))
                }
            }
        }
        return Ok(Some(useless));
    }

    let Context {
        p,
        p_row,
        q,
        q_row,
        r,
        r_row,
    } = cx;
    let (head, rest) = (&p_row[0], &p_row[1..]);
    let next = match head {
        Pattern::Constructed(pat) => {
            // Rows dropped from `p` go away in the other contexts too.
            let combined = p.concat(&q)?.concat(&r)?;
            let specialized = specialized(pat.ctor(), &combined)?;
            let p_end = (pat.fields().len() + p.column_count() - 1) as isize;
            let q_end = p_end + q.column_count() as isize;
            Context {
                p: specialized.slice_cols(..p_end),
                p_row: pat.fields().iter().chain(rest).cloned().collect(),
                q: specialized.slice_cols(p_end..q_end),
                q_row,
                r: specialized.slice_cols(q_end..),
                r_row,
            }
        }
        Pattern::Wildcard => Context {
            p: p.slice_cols(1..),
            p_row: rest.to_vec(),
            q: q.shift(&p.reduce(0)?)?,
            q_row: with_head(head, &q_row),
            r,
            r_row,
        },
        Pattern::Or(_) => Context {
            p: p.slice_cols(1..),
            p_row: rest.to_vec(),
            q,
            q_row,
            r: r.shift(&p.reduce(0)?)?,
            r_row: with_head(head, &r_row),
        },
    };
    compute(next)
}

/// Splits the or-pattern of column `j` of `r` into its first alternative and
/// the rest, and checks each against the rows above.
fn redundant_alternatives<'tcx>(
    cx: &Context<'tcx>,
    j: usize,
) -> Result<Option<PatternSet<'tcx>>, PatternError<'tcx>> {
    let (left, right) = match &cx.r_row[j] {
        Pattern::Or(pat) => pat.split_first(),
        _ => None,
    }
    .ok_or_else(|| {
        PatternError::InvariantViolation(format!("column {} holds no or-pattern", j))
    })?;

    let column = cx.r.reduce(j)?;
    let others = cx.r.erase(j)?.concat(&cx.q)?;
    let others_row: Row<'tcx> = cx
        .r_row
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != j)
        .map(|(_, pat)| pat)
        .chain(&cx.q_row)
        .cloned()
        .collect();

    let first = compute(Context {
        p: column.clone(),
        p_row: vec![left.clone()],
        q: others.clone(),
        q_row: others_row.clone(),
        r: Matrix::blank(column.len()),
        r_row: vec![],
    })?;
    // The rest is checked as if the first alternative were a row above it.
    let rest = compute(Context {
        p: column.with_row(vec![left.clone()])?,
        p_row: vec![right.clone()],
        q: others.with_row(others_row.clone())?,
        q_row: others_row,
        r: Matrix::blank(column.len() + 1),
        r_row: vec![],
    })?;
    trace!(%left, %right, ?first, ?rest, "split or-pattern");

    Ok(match (first, rest) {
        (None, None) => None,
        (None, Some(rest)) => Some(iter::once(left.clone()).chain(rest).collect()),
        (Some(first), None) => Some(first.into_iter().chain(iter::once(right)).collect()),
        (Some(mut first), Some(rest)) => {
            first.add_set(rest);
            Some(first)
        }
    })
}
