//! Exhaustiveness and redundancy checking for matches over algebraic data
//! types.
//!
//! Types are allocated in an arena through [`ty::TypeContext`]. Clauses of a
//! match form a [`matrix::Matrix`] of [`pattern::Pattern`]s with one type per
//! column, and [`sem::compute_match_usefulness`] reports unreachable rows,
//! unreachable or-pattern alternatives and a witness for missing values.
pub mod matrix;
pub mod pattern;
pub mod sem;
pub mod set;
pub mod ty;
pub mod value;

#[cfg(test)]
mod testing;
