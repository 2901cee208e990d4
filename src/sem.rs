//! Semantic analysis of pattern matrices: usefulness, exhaustiveness and
//! redundancy.
pub mod error;
pub mod redundancy;
pub mod usefulness;

pub use error::{MatchWarning, PatternError};
pub use redundancy::{useless_patterns, Redundancy};
pub use usefulness::{
    counter_example, default_matrix, exhaustive, specialized, useful, useless_clause,
};

use crate::matrix::{Matrix, Row};
use itertools::Itertools;
use tracing::debug;

/// The output of checking a match for exhaustiveness and row reachability.
#[derive(Debug, Clone)]
pub struct UsefulnessReport<'tcx> {
    /// For each row of the input, whether that row is reachable after the rows above it.
    pub row_redundancy: Vec<(Row<'tcx>, Redundancy<'tcx>)>,
    /// If the match is exhaustive, this is `None`. If not, a row of patterns
    /// matching the values no row covers.
    pub non_exhaustiveness_witness: Option<Row<'tcx>>,
}

impl<'tcx> UsefulnessReport<'tcx> {
    pub fn is_exhaustive(&self) -> bool {
        self.non_exhaustiveness_witness.is_none()
    }

    pub fn unreachable_rows(&self) -> Vec<usize> {
        self.row_redundancy
            .iter()
            .enumerate()
            .filter(|(_, (_, redundancy))| redundancy.is_unreachable())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn warnings(&self) -> Vec<MatchWarning> {
        let mut warnings = vec![];

        for (i, (row, redundancy)) in self.row_redundancy.iter().enumerate() {
            let pattern = row.iter().join(", ");
            match redundancy {
                Redundancy::Unreachable => {
                    warnings.push(MatchWarning::UnreachablePattern { row: i, pattern });
                }
                Redundancy::Reachable(alternatives) => {
                    for alternative in alternatives {
                        warnings.push(MatchWarning::UnreachableAlternative {
                            row: i,
                            pattern: pattern.clone(),
                            alternative: alternative.to_string(),
                        });
                    }
                }
            }
        }
        if let Some(witness) = &self.non_exhaustiveness_witness {
            warnings.push(MatchWarning::NonExhaustivePattern {
                pattern: witness.iter().join(", "),
            });
        }

        warnings
    }
}

/// The entrypoint for the usefulness algorithm. Computes whether a match is
/// exhaustive and which of its rows, and which alternatives of its
/// or-patterns, are reachable.
pub fn compute_match_usefulness<'tcx>(
    matrix: &Matrix<'tcx>,
) -> Result<UsefulnessReport<'tcx>, PatternError<'tcx>> {
    let mut row_redundancy = Vec::with_capacity(matrix.len());

    for (i, row) in matrix.rows().iter().enumerate() {
        let redundancy = useless_patterns(&matrix.slice_rows(..i as isize), row)?;
        debug!(row = i, ?redundancy, "checked row");
        row_redundancy.push((row.clone(), redundancy));
    }

    let non_exhaustiveness_witness = counter_example(matrix)?;
    debug!(witness = ?non_exhaustiveness_witness, "checked exhaustiveness");

    Ok(UsefulnessReport {
        row_redundancy,
        non_exhaustiveness_witness,
    })
}
