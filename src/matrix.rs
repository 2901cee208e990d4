use crate::pattern::Pattern;
use crate::sem::error::PatternError;
use crate::set::OrderedSet;
use crate::ty::{Type, TypeSet};
use crate::value::{instance, Value};
use std::fmt;
use std::ops::{Bound, Range, RangeBounds};

/// One clause of a match, one pattern per column.
pub type Row<'tcx> = Vec<Pattern<'tcx>>;

/// A 2D matrix of patterns with a type per column. Earlier rows take
/// priority over later ones.
///
/// Every operation returns a new matrix.
#[derive(Clone, PartialEq)]
pub struct Matrix<'tcx> {
    types: Vec<&'tcx Type<'tcx>>,
    rows: Vec<Row<'tcx>>,
}

impl<'tcx> Matrix<'tcx> {
    pub fn new(
        types: Vec<&'tcx Type<'tcx>>,
        rows: Vec<Row<'tcx>>,
    ) -> Result<Self, PatternError<'tcx>> {
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != types.len())
        {
            return Err(PatternError::RowLengthMismatch {
                row: i,
                expected: types.len(),
                actual: row.len(),
            });
        }
        Ok(Self { types, rows })
    }

    /// A matrix without rows.
    pub fn empty(types: Vec<&'tcx Type<'tcx>>) -> Self {
        Self { types, rows: vec![] }
    }

    /// `n` rows of zero columns.
    pub fn blank(n: usize) -> Self {
        Self {
            types: vec![],
            rows: vec![vec![]; n],
        }
    }

    pub fn types(&self) -> &[&'tcx Type<'tcx>] {
        &self.types
    }

    pub fn rows(&self) -> &[Row<'tcx>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row<'tcx>> {
        self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.types.len()
    }

    /// Rows in `range`. Negative bounds count from the end.
    pub fn slice_rows(&self, range: impl RangeBounds<isize>) -> Self {
        let range = resolve_range(&range, self.rows.len());
        Self {
            types: self.types.clone(),
            rows: self.rows[range].to_vec(),
        }
    }

    /// Columns in `range`. Negative bounds count from the end.
    pub fn slice_cols(&self, range: impl RangeBounds<isize>) -> Self {
        let range = resolve_range(&range, self.types.len());
        Self {
            types: self.types[range.clone()].to_vec(),
            rows: self
                .rows
                .iter()
                .map(|row| row[range.clone()].to_vec())
                .collect(),
        }
    }

    /// The single column `col`.
    pub fn reduce(&self, col: usize) -> Result<Self, PatternError<'tcx>> {
        self.check_column(col)?;
        Ok(Self {
            types: vec![self.types[col]],
            rows: self.rows.iter().map(|row| vec![row[col].clone()]).collect(),
        })
    }

    /// Every column but `col`.
    pub fn erase(&self, col: usize) -> Result<Self, PatternError<'tcx>> {
        self.check_column(col)?;
        Ok(Self {
            types: erase_at(&self.types, col),
            rows: self.rows.iter().map(|row| erase_at(row, col)).collect(),
        })
    }

    /// Appends the columns of `other`. A matrix without rows is an identity
    /// for this operation.
    pub fn concat(&self, other: &Self) -> Result<Self, PatternError<'tcx>> {
        if self.rows.len() != other.rows.len() {
            return if other.is_empty() {
                Ok(self.clone())
            } else if self.is_empty() {
                Ok(other.clone())
            } else {
                Err(PatternError::RowCountMismatch {
                    left: self.rows.len(),
                    right: other.rows.len(),
                })
            };
        }

        Ok(Self {
            types: self.types.iter().chain(&other.types).copied().collect(),
            rows: self
                .rows
                .iter()
                .zip(&other.rows)
                .map(|(left, right)| left.iter().chain(right).cloned().collect())
                .collect(),
        })
    }

    /// Prepends the columns of `other`.
    pub fn shift(&self, other: &Self) -> Result<Self, PatternError<'tcx>> {
        other.concat(self)
    }

    /// Appends one row.
    pub fn with_row(&self, row: Row<'tcx>) -> Result<Self, PatternError<'tcx>> {
        if row.len() != self.types.len() {
            return Err(PatternError::RowLengthMismatch {
                row: self.rows.len(),
                expected: self.types.len(),
                actual: row.len(),
            });
        }
        let mut matrix = self.clone();
        matrix.rows.push(row);
        Ok(matrix)
    }

    /// Constructors appearing at the root of the first column.
    pub fn root_constructors(&self) -> TypeSet<'tcx, 'tcx> {
        let mut constructors = OrderedSet::new();
        for row in &self.rows {
            // Rows without columns constrain nothing.
            if let Some(head) = row.first() {
                constructors.add_set(head.constructors());
            }
        }
        constructors
    }

    /// Index of the first row matching `values`, one value per column.
    pub fn first_match(
        &self,
        values: &[Value<'tcx>],
    ) -> Result<Option<usize>, PatternError<'tcx>> {
        if values.len() != self.types.len() {
            return Err(PatternError::RowLengthMismatch {
                row: self.rows.len(),
                expected: self.types.len(),
                actual: values.len(),
            });
        }

        'rows: for (i, row) in self.rows.iter().enumerate() {
            for ((ty, pat), value) in self.types.iter().copied().zip(row).zip(values) {
                if !instance(ty, pat, value)? {
                    continue 'rows;
                }
            }
            return Ok(Some(i));
        }
        Ok(None)
    }

    fn check_column(&self, col: usize) -> Result<(), PatternError<'tcx>> {
        if col < self.types.len() {
            Ok(())
        } else {
            Err(PatternError::ColumnOutOfRange {
                column: col,
                columns: self.types.len(),
            })
        }
    }
}

fn erase_at<T: Clone>(items: &[T], index: usize) -> Vec<T> {
    items[..index].iter().chain(&items[index + 1..]).cloned().collect()
}

fn resolve_index(index: isize, len: usize) -> usize {
    if index < 0 {
        len.saturating_sub(index.unsigned_abs())
    } else {
        index.unsigned_abs().min(len)
    }
}

fn resolve_range(range: &impl RangeBounds<isize>, len: usize) -> Range<usize> {
    let start = match range.start_bound() {
        Bound::Included(&i) => resolve_index(i, len),
        Bound::Excluded(&i) => (resolve_index(i, len) + 1).min(len),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&i) if i < 0 && i.unsigned_abs() > len => 0,
        Bound::Included(&i) => (resolve_index(i, len) + 1).min(len),
        Bound::Excluded(&i) => resolve_index(i, len),
        Bound::Unbounded => len,
    };
    start..end.max(start)
}

/// Pretty-printer for matrices of patterns, example:
///
/// ```text
/// + Nil        + _   +
/// + _          + Nil +
/// + Cons(_, _) + _   +
/// ```
impl fmt::Display for Matrix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Matrix { rows: m, .. } = self;
        let pretty_printed_matrix: Vec<Vec<String>> = m
            .iter()
            .map(|row| row.iter().map(|pat| pat.to_string()).collect())
            .collect();

        let column_count = self.column_count();
        let column_widths: Vec<usize> = (0..column_count)
            .map(|col| {
                pretty_printed_matrix
                    .iter()
                    .map(|row| row[col].len())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        for row in pretty_printed_matrix {
            write!(f, "+")?;
            for (column, pat_str) in row.into_iter().enumerate() {
                write!(f, " ")?;
                write!(f, "{:1$}", pat_str, column_widths[column])?;
                write!(f, " +")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Matrix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ListTypes;
    use crate::ty::TypeContext;
    use typed_arena::Arena;

    #[test]
    fn rows_must_match_the_type_vector() {
        let arena = Arena::new();
        let t = ListTypes::new(TypeContext::new(&arena));

        let err = Matrix::new(
            vec![t.list, t.list],
            vec![
                vec![t.nil_pat(), Pattern::Wildcard],
                vec![t.nil_pat()],
            ],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PatternError::RowLengthMismatch {
                row: 1,
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn slice_rows_counts_negative_bounds_from_the_end() {
        let arena = Arena::new();
        let t = ListTypes::new(TypeContext::new(&arena));
        let q = t.q();

        assert_eq!(q.slice_rows(..-1).len(), 5);
        assert_eq!(q.slice_rows(..-2).rows(), &q.rows()[..4]);
        assert_eq!(q.slice_rows(-2..).rows(), &q.rows()[4..]);
        assert_eq!(q.slice_rows(1..3).rows(), &q.rows()[1..3]);
        assert_eq!(q.slice_rows(..=-1).len(), 6);
        assert!(q.slice_rows(4..2).is_empty());
        assert!(q.slice_rows(..-10).is_empty());
        assert_eq!(q.slice_rows(..100).len(), 6);
    }

    #[test]
    fn column_algebra() {
        let arena = Arena::new();
        let t = ListTypes::new(TypeContext::new(&arena));
        let w = Pattern::Wildcard;
        let m = Matrix::new(
            vec![t.list, t.int, t.list],
            vec![
                vec![t.nil_pat(), w.clone(), t.one_pat()],
                vec![w.clone(), t.int_pat(), t.cons_pat()],
            ],
        )
        .unwrap();

        let reduced = m.reduce(1).unwrap();
        assert_eq!(reduced.types(), &[t.int]);
        assert_eq!(reduced.rows(), &[vec![w.clone()], vec![t.int_pat()]]);

        let erased = m.erase(1).unwrap();
        assert_eq!(erased.types(), &[t.list, t.list]);
        assert_eq!(erased.rows()[1], vec![w.clone(), t.cons_pat()]);

        let shifted = erased.shift(&reduced).unwrap();
        assert_eq!(shifted.types(), &[t.int, t.list, t.list]);
        assert_eq!(shifted.rows()[0], vec![w.clone(), t.nil_pat(), t.one_pat()]);
        assert_eq!(m.slice_cols(..1).concat(&m.slice_cols(1..)).unwrap(), m);
        assert_eq!(m.slice_cols(-1..).rows()[0], vec![t.one_pat()]);

        assert!(matches!(
            m.reduce(3),
            Err(PatternError::ColumnOutOfRange { column: 3, columns: 3 })
        ));
    }

    #[test]
    fn concat_treats_rowless_operands_as_identity() {
        let arena = Arena::new();
        let t = ListTypes::new(TypeContext::new(&arena));
        let q = t.q();

        assert_eq!(q.concat(&Matrix::empty(vec![])).unwrap(), q);
        assert_eq!(Matrix::empty(vec![]).concat(&q).unwrap(), q);
        assert_eq!(q.concat(&Matrix::blank(6)).unwrap(), q);
        assert!(matches!(
            q.concat(&Matrix::blank(2)),
            Err(PatternError::RowCountMismatch { left: 6, right: 2 })
        ));
    }

    #[test]
    fn with_row_appends() {
        let arena = Arena::new();
        let t = ListTypes::new(TypeContext::new(&arena));
        let p = t.p();

        let extended = p.with_row(Pattern::wildcards(2)).unwrap();
        assert_eq!(extended.len(), 3);
        assert_eq!(extended.rows()[2], Pattern::wildcards(2));
        assert_eq!(p.len(), 2);
        assert!(p.with_row(vec![]).is_err());
    }

    #[test]
    fn root_constructors_skip_wildcards_and_empty_rows() {
        let arena = Arena::new();
        let t = ListTypes::new(TypeContext::new(&arena));

        assert_eq!(t.q().root_constructors(), t.list.signature());
        assert_eq!(t.p().root_constructors(), [t.nil].into_iter().collect());
        assert!(Matrix::blank(3).root_constructors().is_empty());
    }

    #[test]
    fn first_match_respects_row_order() {
        let arena = Arena::new();
        let t = ListTypes::new(TypeContext::new(&arena));
        let zero = Value::new(t.int, vec![]).unwrap();
        let nil = Value::new(t.nil, vec![]).unwrap();
        let one = Value::new(t.one, vec![zero]).unwrap();

        let q = t.q();
        assert_eq!(q.first_match(&[nil.clone(), nil.clone()]).unwrap(), Some(0));
        assert_eq!(q.first_match(&[one.clone(), nil]).unwrap(), Some(1));
        assert_eq!(q.first_match(&[one.clone(), one.clone()]).unwrap(), Some(2));
        assert_eq!(t.p().first_match(&[one.clone(), one]).unwrap(), None);
    }

    #[test]
    fn display_aligns_columns() {
        let arena = Arena::new();
        let t = ListTypes::new(TypeContext::new(&arena));

        assert_eq!(t.p().to_string(), "+ Nil + _   +\n+ _   + Nil +\n");
    }
}
