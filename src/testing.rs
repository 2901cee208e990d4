//! The list type used throughout the tests:
//!
//! ```text
//! list = Nil | list2
//! list2 = One(int) | Cons(int, list)
//! ```
use crate::matrix::Matrix;
use crate::pattern::Pattern;
use crate::ty::{Type, TypeContext};

pub(crate) struct ListTypes<'tcx> {
    pub int: &'tcx Type<'tcx>,
    pub list: &'tcx Type<'tcx>,
    pub nil: &'tcx Type<'tcx>,
    pub one: &'tcx Type<'tcx>,
    pub cons: &'tcx Type<'tcx>,
}

impl<'tcx> ListTypes<'tcx> {
    pub fn new(tcx: TypeContext<'tcx>) -> Self {
        let int = tcx.leaf("int");
        let list = tcx
            .sum("list", |list| {
                vec![
                    tcx.constructor("Nil", &[]),
                    tcx.sum("list2", |_| {
                        vec![
                            tcx.constructor("One", &[int]),
                            tcx.constructor("Cons", &[int, list]),
                        ]
                    })
                    .unwrap(),
                ]
            })
            .unwrap();
        let nil = list.terms()[0];
        let one = list.terms()[1].terms()[0];
        let cons = list.terms()[1].terms()[1];

        Self {
            int,
            list,
            nil,
            one,
            cons,
        }
    }

    pub fn int_pat(&self) -> Pattern<'tcx> {
        Pattern::constructed(self.int, vec![]).unwrap()
    }

    pub fn nil_pat(&self) -> Pattern<'tcx> {
        Pattern::constructed(self.nil, vec![]).unwrap()
    }

    /// `One(_)`
    pub fn one_pat(&self) -> Pattern<'tcx> {
        Pattern::constructed_wild(self.one).unwrap()
    }

    /// `Cons(_, _)`
    pub fn cons_pat(&self) -> Pattern<'tcx> {
        Pattern::constructed_wild(self.cons).unwrap()
    }

    pub fn matrix(&self, rows: Vec<Vec<Pattern<'tcx>>>) -> Matrix<'tcx> {
        let columns = rows.first().map_or(0, Vec::len);
        Matrix::new(vec![self.list; columns], rows).unwrap()
    }

    /// `[[Nil, _], [_, Nil]]`
    pub fn p(&self) -> Matrix<'tcx> {
        let w = Pattern::Wildcard;
        self.matrix(vec![
            vec![self.nil_pat(), w.clone()],
            vec![w, self.nil_pat()],
        ])
    }

    /// Every constructor in either column: exhaustive and without redundancy.
    pub fn q(&self) -> Matrix<'tcx> {
        let w = Pattern::Wildcard;
        self.matrix(vec![
            vec![self.nil_pat(), w.clone()],
            vec![w.clone(), self.nil_pat()],
            vec![self.one_pat(), w.clone()],
            vec![w.clone(), self.one_pat()],
            vec![self.cons_pat(), w.clone()],
            vec![w, self.cons_pat()],
        ])
    }

    /// `q` with `Nil | One(_)` in the first two rows.
    pub fn q_prime(&self) -> Matrix<'tcx> {
        let w = Pattern::Wildcard;
        let nil_or_one = Pattern::or(vec![self.nil_pat(), self.one_pat()]).unwrap();
        self.matrix(vec![
            vec![nil_or_one.clone(), w.clone()],
            vec![w.clone(), nil_or_one],
            vec![self.one_pat(), w.clone()],
            vec![w.clone(), self.one_pat()],
            vec![self.cons_pat(), w.clone()],
            vec![w, self.cons_pat()],
        ])
    }
}
