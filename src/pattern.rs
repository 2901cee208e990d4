use crate::sem::error::PatternError;
use crate::set::OrderedSet;
use crate::ty::{Type, TypeSet};
use itertools::Itertools;
use std::fmt;

/// Collections of sub-patterns, e.g. the dead alternatives of an or-pattern.
pub type PatternSet<'tcx> = OrderedSet<Pattern<'tcx>>;

#[derive(Clone, PartialEq)]
pub enum Pattern<'tcx> {
    /// `_`, matches any value.
    Wildcard,
    Constructed(ConstructedPattern<'tcx>),
    Or(OrPattern<'tcx>),
}

impl<'tcx> Pattern<'tcx> {
    pub fn wildcard() -> Self {
        Pattern::Wildcard
    }

    pub fn wildcards(n: usize) -> Vec<Self> {
        vec![Pattern::Wildcard; n]
    }

    /// `ctor(fields...)`. The number of fields must be the constructor's arity.
    pub fn constructed(
        ctor: &'tcx Type<'tcx>,
        fields: Vec<Pattern<'tcx>>,
    ) -> Result<Self, PatternError<'tcx>> {
        let expected = ctor.arity().ok_or(PatternError::NotAConstructor { ty: ctor })?;
        if expected != fields.len() {
            return Err(PatternError::ArityMismatch {
                ctor,
                expected,
                actual: fields.len(),
            });
        }
        Ok(Pattern::Constructed(ConstructedPattern { ctor, fields }))
    }

    /// `ctor(_, _, ...)`.
    pub fn constructed_wild(ctor: &'tcx Type<'tcx>) -> Result<Self, PatternError<'tcx>> {
        let arity = ctor.arity().ok_or(PatternError::NotAConstructor { ty: ctor })?;
        Self::constructed(ctor, Self::wildcards(arity))
    }

    /// `p1 | p2 | ...`. A single alternative is returned as is.
    pub fn or(mut alternatives: Vec<Pattern<'tcx>>) -> Result<Self, PatternError<'tcx>> {
        match alternatives.len() {
            0 => Err(PatternError::EmptyOrPattern),
            1 => Ok(alternatives.swap_remove(0)),
            _ => Ok(Pattern::Or(OrPattern { alternatives })),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Pattern::Wildcard)
    }

    /// Constructors this pattern forces at its root.
    pub fn constructors(&self) -> TypeSet<'tcx, 'tcx> {
        match self {
            Pattern::Wildcard => OrderedSet::new(),
            Pattern::Constructed(pat) => [pat.ctor].into_iter().collect(),
            Pattern::Or(pat) => {
                let mut constructors = OrderedSet::new();
                for alt in &pat.alternatives {
                    constructors.add_set(alt.constructors());
                }
                constructors
            }
        }
    }
}

impl fmt::Display for Pattern<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Wildcard => write!(f, "_"),
            Pattern::Constructed(pat) => pat.fmt(f),
            Pattern::Or(pat) => pat.fmt(f),
        }
    }
}

impl fmt::Debug for Pattern<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructedPattern<'tcx> {
    ctor: &'tcx Type<'tcx>,
    fields: Vec<Pattern<'tcx>>,
}

impl<'tcx> ConstructedPattern<'tcx> {
    pub fn ctor(&self) -> &'tcx Type<'tcx> {
        self.ctor
    }

    pub fn fields(&self) -> &[Pattern<'tcx>] {
        &self.fields
    }
}

impl fmt::Display for ConstructedPattern<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ctor.name())?;
        if !self.fields.is_empty() {
            write!(f, "({})", self.fields.iter().join(", "))?;
        }
        Ok(())
    }
}

/// Two or more alternatives, built through [`Pattern::or`].
#[derive(Debug, Clone, PartialEq)]
pub struct OrPattern<'tcx> {
    alternatives: Vec<Pattern<'tcx>>,
}

impl<'tcx> OrPattern<'tcx> {
    pub fn alternatives(&self) -> &[Pattern<'tcx>] {
        &self.alternatives
    }

    /// Views `p1 | p2 | ... | pn` as the pair `p1`, `p2 | ... | pn`.
    pub fn split_first(&self) -> Option<(&Pattern<'tcx>, Pattern<'tcx>)> {
        let (first, rest) = self.alternatives.split_first()?;
        let rest = match rest {
            [] => return None,
            [single] => single.clone(),
            _ => Pattern::Or(OrPattern {
                alternatives: rest.to_vec(),
            }),
        };
        Some((first, rest))
    }
}

impl fmt::Display for OrPattern<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.alternatives.iter().join(" | "))
    }
}
