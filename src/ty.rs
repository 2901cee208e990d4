use crate::sem::error::PatternError;
use crate::set::OrderedSet;
use std::cell::OnceCell;
use std::fmt;
use typed_arena::Arena;

/// Constructor signatures and other collections of types.
pub type TypeSet<'a, 'tcx> = OrderedSet<&'a Type<'tcx>>;

#[derive(Clone, Copy)]
pub struct TypeContext<'tcx> {
    pub type_arena: &'tcx Arena<Type<'tcx>>,
}

impl<'tcx> TypeContext<'tcx> {
    pub fn new(type_arena: &'tcx Arena<Type<'tcx>>) -> Self {
        Self { type_arena }
    }

    /// Every allocation takes one arena slot, so the slot count before
    /// allocating is a fresh identity.
    fn symbol(&self, name: &str) -> Symbol {
        Symbol::new(self.type_arena.len(), name)
    }

    /// Returns an opaque type such as `int`. Its only constructor is itself.
    pub fn leaf(&self, name: &str) -> &'tcx Type<'tcx> {
        let symbol = self.symbol(name);
        self.type_arena.alloc(Type::Leaf(symbol))
    }

    pub fn constructor(&self, name: &str, terms: &[&'tcx Type<'tcx>]) -> &'tcx Type<'tcx> {
        let symbol = self.symbol(name);
        self.type_arena
            .alloc(Type::Constructor(ConstructorTy::new(symbol, terms.to_vec())))
    }

    /// Builds a sum type whose terms may refer back to the sum itself.
    ///
    /// The sum is allocated first with no terms and handed to `build`, which
    /// returns the terms. They are sealed into the sum afterwards:
    ///
    /// ```
    /// # use patcheck::ty::TypeContext;
    /// # use typed_arena::Arena;
    /// let arena = Arena::new();
    /// let tcx = TypeContext::new(&arena);
    /// let int = tcx.leaf("int");
    /// let list = tcx
    ///     .sum("list", |list| {
    ///         vec![
    ///             tcx.constructor("Nil", &[]),
    ///             tcx.constructor("Cons", &[int, list]),
    ///         ]
    ///     })
    ///     .unwrap();
    /// assert_eq!(list.to_string(), "Nil | Cons(int, list)");
    /// ```
    pub fn sum<F>(&self, name: &str, build: F) -> Result<&'tcx Type<'tcx>, PatternError<'tcx>>
    where
        F: FnOnce(&'tcx Type<'tcx>) -> Vec<&'tcx Type<'tcx>>,
    {
        let symbol = self.symbol(name);
        let sum_ty: &'tcx Type<'tcx> = self.type_arena.alloc(Type::Sum(SumTy::new(symbol)));
        let terms = build(sum_ty);

        if terms.len() < 2 {
            return Err(PatternError::TooFewTerms {
                name: name.to_string(),
                actual: terms.len(),
            });
        }
        if let Some(&term) = terms
            .iter()
            .find(|term| matches!(term, Type::Leaf(_)) || term.symbol() == sum_ty.symbol())
        {
            return Err(PatternError::InvalidSumTerm {
                name: name.to_string(),
                ty: term,
            });
        }

        if let Type::Sum(sum) = sum_ty {
            sum.seal(terms);
        }
        Ok(sum_ty)
    }
}

/// The nominal identity of a type. Two symbols are equal iff they were
/// created by the same allocation.
#[derive(Debug, Clone, Eq)]
pub struct Symbol {
    id: usize,
    name: String,
}

impl Symbol {
    fn new(id: usize, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug)]
pub enum Type<'tcx> {
    /// Opaque type without visible structure, e.g. `int`.
    Leaf(Symbol),
    /// A named constructor applied to argument types.
    Constructor(ConstructorTy<'tcx>),
    /// A choice among constructors and nested sums.
    Sum(SumTy<'tcx>),
}

impl<'tcx> Type<'tcx> {
    pub fn symbol(&self) -> &Symbol {
        match self {
            Type::Leaf(symbol) => symbol,
            Type::Constructor(ctor) => &ctor.symbol,
            Type::Sum(sum) => &sum.symbol,
        }
    }

    pub fn name(&self) -> &str {
        self.symbol().name()
    }

    /// Number of arguments when this type is used as a constructor. A sum
    /// type cannot be used as one.
    pub fn arity(&self) -> Option<usize> {
        match self {
            Type::Leaf(_) => Some(0),
            Type::Constructor(ctor) => Some(ctor.terms.len()),
            Type::Sum(_) => None,
        }
    }

    /// Argument types of a constructor, or the terms of a sum.
    pub fn terms(&self) -> &[&'tcx Type<'tcx>] {
        match self {
            Type::Leaf(_) => &[],
            Type::Constructor(ctor) => &ctor.terms,
            Type::Sum(sum) => sum.terms(),
        }
    }

    pub fn is_sum(&self) -> bool {
        matches!(self, Type::Sum(_))
    }

    /// Every constructor that can build a value of this type, nested sums
    /// flattened, in declaration order.
    pub fn signature(&self) -> TypeSet<'_, 'tcx> {
        let mut signature = OrderedSet::new();
        let mut visited = vec![];
        let mut pending: Vec<&Type<'tcx>> = vec![self];

        while let Some(ty) = pending.pop() {
            match ty {
                Type::Sum(sum) => {
                    if visited.contains(&sum.symbol.id) {
                        continue;
                    }
                    visited.push(sum.symbol.id);
                    for term in sum.terms().iter().rev() {
                        pending.push(*term);
                    }
                }
                Type::Leaf(_) | Type::Constructor(_) => {
                    signature.add(ty);
                }
            }
        }
        signature
    }

    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>, seen: &mut Vec<usize>) -> fmt::Result {
        match self {
            Type::Leaf(symbol) => write!(f, "{}", symbol),
            Type::Constructor(ctor) => {
                write!(f, "{}", ctor.symbol)?;
                if !ctor.terms.is_empty() {
                    write!(f, "(")?;
                    for (i, term) in ctor.terms.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        term.fmt_nested(f, seen)?;
                    }
                    write!(f, ")")?;
                }
                Ok(())
            }
            Type::Sum(sum) => {
                // A sum reached again while rendering itself is only named.
                if seen.contains(&sum.symbol.id) {
                    return write!(f, "{}", sum.symbol);
                }
                seen.push(sum.symbol.id);
                for (i, term) in sum.terms().iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    term.fmt_nested(f, seen)?;
                }
                seen.pop();
                Ok(())
            }
        }
    }
}

impl PartialEq for Type<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Type::Sum(_), Type::Sum(_)) => {
                self.symbol() == other.symbol() && self.signature() == other.signature()
            }
            _ => self.symbol() == other.symbol(),
        }
    }
}

impl fmt::Display for Type<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_nested(f, &mut vec![])
    }
}

#[derive(Debug)]
pub struct ConstructorTy<'tcx> {
    symbol: Symbol,
    terms: Vec<&'tcx Type<'tcx>>,
}

impl<'tcx> ConstructorTy<'tcx> {
    fn new(symbol: Symbol, terms: Vec<&'tcx Type<'tcx>>) -> Self {
        Self { symbol, terms }
    }
}

pub struct SumTy<'tcx> {
    symbol: Symbol,
    terms: OnceCell<Vec<&'tcx Type<'tcx>>>,
}

impl<'tcx> SumTy<'tcx> {
    fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            terms: OnceCell::new(),
        }
    }

    /// Terms of the sum. Empty while the sum is still being built.
    pub fn terms(&self) -> &[&'tcx Type<'tcx>] {
        self.terms.get().map_or(&[], Vec::as_slice)
    }

    fn seal(&self, terms: Vec<&'tcx Type<'tcx>>) {
        // `TypeContext::sum` seals each sum exactly once.
        let _ = self.terms.set(terms);
    }
}

// Terms may point back to this sum, so only their names are printed.
impl fmt::Debug for SumTy<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SumTy")
            .field("symbol", &self.symbol)
            .field(
                "terms",
                &self.terms().iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ListTypes;

    #[test]
    fn constructor_equality_is_nominal() {
        let arena = Arena::new();
        let tcx = TypeContext::new(&arena);
        let t = ListTypes::new(tcx);

        assert_eq!(t.nil, t.nil);
        assert_ne!(t.nil, t.one);

        // Same name, different allocation.
        let other_nil = tcx.constructor("Nil", &[]);
        assert_ne!(t.nil, other_nil);
    }

    #[test]
    fn signature_flattens_nested_sums() {
        let arena = Arena::new();
        let t = ListTypes::new(TypeContext::new(&arena));

        let names = t.list.signature().iter().map(|ty| ty.name()).collect::<Vec<_>>();
        assert_eq!(names, vec!["Nil", "One", "Cons"]);
        assert!(t.list.signature().iter().all(|ty| !ty.is_sum()));
    }

    #[test]
    fn signature_equality_ignores_order_and_duplicates() {
        let arena = Arena::new();
        let t = ListTypes::new(TypeContext::new(&arena));

        let sig = t.list.signature();
        assert_eq!(sig, [t.one, t.cons, t.nil].into_iter().collect());
        assert_eq!(sig, [t.nil, t.one, t.cons, t.nil].into_iter().collect());
        assert_ne!(sig, [t.one, t.cons].into_iter().collect());
        assert_ne!(sig, [t.nil, t.one, t.cons, t.list].into_iter().collect());
    }

    #[test]
    fn leaf_signature_is_itself() {
        let arena = Arena::new();
        let t = ListTypes::new(TypeContext::new(&arena));

        assert_eq!(t.int.signature(), [t.int].into_iter().collect());
        assert_eq!(t.int.arity(), Some(0));
        assert_eq!(t.cons.arity(), Some(2));
        assert_eq!(t.list.arity(), None);
    }

    #[test]
    fn display_names_recursive_occurrences() {
        let arena = Arena::new();
        let t = ListTypes::new(TypeContext::new(&arena));

        assert_eq!(t.list.to_string(), "Nil | One(int) | Cons(int, list)");
        assert_eq!(t.cons.to_string(), "Cons(int, Nil | One(int) | Cons(int, list))");
        assert_eq!(t.int.to_string(), "int");
    }

    #[test]
    fn sum_rejects_too_few_terms() {
        let arena = Arena::new();
        let tcx = TypeContext::new(&arena);

        let err = tcx
            .sum("unit", |_| vec![tcx.constructor("Unit", &[])])
            .unwrap_err();
        assert!(matches!(err, PatternError::TooFewTerms { actual: 1, .. }));
    }

    #[test]
    fn sum_rejects_itself_and_leaves_as_terms() {
        let arena = Arena::new();
        let tcx = TypeContext::new(&arena);
        let int = tcx.leaf("int");

        let err = tcx
            .sum("weird", |weird| vec![weird, tcx.constructor("A", &[])])
            .unwrap_err();
        assert!(matches!(err, PatternError::InvalidSumTerm { .. }));

        let err = tcx
            .sum("weird", |_| vec![int, tcx.constructor("A", &[])])
            .unwrap_err();
        assert!(matches!(err, PatternError::InvalidSumTerm { .. }));
    }
}
