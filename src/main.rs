use patcheck::matrix::Matrix;
use patcheck::pattern::Pattern;
use patcheck::sem::{self, PatternError};
use patcheck::ty::{Type, TypeContext};
use std::env;
use std::io;
use tracing::info;
use tracing_subscriber::EnvFilter;
use typed_arena::Arena;

const MATRICES: [&str; 4] = ["p", "q", "q-prime", "q-redundant"];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    // Check every matrix unless one is named by the positional argument.
    let names = match env::args().nth(1) {
        None => MATRICES.to_vec(),
        Some(name) => match MATRICES.iter().find(|known| **known == name) {
            Some(known) => vec![*known],
            None => {
                eprintln!(
                    "Unknown matrix `{}`, expected one of: {}",
                    name,
                    MATRICES.join(", ")
                );
                std::process::exit(exitcode::USAGE);
            }
        },
    };

    let type_arena = Arena::new();
    let tcx = TypeContext::new(&type_arena);

    if let Err(err) = run(tcx, &names) {
        eprintln!("Error: {}", err);
        std::process::exit(exitcode::SOFTWARE);
    }
}

fn run<'tcx>(tcx: TypeContext<'tcx>, names: &[&str]) -> Result<(), PatternError<'tcx>> {
    let list = list_type(tcx)?;
    println!("list = {}", list);

    let pats = ListPatterns::new(list)?;
    for &name in names {
        let matrix = pats.matrix(name)?;
        info!(matrix = name, rows = matrix.len(), "checking");

        println!("\n{}:", name);
        print!("{}", matrix);

        let report = sem::compute_match_usefulness(&matrix)?;
        println!("exhaustive: {}", report.is_exhaustive());
        if let Some(row) = sem::useless_clause(&matrix)? {
            println!("first useless row: {}", row);
        }
        for warning in report.warnings() {
            println!("warning: {}", warning);
        }
    }
    Ok(())
}

/// `list = Nil | list2` where `list2 = One(int) | Cons(int, list)`.
fn list_type<'tcx>(tcx: TypeContext<'tcx>) -> Result<&'tcx Type<'tcx>, PatternError<'tcx>> {
    let int = tcx.leaf("int");
    let mut list2: Result<Option<&'tcx Type<'tcx>>, PatternError<'tcx>> = Ok(None);

    let list = tcx.sum("list", |list| {
        let nil = tcx.constructor("Nil", &[]);
        list2 = tcx
            .sum("list2", |_| {
                vec![
                    tcx.constructor("One", &[int]),
                    tcx.constructor("Cons", &[int, list]),
                ]
            })
            .map(Some);
        match &list2 {
            Ok(Some(list2)) => vec![nil, *list2],
            _ => vec![nil],
        }
    });

    list2?;
    list
}

struct ListPatterns<'tcx> {
    list: &'tcx Type<'tcx>,
    nil: Pattern<'tcx>,
    one: Pattern<'tcx>,
    cons: Pattern<'tcx>,
}

impl<'tcx> ListPatterns<'tcx> {
    fn new(list: &'tcx Type<'tcx>) -> Result<Self, PatternError<'tcx>> {
        let &[nil, one, cons] = list.signature().as_slice() else {
            return Err(PatternError::InvariantViolation(format!(
                "unexpected signature of `{}`",
                list
            )));
        };

        Ok(Self {
            list,
            nil: Pattern::constructed_wild(nil)?,
            one: Pattern::constructed_wild(one)?,
            cons: Pattern::constructed_wild(cons)?,
        })
    }

    fn matrix(&self, name: &str) -> Result<Matrix<'tcx>, PatternError<'tcx>> {
        let w = Pattern::Wildcard;
        let rows = match name {
            "p" => vec![vec![self.nil.clone(), w.clone()], vec![w, self.nil.clone()]],
            "q" | "q-redundant" => vec![
                vec![self.nil.clone(), w.clone()],
                vec![w.clone(), self.nil.clone()],
                vec![self.one.clone(), w.clone()],
                vec![w.clone(), self.one.clone()],
                vec![self.cons.clone(), w.clone()],
                vec![w, self.cons.clone()],
            ],
            "q-prime" => {
                let nil_or_one = Pattern::or(vec![self.nil.clone(), self.one.clone()])?;
                vec![
                    vec![nil_or_one.clone(), w.clone()],
                    vec![w.clone(), nil_or_one],
                    vec![self.one.clone(), w.clone()],
                    vec![w.clone(), self.one.clone()],
                    vec![self.cons.clone(), w.clone()],
                    vec![w, self.cons.clone()],
                ]
            }
            _ => {
                return Err(PatternError::InvariantViolation(format!(
                    "unknown matrix `{}`",
                    name
                )))
            }
        };

        let matrix = Matrix::new(vec![self.list; 2], rows)?;
        if name == "q-redundant" {
            matrix.with_row(Pattern::wildcards(2))
        } else {
            Ok(matrix)
        }
    }
}
