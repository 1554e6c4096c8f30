//! Tie-breaking between equally scored candidates.
//!
//! Ties are resolved once per run into a rank per employee; lower rank
//! wins. The default is deterministic (employee id order). Shuffled orders
//! are available only through the explicit `Seeded` and `Random` variants.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::models::Employee;

/// Employee comparator for [`TieBreaker::Custom`].
pub type EmployeeComparator = Arc<dyn Fn(&Employee, &Employee) -> Ordering + Send + Sync>;

/// How ties between equally scored candidates are broken.
#[derive(Clone, Default)]
pub enum TieBreaker {
    /// Stable order by employee id (default).
    #[default]
    ById,
    /// Reproducible shuffle from a seed.
    Seeded(u64),
    /// Fresh shuffle from the thread RNG on every run.
    Random,
    /// Caller-supplied ordering; equal elements keep id order.
    Custom(EmployeeComparator),
}

impl TieBreaker {
    /// Wraps a comparator.
    pub fn custom<F>(cmp: F) -> Self
    where
        F: Fn(&Employee, &Employee) -> Ordering + Send + Sync + 'static,
    {
        TieBreaker::Custom(Arc::new(cmp))
    }

    /// Rank of every employee (0 = wins all ties).
    pub fn ranks(&self, employees: &[Employee]) -> HashMap<String, usize> {
        let mut order: Vec<&Employee> = employees.iter().collect();
        order.sort_by(|a, b| a.id.cmp(&b.id));

        match self {
            TieBreaker::ById => {}
            TieBreaker::Seeded(seed) => {
                let mut rng = StdRng::seed_from_u64(*seed);
                order.shuffle(&mut rng);
            }
            TieBreaker::Random => order.shuffle(&mut rand::rng()),
            TieBreaker::Custom(cmp) => order.sort_by(|a, b| cmp(a, b)),
        }

        order
            .into_iter()
            .enumerate()
            .map(|(rank, e)| (e.id.clone(), rank))
            .collect()
    }
}

impl fmt::Debug for TieBreaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TieBreaker::ById => write!(f, "ById"),
            TieBreaker::Seeded(seed) => write!(f, "Seeded({seed})"),
            TieBreaker::Random => write!(f, "Random"),
            TieBreaker::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}
