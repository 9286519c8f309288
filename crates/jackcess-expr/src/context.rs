use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::value::Value;

/// First-day-of-week / first-week-of-year conventions (`DatePart`,
/// `WeekdayName`, …) plus the locale's date/time pattern set.
#[derive(Debug, Clone)]
pub struct TemporalConfig {
    /// 1 (Sunday) .. 7 (Saturday); Sunday is the Access default.
    pub first_day_of_week: u8,
    /// 1 = simple, 2 = first-four-day, 3 = first-full-week.
    pub first_week_of_year: u8,
    pub short_date_pattern: String,
    pub long_date_pattern: String,
    pub short_time_pattern: String,
    pub long_time_pattern: String,
}

impl Default for TemporalConfig {
    fn default() -> Self {
        TemporalConfig {
            first_day_of_week: 1,
            first_week_of_year: 1,
            short_date_pattern: "M/d/yyyy".to_string(),
            long_date_pattern: "dddd, MMMM d, yyyy".to_string(),
            short_time_pattern: "H:mm".to_string(),
            long_time_pattern: "h:mm:ss tt".to_string(),
        }
    }
}

/// Deterministic when seeded (`Rnd(seed)`); falls back to OS entropy
/// otherwise.
pub struct RandomProvider {
    rng: StdRng,
}

impl RandomProvider {
    pub fn from_seed(seed: u64) -> Self {
        RandomProvider {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        RandomProvider {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn next_unit_f64(&mut self) -> f64 {
        self.rng.random_range(0.0..1.0)
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

/// What an evaluating [`crate::ast::Expression`] needs from its host
///. Implementations are borrowed for the duration of a single
/// `eval` call; they are not required to be reentrant.
pub trait EvalContext {
    fn temporal_config(&self) -> &TemporalConfig;

    fn random(&mut self) -> &mut RandomProvider;

    /// The value bound to a bare column reference in a field-validator
    /// context.
    fn this_column_value(&self) -> Option<&Value>;

    /// `(collectionName, objectName, columnName) -> Value`, e.g. resolving
    /// `[Orders].[Total]` from a related row. Returns `None` when the host
    /// has no such row-lookup facility.
    fn lookup_value(&self, collection: Option<&str>, object: Option<&str>, column: &str) -> Option<Value>;
}

/// A minimal, self-contained [`EvalContext`] useful for tests and for
/// evaluating expressions with no row-lookup dependency.
pub struct SimpleContext {
    pub temporal: TemporalConfig,
    pub random: RandomProvider,
    pub this_column: Option<Value>,
}

impl Default for SimpleContext {
    fn default() -> Self {
        SimpleContext {
            temporal: TemporalConfig::default(),
            random: RandomProvider::from_entropy(),
            this_column: None,
        }
    }
}

impl EvalContext for SimpleContext {
    fn temporal_config(&self) -> &TemporalConfig {
        &self.temporal
    }

    fn random(&mut self) -> &mut RandomProvider {
        &mut self.random
    }

    fn this_column_value(&self) -> Option<&Value> {
        self.this_column.as_ref()
    }

    fn lookup_value(&self, _collection: Option<&str>, _object: Option<&str>, _column: &str) -> Option<Value> {
        None
    }
}
