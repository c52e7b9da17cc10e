//! Calculation domain types shared by the calculator, the cache and the API.

use serde::{Deserialize, Serialize};

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// Numeric inputs of a mortgage calculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalcParams {
    pub object_cost: i64,
    pub initial_payment: i64,
    pub months: i64,
}

/// Mortgage program selector. Exactly one flag must be set on a valid request.
///
/// Unset flags are omitted when serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalcProgram {
    #[serde(default, skip_serializing_if = "is_false")]
    pub salary: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub military: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub base: bool,
}

impl CalcProgram {
    pub fn salary() -> Self {
        Self {
            salary: true,
            ..Self::default()
        }
    }

    pub fn military() -> Self {
        Self {
            military: true,
            ..Self::default()
        }
    }

    pub fn base() -> Self {
        Self {
            base: true,
            ..Self::default()
        }
    }

    /// Number of programs switched on.
    pub fn selected_count(&self) -> usize {
        [self.salary, self.military, self.base]
            .into_iter()
            .filter(|flag| *flag)
            .count()
    }
}

/// Computed mortgage figures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalcAggregates {
    /// `YYYY-MM-DD`
    pub last_payment_date: String,
    /// Annual rate in percent
    pub rate: i64,
    pub loan_sum: i64,
    pub monthly_payment: i64,
    pub overpayment: i64,
}
