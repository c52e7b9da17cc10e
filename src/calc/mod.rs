//! Calculator Module
//!
//! Closed-form annuity mortgage calculation.

use std::sync::Arc;

use chrono::{DateTime, Months};
use thiserror::Error;
use tracing::{info, warn};

use crate::cache::{Clock, SystemClock};
use crate::models::{CalcAggregates, CalcParams, CalcProgram};

/// Smallest accepted initial payment as a share of the object cost.
pub const MIN_INITIAL_PAYMENT_RATIO: f64 = 0.2;

const SALARY_RATE_PERCENT: i64 = 8;
const MILITARY_RATE_PERCENT: i64 = 9;
const BASE_RATE_PERCENT: i64 = 10;

// == Calc Error ==
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error("the initial payment should be more")]
    InsufficientInitialPayment,

    #[error("exactly one program must be selected")]
    InvalidProgram,

    #[error("object cost must be positive")]
    InvalidObjectCost,

    #[error("loan term of {0} months is out of range")]
    TermOutOfRange(i64),
}

// == Calculator Trait ==
/// Computes aggregates for a set of parameters under a program.
pub trait Calculator: Send + Sync {
    fn calculate(
        &self,
        params: CalcParams,
        program: CalcProgram,
    ) -> Result<CalcAggregates, CalcError>;
}

/// Annual rate in percent for the selected program.
pub fn annual_rate_percent(program: CalcProgram) -> Result<i64, CalcError> {
    if program.selected_count() != 1 {
        return Err(CalcError::InvalidProgram);
    }

    Ok(if program.salary {
        SALARY_RATE_PERCENT
    } else if program.military {
        MILITARY_RATE_PERCENT
    } else {
        BASE_RATE_PERCENT
    })
}

// == Mortgage Calculator ==
/// Annuity calculator. The clock dates the last payment.
#[derive(Debug, Clone)]
pub struct MortgageCalculator {
    clock: Arc<dyn Clock>,
}

impl MortgageCalculator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl Default for MortgageCalculator {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl Calculator for MortgageCalculator {
    fn calculate(
        &self,
        params: CalcParams,
        program: CalcProgram,
    ) -> Result<CalcAggregates, CalcError> {
        if params.object_cost <= 0 {
            return Err(CalcError::InvalidObjectCost);
        }

        if (params.initial_payment as f64) / (params.object_cost as f64)
            < MIN_INITIAL_PAYMENT_RATIO
        {
            warn!(
                initial_payment = params.initial_payment,
                object_cost = params.object_cost,
                "insufficient initial payment"
            );
            return Err(CalcError::InsufficientInitialPayment);
        }

        let term = u32::try_from(params.months)
            .ok()
            .filter(|months| *months > 0)
            .ok_or(CalcError::TermOutOfRange(params.months))?;
        let last_payment_date = DateTime::from_timestamp(self.clock.now(), 0)
            .and_then(|now| now.date_naive().checked_add_months(Months::new(term)))
            .ok_or(CalcError::TermOutOfRange(params.months))?;

        let rate = annual_rate_percent(program)?;
        let monthly_rate = rate as f64 / 100.0 / 12.0;
        let loan_sum = (params.object_cost - params.initial_payment) as f64;
        let periods = params.months as f64;

        let total_rate = (1.0 + monthly_rate).powf(periods);
        let monthly_payment =
            (loan_sum * monthly_rate * total_rate / (total_rate - 1.0)).ceil();
        if !monthly_payment.is_finite() {
            warn!(months = params.months, "term overflows the annuity factor");
            return Err(CalcError::TermOutOfRange(params.months));
        }
        let overpayment = monthly_payment * periods - loan_sum;

        info!(
            rate,
            loan_sum,
            monthly_payment,
            overpayment,
            "aggregates calculated"
        );

        Ok(CalcAggregates {
            last_payment_date: last_payment_date.format("%Y-%m-%d").to_string(),
            rate,
            loan_sum: loan_sum as i64,
            monthly_payment: monthly_payment as i64,
            overpayment: overpayment as i64,
        })
    }
}
