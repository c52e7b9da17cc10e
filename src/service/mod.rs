//! Calculation Service
//!
//! Cache-aside orchestration: look in the repository, compute on a miss,
//! store the fresh result on a best-effort basis.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{CalcRepository, ListedResult};
use crate::calc::{CalcError, Calculator};
use crate::error::Result;
use crate::models::{CalcAggregates, CalculateRequest};

// == Calc Cache Trait ==
/// Result cache consulted by [`CalcService`].
pub trait CalcCache: Send + Sync {
    fn get(&self, request: &CalculateRequest) -> Option<CalcAggregates>;

    fn set(&self, request: &CalculateRequest, result: &CalcAggregates) -> Result<u64>;

    fn list(&self) -> Result<Vec<ListedResult<CalculateRequest, CalcAggregates>>>;
}

impl CalcCache for CalcRepository {
    fn get(&self, request: &CalculateRequest) -> Option<CalcAggregates> {
        CalcRepository::get(self, request)
    }

    fn set(&self, request: &CalculateRequest, result: &CalcAggregates) -> Result<u64> {
        CalcRepository::set(self, request, result)
    }

    fn list(&self) -> Result<Vec<ListedResult<CalculateRequest, CalcAggregates>>> {
        CalcRepository::list(self)
    }
}

// == Calc Service ==
pub struct CalcService<C = CalcRepository> {
    repository: Arc<C>,
    calculator: Arc<dyn Calculator>,
}

impl<C> Clone for CalcService<C> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            calculator: self.calculator.clone(),
        }
    }
}

impl<C: CalcCache> CalcService<C> {
    pub fn new(repository: Arc<C>, calculator: Arc<dyn Calculator>) -> Self {
        Self {
            repository,
            calculator,
        }
    }

    /// Returns the memoized result for `request`, computing it on a miss.
    ///
    /// Calculator errors are returned unchanged and nothing is cached for
    /// them. A failed cache write is logged and otherwise ignored.
    pub fn calculate(
        &self,
        request: &CalculateRequest,
    ) -> std::result::Result<CalcAggregates, CalcError> {
        if let Some(cached) = self.repository.get(request) {
            debug!(op = "service.calculate", "serving cached result");
            return Ok(cached);
        }

        let aggregates = self
            .calculator
            .calculate(request.params(), request.program)?;

        if let Err(err) = self.repository.set(request, &aggregates) {
            warn!(op = "service.calculate", error = %err, "failed to cache result");
        }

        Ok(aggregates)
    }

    /// Lists every cached calculation.
    pub fn list(&self) -> Result<Vec<ListedResult<CalculateRequest, CalcAggregates>>> {
        self.repository.list()
    }

    pub fn repository(&self) -> &Arc<C> {
        &self.repository
    }
}
