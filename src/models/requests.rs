//! Request DTOs for the calculator API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::{Deserialize, Serialize};

use crate::models::{CalcParams, CalcProgram};

/// Request body for POST /execute
///
/// Field declaration order is the serialization order, which is also the
/// layout of the cache key derived from this request. Missing fields default
/// to zero so a cache key can always be parsed back; `validate` rejects
/// zeros for incoming requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalculateRequest {
    #[serde(default)]
    pub object_cost: i64,
    #[serde(default)]
    pub initial_payment: i64,
    #[serde(default)]
    pub months: i64,
    #[serde(default)]
    pub program: CalcProgram,
}

impl CalculateRequest {
    /// Builds a request from its parts.
    pub fn new(params: CalcParams, program: CalcProgram) -> Self {
        Self {
            object_cost: params.object_cost,
            initial_payment: params.initial_payment,
            months: params.months,
            program,
        }
    }

    /// Numeric part of the request.
    pub fn params(&self) -> CalcParams {
        CalcParams {
            object_cost: self.object_cost,
            initial_payment: self.initial_payment,
            months: self.months,
        }
    }

    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        for (name, value) in [
            ("object_cost", self.object_cost),
            ("initial_payment", self.initial_payment),
            ("months", self.months),
        ] {
            if value <= 0 {
                return Some(format!("{} is required", name));
            }
        }

        match self.program.selected_count() {
            0 => Some("choose program".to_string()),
            1 => None,
            _ => Some("choose only 1 program".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CalculateRequest {
        CalculateRequest::new(
            CalcParams {
                object_cost: 5_000_000,
                initial_payment: 1_000_000,
                months: 240,
            },
            CalcProgram::salary(),
        )
    }

    #[test]
    fn test_calculate_request_deserialize() {
        let json = r#"{"object_cost": 100, "initial_payment": 20, "months": 12, "program": {"military": true}}"#;
        let req: CalculateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.object_cost, 100);
        assert_eq!(req.initial_payment, 20);
        assert_eq!(req.months, 12);
        assert_eq!(req.program, CalcProgram::military());
    }

    #[test]
    fn test_validate_valid_request() {
        assert!(valid_request().validate().is_none());
    }

    #[test]
    fn test_validate_missing_field() {
        let json = r#"{"object_cost": 100, "months": 12, "program": {"base": true}}"#;
        let req: CalculateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.validate().unwrap(), "initial_payment is required");
    }

    #[test]
    fn test_validate_no_program() {
        let mut req = valid_request();
        req.program = CalcProgram::default();
        assert_eq!(req.validate().unwrap(), "choose program");
    }

    #[test]
    fn test_validate_too_many_programs() {
        let mut req = valid_request();
        req.program.base = true;
        assert_eq!(req.validate().unwrap(), "choose only 1 program");
    }

    #[test]
    fn test_params_roundtrip() {
        let req = valid_request();
        assert_eq!(CalculateRequest::new(req.params(), req.program), req);
    }
}
