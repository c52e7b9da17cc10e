//! Cache Key Module
//!
//! Deterministic cache keys derived from structured requests.
//!
//! A key is the compact JSON encoding of the request: fields appear in
//! declaration order, there is no insignificant whitespace, and fields the
//! type marks as skippable (unset program flags) are always omitted. Keys
//! are therefore byte-identical for field-wise equal requests, and the
//! request can be recovered from its key when listing.

use std::fmt;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{CacheError, Result};

// == Cache Key ==
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    // == Derive ==
    /// Canonical key for `request`. Pure: no clock, randomness or store access.
    pub fn derive<Q: Serialize>(request: &Q) -> Result<Self> {
        serde_json::to_string(request)
            .map(CacheKey)
            .map_err(CacheError::KeyDerivation)
    }

    // == Parse ==
    /// Recovers the request a stored key was derived from.
    pub fn parse<Q: DeserializeOwned>(key: &str) -> Result<Q> {
        serde_json::from_str(key).map_err(|source| CacheError::Decode {
            key: key.to_string(),
            source,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::models::{CalcProgram, CalculateRequest};

    #[test]
    fn test_derive_layout() {
        let req = CalculateRequest {
            object_cost: 1,
            initial_payment: 2,
            months: 3,
            program: CalcProgram::base(),
        };
        let key = CacheKey::derive(&req).unwrap();
        assert_eq!(
            key.as_str(),
            r#"{"object_cost":1,"initial_payment":2,"months":3,"program":{"base":true}}"#
        );
    }

    #[test]
    fn test_derive_zero_request() {
        let key = CacheKey::derive(&CalculateRequest::default()).unwrap();
        assert_eq!(
            key.as_str(),
            r#"{"object_cost":0,"initial_payment":0,"months":0,"program":{}}"#
        );
    }

    #[test]
    fn test_program_changes_key() {
        let salary = CalculateRequest {
            program: CalcProgram::salary(),
            ..CalculateRequest::default()
        };
        let military = CalculateRequest {
            program: CalcProgram::military(),
            ..CalculateRequest::default()
        };
        assert_ne!(
            CacheKey::derive(&salary).unwrap(),
            CacheKey::derive(&military).unwrap()
        );
    }

    #[test]
    fn test_parse_recovers_request() {
        let req = CalculateRequest {
            object_cost: 5_000_000,
            initial_payment: 1_000_000,
            months: 240,
            program: CalcProgram::salary(),
        };
        let key = CacheKey::derive(&req).unwrap();
        let parsed: CalculateRequest = CacheKey::parse(key.as_str()).unwrap();
        assert_eq!(parsed, req);
    }

    #[test]
    fn test_parse_empty_object_defaults() {
        let parsed: CalculateRequest = CacheKey::parse("{}").unwrap();
        assert_eq!(parsed, CalculateRequest::default());
    }

    #[test]
    fn test_parse_garbage_fails() {
        let err = CacheKey::parse::<CalculateRequest>("not json").unwrap_err();
        assert!(matches!(err, CacheError::Decode { ref key, .. } if key == "not json"));
    }

    #[test]
    fn test_non_string_map_keys_fail_derivation() {
        let mut bad = BTreeMap::new();
        bad.insert((1, 2), "v");
        assert!(matches!(
            CacheKey::derive(&bad),
            Err(CacheError::KeyDerivation(_))
        ));
    }
}
