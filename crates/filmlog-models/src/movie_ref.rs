use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest id that survives a round trip through an IEEE double.
const MAX_EXACT_ID: f64 = 9_007_199_254_740_991.0;

/// Canonical movie identifier from the external metadata catalog
///
/// Always a positive integer. Records from the logging service and the
/// list documents carry this id under many different field names; once
/// resolved, every other lookup (posters, overrides, de-duplication) keys
/// off this value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct MovieRef(u64);

impl MovieRef {
    /// Create a MovieRef, rejecting zero
    pub fn new(id: u64) -> Option<Self> {
        if id == 0 {
            None
        } else {
            Some(Self(id))
        }
    }

    /// Create a MovieRef from a JSON-style number
    ///
    /// Returns None for NaN, infinities, non-positive values, fractional
    /// values and anything beyond the exactly representable integer range.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() || value <= 0.0 || value.fract() != 0.0 || value > MAX_EXACT_ID {
            return None;
        }
        Self::new(value as u64)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// Key used by per-user override maps
    pub fn key(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for MovieRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero() {
        assert!(MovieRef::new(0).is_none());
        assert_eq!(MovieRef::new(27205).map(|r| r.get()), Some(27205));
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(MovieRef::from_f64(550.0), MovieRef::new(550));
        assert!(MovieRef::from_f64(f64::NAN).is_none());
        assert!(MovieRef::from_f64(f64::INFINITY).is_none());
        assert!(MovieRef::from_f64(-3.0).is_none());
        assert!(MovieRef::from_f64(0.0).is_none());
        assert!(MovieRef::from_f64(12.5).is_none());
        assert!(MovieRef::from_f64(1e300).is_none());
    }

    #[test]
    fn test_key_and_serde() {
        let r = MovieRef::new(155).unwrap();
        assert_eq!(r.key(), "155");
        assert_eq!(serde_json::to_string(&r).unwrap(), "155");
        let back: MovieRef = serde_json::from_str("155").unwrap();
        assert_eq!(back, r);
    }
}
