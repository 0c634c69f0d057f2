//! Ticket code generation
//!
//! Codes have the form `GAL-NNNNN` with the number drawn uniformly from
//! `[10000, 99999]`. Draws are independent: nothing checks a new code against
//! codes already in the store, so two tickets can share a code (1 in 90 000
//! per pair of draws).

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TicketError;

/// Prefix shared by every ticket code
pub const CODE_PREFIX: &str = "GAL-";

/// Smallest numeric suffix
pub const CODE_MIN: u32 = 10_000;

/// Largest numeric suffix
pub const CODE_MAX: u32 = 99_999;

/// Validated ticket identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TicketCode(String);

impl TicketCode {
    /// Build the code for a numeric suffix
    pub fn from_number(number: u32) -> Result<Self, TicketError> {
        if !(CODE_MIN..=CODE_MAX).contains(&number) {
            return Err(TicketError::Validation(format!(
                "Ticket number {} outside {}..={}",
                number, CODE_MIN, CODE_MAX
            )));
        }
        Ok(Self(format!("{CODE_PREFIX}{number}")))
    }

    /// Validate a code received from a request or read from the store
    pub fn parse(value: &str) -> Result<Self, TicketError> {
        let digits = value.strip_prefix(CODE_PREFIX).ok_or_else(|| {
            TicketError::Validation(format!("Invalid ticket code '{value}': missing {CODE_PREFIX} prefix"))
        })?;

        if digits.len() != 5 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TicketError::Validation(format!(
                "Invalid ticket code '{value}': expected 5 digits after {CODE_PREFIX}"
            )));
        }

        let number: u32 = digits
            .parse()
            .map_err(|_| TicketError::Validation(format!("Invalid ticket code '{value}'")))?;
        Self::from_number(number)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric part of the code
    pub fn number(&self) -> u32 {
        // Constructors guarantee five ASCII digits after the prefix
        self.0[CODE_PREFIX.len()..].parse().unwrap_or_default()
    }
}

impl fmt::Display for TicketCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TicketCode {
    type Err = TicketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TicketCode {
    type Error = TicketError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TicketCode> for String {
    fn from(code: TicketCode) -> Self {
        code.0
    }
}

impl AsRef<str> for TicketCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Draw a fresh code from the thread-local RNG
pub fn generate() -> TicketCode {
    generate_with(&mut rand::thread_rng())
}

/// Draw a fresh code from a caller-supplied RNG
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> TicketCode {
    let number = rng.gen_range(CODE_MIN..=CODE_MAX);
    TicketCode(format!("{CODE_PREFIX}{number}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn assert_well_formed(code: &TicketCode) {
        let s = code.as_str();
        assert_eq!(s.len(), 9, "unexpected length for {s}");
        assert!(s.starts_with("GAL-"));
        assert!(s[4..].bytes().all(|b| b.is_ascii_digit()), "non-digit suffix in {s}");
        assert!((CODE_MIN..=CODE_MAX).contains(&code.number()));
    }

    #[test]
    fn test_generated_codes_match_format_and_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            assert_well_formed(&generate_with(&mut rng));
        }
    }

    #[test]
    fn test_thread_rng_codes_are_well_formed() {
        for _ in 0..100 {
            assert_well_formed(&generate());
        }
    }

    #[test]
    fn test_same_seed_same_codes() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            assert_eq!(generate_with(&mut a), generate_with(&mut b));
        }
    }

    /// Codes are not checked for uniqueness. With 90 000 possible values,
    /// 90 001 draws must contain a duplicate; this pins that collisions are an
    /// accepted property of the generator rather than something it prevents.
    #[test]
    fn test_collisions_are_possible() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = HashSet::new();
        let mut collided = false;
        for _ in 0..=(CODE_MAX - CODE_MIN + 1) {
            if !seen.insert(generate_with(&mut rng)) {
                collided = true;
                break;
            }
        }
        assert!(collided);
    }

    #[test]
    fn test_parse_accepts_bounds() {
        assert_eq!(TicketCode::parse("GAL-10000").unwrap().number(), 10_000);
        assert_eq!(TicketCode::parse("GAL-99999").unwrap().number(), 99_999);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "",
            "GAL-",
            "GAL-1234",
            "GAL-123456",
            "GAL-09999",
            "gal-12345",
            "GAL-12a45",
            "GAL-+1234",
            "XYZ-12345",
            " GAL-12345",
        ] {
            let err = TicketCode::parse(bad).unwrap_err();
            assert!(err.is_validation(), "{bad:?} should be a validation error");
        }
    }

    #[test]
    fn test_from_number_rejects_out_of_range() {
        assert!(TicketCode::from_number(9_999).is_err());
        assert!(TicketCode::from_number(100_000).is_err());
        assert_eq!(TicketCode::from_number(54_321).unwrap().as_str(), "GAL-54321");
    }

    #[test]
    fn test_serde_uses_plain_string() {
        let code = TicketCode::parse("GAL-12345").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"GAL-12345\"");
        let back: TicketCode = serde_json::from_str("\"GAL-12345\"").unwrap();
        assert_eq!(back, code);
        assert!(serde_json::from_str::<TicketCode>("\"nope\"").is_err());
    }
}
