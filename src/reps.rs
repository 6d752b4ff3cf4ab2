//! Rep targets: fixed counts and open-ended "to-failure" minimums.
//!
//! Catalog JSON and persisted records carry targets as either a number (`10`)
//! or a string with a trailing plus (`"20+"`, do at least 20 and report the
//! actual count). Both are decided once, at parse time, into [`RepTarget`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// ---------------------------------------------------------------------------
/// Wire Form
/// ---------------------------------------------------------------------------

/// Rep target exactly as it appears in JSON: `12` or `"12+"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRepTarget {
  Count(i64),
  Text(String),
}

impl fmt::Display for RawRepTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RawRepTarget::Count(n) => write!(f, "{}", n),
      RawRepTarget::Text(s) => write!(f, "{}", s),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unexpected rep format: {raw}")]
pub struct MalformedRepTarget {
  pub raw: String,
}

/// ---------------------------------------------------------------------------
/// Parsed Target
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepTarget {
  /// Do exactly this many reps; recorded automatically
  Fixed(u32),
  /// Do at least this many; the athlete reports the actual count
  Minimum(u32),
}

impl RepTarget {
  /// Strict parse, used when validating catalog data
  pub fn try_parse(raw: &RawRepTarget) -> Result<Self, MalformedRepTarget> {
    let malformed = || MalformedRepTarget {
      raw: raw.to_string(),
    };

    match raw {
      RawRepTarget::Count(n) => u32::try_from(*n).map(RepTarget::Fixed).map_err(|_| malformed()),
      RawRepTarget::Text(text) => {
        if let Some(digits) = text.strip_suffix('+') {
          parse_digits(digits).map(RepTarget::Minimum).ok_or_else(malformed)
        } else {
          // Numeric strings ("10") are treated as fixed counts
          parse_digits(text).map(RepTarget::Fixed).ok_or_else(malformed)
        }
      }
    }
  }

  /// Lenient parse: anything unrecognised becomes a zero-rep fixed set.
  ///
  /// Callers get a usable (if empty) set instead of an error, so a bad value
  /// in persisted data never takes a whole session down with it.
  pub fn parse(raw: &RawRepTarget) -> Self {
    match Self::try_parse(raw) {
      Ok(target) => target,
      Err(e) => {
        tracing::warn!("{}", e);
        RepTarget::Fixed(0)
      }
    }
  }

  /// Integer component of the target
  pub fn value(&self) -> u32 {
    match self {
      RepTarget::Fixed(n) | RepTarget::Minimum(n) => *n,
    }
  }

  pub fn is_minimum(&self) -> bool {
    matches!(self, RepTarget::Minimum(_))
  }

  /// Reps recorded without asking the athlete (None for minimum targets)
  pub fn automatic_reps(&self) -> Option<u32> {
    match self {
      RepTarget::Fixed(n) => Some(*n),
      RepTarget::Minimum(_) => None,
    }
  }

  pub fn to_raw(&self) -> RawRepTarget {
    match self {
      RepTarget::Fixed(n) => RawRepTarget::Count(i64::from(*n)),
      RepTarget::Minimum(n) => RawRepTarget::Text(format!("{}+", n)),
    }
  }
}

fn parse_digits(digits: &str) -> Option<u32> {
  if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  digits.parse().ok()
}

impl fmt::Display for RepTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RepTarget::Fixed(n) => write!(f, "{}", n),
      RepTarget::Minimum(n) => write!(f, "{}+", n),
    }
  }
}

impl Serialize for RepTarget {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    self.to_raw().serialize(serializer)
  }
}

impl<'de> Deserialize<'de> for RepTarget {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let raw = RawRepTarget::deserialize(deserializer)?;
    Ok(RepTarget::parse(&raw))
  }
}

/// ---------------------------------------------------------------------------
/// Rep Entry
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{reps} reps is below the minimum of {minimum}")]
pub struct BelowMinimum {
  pub minimum: u32,
  pub reps: u32,
}

/// Check a user-entered count for a minimum set before handing it to the
/// session. The session itself records whatever it is given.
pub fn validate_rep_entry(minimum: u32, reps: u32) -> Result<u32, BelowMinimum> {
  if reps < minimum {
    Err(BelowMinimum { minimum, reps })
  } else {
    Ok(reps)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_integer_targets_are_fixed() {
    for n in [1, 5, 12, 250] {
      let target = RepTarget::parse(&RawRepTarget::Count(n));
      assert_eq!(target, RepTarget::Fixed(n as u32));
      assert_eq!(target.value(), n as u32);
      assert!(!target.is_minimum());
    }
  }

  #[test]
  fn test_plus_suffix_is_minimum() {
    for n in [1, 8, 20, 99] {
      let target = RepTarget::parse(&RawRepTarget::Text(format!("{}+", n)));
      assert_eq!(target, RepTarget::Minimum(n));
      assert!(target.is_minimum());
      assert_eq!(target.automatic_reps(), None);
    }
  }

  #[test]
  fn test_numeric_string_is_fixed() {
    assert_eq!(RepTarget::parse(&RawRepTarget::Text("10".to_string())), RepTarget::Fixed(10));
  }

  #[test]
  fn test_malformed_falls_back_to_zero() {
    for raw in ["abc", "", "+", "5++", "+5+", "-3+", "1 0+", "x+"] {
      let raw = RawRepTarget::Text(raw.to_string());
      assert!(RepTarget::try_parse(&raw).is_err(), "{} should be rejected", raw);
      assert_eq!(RepTarget::parse(&raw), RepTarget::Fixed(0));
    }
  }

  #[test]
  fn test_negative_count_is_malformed() {
    let err = RepTarget::try_parse(&RawRepTarget::Count(-4)).unwrap_err();
    assert_eq!(err.raw, "-4");
  }

  #[test]
  fn test_serializes_back_to_wire_form() {
    let json = serde_json::to_string(&vec![RepTarget::Fixed(10), RepTarget::Minimum(8)]).unwrap();
    assert_eq!(json, r#"[10,"8+"]"#);

    let parsed: Vec<RepTarget> = serde_json::from_str(r#"[10,"8+","bogus"]"#).unwrap();
    assert_eq!(parsed, vec![RepTarget::Fixed(10), RepTarget::Minimum(8), RepTarget::Fixed(0)]);
  }

  #[test]
  fn test_display() {
    assert_eq!(RepTarget::Fixed(12).to_string(), "12");
    assert_eq!(RepTarget::Minimum(20).to_string(), "20+");
  }

  #[test]
  fn test_validate_rep_entry() {
    assert_eq!(validate_rep_entry(8, 11), Ok(11));
    assert_eq!(validate_rep_entry(8, 8), Ok(8));
    assert_eq!(
      validate_rep_entry(8, 7),
      Err(BelowMinimum { minimum: 8, reps: 7 })
    );
  }
}
