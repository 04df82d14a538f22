//! Display names for recorded codes and classifier output.

use std::fmt;

use crate::error::{Error, Result};

/// MAC scheduling policy recorded in the `scheduling_policy` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulingPolicy {
    /// Code 0.
    RoundRobin,
    /// Code 1.
    WaterFilling,
    /// Code 2.
    ProportionallyFair,
}

impl SchedulingPolicy {
    /// Map a recorded code to its policy.
    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            0 => Ok(Self::RoundRobin),
            1 => Ok(Self::WaterFilling),
            2 => Ok(Self::ProportionallyFair),
            other => Err(Error::UnknownPolicy(other)),
        }
    }

    /// Human readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::RoundRobin => "Round Robin",
            Self::WaterFilling => "Water Filling",
            Self::ProportionallyFair => "Proportionally Fair",
        }
    }
}

impl fmt::Display for SchedulingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Short class label of a classifier output line.
///
/// The label is the first word, except for `unexpected ...: <label> ...` lines
/// where it is the first word after the colon.
pub fn classify(class_output: &str) -> Result<&str> {
    let first = class_output.split_whitespace().next().unwrap_or_default();
    if first != "unexpected" {
        return Ok(first);
    }
    class_output
        .split_once(':')
        .and_then(|(_, rest)| rest.split_whitespace().next())
        .ok_or_else(|| Error::InvalidValue {
            metric: "classifier".to_string(),
            reason: format!("no label after ':' in {class_output:?}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_codes() {
        assert_eq!(
            SchedulingPolicy::from_code(0).unwrap().to_string(),
            "Round Robin"
        );
        assert_eq!(
            SchedulingPolicy::from_code(2).unwrap(),
            SchedulingPolicy::ProportionallyFair
        );
        assert!(matches!(
            SchedulingPolicy::from_code(7),
            Err(Error::UnknownPolicy(7))
        ));
    }

    #[test]
    fn classify_takes_first_word() {
        assert_eq!(classify("jammer detected: strong").unwrap(), "jammer");
        assert_eq!(classify("").unwrap(), "");
    }

    #[test]
    fn classify_unexpected_uses_word_after_colon() {
        assert_eq!(
            classify("unexpected output: normal traffic").unwrap(),
            "normal"
        );
        assert!(classify("unexpected output").is_err());
        assert!(classify("unexpected output:").is_err());
    }
}
