//! Task identifiers

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

/// Positive task identifier
///
/// Ids are not guaranteed to be contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TaskId(NonZeroU32);

impl TaskId {
    /// Create a task id, rejecting zero
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidTaskId`] for `0`.
    pub fn new(id: u32) -> Result<Self, ModelError> {
        NonZeroU32::new(id)
            .map(Self)
            .ok_or_else(|| ModelError::InvalidTaskId(id.to_string()))
    }

    /// Raw numeric value
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for TaskId {
    type Error = ModelError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskId> for u32 {
    fn from(id: TaskId) -> Self {
        id.get()
    }
}

impl FromStr for TaskId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: u32 = s
            .trim()
            .parse()
            .map_err(|_| ModelError::InvalidTaskId(s.to_string()))?;
        Self::new(raw)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_rejected() {
        assert!(TaskId::new(0).is_err());
        assert!("0".parse::<TaskId>().is_err());
        assert!(serde_json::from_str::<TaskId>("0").is_err());
    }

    #[test]
    fn parses_and_displays() {
        let id: TaskId = " 101 ".parse().unwrap();
        assert_eq!(id.get(), 101);
        assert_eq!(id.to_string(), "101");
        assert!("-3".parse::<TaskId>().is_err());
        assert!("seven".parse::<TaskId>().is_err());
    }

    #[test]
    fn serde_is_a_plain_number() {
        let id = TaskId::new(42).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        assert_eq!(serde_json::from_str::<TaskId>("42").unwrap(), id);
    }
}
