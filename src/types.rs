//! Shared primitive IDs and race-related enums.

use std::{borrow::Borrow, fmt, str::FromStr};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Counter bumped by every race reset.
pub type Generation = u64;
/// Wall-clock milliseconds since the Unix epoch.
pub type WallMs = u64;

/// Opaque token identifying a contestant within the current generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContestantId(String);

impl ContestantId {
    /// Wraps a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Borrowed token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContestantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContestantId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ContestantId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for ContestantId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Start group a contestant runs in, numbered from 1.
///
/// The upper bound is a deployment setting, so the store checks it against
/// its registration policy rather than the type doing it here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Group(u8);

/// Reasons a group label fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupParseError {
    /// Group numbers start at 1.
    #[error("group number must be at least 1")]
    Zero,
    /// Label was not `G<n>` or `<n>`.
    #[error("unrecognized group label `{0}`")]
    Malformed(String),
}

impl Group {
    /// Returns `None` for group 0.
    pub fn new(number: u8) -> Option<Self> {
        (number >= 1).then_some(Self(number))
    }

    /// 1-based group number.
    pub fn number(self) -> u8 {
        self.0
    }

    /// All groups `1..=count`, in order.
    pub fn all(count: u8) -> impl Iterator<Item = Group> {
        (1..=count).map(Group)
    }

    /// Uniformly random group in `1..=count`; `None` when `count` is 0.
    pub fn random<R: Rng + ?Sized>(count: u8, rng: &mut R) -> Option<Self> {
        (count >= 1).then(|| Self(rng.gen_range(1..=count)))
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G{}", self.0)
    }
}

impl FromStr for Group {
    type Err = GroupParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('G')
            .or_else(|| trimmed.strip_prefix('g'))
            .unwrap_or(trimmed);
        let number: u8 = digits
            .parse()
            .map_err(|_| GroupParseError::Malformed(s.to_string()))?;
        Group::new(number).ok_or(GroupParseError::Zero)
    }
}

impl TryFrom<u8> for Group {
    type Error = GroupParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Group::new(value).ok_or(GroupParseError::Zero)
    }
}

impl From<Group> for u8 {
    fn from(value: Group) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn group_labels_parse_with_or_without_prefix() {
        assert_eq!("G7".parse::<Group>().unwrap().number(), 7);
        assert_eq!(" 12 ".parse::<Group>().unwrap().number(), 12);
        assert_eq!("G0".parse::<Group>(), Err(GroupParseError::Zero));
        assert!(matches!("west".parse::<Group>(), Err(GroupParseError::Malformed(_))));
        assert_eq!(Group::new(3).unwrap().to_string(), "G3");
    }

    #[test]
    fn all_lists_groups_in_order() {
        let labels: Vec<String> = Group::all(3).map(|g| g.to_string()).collect();
        assert_eq!(labels, ["G1", "G2", "G3"]);
        assert_eq!(Group::all(30).count(), 30);
        assert_eq!(Group::all(0).count(), 0);
    }

    #[test]
    fn random_group_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let g = Group::random(30, &mut rng).unwrap();
            assert!((1..=30).contains(&g.number()));
        }
        assert!(Group::random(0, &mut rng).is_none());
    }
}
