//! Component-wise version comparison.
//!
//! Versions are split on `.` and `-`. Two components compare numerically when
//! both parse as integers and lexicographically otherwise; a missing component
//! sorts before a present one. There is no notion of pre-release ordering, so
//! `1.0.0-beta` compares greater than `1.0.0`.

use std::cmp::Ordering;
use std::fmt;

/// One piece of a dotted/dashed version string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionComponent {
    Numeric(u64),
    Text(String),
}

impl VersionComponent {
    fn parse(s: &str) -> Self {
        match s.parse::<u64>() {
            Ok(n) => VersionComponent::Numeric(n),
            Err(_) => VersionComponent::Text(s.to_string()),
        }
    }
}

impl PartialOrd for VersionComponent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VersionComponent {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (VersionComponent::Numeric(a), VersionComponent::Numeric(b)) => a.cmp(b),
            (a, b) => a.to_string().cmp(&b.to_string()),
        }
    }
}

impl fmt::Display for VersionComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionComponent::Numeric(n) => write!(f, "{}", n),
            VersionComponent::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Split a version string into comparable components
pub fn components(version: &str) -> Vec<VersionComponent> {
    version
        .trim()
        .split(['.', '-'])
        .filter(|part| !part.is_empty())
        .map(VersionComponent::parse)
        .collect()
}

/// Compare two version strings component by component
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let left = components(a);
    let right = components(b);

    for (l, r) in left.iter().zip(right.iter()) {
        match l.cmp(r) {
            Ordering::Equal => continue,
            other => return other,
        }
    }

    left.len().cmp(&right.len())
}

/// True when `candidate` orders strictly after `current`
pub fn is_newer(candidate: &str, current: &str) -> bool {
    compare_versions(candidate, current) == Ordering::Greater
}
