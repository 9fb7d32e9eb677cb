//! Processing tier identifiers.
//!
//! Tiers form a totally ordered set of engine backends with increasing
//! capability and cost:
//!
//! ```text
//! Engine1 (baseline) < Engine2 (middle) < Engine3 (highest general-purpose) < Engine4
//! ```
//!
//! `Engine4` sits above the general-purpose tiers and is only reached
//! through an explicit override by a mode whose ceiling allows it.

use serde::{Deserialize, Serialize};

/// Identifier of a processing tier.
///
/// Ordering follows [`rank`](Self::rank), so `a < b` means `b` is the
/// more capable tier.
///
/// # Example
///
/// ```
/// use spacewh_types::TierId;
///
/// assert!(TierId::Engine1 < TierId::Engine3);
/// assert_eq!(TierId::Engine2.name(), "engine_2");
/// assert_eq!(TierId::parse("ENGINE_4"), Some(TierId::Engine4));
/// assert_eq!(TierId::parse("3"), Some(TierId::Engine3));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum TierId {
    /// Baseline tier.
    #[serde(rename = "engine_1")]
    Engine1,
    /// Middle tier.
    #[serde(rename = "engine_2")]
    Engine2,
    /// Highest general-purpose tier.
    #[serde(rename = "engine_3")]
    Engine3,
    /// Complete tier, above the general-purpose set.
    #[serde(rename = "engine_4")]
    Engine4,
}

impl TierId {
    /// All tiers in ascending order.
    pub const ALL: [Self; 4] = [Self::Engine1, Self::Engine2, Self::Engine3, Self::Engine4];

    /// Returns the 1-based rank of the tier.
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Self::Engine1 => 1,
            Self::Engine2 => 2,
            Self::Engine3 => 3,
            Self::Engine4 => 4,
        }
    }

    /// Returns the tier for a 1-based rank.
    #[must_use]
    pub fn from_rank(rank: u8) -> Option<Self> {
        match rank {
            1 => Some(Self::Engine1),
            2 => Some(Self::Engine2),
            3 => Some(Self::Engine3),
            4 => Some(Self::Engine4),
            _ => None,
        }
    }

    /// Returns the stable wire name (`engine_N`).
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Engine1 => "engine_1",
            Self::Engine2 => "engine_2",
            Self::Engine3 => "engine_3",
            Self::Engine4 => "engine_4",
        }
    }

    /// Parses `engine_N`, `engineN` or a bare rank (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_ascii_lowercase();
        let digits = lower
            .strip_prefix("engine_")
            .or_else(|| lower.strip_prefix("engine"))
            .unwrap_or(&lower);
        digits.parse::<u8>().ok().and_then(Self::from_rank)
    }
}

impl std::fmt::Display for TierId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
