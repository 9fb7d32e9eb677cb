//! Tier selection policy.
//!
//! # Decision Order
//!
//! First match wins:
//!
//! | # | Condition | Tier |
//! |---|-----------|------|
//! | 1 | explicit override | the override, verbatim |
//! | 2 | complexity `high` or context length > threshold | [`TierPolicy::highest`] |
//! | 3 | complexity `medium` or urgency `high` | [`TierPolicy::middle`] |
//! | 4 | otherwise | [`TierPolicy::baseline`] |
//!
//! Selection is total and deterministic: every input maps to exactly
//! one tier and the same input always maps to the same tier.

use serde::{Deserialize, Serialize};
use spacewh_types::TierId;

/// Default context length above which the highest tier is used.
pub const DEFAULT_CONTEXT_THRESHOLD: usize = 10_000;

/// Declared request complexity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    /// Simple lookup.
    Low,
    /// Some reasoning.
    Medium,
    /// Deep reasoning.
    High,
}

impl Complexity {
    /// Parses `low`, `medium` or `high` (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Declared request urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// No rush.
    Low,
    /// Prefer a faster tier.
    High,
}

impl Urgency {
    /// Parses `low` or `high` (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Attributes the caller declares to steer tier selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierHints {
    /// Explicit tier; bypasses the policy.
    pub tier: Option<TierId>,
    /// Declared complexity.
    pub complexity: Option<Complexity>,
    /// Declared urgency.
    pub urgency: Option<Urgency>,
    /// Explicit context length; derived from the payload when absent.
    pub context_len: Option<usize>,
}

impl TierHints {
    /// Hints with only an explicit tier.
    #[must_use]
    pub fn with_tier(tier: TierId) -> Self {
        Self {
            tier: Some(tier),
            ..Self::default()
        }
    }

    /// Sets the complexity.
    #[must_use]
    pub fn complexity(mut self, complexity: Complexity) -> Self {
        self.complexity = Some(complexity);
        self
    }

    /// Sets the urgency.
    #[must_use]
    pub fn urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = Some(urgency);
        self
    }
}

/// Configurable thresholds and tier assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierPolicy {
    /// Context length (in characters) above which `highest` is used.
    pub context_threshold: usize,
    /// Tier for ordinary requests.
    pub baseline: TierId,
    /// Tier for medium or urgent requests.
    pub middle: TierId,
    /// Highest general-purpose tier.
    pub highest: TierId,
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self {
            context_threshold: DEFAULT_CONTEXT_THRESHOLD,
            baseline: TierId::Engine1,
            middle: TierId::Engine2,
            highest: TierId::Engine3,
        }
    }
}

/// Which rule picked the tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TierReason {
    /// Explicit override.
    Override,
    /// Complexity was `high`.
    HighComplexity,
    /// Context exceeded the threshold.
    LargeContext,
    /// Complexity was `medium`.
    MediumComplexity,
    /// Urgency was `high`.
    HighUrgency,
    /// No rule matched.
    Baseline,
}

impl TierReason {
    /// Snake-case name for logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Override => "override",
            Self::HighComplexity => "high_complexity",
            Self::LargeContext => "large_context",
            Self::MediumComplexity => "medium_complexity",
            Self::HighUrgency => "high_urgency",
            Self::Baseline => "baseline",
        }
    }
}

/// A selected tier and the rule that selected it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierDecision {
    /// Selected tier.
    pub tier: TierId,
    /// Rule that matched.
    pub reason: TierReason,
}

/// Applies a [`TierPolicy`] to request hints.
///
/// # Example
///
/// ```
/// use spacewh_runtime::tier::{Complexity, TierHints, TierSelector, Urgency};
/// use spacewh_types::TierId;
///
/// let selector = TierSelector::default();
///
/// let hints = TierHints::default().complexity(Complexity::High).urgency(Urgency::Low);
/// assert_eq!(selector.select_tier(&hints, 0), TierId::Engine3);
///
/// assert_eq!(selector.select_tier(&TierHints::default(), 20_000), TierId::Engine3);
/// assert_eq!(selector.select_tier(&TierHints::default(), 10), TierId::Engine1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierSelector {
    policy: TierPolicy,
}

impl TierSelector {
    /// Creates a selector with `policy`.
    #[must_use]
    pub fn new(policy: TierPolicy) -> Self {
        Self { policy }
    }

    /// Returns the active policy.
    #[must_use]
    pub fn policy(&self) -> &TierPolicy {
        &self.policy
    }

    /// Selects a tier. `context_len` is used when the hints carry none.
    #[must_use]
    pub fn select_tier(&self, hints: &TierHints, context_len: usize) -> TierId {
        self.decide(hints, context_len).tier
    }

    /// Selects a tier and reports which rule matched.
    #[must_use]
    pub fn decide(&self, hints: &TierHints, context_len: usize) -> TierDecision {
        let policy = &self.policy;
        let context_len = hints.context_len.unwrap_or(context_len);

        let (tier, reason) = if let Some(tier) = hints.tier {
            (tier, TierReason::Override)
        } else if hints.complexity == Some(Complexity::High) {
            (policy.highest, TierReason::HighComplexity)
        } else if context_len > policy.context_threshold {
            (policy.highest, TierReason::LargeContext)
        } else if hints.complexity == Some(Complexity::Medium) {
            (policy.middle, TierReason::MediumComplexity)
        } else if hints.urgency == Some(Urgency::High) {
            (policy.middle, TierReason::HighUrgency)
        } else {
            (policy.baseline, TierReason::Baseline)
        };

        TierDecision { tier, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> TierSelector {
        TierSelector::default()
    }

    #[test]
    fn override_wins_verbatim() {
        let hints = TierHints::with_tier(TierId::Engine4).complexity(Complexity::Low);
        let decision = selector().decide(&hints, 1_000_000);
        assert_eq!(decision.tier, TierId::Engine4);
        assert_eq!(decision.reason, TierReason::Override);
    }

    #[test]
    fn high_complexity_ignores_urgency() {
        for urgency in [None, Some(Urgency::Low), Some(Urgency::High)] {
            let hints = TierHints {
                complexity: Some(Complexity::High),
                urgency,
                ..TierHints::default()
            };
            assert_eq!(selector().select_tier(&hints, 0), TierId::Engine3);
        }
    }

    #[test]
    fn context_threshold_is_exclusive() {
        let s = selector();
        assert_eq!(
            s.select_tier(&TierHints::default(), DEFAULT_CONTEXT_THRESHOLD),
            TierId::Engine1
        );
        let decision = s.decide(&TierHints::default(), DEFAULT_CONTEXT_THRESHOLD + 1);
        assert_eq!(decision.tier, TierId::Engine3);
        assert_eq!(decision.reason, TierReason::LargeContext);
    }

    #[test]
    fn explicit_context_len_overrides_derived() {
        let hints = TierHints {
            context_len: Some(50_000),
            ..TierHints::default()
        };
        assert_eq!(selector().select_tier(&hints, 0), TierId::Engine3);
    }

    #[test]
    fn medium_or_urgent_uses_middle() {
        let s = selector();
        let medium = TierHints::default().complexity(Complexity::Medium);
        let urgent = TierHints::default().urgency(Urgency::High);
        assert_eq!(s.decide(&medium, 0).reason, TierReason::MediumComplexity);
        assert_eq!(s.decide(&urgent, 0).reason, TierReason::HighUrgency);
        assert_eq!(s.select_tier(&medium, 0), TierId::Engine2);
        assert_eq!(s.select_tier(&urgent, 0), TierId::Engine2);
    }

    #[test]
    fn everything_else_is_baseline() {
        let hints = TierHints::default()
            .complexity(Complexity::Low)
            .urgency(Urgency::Low);
        assert_eq!(selector().select_tier(&hints, 10), TierId::Engine1);
    }

    #[test]
    fn custom_policy_is_honoured() {
        let s = TierSelector::new(TierPolicy {
            context_threshold: 100,
            baseline: TierId::Engine2,
            middle: TierId::Engine3,
            highest: TierId::Engine4,
        });
        assert_eq!(s.select_tier(&TierHints::default(), 101), TierId::Engine4);
        assert_eq!(s.select_tier(&TierHints::default(), 100), TierId::Engine2);
    }

    #[test]
    fn selection_is_deterministic() {
        let s = selector();
        let complexities = [None, Some(Complexity::Low), Some(Complexity::Medium), Some(Complexity::High)];
        let urgencies = [None, Some(Urgency::Low), Some(Urgency::High)];
        for complexity in complexities {
            for urgency in urgencies {
                for len in [0, 10_000, 10_001] {
                    let hints = TierHints {
                        complexity,
                        urgency,
                        ..TierHints::default()
                    };
                    assert_eq!(s.decide(&hints, len), s.decide(&hints, len));
                }
            }
        }
    }

    #[test]
    fn hints_deserialize_partial() {
        let hints: TierHints =
            serde_json::from_str(r#"{"complexity":"medium","tier":"engine_2"}"#).expect("parse");
        assert_eq!(hints.complexity, Some(Complexity::Medium));
        assert_eq!(hints.tier, Some(TierId::Engine2));
        assert_eq!(hints.urgency, None);
    }

    #[test]
    fn parse_complexity_and_urgency() {
        assert_eq!(Complexity::parse("HIGH"), Some(Complexity::High));
        assert_eq!(Complexity::parse("extreme"), None);
        assert_eq!(Urgency::parse("high"), Some(Urgency::High));
        assert_eq!(Urgency::parse("medium"), None);
    }
}
