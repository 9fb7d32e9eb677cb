//! Operational modes and their static profiles.
//!
//! # Mode Table
//!
//! | Mode | Level | Engine | max_tokens | timeout | Council |
//! |------|-------|--------|-----------:|--------:|---------|
//! | [`Archivist`](Mode::Archivist) | 1 | `engine_1` | 1024 | 30s | 2 agents, basic |
//! | [`Orchestrator`](Mode::Orchestrator) | 2 | `engine_2` | 2048 | 60s | 5 agents, standard |
//! | [`Godfather`](Mode::Godfather) | 3 | `engine_3` | 4096 | 120s | 7 agents, advanced |
//! | [`Entity`](Mode::Entity) | 4 | `engine_4` | 8192 | 300s | 9 agents, complete |
//!
//! Level ordering is total: `Archivist < Orchestrator < Godfather < Entity`.
//! The engine column is the mode's tier ceiling.

use crate::Category;
use serde::{Deserialize, Serialize};
use spacewh_types::TierId;
use std::time::Duration;

/// Operational access mode.
///
/// # Example
///
/// ```
/// use spacewh_auth::Mode;
///
/// assert_eq!(Mode::parse("Godfather"), Some(Mode::Godfather));
/// assert_eq!(Mode::parse(""), None);
/// assert!(Mode::Archivist < Mode::Entity);
/// assert_eq!(Mode::Orchestrator.level(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Basic access.
    Archivist,
    /// Standard access.
    Orchestrator,
    /// Advanced access.
    Godfather,
    /// Complete access.
    Entity,
}

impl Mode {
    /// All modes in ascending level order.
    pub const ALL: [Self; 4] = [
        Self::Archivist,
        Self::Orchestrator,
        Self::Godfather,
        Self::Entity,
    ];

    /// Returns the numeric level (1..=4). Level 0 is reserved for "no mode".
    #[must_use]
    pub fn level(self) -> u8 {
        match self {
            Self::Archivist => 1,
            Self::Orchestrator => 2,
            Self::Godfather => 3,
            Self::Entity => 4,
        }
    }

    /// Returns the lowercase mode name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Archivist => "archivist",
            Self::Orchestrator => "orchestrator",
            Self::Godfather => "godfather",
            Self::Entity => "entity",
        }
    }

    /// Parses a mode name (case-insensitive). Unknown or empty names yield `None`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "archivist" => Some(Self::Archivist),
            "orchestrator" => Some(Self::Orchestrator),
            "godfather" => Some(Self::Godfather),
            "entity" => Some(Self::Entity),
            _ => None,
        }
    }

    /// Name for an optional mode, `"none"` when unresolved.
    #[must_use]
    pub fn display_name(mode: Option<Self>) -> &'static str {
        mode.map_or("none", Self::name)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Engine parameters a mode applies to every invocation it dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierParams {
    /// Tier ceiling (the mode's engine identity).
    pub engine: TierId,
    /// Maximum tokens the engine may generate.
    pub max_tokens: u32,
    /// Invocation timeout in seconds.
    pub timeout_secs: u64,
}

impl TierParams {
    /// Returns the timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Multi-agent workflow depth used by an engine for this mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Workflow {
    /// Single-pass answer.
    Basic,
    /// Draft and review.
    Standard,
    /// Draft, critique and revise.
    Advanced,
    /// Full council deliberation.
    Complete,
}

impl Workflow {
    /// Returns the lowercase workflow name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Standard => "standard",
            Self::Advanced => "advanced",
            Self::Complete => "complete",
        }
    }
}

/// Agent council sizing handed to engines as a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouncilProfile {
    /// Number of cooperating agents.
    pub agents: u8,
    /// Workflow depth.
    pub workflow: Workflow,
}

/// Static profile of one mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeProfile {
    /// The mode this profile describes.
    pub mode: Mode,
    /// Allowed categories.
    pub categories: Category,
    /// Tier parameters.
    pub tier: TierParams,
    /// Council sizing.
    pub council: CouncilProfile,
    /// Human-readable description.
    pub description: &'static str,
}

impl ModeProfile {
    /// Returns the mode's level.
    #[must_use]
    pub fn level(&self) -> u8 {
        self.mode.level()
    }

    /// Built-in profile for `mode`.
    #[must_use]
    pub fn builtin(mode: Mode) -> Self {
        let basic = Category::BASIC_TOOLS | Category::READ_KNOWLEDGE;
        let standard = basic | Category::WRITE_KNOWLEDGE | Category::ADVANCED_TOOLS;
        let advanced = standard | Category::ADMIN_TOOLS;
        let complete = advanced | Category::UNRESTRICTED;

        let (categories, engine, max_tokens, timeout_secs, agents, workflow, description) =
            match mode {
                Mode::Archivist => (
                    basic,
                    TierId::Engine1,
                    1024,
                    30,
                    2,
                    Workflow::Basic,
                    "Basic access mode with limited permissions",
                ),
                Mode::Orchestrator => (
                    standard,
                    TierId::Engine2,
                    2048,
                    60,
                    5,
                    Workflow::Standard,
                    "Standard access mode with moderate permissions",
                ),
                Mode::Godfather => (
                    advanced,
                    TierId::Engine3,
                    4096,
                    120,
                    7,
                    Workflow::Advanced,
                    "Advanced access mode with extended permissions",
                ),
                Mode::Entity => (
                    complete,
                    TierId::Engine4,
                    8192,
                    300,
                    9,
                    Workflow::Complete,
                    "Full access mode with all permissions",
                ),
            };

        Self {
            mode,
            categories,
            tier: TierParams {
                engine,
                max_tokens,
                timeout_secs,
            },
            council: CouncilProfile { agents, workflow },
            description,
        }
    }
}
