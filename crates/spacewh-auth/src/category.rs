//! Permission categories.
//!
//! A [`Category`] set describes *what kind* of capability a mode may
//! use. Tools carry a single category tag plus a set of required
//! categories; a mode carries the set it allows.
//!
//! # Monotonic Growth
//!
//! Each mode allows a superset of the mode below it:
//!
//! ```text
//! archivist    BASIC_TOOLS | READ_KNOWLEDGE
//! orchestrator   + WRITE_KNOWLEDGE | ADVANCED_TOOLS
//! godfather        + ADMIN_TOOLS
//! entity             + UNRESTRICTED
//! ```
//!
//! # Example
//!
//! ```
//! use spacewh_auth::Category;
//!
//! let allowed = Category::BASIC_TOOLS | Category::READ_KNOWLEDGE;
//! assert!(allowed.contains(Category::READ_KNOWLEDGE));
//! assert!(!allowed.contains(Category::ADMIN_TOOLS));
//!
//! // What is missing for a requirement
//! let required = Category::READ_KNOWLEDGE | Category::WRITE_KNOWLEDGE;
//! assert_eq!(required - allowed, Category::WRITE_KNOWLEDGE);
//! ```

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Capability categories a mode may grant.
    ///
    /// | Category | Wire name | Typical capabilities |
    /// |----------|-----------|----------------------|
    /// | [`BASIC_TOOLS`](Self::BASIC_TOOLS) | `basic_tools` | `echo`, `system_info` |
    /// | [`READ_KNOWLEDGE`](Self::READ_KNOWLEDGE) | `read_knowledge` | document retrieval |
    /// | [`WRITE_KNOWLEDGE`](Self::WRITE_KNOWLEDGE) | `write_knowledge` | document ingestion |
    /// | [`ADVANCED_TOOLS`](Self::ADVANCED_TOOLS) | `advanced_tools` | multi-agent workflows |
    /// | [`ADMIN_TOOLS`](Self::ADMIN_TOOLS) | `admin_tools` | tool enable/disable, config |
    /// | [`UNRESTRICTED`](Self::UNRESTRICTED) | `unrestricted` | everything else |
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Category: u8 {
        /// Basic tools available to every mode.
        const BASIC_TOOLS     = 0b0000_0001;
        /// Read access to the knowledge store.
        const READ_KNOWLEDGE  = 0b0000_0010;
        /// Write access to the knowledge store.
        const WRITE_KNOWLEDGE = 0b0000_0100;
        /// Advanced tools and workflows.
        const ADVANCED_TOOLS  = 0b0000_1000;
        /// Administrative tools.
        const ADMIN_TOOLS     = 0b0001_0000;
        /// No restriction.
        const UNRESTRICTED    = 0b0010_0000;
    }
}

/// Wire names in declaration order.
const NAMES: [(Category, &str); 6] = [
    (Category::BASIC_TOOLS, "basic_tools"),
    (Category::READ_KNOWLEDGE, "read_knowledge"),
    (Category::WRITE_KNOWLEDGE, "write_knowledge"),
    (Category::ADVANCED_TOOLS, "advanced_tools"),
    (Category::ADMIN_TOOLS, "admin_tools"),
    (Category::UNRESTRICTED, "unrestricted"),
];

impl Category {
    /// Every category.
    pub const ALL: Self = Self::BASIC_TOOLS
        .union(Self::READ_KNOWLEDGE)
        .union(Self::WRITE_KNOWLEDGE)
        .union(Self::ADVANCED_TOOLS)
        .union(Self::ADMIN_TOOLS)
        .union(Self::UNRESTRICTED);

    /// Returns the wire names of the categories in this set.
    ///
    /// # Example
    ///
    /// ```
    /// use spacewh_auth::Category;
    ///
    /// let set = Category::ADMIN_TOOLS | Category::BASIC_TOOLS;
    /// assert_eq!(set.names(), vec!["basic_tools", "admin_tools"]);
    /// ```
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }

    /// Parses a category name (case-insensitive, `-` or `_` separated).
    ///
    /// # Example
    ///
    /// ```
    /// use spacewh_auth::Category;
    ///
    /// assert_eq!(Category::parse("read_knowledge"), Some(Category::READ_KNOWLEDGE));
    /// assert_eq!(Category::parse("ADMIN-TOOLS"), Some(Category::ADMIN_TOOLS));
    /// assert_eq!(Category::parse("all"), Some(Category::ALL));
    /// assert_eq!(Category::parse("root"), None);
    /// ```
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        if normalized == "all" {
            return Some(Self::ALL);
        }
        NAMES
            .iter()
            .find(|(_, n)| *n == normalized)
            .map(|(flag, _)| *flag)
    }

    /// Parses a list of names into a combined set.
    ///
    /// Returns the combined set and the names that were not recognized.
    ///
    /// # Example
    ///
    /// ```
    /// use spacewh_auth::Category;
    ///
    /// let (set, unknown) = Category::parse_list(&["basic_tools", "warp_drive"]);
    /// assert_eq!(set, Category::BASIC_TOOLS);
    /// assert_eq!(unknown, vec!["warp_drive"]);
    /// ```
    #[must_use]
    pub fn parse_list<'a>(names: &[&'a str]) -> (Self, Vec<&'a str>) {
        let mut set = Self::empty();
        let mut unknown = Vec::new();
        for name in names {
            match Self::parse(name) {
                Some(c) => set |= c,
                None => unknown.push(*name),
            }
        }
        (set, unknown)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self.names();
        if names.is_empty() {
            write!(f, "(none)")
        } else {
            write!(f, "{}", names.join(" | "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_contains_every_category() {
        for (flag, _) in NAMES {
            assert!(Category::ALL.contains(flag));
        }
        assert_eq!(Category::ALL.names().len(), NAMES.len());
    }

    #[test]
    fn empty_category() {
        let empty = Category::empty();
        assert!(empty.names().is_empty());
        assert_eq!(empty.to_string(), "(none)");
    }

    #[test]
    fn parse_roundtrips_names() {
        for (flag, name) in NAMES {
            assert_eq!(Category::parse(name), Some(flag));
            assert_eq!(Category::parse(&name.to_uppercase()), Some(flag));
        }
    }

    #[test]
    fn parse_unknown_returns_none() {
        assert_eq!(Category::parse(""), None);
        assert_eq!(Category::parse("superuser"), None);
    }

    #[test]
    fn parse_list_reports_unknown() {
        let (set, unknown) =
            Category::parse_list(&["basic_tools", "nope", "admin-tools", "bad"]);
        assert_eq!(set, Category::BASIC_TOOLS | Category::ADMIN_TOOLS);
        assert_eq!(unknown, vec!["nope", "bad"]);
    }

    #[test]
    fn display_formatting() {
        assert_eq!(Category::BASIC_TOOLS.to_string(), "basic_tools");
        assert_eq!(
            (Category::BASIC_TOOLS | Category::READ_KNOWLEDGE).to_string(),
            "basic_tools | read_knowledge"
        );
    }

    #[test]
    fn serde_roundtrip() {
        let set = Category::WRITE_KNOWLEDGE | Category::UNRESTRICTED;
        let json = serde_json::to_string(&set).expect("serialize");
        let parsed: Category = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, set);
    }
}
