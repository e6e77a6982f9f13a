//! Check names and selections.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// One probe that can be selected for a scan.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    Os,
    Python,
    Venv,
    Dependencies,
    Config,
}

impl CheckKind {
    pub const ALL: [CheckKind; 5] = [
        CheckKind::Os,
        CheckKind::Python,
        CheckKind::Venv,
        CheckKind::Dependencies,
        CheckKind::Config,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::Os => "os",
            CheckKind::Python => "python",
            CheckKind::Venv => "venv",
            CheckKind::Dependencies => "dependencies",
            CheckKind::Config => "config",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CheckKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CheckKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown check '{}' (expected one of: os, python, venv, dependencies, config)",
                    s
                )
            })
    }
}

/// The set of checks a scan runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSelection(BTreeSet<CheckKind>);

impl CheckSelection {
    pub fn all() -> Self {
        Self(CheckKind::ALL.into_iter().collect())
    }

    pub fn only(kinds: impl IntoIterator<Item = CheckKind>) -> Self {
        Self(kinds.into_iter().collect())
    }

    /// Every check except `kinds`.
    pub fn excluding(kinds: impl IntoIterator<Item = CheckKind>) -> Self {
        let skip: BTreeSet<_> = kinds.into_iter().collect();
        Self(
            CheckKind::ALL
                .into_iter()
                .filter(|k| !skip.contains(k))
                .collect(),
        )
    }

    pub fn contains(&self, kind: CheckKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = CheckKind> + '_ {
        self.0.iter().copied()
    }
}

impl Default for CheckSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Display for CheckSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.iter().map(|k| k.as_str()).collect();
        write!(f, "{}", names.join(", "))
    }
}
