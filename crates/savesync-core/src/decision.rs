//! Per-file sync decisions
//!
//! Classification is a pure function of which sides hold the file and, when
//! both do, of their last-write timestamps. Content is never compared.

use std::path::Path;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// One of the two reconciled roots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

/// Display names for the two roots, used in log lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideLabels {
    pub a: String,
    pub b: String,
}

impl SideLabels {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
        }
    }

    pub fn get(&self, side: Side) -> &str {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }
}

impl Default for SideLabels {
    fn default() -> Self {
        Self::new("Steam", "Xbox")
    }
}

/// Which root is the source of a propagation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    AtoB,
    BtoA,
}

impl Direction {
    pub fn source(self) -> Side {
        match self {
            Self::AtoB => Side::A,
            Self::BtoA => Side::B,
        }
    }

    pub fn target(self) -> Side {
        self.source().other()
    }

    /// Label used in log lines and backup folder names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AtoB => "AtoB",
            Self::BtoA => "BtoA",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "AtoB" => Some(Self::AtoB),
            "BtoA" => Some(Self::BtoA),
            _ => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a filename currently exists as a file under each root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presence {
    pub on_a: bool,
    pub on_b: bool,
}

impl Presence {
    /// Probe the filesystem now. Directories with the same name do not count.
    pub fn probe(path_a: &Path, path_b: &Path) -> Self {
        Self {
            on_a: path_a.is_file(),
            on_b: path_b.is_file(),
        }
    }

    /// The decision when at most one side holds the file, `None` when both do.
    pub fn one_sided(self) -> Option<Decision> {
        match (self.on_a, self.on_b) {
            (true, true) => None,
            (true, false) => Some(Decision::AOnly),
            (false, true) => Some(Decision::BOnly),
            (false, false) => Some(Decision::Absent),
        }
    }
}

/// What to do with one filename
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// Both exist, A was written later
    ANewer,
    /// Both exist, B was written later
    BNewer,
    /// Both exist with equal timestamps
    Equal,
    AOnly,
    BOnly,
    /// Listed, but gone from both sides by the time it was probed
    Absent,
}

impl Decision {
    /// Direction of the copy this decision calls for, if any.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Self::ANewer | Self::AOnly => Some(Direction::AtoB),
            Self::BNewer | Self::BOnly => Some(Direction::BtoA),
            Self::Equal | Self::Absent => None,
        }
    }

    /// True when the target already holds an older copy that must be backed up.
    pub fn overwrites(self) -> bool {
        matches!(self, Self::ANewer | Self::BNewer)
    }

    pub fn describe(self, labels: &SideLabels) -> String {
        let Some(direction) = self.direction() else {
            return match self {
                Self::Absent => "missing from both sides".to_string(),
                _ => "up to date".to_string(),
            };
        };
        let source = labels.get(direction.source());
        let target = labels.get(direction.target());
        if self.overwrites() {
            format!("{source} is newer, would update {target} ({direction})")
        } else {
            format!("only in {source}, would copy to {target}")
        }
    }
}

/// Compare the last-write times of a file present on both sides.
///
/// Differences up to `tolerance` count as equal; a zero tolerance is a strict
/// comparison.
pub fn compare(modified_a: DateTime<Utc>, modified_b: DateTime<Utc>, tolerance: TimeDelta) -> Decision {
    let delta = modified_a - modified_b;
    if delta > tolerance {
        Decision::ANewer
    } else if delta < -tolerance {
        Decision::BNewer
    } else {
        Decision::Equal
    }
}
