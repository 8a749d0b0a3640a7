//! The five fixed levels of a form hierarchy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormError;

/// A level in the Card → Set → Group → Field → Input hierarchy.
///
/// Kinds are ordered coarse to fine, so `Kind::Card < Kind::Input`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Card,
    Set,
    Group,
    Field,
    Input,
}

impl Kind {
    /// All kinds, coarsest first.
    pub const ALL: [Kind; 5] = [Kind::Card, Kind::Set, Kind::Group, Kind::Field, Kind::Input];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Set => "set",
            Self::Group => "group",
            Self::Field => "field",
            Self::Input => "input",
        }
    }

    /// The next coarser kind, `None` for Card.
    pub fn parent(self) -> Option<Kind> {
        match self {
            Self::Card => None,
            Self::Set => Some(Self::Card),
            Self::Group => Some(Self::Set),
            Self::Field => Some(Self::Group),
            Self::Input => Some(Self::Field),
        }
    }

    /// The next finer kind, `None` for Input.
    pub fn child(self) -> Option<Kind> {
        match self {
            Self::Card => Some(Self::Set),
            Self::Set => Some(Self::Group),
            Self::Group => Some(Self::Field),
            Self::Field => Some(Self::Input),
            Self::Input => None,
        }
    }

    /// Kinds strictly coarser than `self`, nearest first.
    pub fn coarser(self) -> impl Iterator<Item = Kind> {
        std::iter::successors(self.parent(), |kind| kind.parent())
    }

    /// Kinds strictly finer than `self`, nearest first.
    pub fn finer(self) -> impl Iterator<Item = Kind> {
        std::iter::successors(self.child(), |kind| kind.child())
    }

    /// Kinds that take part in step navigation (everything but Input).
    pub fn is_navigable(self) -> bool {
        !matches!(self, Self::Input)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "card" => Ok(Self::Card),
            "set" => Ok(Self::Set),
            "group" => Ok(Self::Group),
            "field" => Ok(Self::Field),
            "input" => Ok(Self::Input),
            other => Err(FormError::UnknownKind(other.to_string())),
        }
    }
}
