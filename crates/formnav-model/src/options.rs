//! Configuration options for form navigation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::kind::Kind;

/// Navigation granularity: how far one forward/backward step moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Behavior {
    /// One field at a time.
    #[default]
    #[serde(rename = "byField")]
    ByField,
    /// One group at a time; every field of the group is shown.
    #[serde(rename = "byGroup")]
    ByGroup,
    /// One set at a time.
    #[serde(rename = "bySet")]
    BySet,
    /// One card at a time.
    #[serde(rename = "byCard")]
    ByCard,
}

impl Behavior {
    pub const ALL: [Behavior; 4] = [
        Behavior::ByField,
        Behavior::ByGroup,
        Behavior::BySet,
        Behavior::ByCard,
    ];

    /// The kind whose controller handles moves for this behavior.
    pub fn kind(self) -> Kind {
        match self {
            Self::ByField => Kind::Field,
            Self::ByGroup => Kind::Group,
            Self::BySet => Kind::Set,
            Self::ByCard => Kind::Card,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ByField => "byField",
            Self::ByGroup => "byGroup",
            Self::BySet => "bySet",
            Self::ByCard => "byCard",
        }
    }
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Behavior {
    type Err = FormError;

    /// Accepts `byField`, `by-field`, `by_field` and `field` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|ch| *ch != '-' && *ch != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "byfield" | "field" => Ok(Self::ByField),
            "bygroup" | "group" => Ok(Self::ByGroup),
            "byset" | "set" => Ok(Self::BySet),
            "bycard" | "card" => Ok(Self::ByCard),
            _ => Err(FormError::InvalidBehavior(s.to_string())),
        }
    }
}

/// Direction of a move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Next,
    Prev,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Prev => "prev",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "next" | "forward" => Ok(Self::Next),
            "prev" | "previous" | "back" => Ok(Self::Prev),
            _ => Err(FormError::InvalidDirection(s.to_string())),
        }
    }
}

/// Options a form is configured with. Read, never mutated, by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormOptions {
    /// Overrides the blueprint's form id when set.
    pub form_id: Option<String>,
    pub behavior: Behavior,
    /// Mark nodes visited when they become current.
    pub mark_visited: bool,
    /// Write the aggregated state once right after initialisation.
    pub publish_initial_state: bool,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            form_id: None,
            behavior: Behavior::default(),
            mark_visited: true,
            publish_initial_state: true,
        }
    }
}

impl FormOptions {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    #[must_use]
    pub fn with_form_id(mut self, form_id: impl Into<String>) -> Self {
        self.form_id = Some(form_id.into());
        self
    }

    #[must_use]
    pub fn with_mark_visited(mut self, enable: bool) -> Self {
        self.mark_visited = enable;
        self
    }
}
