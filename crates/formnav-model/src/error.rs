use thiserror::Error;

use crate::kind::Kind;

/// Errors raised by the form engine.
///
/// Configuration and discovery errors mean the host set the form up wrongly.
/// Data-consistency errors mean a core invariant was broken. Neither is
/// retried; recoverable inconsistencies are logged and corrected in place
/// and never surface here.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid navigation behavior '{0}' (expected byField, byGroup, bySet or byCard)")]
    InvalidBehavior(String),
    #[error("invalid navigation direction '{0}' (expected next or prev)")]
    InvalidDirection(String),
    #[error("unknown node kind '{0}'")]
    UnknownKind(String),
    #[error("form root is missing: form id must not be empty")]
    MissingRoot,
    #[error("form '{0}' has no cards")]
    EmptyForm(String),
    #[error("configuration error: {0}")]
    Config(String),

    #[error("{child_kind} '{child_id}' cannot be nested inside {parent_kind} '{parent_id}'")]
    InvalidNesting {
        parent_kind: Kind,
        parent_id: String,
        child_kind: Kind,
        child_id: String,
    },
    #[error("{parent_kind} '{parent_id}' mixes {kind} and {other_kind} '{other_id}' as direct children")]
    MixedChildren {
        parent_kind: Kind,
        parent_id: String,
        kind: Kind,
        other_kind: Kind,
        other_id: String,
    },
    #[error("top-level node {kind} '{id}' must be a card")]
    OrphanNode { kind: Kind, id: String },
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: Kind, id: String },

    #[error("{kind} not found: {selector}")]
    NodeNotFound { kind: Kind, selector: String },
    #[error("{kind} '{id}' is excluded and cannot be navigated to")]
    NodeExcluded { kind: Kind, id: String },
    #[error("{0} nodes are not navigable")]
    NotNavigable(Kind),
    #[error("navigation order for {kind} points at index {index}, which is not in the store")]
    NavigationOutOfSync { kind: Kind, index: usize },
    #[error("hierarchy resolution requested for card '{id}', which has no ancestor")]
    HierarchyOnCard { id: String },
    #[error("{kind} '{id}' references ancestor {ancestor_kind} '{ancestor_id}' that was not discovered")]
    MissingAncestor {
        kind: Kind,
        id: String,
        ancestor_kind: Kind,
        ancestor_id: String,
    },
}

impl FormError {
    /// True for errors that indicate the engine's own invariants diverged.
    pub fn is_data_consistency(&self) -> bool {
        matches!(
            self,
            Self::NavigationOutOfSync { .. }
                | Self::HierarchyOnCard { .. }
                | Self::MissingAncestor { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FormError>;
