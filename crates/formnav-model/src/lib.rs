pub mod error;
pub mod hierarchy;
pub mod kind;
pub mod node;
pub mod options;
pub mod state;

pub use error::{FormError, Result};
pub use hierarchy::{AncestorLink, ParentHierarchy};
pub use kind::Kind;
pub use node::{Node, NodePatch, Selector};
pub use options::{Behavior, Direction, FormOptions};
pub use state::{FormState, LevelState};
