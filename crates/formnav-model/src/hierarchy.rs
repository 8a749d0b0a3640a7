//! Ancestor chain records.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::kind::Kind;

/// Identity of one ancestor: its id and discovery index within its kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AncestorLink {
    pub id: String,
    pub index: usize,
}

/// Immutable record of every ancestor of a node, rooted at the form id.
///
/// A Group's record holds `card` and `set` links, a Field adds `group`, an
/// Input adds `field`. Records are only ever extended from a parent's record
/// (see [`ParentHierarchy::with_link`]), so a child's record is always a
/// superset of its parent's.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParentHierarchy {
    form_id: String,
    links: BTreeMap<Kind, AncestorLink>,
}

impl ParentHierarchy {
    /// A record with only the form root.
    pub fn root(form_id: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            links: BTreeMap::new(),
        }
    }

    /// Returns a copy of this record extended with one more ancestor.
    #[must_use]
    pub fn with_link(&self, kind: Kind, id: impl Into<String>, index: usize) -> Self {
        let mut next = self.clone();
        next.links.insert(
            kind,
            AncestorLink {
                id: id.into(),
                index,
            },
        );
        next
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn get(&self, kind: Kind) -> Option<&AncestorLink> {
        self.links.get(&kind)
    }

    pub fn id_of(&self, kind: Kind) -> Option<&str> {
        self.links.get(&kind).map(|link| link.id.as_str())
    }

    pub fn index_of(&self, kind: Kind) -> Option<usize> {
        self.links.get(&kind).map(|link| link.index)
    }

    /// Ancestor links, coarsest first.
    pub fn links(&self) -> impl Iterator<Item = (Kind, &AncestorLink)> {
        self.links.iter().map(|(kind, link)| (*kind, link))
    }

    /// The finest ancestor in the record, i.e. the node's immediate parent.
    pub fn nearest(&self) -> Option<(Kind, &AncestorLink)> {
        self.links
            .iter()
            .next_back()
            .map(|(kind, link)| (*kind, link))
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// True when every link (and the root) of `other` is present here with
    /// the same value.
    pub fn is_superset_of(&self, other: &ParentHierarchy) -> bool {
        self.form_id == other.form_id
            && other
                .links
                .iter()
                .all(|(kind, link)| self.links.get(kind) == Some(link))
    }

    /// Flat `formId` / `{kind}Id` / `{kind}Index` view, as consumed by
    /// attribute-style collaborators.
    pub fn to_flat(&self) -> BTreeMap<String, serde_json::Value> {
        let mut flat = BTreeMap::new();
        flat.insert(
            "formId".to_string(),
            serde_json::Value::String(self.form_id.clone()),
        );
        for (kind, link) in &self.links {
            flat.insert(
                format!("{kind}Id"),
                serde_json::Value::String(link.id.clone()),
            );
            flat.insert(format!("{kind}Index"), serde_json::Value::from(link.index));
        }
        flat
    }
}

impl fmt::Display for ParentHierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.form_id)?;
        for (kind, link) in &self.links {
            write!(f, " > {kind}:{}#{}", link.id, link.index)?;
        }
        Ok(())
    }
}
