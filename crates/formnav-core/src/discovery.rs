//! Building a [`FormTree`] from a discovered form structure.
//!
//! Scanning markup is the host's job. The host hands over a nested
//! [`FormBlueprint`]; this module flattens it into one node list per kind and
//! builds the kinds top-down, so every node can resolve its ancestor chain
//! from nodes that already exist.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use formnav_model::{FormError, Kind, Node, ParentHierarchy, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::hierarchy::find_parent_hierarchy;
use crate::tree::FormTree;

/// A discovered form: the root id plus its cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormBlueprint {
    pub form_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub cards: Vec<BlueprintNode>,
}

/// One discovered element and the elements nested inside it.
///
/// Children may skip kinds (a Field directly inside a Set), but must always
/// be strictly finer than their parent and all of one kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlueprintNode {
    pub kind: Kind,
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_included")]
    pub included: bool,
    #[serde(default)]
    pub children: Vec<BlueprintNode>,
}

fn default_included() -> bool {
    true
}

impl BlueprintNode {
    pub fn new(kind: Kind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            title: None,
            included: true,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_included(mut self, included: bool) -> Self {
        self.included = included;
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<BlueprintNode>) -> Self {
        self.children = children;
        self
    }
}

impl FormBlueprint {
    pub fn new(form_id: impl Into<String>, cards: Vec<BlueprintNode>) -> Self {
        Self {
            form_id: form_id.into(),
            title: None,
            cards,
        }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| FormError::Config(format!("invalid blueprint: {e}")))
    }
}

/// Reads a JSON blueprint from disk.
pub fn load_blueprint(path: &Path) -> Result<FormBlueprint> {
    let raw = fs::read_to_string(path)?;
    FormBlueprint::from_json(&raw)
}

/// A flattened blueprint entry with its nearest ancestor.
#[derive(Debug, Clone)]
struct Discovered {
    id: String,
    title: Option<String>,
    included: bool,
    parent: Option<(Kind, String)>,
}

/// Flattens the blueprint in document order, checking its shape.
fn flatten(blueprint: &FormBlueprint) -> Result<BTreeMap<Kind, Vec<Discovered>>> {
    let mut by_kind: BTreeMap<Kind, Vec<Discovered>> = BTreeMap::new();
    let mut seen: HashSet<(Kind, String)> = HashSet::new();

    for card in &blueprint.cards {
        if card.kind != Kind::Card {
            return Err(FormError::OrphanNode {
                kind: card.kind,
                id: card.id.clone(),
            });
        }
        visit(card, None, &mut by_kind, &mut seen)?;
    }
    Ok(by_kind)
}

fn visit(
    node: &BlueprintNode,
    parent: Option<(Kind, &str)>,
    by_kind: &mut BTreeMap<Kind, Vec<Discovered>>,
    seen: &mut HashSet<(Kind, String)>,
) -> Result<()> {
    if let Some((parent_kind, parent_id)) = parent
        && node.kind <= parent_kind
    {
        return Err(FormError::InvalidNesting {
            parent_kind,
            parent_id: parent_id.to_string(),
            child_kind: node.kind,
            child_id: node.id.clone(),
        });
    }
    if !seen.insert((node.kind, node.id.clone())) {
        return Err(FormError::DuplicateId {
            kind: node.kind,
            id: node.id.clone(),
        });
    }
    by_kind.entry(node.kind).or_default().push(Discovered {
        id: node.id.clone(),
        title: node.title.clone(),
        included: node.included,
        parent: parent.map(|(kind, id)| (kind, id.to_string())),
    });
    if let Some(first) = node.children.first()
        && let Some(other) = node.children.iter().find(|child| child.kind != first.kind)
    {
        return Err(FormError::MixedChildren {
            parent_kind: node.kind,
            parent_id: node.id.clone(),
            kind: first.kind,
            other_kind: other.kind,
            other_id: other.id.clone(),
        });
    }
    for child in &node.children {
        visit(child, Some((node.kind, &node.id)), by_kind, seen)?;
    }
    Ok(())
}

/// Builds a populated tree, one kind at a time from Card down to Input.
///
/// Navigation orders are built as each controller is initialised; nothing is
/// activated yet.
pub fn build_tree(blueprint: &FormBlueprint) -> Result<FormTree> {
    let form_id = blueprint.form_id.trim();
    if form_id.is_empty() {
        return Err(FormError::MissingRoot);
    }
    if blueprint.cards.is_empty() {
        return Err(FormError::EmptyForm(form_id.to_string()));
    }

    let mut discovered = flatten(blueprint)?;
    let mut tree = FormTree::new(form_id);

    for kind in Kind::ALL {
        let entries = discovered.remove(&kind).unwrap_or_default();
        let mut nodes = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            let mut node = Node::new(kind, entry.id, index, ParentHierarchy::root(form_id))
                .with_included(entry.included);
            node.title = entry.title;
            if kind != Kind::Card {
                node.parent_hierarchy = resolve(&tree, &node, entry.parent.as_ref(), form_id)?;
            }
            nodes.push(node);
        }
        debug!(kind = %kind, count = nodes.len(), "discovered level");
        tree.controller_mut(kind).init(nodes);
    }

    info!(form_id, nodes = tree.len(), "form discovered");
    Ok(tree)
}

fn resolve(
    tree: &FormTree,
    node: &Node,
    parent: Option<&(Kind, String)>,
    form_id: &str,
) -> Result<ParentHierarchy> {
    let Some((parent_kind, parent_id)) = parent else {
        return Err(FormError::OrphanNode {
            kind: node.kind,
            id: node.id.clone(),
        });
    };
    let ancestor = tree.controller(*parent_kind).get_by_id(parent_id);
    if ancestor.is_none() {
        return Err(FormError::MissingAncestor {
            kind: node.kind,
            id: node.id.clone(),
            ancestor_kind: *parent_kind,
            ancestor_id: parent_id.clone(),
        });
    }
    find_parent_hierarchy(node, form_id, |_| ancestor)
}
