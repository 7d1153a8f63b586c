//! Integrity checks for a loaded tree.
//!
//! Creation through [`ContactTree::create`] cannot produce these problems, but a
//! hand-edited `directory.json` can.

use std::collections::BTreeSet;

use crate::content::ContentData;
use crate::error::DirectoryError;
use crate::policy;
use crate::tree::{ContactTree, check_required_fields};

/// A problem found by [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Issue {
    #[error("'{id}' has missing parent '{parent}'")]
    DanglingParent { id: String, parent: String },
    #[error("'{id}' is part of a parent cycle")]
    ParentCycle { id: String },
    #[error("'{id}': {source}")]
    Invalid { id: String, source: DirectoryError },
}

impl Issue {
    pub fn id(&self) -> &str {
        match self {
            Issue::DanglingParent { id, .. } | Issue::ParentCycle { id } | Issue::Invalid { id, .. } => {
                id
            }
        }
    }
}

/// Check every node: parent present and acyclic, container allowed, required fields
/// set, vocabulary tokens known, held position references valid.
///
/// Vocabularies are checked even when the tree does not enforce them on creation.
pub fn validate(tree: &ContactTree) -> Vec<Issue> {
    let mut issues = Vec::new();
    for node in tree.nodes.values() {
        let id = node.id.clone();
        let container = match node.parent.as_deref() {
            Some(pid) => match tree.get(pid) {
                Some(parent) => Some(parent.kind()),
                None => {
                    issues.push(Issue::DanglingParent {
                        id,
                        parent: pid.to_string(),
                    });
                    continue;
                }
            },
            None => None,
        };
        if in_parent_cycle(tree, &node.id) {
            issues.push(Issue::ParentCycle { id });
            continue;
        }

        let mut checks = vec![
            policy::check_container(node.kind(), container),
            check_required_fields(&node.data),
            tree.check_vocabulary(node.parent.as_deref(), container, &node.data),
        ];
        if let ContentData::HeldPosition(held) = &node.data {
            checks.push(tree.check_reference(&node.id, held));
        }
        issues.extend(
            checks
                .into_iter()
                .filter_map(Result::err)
                .map(|source| Issue::Invalid {
                    id: node.id.clone(),
                    source,
                }),
        );
    }
    for issue in &issues {
        tracing::warn!(id = issue.id(), "{issue}");
    }
    issues
}

/// True if walking up from `id` comes back to `id`. Nodes hanging below a cycle
/// are not part of it.
fn in_parent_cycle(tree: &ContactTree, id: &str) -> bool {
    let mut visited = BTreeSet::new();
    let mut current = tree.get(id);
    while let Some(pid) = current.and_then(|n| n.parent.as_deref()) {
        if pid == id {
            return true;
        }
        if !visited.insert(pid) {
            return false;
        }
        current = tree.get(pid);
    }
    false
}
