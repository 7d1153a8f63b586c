//! The directory content tree: nodes keyed by id, linked by parent back-references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::content::{
    ContentData, ContentKind, ContentNode, DirectoryData, HeldPositionData, OrganizationData,
    PersonData, PositionData,
};
use crate::error::DirectoryError;
use crate::policy;
use crate::vocabulary::{Term, VocabularyKind};

/// Current on-disk format version of [`ContactTree`].
pub const TREE_VERSION: &str = "1.0.0";

/// All directory content, with containment rules enforced on creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactTree {
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub metadata: TreeMetadata,
    pub nodes: BTreeMap<String, ContentNode>,
    /// Reject organization and position types missing from the directory vocabularies.
    #[serde(skip, default = "enforce_by_default")]
    pub enforce_vocabularies: bool,
}

fn enforce_by_default() -> bool {
    true
}

/// Aggregate counts for the tree, recomputed by [`ContactTree::refresh_metadata`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeMetadata {
    pub directories: usize,
    pub organizations: usize,
    pub persons: usize,
    pub positions: usize,
    pub held_positions: usize,
    /// Length of the longest organization chain.
    pub max_organization_depth: usize,
}

impl Default for ContactTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactTree {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            version: TREE_VERSION.to_string(),
            created_at: now,
            updated_at: now,
            metadata: TreeMetadata::default(),
            nodes: BTreeMap::new(),
            enforce_vocabularies: true,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ContentNode> {
        self.nodes.get(id)
    }

    /// Like [`get`](Self::get), but a missing id is an error.
    pub fn node(&self, id: &str) -> Result<&ContentNode, DirectoryError> {
        self.nodes
            .get(id)
            .ok_or_else(|| DirectoryError::NotFound(id.to_string()))
    }

    /// Fetch a node and check its kind.
    pub fn node_of_kind(
        &self,
        id: &str,
        expected: ContentKind,
    ) -> Result<&ContentNode, DirectoryError> {
        let node = self.node(id)?;
        if node.kind() == expected {
            Ok(node)
        } else {
            Err(DirectoryError::WrongKind {
                id: id.to_string(),
                expected,
                found: node.kind(),
            })
        }
    }

    /// Create a node inside `parent` (or at the top level when `None`).
    ///
    /// Fails when the id is invalid or taken, the parent is missing, the containment
    /// policy forbids the kind in that container, a required field is blank, a type
    /// token is not in the directory vocabulary, or a held position references
    /// anything but a position or an organization.
    pub fn create(
        &mut self,
        parent: Option<&str>,
        id: &str,
        data: ContentData,
    ) -> Result<&ContentNode, DirectoryError> {
        validate_id(id)?;
        if self.nodes.contains_key(id) {
            return Err(DirectoryError::DuplicateId(id.to_string()));
        }
        let container = match parent {
            Some(pid) => Some(self.node(pid)?.kind()),
            None => None,
        };
        policy::check_container(data.kind(), container)?;
        check_required_fields(&data)?;
        if self.enforce_vocabularies {
            self.check_vocabulary(parent, container, &data)?;
        }
        if let ContentData::HeldPosition(held) = &data {
            self.check_reference(id, held)?;
        }

        tracing::debug!(id, kind = %data.kind(), parent = ?parent, "creating content");
        let node = ContentNode::new(id, parent.map(str::to_string), data);
        if let Some(pid) = parent
            && let Some(p) = self.nodes.get_mut(pid)
        {
            p.children.insert(id.to_string());
        }
        self.nodes.insert(id.to_string(), node);
        self.updated_at = Utc::now();
        self.node(id)
    }

    pub fn add_directory(
        &mut self,
        id: &str,
        data: DirectoryData,
    ) -> Result<&ContentNode, DirectoryError> {
        self.create(None, id, ContentData::Directory(data))
    }

    pub fn add_organization(
        &mut self,
        parent: &str,
        id: &str,
        data: OrganizationData,
    ) -> Result<&ContentNode, DirectoryError> {
        self.create(Some(parent), id, ContentData::Organization(data))
    }

    pub fn add_person(
        &mut self,
        parent: &str,
        id: &str,
        data: PersonData,
    ) -> Result<&ContentNode, DirectoryError> {
        self.create(Some(parent), id, ContentData::Person(data))
    }

    pub fn add_position(
        &mut self,
        organization: &str,
        id: &str,
        data: PositionData,
    ) -> Result<&ContentNode, DirectoryError> {
        self.create(Some(organization), id, ContentData::Position(data))
    }

    pub fn add_held_position(
        &mut self,
        person: &str,
        id: &str,
        data: HeldPositionData,
    ) -> Result<&ContentNode, DirectoryError> {
        self.create(Some(person), id, ContentData::HeldPosition(data))
    }

    /// Add a term to one of a directory's vocabularies. Returns false when the token
    /// is already present.
    pub fn add_term(
        &mut self,
        directory: &str,
        kind: VocabularyKind,
        term: Term,
    ) -> Result<bool, DirectoryError> {
        self.node_of_kind(directory, ContentKind::Directory)?;
        let Some(ContentData::Directory(data)) = self.nodes.get_mut(directory).map(|n| &mut n.data)
        else {
            return Err(DirectoryError::NotFound(directory.to_string()));
        };
        let added = data.add_term(kind, term);
        if added {
            self.updated_at = Utc::now();
        }
        Ok(added)
    }

    pub(crate) fn check_vocabulary(
        &self,
        parent: Option<&str>,
        container: Option<ContentKind>,
        data: &ContentData,
    ) -> Result<(), DirectoryError> {
        let (vocabulary, token) = match data {
            ContentData::Organization(org) => {
                let vocabulary = if container == Some(ContentKind::Organization) {
                    VocabularyKind::OrganizationLevels
                } else {
                    VocabularyKind::OrganizationTypes
                };
                (vocabulary, org.organization_type.as_str())
            }
            ContentData::Position(pos) => (VocabularyKind::PositionTypes, pos.position_type.as_str()),
            _ => return Ok(()),
        };
        let Some(directory) = parent
            .and_then(|pid| self.directory_of(pid))
            .and_then(ContentNode::as_directory)
        else {
            return Ok(());
        };
        directory.check_term(vocabulary, token).map(|_| ())
    }

    pub(crate) fn check_reference(&self, id: &str, held: &HeldPositionData) -> Result<(), DirectoryError> {
        let target = self.node(&held.position)?;
        match target.kind() {
            ContentKind::Position | ContentKind::Organization => Ok(()),
            _ => Err(DirectoryError::InvalidReference {
                id: id.to_string(),
                target: held.position.clone(),
            }),
        }
    }

    pub fn parent(&self, id: &str) -> Option<&ContentNode> {
        self.nodes
            .get(id)
            .and_then(|n| n.parent.as_deref())
            .and_then(|pid| self.nodes.get(pid))
    }

    pub fn children(&self, id: &str) -> Vec<&ContentNode> {
        self.nodes.get(id).map_or_else(Vec::new, |n| {
            n.children
                .iter()
                .filter_map(|cid| self.nodes.get(cid))
                .collect()
        })
    }

    /// True if `child` is directly contained in `parent`.
    pub fn contains(&self, parent: &str, child: &str) -> bool {
        self.nodes
            .get(parent)
            .is_some_and(|p| p.children.contains(child))
    }

    /// Content with no parent, in id order.
    pub fn top_level(&self) -> Vec<&ContentNode> {
        self.nodes.values().filter(|n| n.parent.is_none()).collect()
    }

    /// The node and its ancestors, root first.
    ///
    /// A parent cycle in hand-edited data stops the walk after visiting every node once.
    pub fn lineage(&self, id: &str) -> Result<Vec<&ContentNode>, DirectoryError> {
        let mut current = self.node(id)?;
        let mut chain = vec![current];
        let mut visited = BTreeSet::from([current.id.as_str()]);
        while let Some(pid) = current.parent.as_deref() {
            if !visited.insert(pid) {
                tracing::warn!(id, parent = pid, "parent cycle detected");
                break;
            }
            let Some(parent) = self.nodes.get(pid) else {
                break;
            };
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        Ok(chain)
    }

    /// Ids from the top-level ancestor down to `id`.
    pub fn physical_path(&self, id: &str) -> Result<Vec<String>, DirectoryError> {
        Ok(self.lineage(id)?.into_iter().map(|n| n.id.clone()).collect())
    }

    /// The directory containing `id`, or `id` itself if it is a directory.
    pub fn directory_of(&self, id: &str) -> Option<&ContentNode> {
        self.lineage(id)
            .ok()?
            .into_iter()
            .rev()
            .find(|n| n.kind() == ContentKind::Directory)
    }

    /// Display title of any node. Held positions take the title of what they reference.
    pub fn title(&self, id: &str) -> Result<String, DirectoryError> {
        let node = self.node(id)?;
        match &node.data {
            ContentData::HeldPosition(held) => Ok(self.node(&held.position)?.title()),
            _ => Ok(node.title()),
        }
    }

    /// Held positions referencing `id`.
    pub fn referrers(&self, id: &str) -> Vec<&ContentNode> {
        self.nodes
            .values()
            .filter(|n| n.as_held_position().is_some_and(|h| h.position == id))
            .collect()
    }

    /// Ids of `id` and everything below it, parents before children.
    pub fn subtree_ids(&self, id: &str) -> Vec<String> {
        let mut ids = Vec::new();
        let mut stack = vec![id.to_string()];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(&current) {
                stack.extend(node.children.iter().rev().cloned());
                ids.push(current);
            }
        }
        ids
    }

    /// Remove a node and its whole subtree.
    ///
    /// Refused while a held position outside the subtree still references a node
    /// inside it.
    pub fn remove(&mut self, id: &str) -> Result<Vec<ContentNode>, DirectoryError> {
        self.node(id)?;
        let doomed = self.subtree_ids(id);
        let doomed_set: BTreeSet<&str> = doomed.iter().map(String::as_str).collect();
        for target in &doomed {
            if let Some(referrer) = self
                .referrers(target)
                .into_iter()
                .find(|r| !doomed_set.contains(r.id.as_str()))
            {
                return Err(DirectoryError::Referenced {
                    id: target.clone(),
                    referrer: referrer.id.clone(),
                });
            }
        }

        if let Some(pid) = self.nodes.get(id).and_then(|n| n.parent.clone())
            && let Some(parent) = self.nodes.get_mut(&pid)
        {
            parent.children.remove(id);
        }
        let removed: Vec<ContentNode> = doomed
            .iter()
            .filter_map(|d| self.nodes.remove(d))
            .collect();
        tracing::debug!(id, count = removed.len(), "removed content subtree");
        self.updated_at = Utc::now();
        Ok(removed)
    }

    /// Rebuild every node's `children` set from parent references.
    /// Call after deserializing or bulk edits of `nodes`.
    pub fn rebuild_children_index(&mut self) {
        for node in self.nodes.values_mut() {
            node.children.clear();
        }
        let links: Vec<(String, String)> = self
            .nodes
            .values()
            .filter_map(|n| n.parent.clone().map(|p| (p, n.id.clone())))
            .collect();
        for (parent, child) in links {
            if let Some(p) = self.nodes.get_mut(&parent) {
                p.children.insert(child);
            }
        }
    }

    /// Recompute metadata counts.
    pub fn refresh_metadata(&mut self) {
        let mut metadata = TreeMetadata::default();
        for node in self.nodes.values() {
            match node.kind() {
                ContentKind::Directory => metadata.directories += 1,
                ContentKind::Organization => {
                    metadata.organizations += 1;
                    let depth = self
                        .lineage(&node.id)
                        .map(|chain| {
                            chain
                                .iter()
                                .filter(|n| n.kind() == ContentKind::Organization)
                                .count()
                        })
                        .unwrap_or(0);
                    metadata.max_organization_depth = metadata.max_organization_depth.max(depth);
                }
                ContentKind::Person => metadata.persons += 1,
                ContentKind::Position => metadata.positions += 1,
                ContentKind::HeldPosition => metadata.held_positions += 1,
            }
        }
        self.metadata = metadata;
        self.updated_at = Utc::now();
    }
}

fn validate_id(id: &str) -> Result<(), DirectoryError> {
    if id.trim().is_empty() || id.contains('/') || id.trim() != id {
        return Err(DirectoryError::InvalidId(id.to_string()));
    }
    Ok(())
}

pub(crate) fn check_required_fields(data: &ContentData) -> Result<(), DirectoryError> {
    let missing = match data {
        ContentData::Directory(d) if d.title.trim().is_empty() => Some("title"),
        ContentData::Organization(o) if o.title.trim().is_empty() => Some("title"),
        ContentData::Person(p) if p.lastname.trim().is_empty() => Some("lastname"),
        ContentData::Position(p) if p.title.trim().is_empty() => Some("title"),
        ContentData::HeldPosition(h) if h.position.trim().is_empty() => Some("position"),
        _ => None,
    };
    match missing {
        Some(field) => Err(DirectoryError::MissingField {
            kind: data.kind(),
            field,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_tree() -> ContactTree {
        let mut tree = ContactTree::new();
        let mut directory = DirectoryData::new("Directory");
        directory.organization_types = vec![Term::from_name("Army")];
        directory.organization_levels = vec![Term::from_name("Corps")];
        directory.position_types = vec![Term::from_name("General")];
        tree.add_directory("dir", directory).unwrap();
        tree.add_organization("dir", "army", OrganizationData::new("Army", "army"))
            .unwrap();
        tree.add_organization("army", "corps", OrganizationData::new("Corps", "corps"))
            .unwrap();
        tree
    }

    #[test]
    fn test_create_links_children() {
        let tree = small_tree();
        assert!(tree.contains("dir", "army"));
        assert!(tree.contains("army", "corps"));
        assert!(!tree.contains("dir", "corps"));
        assert_eq!(tree.parent("corps").map(|n| n.id.as_str()), Some("army"));
    }

    #[test]
    fn test_invalid_ids() {
        let mut tree = small_tree();
        for bad in ["", "a/b", " padded"] {
            let err = tree
                .add_organization("dir", bad, OrganizationData::new("X", "army"))
                .unwrap_err();
            assert_eq!(err, DirectoryError::InvalidId(bad.to_string()));
        }
    }

    #[test]
    fn test_duplicate_id() {
        let mut tree = small_tree();
        let err = tree
            .add_organization("dir", "army", OrganizationData::new("Army 2", "army"))
            .unwrap_err();
        assert_eq!(err, DirectoryError::DuplicateId("army".to_string()));
    }

    #[test]
    fn test_missing_parent() {
        let mut tree = small_tree();
        let err = tree
            .add_person("nowhere", "p", PersonData::new("Doe"))
            .unwrap_err();
        assert_eq!(err, DirectoryError::NotFound("nowhere".to_string()));
    }

    #[test]
    fn test_missing_required_field() {
        let mut tree = small_tree();
        let err = tree.add_person("dir", "p", PersonData::new(" ")).unwrap_err();
        assert_eq!(
            err,
            DirectoryError::MissingField {
                kind: ContentKind::Person,
                field: "lastname",
            }
        );
    }

    #[test]
    fn test_sub_organization_uses_levels() {
        let mut tree = small_tree();
        // "army" is a type, not a level
        let err = tree
            .add_organization("corps", "div", OrganizationData::new("Division", "army"))
            .unwrap_err();
        assert!(matches!(err, DirectoryError::UnknownTerm { .. }));

        tree.enforce_vocabularies = false;
        assert!(
            tree.add_organization("corps", "div", OrganizationData::new("Division", "army"))
                .is_ok()
        );
    }

    #[test]
    fn test_held_position_must_reference_position_or_organization() {
        let mut tree = small_tree();
        tree.add_person("dir", "p", PersonData::new("Doe")).unwrap();
        let err = tree
            .add_held_position("p", "hp", HeldPositionData::new("dir"))
            .unwrap_err();
        assert_eq!(
            err,
            DirectoryError::InvalidReference {
                id: "hp".to_string(),
                target: "dir".to_string(),
            }
        );
        tree.add_held_position("p", "hp", HeldPositionData::new("corps"))
            .unwrap();
        assert_eq!(tree.title("hp").unwrap(), "Corps");
    }

    #[test]
    fn test_lineage_and_physical_path() {
        let tree = small_tree();
        assert_eq!(
            tree.physical_path("corps").unwrap(),
            vec!["dir".to_string(), "army".to_string(), "corps".to_string()]
        );
        assert_eq!(tree.physical_path("dir").unwrap(), vec!["dir".to_string()]);
        assert!(tree.physical_path("missing").is_err());
    }

    #[test]
    fn test_lineage_survives_parent_cycle() {
        let mut tree = small_tree();
        if let Some(army) = tree.nodes.get_mut("army") {
            army.parent = Some("corps".to_string());
        }
        let lineage = tree.lineage("corps").unwrap();
        assert_eq!(lineage.len(), 2);
    }

    #[test]
    fn test_remove_subtree() {
        let mut tree = small_tree();
        let removed = tree.remove("army").unwrap();
        assert_eq!(removed.len(), 2);
        assert!(tree.get("corps").is_none());
        assert!(!tree.contains("dir", "army"));
    }

    #[test]
    fn test_remove_refused_while_referenced() {
        let mut tree = small_tree();
        tree.add_person("dir", "p", PersonData::new("Doe")).unwrap();
        tree.add_held_position("p", "hp", HeldPositionData::new("corps"))
            .unwrap();
        let err = tree.remove("army").unwrap_err();
        assert_eq!(
            err,
            DirectoryError::Referenced {
                id: "corps".to_string(),
                referrer: "hp".to_string(),
            }
        );
        // removing the person takes its held position along
        assert_eq!(tree.remove("p").unwrap().len(), 2);
        assert!(tree.remove("army").is_ok());
    }

    #[test]
    fn test_rebuild_children_index() {
        let mut tree = small_tree();
        for node in tree.nodes.values_mut() {
            node.children.clear();
        }
        assert!(!tree.contains("dir", "army"));
        tree.rebuild_children_index();
        assert!(tree.contains("dir", "army"));
        assert!(tree.contains("army", "corps"));
    }

    #[test]
    fn test_refresh_metadata() {
        let mut tree = small_tree();
        tree.add_position("corps", "gen", PositionData::new("General", "general"))
            .unwrap();
        tree.refresh_metadata();
        assert_eq!(tree.metadata.directories, 1);
        assert_eq!(tree.metadata.organizations, 2);
        assert_eq!(tree.metadata.positions, 1);
        assert_eq!(tree.metadata.max_organization_depth, 2);
    }

    #[test]
    fn test_add_term() {
        let mut tree = small_tree();
        assert!(
            tree.add_term("dir", VocabularyKind::OrganizationLevels, Term::from_name("Division"))
                .unwrap()
        );
        assert!(
            tree.add_organization("corps", "div", OrganizationData::new("Division", "division"))
                .is_ok()
        );
        let err = tree
            .add_term("army", VocabularyKind::PositionTypes, Term::from_name("Major"))
            .unwrap_err();
        assert!(matches!(err, DirectoryError::WrongKind { .. }));
    }
}
