//! Organization chain resolution and composite titles.
//!
//! An organization's chain is the run of Organization ancestors ending at the
//! organization itself, root first. Positions and held positions resolve through the
//! organization they belong to:
//!
//! - organization: `Armée de terre / Corps A / Division Alpha`
//! - position: `Général de l'armée de terre (Armée de terre)`
//! - held position: `Général Charles De Gaulle (Armée de terre - Général de l'armée de terre)`

use crate::config::{HeldPositionContext, TitlesConfig};
use crate::content::{ContentData, ContentKind, ContentNode};
use crate::error::DirectoryError;
use crate::tree::ContactTree;

impl ContactTree {
    /// The organization `id` belongs to: itself for an organization, the owning
    /// organization for a position, the referenced one for a held position.
    /// `None` for directories and persons.
    pub fn get_organization(&self, id: &str) -> Result<Option<&ContentNode>, DirectoryError> {
        let node = self.node(id)?;
        match &node.data {
            ContentData::Organization(_) => Ok(Some(node)),
            ContentData::Position(_) => Ok(self
                .parent(id)
                .filter(|p| p.kind() == ContentKind::Organization)),
            ContentData::HeldPosition(held) => {
                let target = self.node(&held.position)?;
                match target.kind() {
                    ContentKind::Organization => Ok(Some(target)),
                    ContentKind::Position => Ok(self
                        .parent(&target.id)
                        .filter(|p| p.kind() == ContentKind::Organization)),
                    _ => Err(DirectoryError::InvalidReference {
                        id: id.to_string(),
                        target: held.position.clone(),
                    }),
                }
            }
            ContentData::Directory(_) | ContentData::Person(_) => Ok(None),
        }
    }

    /// The person holding a held position.
    pub fn get_person(&self, held_position: &str) -> Result<&ContentNode, DirectoryError> {
        self.node_of_kind(held_position, ContentKind::HeldPosition)?;
        let parent = self
            .parent(held_position)
            .ok_or_else(|| DirectoryError::NotFound(held_position.to_string()))?;
        self.node_of_kind(&parent.id, ContentKind::Person)
    }

    /// The position a held position references, or `None` when it references an
    /// organization directly.
    pub fn get_position(&self, held_position: &str) -> Result<Option<&ContentNode>, DirectoryError> {
        let node = self.node_of_kind(held_position, ContentKind::HeldPosition)?;
        let Some(held) = node.as_held_position() else {
            return Ok(None);
        };
        let target = self.node(&held.position)?;
        Ok((target.kind() == ContentKind::Position).then_some(target))
    }

    /// Organizations from the root organization down to the organization of `id`,
    /// inclusive. Empty for content outside any organization.
    pub fn get_organizations_chain(&self, id: &str) -> Result<Vec<&ContentNode>, DirectoryError> {
        let Some(organization) = self.get_organization(id)? else {
            return Ok(Vec::new());
        };
        let lineage = self.lineage(&organization.id)?;
        // The chain is the trailing run of organizations: stop at the first
        // non-organization ancestor walking upward.
        let start = lineage
            .iter()
            .rposition(|n| n.kind() != ContentKind::Organization)
            .map_or(0, |i| i + 1);
        Ok(lineage[start..].to_vec())
    }

    pub fn get_root_organization(&self, id: &str) -> Result<&ContentNode, DirectoryError> {
        let chain = self.get_organizations_chain(id)?;
        match chain.first().copied() {
            Some(root) => Ok(root),
            None => Err(DirectoryError::WrongKind {
                id: id.to_string(),
                expected: ContentKind::Organization,
                found: self.node(id)?.kind(),
            }),
        }
    }

    pub fn get_organizations_titles(&self, id: &str) -> Result<Vec<String>, DirectoryError> {
        Ok(self
            .get_organizations_chain(id)?
            .into_iter()
            .map(ContentNode::title)
            .collect())
    }

    /// Full title with the default separators.
    pub fn get_full_title(&self, id: &str) -> Result<String, DirectoryError> {
        self.get_full_title_with(id, &TitlesConfig::default())
    }

    pub fn get_full_title_with(
        &self,
        id: &str,
        titles: &TitlesConfig,
    ) -> Result<String, DirectoryError> {
        let node = self.node(id)?;
        match &node.data {
            ContentData::Organization(_) => Ok(self
                .get_organizations_titles(id)?
                .join(&titles.organization_separator)),
            ContentData::Position(pos) => match self.get_organization(id)? {
                Some(org) => Ok(format!(
                    "{} ({})",
                    pos.title,
                    self.get_full_title_with(&org.id, titles)?
                )),
                None => Ok(pos.title.clone()),
            },
            ContentData::HeldPosition(_) => self.held_position_full_title(id, titles),
            ContentData::Directory(_) | ContentData::Person(_) => Ok(node.title()),
        }
    }

    fn held_position_full_title(
        &self,
        id: &str,
        titles: &TitlesConfig,
    ) -> Result<String, DirectoryError> {
        let person = self.get_person(id)?.title();
        let organization = match titles.held_position_context {
            HeldPositionContext::Root => self.get_root_organization(id)?.title(),
            HeldPositionContext::Chain => self
                .get_organizations_titles(id)?
                .join(&titles.organization_separator),
        };
        Ok(match self.get_position(id)? {
            Some(position) => format!(
                "{} ({}{}{})",
                person,
                organization,
                titles.position_separator,
                position.title()
            ),
            None => format!("{} ({})", person, organization),
        })
    }
}
