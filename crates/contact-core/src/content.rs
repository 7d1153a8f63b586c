//! Content model for directory nodes.
//!
//! Every piece of content is a [`ContentNode`]: an id, a parent back-reference and
//! the kind-specific fields in [`ContentData`]. Children are a derived index rebuilt
//! from parent references.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::vocabulary::Term;

/// The kind of a content node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Directory,
    Organization,
    Person,
    Position,
    HeldPosition,
}

impl ContentKind {
    pub const ALL: [ContentKind; 5] = [
        ContentKind::Directory,
        ContentKind::Organization,
        ContentKind::Person,
        ContentKind::Position,
        ContentKind::HeldPosition,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Directory => "directory",
            ContentKind::Organization => "organization",
            ContentKind::Person => "person",
            ContentKind::Position => "position",
            ContentKind::HeldPosition => "held_position",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "directory" => Ok(ContentKind::Directory),
            "organization" => Ok(ContentKind::Organization),
            "person" => Ok(ContentKind::Person),
            "position" => Ok(ContentKind::Position),
            "held_position" | "heldposition" => Ok(ContentKind::HeldPosition),
            other => Err(format!("unknown content kind: {other}")),
        }
    }
}

/// A node of the directory tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentNode {
    pub id: String,
    /// Id of the containing node; `None` for top-level content.
    pub parent: Option<String>,
    /// Ids of contained nodes. Rebuilt from `parent` references on load.
    #[serde(skip)]
    pub children: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub data: ContentData,
}

impl ContentNode {
    pub fn new(id: impl Into<String>, parent: Option<String>, data: ContentData) -> Self {
        Self {
            id: id.into(),
            parent,
            children: BTreeSet::new(),
            created_at: Utc::now(),
            data,
        }
    }

    pub fn kind(&self) -> ContentKind {
        self.data.kind()
    }

    /// The node's own display title.
    ///
    /// Held positions have no title of their own; they borrow the title of the
    /// content they reference, which only the tree can resolve. This returns an
    /// empty string for them; use [`crate::tree::ContactTree::title`] instead.
    pub fn title(&self) -> String {
        match &self.data {
            ContentData::Directory(d) => d.title.clone(),
            ContentData::Organization(o) => o.title.clone(),
            ContentData::Person(p) => p.display_name(),
            ContentData::Position(p) => p.title.clone(),
            ContentData::HeldPosition(_) => String::new(),
        }
    }

    pub fn as_directory(&self) -> Option<&DirectoryData> {
        match &self.data {
            ContentData::Directory(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_organization(&self) -> Option<&OrganizationData> {
        match &self.data {
            ContentData::Organization(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_person(&self) -> Option<&PersonData> {
        match &self.data {
            ContentData::Person(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_position(&self) -> Option<&PositionData> {
        match &self.data {
            ContentData::Position(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_held_position(&self) -> Option<&HeldPositionData> {
        match &self.data {
            ContentData::HeldPosition(h) => Some(h),
            _ => None,
        }
    }
}

impl PartialEq for ContentNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.parent == other.parent && self.data == other.data
    }
}

impl Eq for ContentNode {}

/// Kind-specific fields of a content node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentData {
    Directory(DirectoryData),
    Organization(OrganizationData),
    Person(PersonData),
    Position(PositionData),
    HeldPosition(HeldPositionData),
}

impl ContentData {
    pub fn kind(&self) -> ContentKind {
        match self {
            ContentData::Directory(_) => ContentKind::Directory,
            ContentData::Organization(_) => ContentKind::Organization,
            ContentData::Person(_) => ContentKind::Person,
            ContentData::Position(_) => ContentKind::Position,
            ContentData::HeldPosition(_) => ContentKind::HeldPosition,
        }
    }
}

/// A directory: the top-level container holding organizations and persons, and the
/// vocabularies their type fields draw from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryData {
    pub title: String,
    #[serde(default)]
    pub position_types: Vec<Term>,
    /// Types offered to top-level organizations.
    #[serde(default)]
    pub organization_types: Vec<Term>,
    /// Levels offered to organizations nested in another organization.
    #[serde(default)]
    pub organization_levels: Vec<Term>,
}

impl DirectoryData {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationData {
    pub title: String,
    pub organization_type: String,
}

impl OrganizationData {
    pub fn new(title: impl Into<String>, organization_type: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            organization_type: organization_type.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonData {
    pub lastname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    /// Honorific or rank shown before the name ("Général", "Sergent").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
}

impl PersonData {
    pub fn new(lastname: impl Into<String>) -> Self {
        Self {
            lastname: lastname.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_firstname(mut self, firstname: impl Into<String>) -> Self {
        self.firstname = Some(firstname.into());
        self
    }

    #[must_use]
    pub fn with_person_title(mut self, person_title: impl Into<String>) -> Self {
        self.person_title = Some(person_title.into());
        self
    }

    #[must_use]
    pub fn with_birthday(mut self, birthday: NaiveDate) -> Self {
        self.birthday = Some(birthday);
        self
    }

    /// `person_title firstname lastname`, skipping absent or blank parts.
    pub fn display_name(&self) -> String {
        [
            self.person_title.as_deref(),
            self.firstname.as_deref(),
            Some(self.lastname.as_str()),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionData {
    pub title: String,
    pub position_type: String,
}

impl PositionData {
    pub fn new(title: impl Into<String>, position_type: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            position_type: position_type.into(),
        }
    }
}

/// A person's assignment. `position` is the id of either a Position or, when the
/// person belongs to an organization without a defined role, an Organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldPositionData {
    pub position: String,
}

impl HeldPositionData {
    pub fn new(position: impl Into<String>) -> Self {
        Self {
            position: position.into(),
        }
    }
}
