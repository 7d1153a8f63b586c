//! JSON serialization and version handling for directory files.

use crate::tree::{ContactTree, TREE_VERSION};
use anyhow::{Context, Result};
use semver::Version;

/// Validate a tree's format version: same major version as [`TREE_VERSION`].
pub fn validate_version(tree: &ContactTree) -> Result<()> {
    let current = Version::parse(TREE_VERSION).context("invalid built-in format version")?;
    let found = Version::parse(&tree.version)
        .with_context(|| format!("invalid directory format version '{}'", tree.version))?;
    if found.major != current.major {
        anyhow::bail!(
            "directory format mismatch: expected {}.x, found {}",
            current.major,
            found
        );
    }
    Ok(())
}

/// Serialize a tree to a pretty-printed JSON string.
pub fn to_json(tree: &ContactTree) -> Result<String> {
    serde_json::to_string_pretty(tree).context("failed to serialize directory to JSON")
}

/// Deserialize a tree from a JSON string and rebuild its child index.
pub fn from_json(json: &str) -> Result<ContactTree> {
    let mut tree: ContactTree =
        serde_json::from_str(json).context("failed to deserialize directory from JSON")?;
    validate_version(&tree)?;
    tree.rebuild_children_index();
    Ok(tree)
}
