//! Read/write directory files from disk.

use crate::config::StorageConfig;
use crate::schema;
use crate::tree::ContactTree;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const CONTACT_DIR: &str = ".contact";
const CONTACT_FILE: &str = "directory.json";
const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Get the path to the `.contact` directory for a given project root.
pub fn contact_dir(project_root: &Path) -> PathBuf {
    project_root.join(CONTACT_DIR)
}

/// Get the path to the directory file for a given project root.
pub fn contact_file(project_root: &Path) -> PathBuf {
    contact_dir(project_root).join(CONTACT_FILE)
}

/// Check if a directory file exists for the given project root.
pub fn contact_exists(project_root: &Path) -> bool {
    contact_file(project_root).exists()
}

/// Load a tree from disk, transparently decompressing zstd content.
pub fn load(project_root: &Path) -> Result<ContactTree> {
    let path = contact_file(project_root);
    let bytes =
        fs::read(&path).with_context(|| format!("failed to read directory from {}", path.display()))?;
    let json = if bytes.starts_with(&ZSTD_MAGIC) {
        let raw = zstd::decode_all(bytes.as_slice())
            .with_context(|| format!("failed to decompress {}", path.display()))?;
        String::from_utf8(raw).context("decompressed directory is not valid UTF-8")?
    } else {
        String::from_utf8(bytes).context("directory file is not valid UTF-8")?
    };
    schema::from_json(&json)
}

/// Save a tree to disk uncompressed, creating the .contact directory if needed.
pub fn save(project_root: &Path, tree: &ContactTree) -> Result<()> {
    save_with_config(project_root, tree, &StorageConfig::default())
}

/// Save a tree to disk, compressing it when `config.compress` is set.
pub fn save_with_config(project_root: &Path, tree: &ContactTree, config: &StorageConfig) -> Result<()> {
    let dir = contact_dir(project_root);
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory {}", dir.display()))?;

    let path = contact_file(project_root);
    let json = schema::to_json(tree)?;
    let bytes = if config.compress {
        zstd::encode_all(json.as_bytes(), 0).context("failed to compress directory")?
    } else {
        json.into_bytes()
    };
    fs::write(&path, bytes).with_context(|| format!("failed to write directory to {}", path.display()))?;
    tracing::debug!(path = %path.display(), compressed = config.compress, "saved directory");

    Ok(())
}

/// Ensure .contact is in .gitignore. Returns true if it was already there.
pub fn ensure_gitignore(project_root: &Path) -> Result<bool> {
    let gitignore = project_root.join(".gitignore");

    if gitignore.exists() {
        let content = fs::read_to_string(&gitignore)?;
        if content
            .lines()
            .any(|line| line.trim() == CONTACT_DIR || line.trim() == ".contact/")
        {
            return Ok(true);
        }
        let mut new_content = content;
        if !new_content.ends_with('\n') {
            new_content.push('\n');
        }
        new_content.push_str("\n# Contact directory\n.contact/\n");
        fs::write(&gitignore, new_content)?;
    } else {
        fs::write(&gitignore, "# Contact directory\n.contact/\n")?;
    }

    Ok(false)
}
