//! Containment policy: which kinds of content may be created inside which containers.

use crate::content::ContentKind;
use crate::error::DirectoryError;

/// Containers a kind may be created in. `None` stands for the top level.
pub fn allowed_containers(kind: ContentKind) -> &'static [Option<ContentKind>] {
    match kind {
        ContentKind::Directory => &[None],
        ContentKind::Organization => &[
            Some(ContentKind::Directory),
            Some(ContentKind::Organization),
        ],
        ContentKind::Person => &[Some(ContentKind::Directory)],
        ContentKind::Position => &[Some(ContentKind::Organization)],
        ContentKind::HeldPosition => &[Some(ContentKind::Person)],
    }
}

/// Kinds that may be created directly inside `container`.
pub fn allowed_children(container: Option<ContentKind>) -> Vec<ContentKind> {
    ContentKind::ALL
        .into_iter()
        .filter(|kind| allowed_containers(*kind).contains(&container))
        .collect()
}

pub fn check_container(
    kind: ContentKind,
    container: Option<ContentKind>,
) -> Result<(), DirectoryError> {
    if allowed_containers(kind).contains(&container) {
        Ok(())
    } else {
        Err(DirectoryError::InvalidContainer { kind, container })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_only_in_directory() {
        assert!(check_container(ContentKind::Person, Some(ContentKind::Directory)).is_ok());
        assert_eq!(
            check_container(ContentKind::Person, None),
            Err(DirectoryError::InvalidContainer {
                kind: ContentKind::Person,
                container: None,
            })
        );
        assert!(check_container(ContentKind::Person, Some(ContentKind::Organization)).is_err());
    }

    #[test]
    fn test_allowed_children() {
        assert_eq!(allowed_children(None), vec![ContentKind::Directory]);
        assert_eq!(
            allowed_children(Some(ContentKind::Directory)),
            vec![ContentKind::Organization, ContentKind::Person]
        );
        assert_eq!(
            allowed_children(Some(ContentKind::Organization)),
            vec![ContentKind::Organization, ContentKind::Position]
        );
        assert_eq!(
            allowed_children(Some(ContentKind::Person)),
            vec![ContentKind::HeldPosition]
        );
        assert!(allowed_children(Some(ContentKind::HeldPosition)).is_empty());
    }
}
