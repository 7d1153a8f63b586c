//! A small military directory used to seed new projects and as a test fixture.

use chrono::NaiveDate;

use crate::content::{
    DirectoryData, HeldPositionData, OrganizationData, PersonData, PositionData,
};
use crate::error::DirectoryError;
use crate::tree::ContactTree;
use crate::vocabulary::Term;

pub const SAMPLE_DIRECTORY_ID: &str = "mydirectory";

pub fn military_vocabularies(directory: &mut DirectoryData) {
    directory.position_types = vec![
        Term::new("Général", "general"),
        Term::new("Sergent", "sergent"),
        Term::new("Colonel", "colonel"),
        Term::new("Lieutenant", "lieutenant"),
        Term::new("Capitaine", "capitaine"),
        Term::new("Amiral", "amiral"),
    ];
    directory.organization_types = vec![
        Term::new("Marine", "marine"),
        Term::new("Air force", "air_force"),
        Term::new("Armée", "armee"),
    ];
    directory.organization_levels = vec![
        Term::new("Corps", "corps"),
        Term::new("Division", "division"),
        Term::new("Regiment", "regiment"),
        Term::new("Brigade", "brigade"),
        Term::new("Squad", "squad"),
    ];
}

/// Build the sample directory:
///
/// ```text
/// mydirectory
/// ├── armeedeterre            Armée de terre
/// │   ├── corpsa              Corps A
/// │   │   ├── divisionalpha   Division Alpha
/// │   │   │   └── regimenth   Régiment H
/// │   │   │       └── brigadelh           Brigade LH
/// │   │   │           └── sergent_lh      Sergent de la brigade LH
/// │   │   └── divisionbeta    Division Beta
/// │   ├── corpsb              Corps B
/// │   └── general_adt         Général de l'armée de terre
/// ├── degaulle                Général Charles De Gaulle
/// │   ├── adt     -> armeedeterre
/// │   └── gadt    -> general_adt
/// ├── pepper                  Sergent Pepper
/// │   └── sergent_pepper -> sergent_lh
/// └── rambo                   John Rambo
/// ```
pub fn military_directory() -> Result<ContactTree, DirectoryError> {
    let mut tree = ContactTree::new();
    let mut directory = DirectoryData::new("Military directory");
    military_vocabularies(&mut directory);
    tree.add_directory(SAMPLE_DIRECTORY_ID, directory)?;

    let dir = SAMPLE_DIRECTORY_ID;
    tree.add_organization(dir, "armeedeterre", OrganizationData::new("Armée de terre", "armee"))?;
    tree.add_organization("armeedeterre", "corpsa", OrganizationData::new("Corps A", "corps"))?;
    tree.add_organization("armeedeterre", "corpsb", OrganizationData::new("Corps B", "corps"))?;
    tree.add_organization(
        "corpsa",
        "divisionalpha",
        OrganizationData::new("Division Alpha", "division"),
    )?;
    tree.add_organization(
        "corpsa",
        "divisionbeta",
        OrganizationData::new("Division Beta", "division"),
    )?;
    tree.add_organization(
        "divisionalpha",
        "regimenth",
        OrganizationData::new("Régiment H", "regiment"),
    )?;
    tree.add_organization("regimenth", "brigadelh", OrganizationData::new("Brigade LH", "brigade"))?;

    tree.add_position(
        "armeedeterre",
        "general_adt",
        PositionData::new("Général de l'armée de terre", "general"),
    )?;
    tree.add_position(
        "brigadelh",
        "sergent_lh",
        PositionData::new("Sergent de la brigade LH", "sergent"),
    )?;

    let mut degaulle = PersonData::new("De Gaulle")
        .with_firstname("Charles")
        .with_person_title("Général");
    degaulle.birthday = NaiveDate::from_ymd_opt(1901, 11, 22);
    tree.add_person(dir, "degaulle", degaulle)?;
    tree.add_person(dir, "pepper", PersonData::new("Pepper").with_person_title("Sergent"))?;
    tree.add_person(dir, "rambo", PersonData::new("Rambo").with_firstname("John"))?;

    tree.add_held_position("degaulle", "adt", HeldPositionData::new("armeedeterre"))?;
    tree.add_held_position("degaulle", "gadt", HeldPositionData::new("general_adt"))?;
    tree.add_held_position("pepper", "sergent_pepper", HeldPositionData::new("sergent_lh"))?;

    tree.refresh_metadata();
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_builds() {
        let tree = military_directory().unwrap();
        assert_eq!(tree.metadata.directories, 1);
        assert_eq!(tree.metadata.organizations, 7);
        assert_eq!(tree.metadata.persons, 3);
        assert_eq!(tree.metadata.positions, 2);
        assert_eq!(tree.metadata.held_positions, 3);
        assert_eq!(tree.metadata.max_organization_depth, 5);
    }
}
