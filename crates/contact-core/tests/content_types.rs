use chrono::NaiveDate;
use contact_core::content::*;
use contact_core::error::DirectoryError;
use contact_core::sample::{SAMPLE_DIRECTORY_ID, military_directory};
use contact_core::tree::ContactTree;
use contact_core::vocabulary::Term;

fn directory() -> ContactTree {
    military_directory().unwrap()
}

fn ids(nodes: Vec<&ContentNode>) -> Vec<&str> {
    nodes.into_iter().map(|n| n.id.as_str()).collect()
}

#[test]
fn test_directory() {
    let tree = directory();
    let node = tree.node(SAMPLE_DIRECTORY_ID).unwrap();
    assert_eq!(node.title(), "Military directory");

    let data = node.as_directory().unwrap();
    assert!(data.position_types.contains(&Term::new("Colonel", "colonel")));
    assert!(data.organization_types.contains(&Term::new("Air force", "air_force")));
    assert!(data.organization_levels.contains(&Term::new("Regiment", "regiment")));
}

#[test]
fn test_person() {
    let tree = directory();
    assert!(tree.contains(SAMPLE_DIRECTORY_ID, "degaulle"));
    let degaulle = tree.node("degaulle").unwrap();
    assert_eq!(degaulle.title(), "Général Charles De Gaulle");

    let person = degaulle.as_person().unwrap();
    assert_eq!(person.lastname, "De Gaulle");
    assert_eq!(person.firstname.as_deref(), Some("Charles"));
    assert_eq!(person.birthday, NaiveDate::from_ymd_opt(1901, 11, 22));
}

#[test]
fn test_person_without_firstname() {
    let tree = directory();
    assert_eq!(tree.title("pepper").unwrap(), "Sergent Pepper");
}

#[test]
fn test_person_without_person_title() {
    let tree = directory();
    assert_eq!(tree.title("rambo").unwrap(), "John Rambo");
}

#[test]
fn test_person_cannot_be_created_at_top_level() {
    let mut tree = directory();
    let err = tree
        .create(None, "error", ContentData::Person(PersonData::new("Casper")))
        .unwrap_err();
    assert_eq!(
        err,
        DirectoryError::InvalidContainer {
            kind: ContentKind::Person,
            container: None,
        }
    );
    assert!(tree.get("error").is_none());
}

#[test]
fn test_person_cannot_be_created_in_organization() {
    let mut tree = directory();
    let err = tree
        .add_person("armeedeterre", "casper", PersonData::new("Casper"))
        .unwrap_err();
    assert!(matches!(err, DirectoryError::InvalidContainer { .. }));
}

#[test]
fn test_organization() {
    let tree = directory();
    assert!(tree.contains(SAMPLE_DIRECTORY_ID, "armeedeterre"));
    assert_eq!(tree.title("armeedeterre").unwrap(), "Armée de terre");
    assert!(tree.contains("armeedeterre", "corpsa"));
    assert!(tree.contains("armeedeterre", "corpsb"));
    assert!(tree.contains("corpsa", "divisionalpha"));
    assert!(tree.contains("corpsa", "divisionbeta"));
    assert!(tree.contains("divisionalpha", "regimenth"));
    assert!(tree.contains("regimenth", "brigadelh"));
    assert!(
        tree.physical_path("divisionalpha")
            .unwrap()
            .contains(&"armeedeterre".to_string())
    );
    assert!(
        tree.physical_path("brigadelh")
            .unwrap()
            .contains(&"armeedeterre".to_string())
    );
}

#[test]
fn test_get_organizations_chain() {
    let tree = directory();
    assert_eq!(
        ids(tree.get_organizations_chain("armeedeterre").unwrap()),
        ["armeedeterre"]
    );
    assert_eq!(
        ids(tree.get_organizations_chain("divisionalpha").unwrap()),
        ["armeedeterre", "corpsa", "divisionalpha"]
    );
}

#[test]
fn test_get_root_organization() {
    let tree = directory();
    for org in [
        "armeedeterre",
        "corpsa",
        "corpsb",
        "divisionalpha",
        "regimenth",
        "brigadelh",
    ] {
        let root = tree.get_root_organization(org).unwrap();
        assert_eq!(root.id, "armeedeterre");
        // idempotent
        assert_eq!(tree.get_root_organization(&root.id).unwrap().id, root.id);
    }
}

#[test]
fn test_get_organizations_titles() {
    let tree = directory();
    assert_eq!(
        tree.get_organizations_titles("corpsa").unwrap(),
        ["Armée de terre", "Corps A"]
    );
    assert_eq!(
        tree.get_organizations_titles("divisionalpha").unwrap(),
        ["Armée de terre", "Corps A", "Division Alpha"]
    );
    assert_eq!(
        tree.get_organizations_titles("brigadelh").unwrap(),
        [
            "Armée de terre",
            "Corps A",
            "Division Alpha",
            "Régiment H",
            "Brigade LH"
        ]
    );
}

#[test]
fn test_organization_full_title() {
    let tree = directory();
    assert_eq!(tree.get_full_title("armeedeterre").unwrap(), "Armée de terre");
    assert_eq!(
        tree.get_full_title("brigadelh").unwrap(),
        "Armée de terre / Corps A / Division Alpha / Régiment H / Brigade LH"
    );
}

#[test]
fn test_position() {
    let tree = directory();
    assert!(tree.contains("armeedeterre", "general_adt"));
    let general = tree.node("general_adt").unwrap();
    assert_eq!(general.title(), "Général de l'armée de terre");
    assert_eq!(general.as_position().unwrap().position_type, "general");
}

#[test]
fn test_position_full_title() {
    let tree = directory();
    assert_eq!(
        tree.get_full_title("general_adt").unwrap(),
        "Général de l'armée de terre (Armée de terre)"
    );
    assert_eq!(
        tree.get_full_title("sergent_lh").unwrap(),
        "Sergent de la brigade LH (Armée de terre / Corps A / Division Alpha / Régiment H / Brigade LH)"
    );
}

#[test]
fn test_held_position() {
    let tree = directory();
    assert!(tree.contains("degaulle", "adt"));
    assert_eq!(tree.title("adt").unwrap(), "Armée de terre");
    assert!(tree.contains("degaulle", "gadt"));
    assert_eq!(tree.title("gadt").unwrap(), "Général de l'armée de terre");
    assert!(tree.contains("pepper", "sergent_pepper"));
    assert_eq!(tree.title("sergent_pepper").unwrap(), "Sergent de la brigade LH");
}

#[test]
fn test_held_position_full_title() {
    let tree = directory();
    assert_eq!(
        tree.get_full_title("adt").unwrap(),
        "Général Charles De Gaulle (Armée de terre)"
    );
    assert_eq!(
        tree.get_full_title("gadt").unwrap(),
        "Général Charles De Gaulle (Armée de terre - Général de l'armée de terre)"
    );
    assert_eq!(
        tree.get_full_title("sergent_pepper").unwrap(),
        "Sergent Pepper (Armée de terre - Sergent de la brigade LH)"
    );
}

#[test]
fn test_held_position_person_position_and_organization() {
    let tree = directory();
    assert_eq!(tree.get_person("gadt").unwrap().id, "degaulle");
    assert_eq!(tree.get_position("gadt").unwrap().unwrap().id, "general_adt");
    assert!(tree.get_position("adt").unwrap().is_none());
    assert_eq!(
        tree.get_organization("adt").unwrap().unwrap().id,
        "armeedeterre"
    );
    assert_eq!(
        tree.get_organization("sergent_pepper").unwrap().unwrap().id,
        "brigadelh"
    );
}

#[test]
fn test_unknown_vocabulary_token() {
    let mut tree = directory();
    let err = tree
        .add_position("corpsb", "colonel_b", PositionData::new("Colonel du corps B", "colonl"))
        .unwrap_err();
    assert_eq!(
        err,
        DirectoryError::UnknownTerm {
            vocabulary: "position type".to_string(),
            token: "colonl".to_string(),
            suggestion: Some("colonel".to_string()),
        }
    );
    // root organizations draw from types, sub-organizations from levels
    assert!(
        tree.add_organization(SAMPLE_DIRECTORY_ID, "marine", OrganizationData::new("Marine", "marine"))
            .is_ok()
    );
    assert!(
        tree.add_organization("marine", "escadre", OrganizationData::new("Escadre", "marine"))
            .is_err()
    );
}
