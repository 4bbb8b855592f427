
use crate::user::{validate, validate_name, StorageMeta, User};

#[test]
fn name_validation() {
    assert!(validate_name("Piotr").is_ok());
    assert!(validate_name("").is_err());
    assert!(validate_name("   ").is_err());
}

#[test]
fn entity_validation() {
    assert!(validate(&User { name: "Piotr".into(), age: 30 }).is_ok());
    assert!(validate(&User { name: "Piotr".into(), age: -1 }).is_err());
    assert!(validate(&User { name: "".into(), age: 30 }).is_err());
}

#[test]
fn user_wire_shape() {
    let u: User = serde_json::from_str(r#"{"name":"Piotr","age":30}"#).expect("decode");
    assert_eq!(u, User { name: "Piotr".into(), age: 30 });
    // missing name must not decode
    assert!(serde_json::from_str::<User>(r#"{"age":30}"#).is_err());
}

#[test]
fn meta_is_opaque_strings() {
    let m = StorageMeta { key: "k".into(), revision: "r".into() };
    let json = serde_json::to_value(&m).expect("encode");
    assert_eq!(json["key"], "k");
    assert_eq!(json["revision"], "r");
}
