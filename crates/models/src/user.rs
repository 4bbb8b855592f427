use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Wire-level entity. The `name` is the identifying key; uniqueness is
/// enforced by lookup-before-create, not by the schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub age: i32,
}

/// Storage handle of a single record: the opaque key the store assigned
/// and the revision stamp of the last write to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageMeta {
    pub key: String,
    pub revision: String,
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("name required".into()));
    }
    Ok(())
}

pub fn validate(user: &User) -> Result<(), ModelError> {
    validate_name(&user.name)?;
    if user.age < 0 {
        return Err(ModelError::Validation("age must be non-negative".into()));
    }
    Ok(())
}
