use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::{StorageMeta, User};

/// One stored document. `key` is the opaque storage key, `revision` is
/// rewritten on every replace and drives the conditional mutations.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "record")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: Uuid,
    pub revision: String,
    pub name: String,
    pub age: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn body(&self) -> User {
        User { name: self.name.clone(), age: self.age }
    }

    pub fn meta(&self) -> StorageMeta {
        StorageMeta { key: self.key.to_string(), revision: self.revision.clone() }
    }
}

/// Fresh revision stamp for a write.
pub fn new_revision() -> String {
    Uuid::new_v4().to_string()
}
