use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use models::errors::ModelError;
use models::record::{self, Column, Entity};
use models::user::{StorageMeta, User};

use super::backend::DocumentBackend;

/// Production backend over the `record` table. Replace and remove are
/// compare-and-swap on the revision stamp so a concurrent writer
/// surfaces as a conflict instead of a lost update.
pub struct SeaOrmBackend {
    db: DatabaseConnection,
}

impl SeaOrmBackend {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn parse_key(key: &str) -> Result<Uuid, ModelError> {
    key.parse()
        .map_err(|e| ModelError::Query(format!("malformed storage key {}: {}", key, e)))
}

#[async_trait]
impl DocumentBackend for SeaOrmBackend {
    async fn insert(&self, doc: &User) -> Result<StorageMeta, ModelError> {
        let am = record::ActiveModel {
            key: Set(Uuid::new_v4()),
            revision: Set(record::new_revision()),
            name: Set(doc.name.clone()),
            age: Set(doc.age),
        };
        let created = am.insert(&self.db).await?;
        Ok(created.meta())
    }

    async fn fetch(&self, key: &str) -> Result<Option<(User, StorageMeta)>, ModelError> {
        let parsed = parse_key(key)?;
        let found = Entity::find_by_id(parsed).one(&self.db).await?;
        Ok(found.map(|m| (m.body(), m.meta())))
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<(User, StorageMeta)>, ModelError> {
        // `name` is bound as a statement parameter; it never appears in
        // the query text.
        let rows = Entity::find()
            .filter(Column::Name.eq(name))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|m| (m.body(), m.meta())).collect())
    }

    async fn list(&self) -> Result<Vec<(User, StorageMeta)>, ModelError> {
        let rows = Entity::find().all(&self.db).await?;
        Ok(rows.into_iter().map(|m| (m.body(), m.meta())).collect())
    }

    async fn replace(
        &self,
        key: &str,
        expected_revision: &str,
        doc: &User,
    ) -> Result<Option<StorageMeta>, ModelError> {
        let parsed = parse_key(key)?;
        let new_revision = record::new_revision();
        let res = Entity::update_many()
            .col_expr(Column::Revision, Expr::value(new_revision.clone()))
            .col_expr(Column::Name, Expr::value(doc.name.clone()))
            .col_expr(Column::Age, Expr::value(doc.age))
            .filter(Column::Key.eq(parsed))
            .filter(Column::Revision.eq(expected_revision))
            .exec(&self.db)
            .await?;
        if res.rows_affected == 0 {
            return Ok(None);
        }
        Ok(Some(StorageMeta { key: key.to_string(), revision: new_revision }))
    }

    async fn remove(
        &self,
        key: &str,
        expected_revision: &str,
    ) -> Result<Option<StorageMeta>, ModelError> {
        let parsed = parse_key(key)?;
        let res = Entity::delete_many()
            .filter(Column::Key.eq(parsed))
            .filter(Column::Revision.eq(expected_revision))
            .exec(&self.db)
            .await?;
        if res.rows_affected == 0 {
            return Ok(None);
        }
        Ok(Some(StorageMeta {
            key: key.to_string(),
            revision: expected_revision.to_string(),
        }))
    }

    async fn drop_all(&self) -> Result<(), ModelError> {
        Entity::delete_many().exec(&self.db).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::Result;
    use migration::MigratorTrait;

    use crate::store::{LastTouched, UserStore};

    use super::*;

    /// Full protocol pass against a real database. Skips when no
    /// DATABASE_URL is configured or the database is unreachable.
    #[tokio::test]
    async fn protocol_roundtrip_on_postgres() -> Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
            return Ok(());
        }
        let mut cfg = configs::DatabaseConfig::default();
        cfg.normalize_from_env();
        cfg.validate()?;
        let db = match models::db::connect(&cfg).await {
            Ok(db) => db,
            Err(e) => {
                eprintln!("skip: cannot connect to db: {}", e);
                return Ok(());
            }
        };
        migration::Migrator::up(&db, None).await?;

        let store = UserStore::new(
            Arc::new(SeaOrmBackend::new(db)),
            Arc::new(LastTouched::default()),
        );

        let name = format!("pg_test_{}", Uuid::new_v4());
        let user = User { name: name.clone(), age: 30 };

        let outcome = store.create(&user).await?;
        assert!(outcome.was_created());

        let (read, meta) = store.read_one(&name).await?;
        assert_eq!(read, user);
        assert_eq!(meta.key, outcome.meta().key);

        let updated = store.update(&User { name: name.clone(), age: 22 }).await?;
        assert_ne!(updated.revision, outcome.meta().revision);
        let (read, _) = store.read_one(&name).await?;
        assert_eq!(read.age, 22);

        store.delete(&name).await?;
        assert!(store.read_one(&name).await.is_err());
        Ok(())
    }
}
