use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("connection error: {0}")]
    Connection(String),
    #[error("query error: {0}")]
    Query(String),
}

impl From<DbErr> for ModelError {
    fn from(e: DbErr) -> Self {
        // Connection-level failures stay distinguishable from query
        // failures: the latter indicate a code defect once every filter
        // value is parameter-bound.
        match e {
            DbErr::Conn(err) => ModelError::Connection(err.to_string()),
            DbErr::ConnectionAcquire(err) => ModelError::Connection(err.to_string()),
            other => ModelError::Query(other.to_string()),
        }
    }
}
