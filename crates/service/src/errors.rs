use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    /// Uniqueness or referential-integrity guard refused the operation.
    #[error("{0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
    #[error(transparent)]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn db(e: impl ToString) -> Self { Self::Db(e.to_string()) }

    /// True for failures the caller caused (bad input, missing ids, guards).
    pub fn is_client_error(&self) -> bool {
        match self {
            ServiceError::Validation(_) | ServiceError::NotFound(_) | ServiceError::Conflict(_) => true,
            ServiceError::Model(models::errors::ModelError::Validation(_)) => true,
            ServiceError::Db(_) | ServiceError::Model(models::errors::ModelError::Db(_)) => false,
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self { Self::Db(e.to_string()) }
}
