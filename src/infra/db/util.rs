use crate::application::repos::RepoError;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const INVALID_TEXT_REPRESENTATION: &str = "22P02";
const QUERY_CANCELED: &str = "57014";
const INTEGRITY_CLASS: &str = "23";

pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::RowNotFound => RepoError::NotFound,
        sqlx::Error::Database(db) => {
            let code = db.code();
            map_database_error(code.as_deref(), db.constraint(), db.message())
        }
        other => RepoError::from_persistence(other),
    }
}

/// Classifies a Postgres error by SQLSTATE.
fn map_database_error(code: Option<&str>, constraint: Option<&str>, message: &str) -> RepoError {
    match code {
        Some(UNIQUE_VIOLATION) => RepoError::Duplicate {
            constraint: constraint.unwrap_or("unknown").to_string(),
        },
        Some(FOREIGN_KEY_VIOLATION) | Some(INVALID_TEXT_REPRESENTATION) => {
            RepoError::InvalidInput {
                message: message.to_string(),
            }
        }
        Some(QUERY_CANCELED) => RepoError::Timeout,
        Some(code) if code.starts_with(INTEGRITY_CLASS) => RepoError::Integrity {
            message: message.to_string(),
        },
        _ => RepoError::from_persistence(message),
    }
}
