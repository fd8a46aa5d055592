//! Objects related to reporting errors from this library

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid time of day '{}', expected HH:MM:SS", .0)]
    InvalidTimeFormat(String),

    #[error("can't update the object, no id was specified")]
    InvalidUpdateObjectNotFound,

    #[error("can't insert the object, it already exists in the database with id = {}", .0)]
    InvalidInsertObjectAlreadyExists(i64),

    #[error("Database error: unspecified")]
    DatabaseUnspecified(#[source] sqlx::Error),

    #[error("Database error: row not found")]
    DatabaseRowNotFound(#[source] sqlx::Error),
}

impl std::convert::From<sqlx::Error> for Error {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::RowNotFound => Self::DatabaseRowNotFound(value),
            _ => Self::DatabaseUnspecified(value),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
