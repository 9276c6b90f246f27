use std::io;

use thiserror::Error;

/// The error type of the whole engine. Storage faults are propagated
/// unwrapped, user mistakes are reported as [`UserError`]s.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] heed::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    User(#[from] UserError),
}

#[derive(Error, Debug)]
pub enum UserError {
    #[error("document primary key is empty")]
    EmptyPrimaryKey,
    #[error("database path is empty")]
    EmptyStorePath,
}
