//! The module contains the errors the engine can return.
//!
//! Every engine operation returns the same result shape: either the value or an
//! [`EngineError`]. Business rejections ([`Validation`], [`NotFound`],
//! [`DuplicateName`], [`CategoryInUse`]) and infrastructure failures
//! ([`Unauthenticated`], [`Store`]) share that shape; callers tell them apart
//! through [`EngineError::kind`].
//!
//!  [`Validation`]: EngineError::Validation
//!  [`NotFound`]: EngineError::NotFound
//!  [`DuplicateName`]: EngineError::DuplicateName
//!  [`CategoryInUse`]: EngineError::CategoryInUse
//!  [`Unauthenticated`]: EngineError::Unauthenticated
//!  [`Store`]: EngineError::Store
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// User-facing message for every storage failure. The underlying detail is
/// logged, never surfaced.
pub const STORE_FAILURE_MESSAGE: &str = "storage is unavailable, please try again later";

/// Engine custom errors.
#[derive(Error, Debug, Clone)]
pub enum EngineError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("a category named \"{0}\" already exists")]
    DuplicateName(String),
    #[error("category \"{0}\" is still used by transactions")]
    CategoryInUse(String),
    #[error("no authenticated user")]
    Unauthenticated,
    #[error("{0}")]
    Store(String),
}

/// Discriminant of [`EngineError`], handy for presentation code and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    DuplicateName,
    CategoryInUse,
    Unauthenticated,
    Store,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::DuplicateName(_) => ErrorKind::DuplicateName,
            Self::CategoryInUse(_) => ErrorKind::CategoryInUse,
            Self::Unauthenticated => ErrorKind::Unauthenticated,
            Self::Store(_) => ErrorKind::Store,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn category_not_found() -> Self {
        Self::NotFound("category".to_string())
    }

    pub(crate) fn transaction_not_found() -> Self {
        Self::NotFound("transaction".to_string())
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        tracing::error!("store failure: {err}");
        Self::Store(STORE_FAILURE_MESSAGE.to_string())
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::DuplicateName(a), Self::DuplicateName(b)) => a == b,
            (Self::CategoryInUse(a), Self::CategoryInUse(b)) => a == b,
            (Self::Unauthenticated, Self::Unauthenticated) => true,
            (Self::Store(a), Self::Store(b)) => a == b,
            _ => false,
        }
    }
}
