use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum OrchestratorError {
    #[error("app '{id}' is already registered")]
    DuplicateApp { id: String },

    #[error("app '{id}' is not registered")]
    UnknownApp { id: String },

    #[error("app '{id}' has an empty mount id")]
    MissingMount { id: String },
}
