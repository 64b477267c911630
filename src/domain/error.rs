use super::handler_id::HandlerId;
use thiserror::Error;

/// Programmer-usage errors raised by the router and the field builder.
///
/// The router reports each of these as a Critical assertion message before
/// handing it back to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    #[error("could not find handler with id '{id}' for domain \"{domain}\"")]
    HandlerNotFound { domain: String, id: HandlerId },

    #[error("handler for domain \"{domain}\" registered with an empty level mask")]
    EmptyLevelMask { domain: String },

    #[error("field key '{key}' is reserved")]
    ReservedKey { key: String },

    #[error("invalid field key '{key}'")]
    InvalidKey { key: String },

    #[error("structured log call without a MESSAGE field")]
    MissingMessage,

    #[error("log call with an empty message")]
    EmptyMessage,
}
