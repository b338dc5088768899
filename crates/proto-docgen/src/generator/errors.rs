use strum::Display;
use thiserror::Error;

/// Which end of an RPC a message lookup was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum MessageRole {
  Request,
  Response,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
  #[error("type '{0}' is neither a known message nor a known enum")]
  UnknownType(String),
}

/// Failure to build the documentation model of a single method.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocgenError {
  #[error("{service}.{method}: {role} type '{type_name}' is not a known message")]
  SchemaLookup {
    service: String,
    method: String,
    role: MessageRole,
    type_name: String,
  },
  #[error("{service}.{method}: referenced type '{type_name}' is neither a known message nor a known enum")]
  TypeResolution {
    service: String,
    method: String,
    type_name: String,
  },
}
