//! Command responses
//!
//! Every command line produces exactly one [`Response`]. Responses serialize to
//! JSON objects tagged by `status`:
//!
//! ```text
//! {"status":"success","message":"Entity \"Alice\" added with label \"Person\""}
//! {"status":"error","kind":"EntityNotFound","message":"Entity \"Zed\" does not exist"}
//! ```

use crate::config::OutputFormat;
use crate::graph::{
    EntitySnapshot, GraphError, KeyRemoval, Label, Neighbor, PropertyMatch, RelationshipSnapshot,
};
use crate::protocol::command::CommandError;
use serde::Serialize;
use std::fmt;

/// Error taxonomy surfaced to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    MalformedCommand,
    DuplicateEntity,
    EntityNotFound,
    LabelNotFound,
    EndpointNotFound,
    RelationshipNotFound,
    NoMatchingType,
    NoMatchingProperty,
    NoMatch,
    NoRelationships,
    UnsupportedCommand,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<&GraphError> for ErrorKind {
    fn from(err: &GraphError) -> Self {
        match err {
            GraphError::DuplicateEntity(_) => ErrorKind::DuplicateEntity,
            GraphError::EntityNotFound(_) | GraphError::LabeledEntityNotFound { .. } => {
                ErrorKind::EntityNotFound
            }
            GraphError::LabelNotFound(_) => ErrorKind::LabelNotFound,
            GraphError::EndpointNotFound(_) => ErrorKind::EndpointNotFound,
            GraphError::RelationshipNotFound { .. } => ErrorKind::RelationshipNotFound,
            GraphError::NoMatchingType { .. } => ErrorKind::NoMatchingType,
            GraphError::NoMatchingProperty { .. } => ErrorKind::NoMatchingProperty,
            GraphError::NoMatchingEntities | GraphError::NoMatchingNeighbors { .. } => {
                ErrorKind::NoMatch
            }
            GraphError::NoRelationships(_) => ErrorKind::NoRelationships,
        }
    }
}

impl From<&CommandError> for ErrorKind {
    fn from(err: &CommandError) -> Self {
        match err {
            CommandError::Malformed { .. } => ErrorKind::MalformedCommand,
            CommandError::Unsupported(_) => ErrorKind::UnsupportedCommand,
        }
    }
}

/// Success payloads
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Message {
        message: String,
    },
    Entity(EntitySnapshot),
    Labeled {
        label: Label,
        entities: Vec<String>,
    },
    Relationship(RelationshipSnapshot),
    Related {
        name: String,
        related: Vec<Neighbor>,
    },
    Matches {
        matches: Vec<PropertyMatch>,
    },
    PropertiesDeleted {
        message: String,
        keys: Vec<KeyRemoval>,
    },
    EntityDeleted {
        message: String,
        relationships_removed: usize,
    },
}

/// Outcome of one command line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Response {
    Success(Payload),
    Error { kind: ErrorKind, message: String },
}

impl Response {
    pub fn message(message: impl Into<String>) -> Self {
        Response::Success(Payload::Message {
            message: message.into(),
        })
    }

    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Response::Error {
            kind,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error { .. })
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Response::Error { kind, .. } => Some(*kind),
            Response::Success(_) => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|err| {
            serde_json::json!({
                "status": "error",
                "kind": "Render",
                "message": err.to_string(),
            })
        })
    }

    /// Render as a single string in the requested format
    ///
    /// Field order follows declaration order and property maps keep insertion
    /// order.
    pub fn render(&self, format: OutputFormat) -> String {
        let rendered = match format {
            OutputFormat::Compact => serde_json::to_string(self),
            OutputFormat::Pretty => serde_json::to_string_pretty(self),
        };
        rendered.unwrap_or_else(|_| self.to_json().to_string())
    }
}

impl From<GraphError> for Response {
    fn from(err: GraphError) -> Self {
        Response::error(ErrorKind::from(&err), err.to_string())
    }
}

impl From<CommandError> for Response {
    fn from(err: CommandError) -> Self {
        Response::error(ErrorKind::from(&err), err.to_string())
    }
}

impl From<Payload> for Response {
    fn from(payload: Payload) -> Self {
        Response::Success(payload)
    }
}
