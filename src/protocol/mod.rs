//! Textual command protocol
//!
//! One command per line, `NAME{field, field, ...}`:
//! - `command`: framing, field validation and the typed `Command` value
//! - `handler`: dispatch of a parsed command to the graph store
//! - `response`: success/error payloads and their JSON rendering
//! - `session`: the read loop that feeds lines to the handler

pub mod command;
pub mod handler;
pub mod response;
pub mod session;

// Re-export main types
pub use command::{Command, CommandError, CommandName, CommandResult};
pub use handler::CommandHandler;
pub use response::{ErrorKind, Payload, Response};
pub use session::{Session, SessionSummary};
