//! Application layer: command language and workspace services
//!
//! This layer turns statement text into commands, validates them against the
//! workspace and drives the domain engines. It depends on I/O boundary traits
//! only through injected services.

pub mod command;
pub mod error;
pub mod executor;
pub mod lexer;
pub mod parser;
pub mod recorder;
pub mod registry;
pub mod script;
pub mod services;
pub mod validator;

pub use command::{BuildInput, ClearScope, Command, Locator, Lookup, Verb};
pub use error::{ApplicationError, ApplicationResult, ErrorKind, ParseError};
pub use executor::{execute, Outcome};
pub use parser::parse_statement;
pub use recorder::{HistoryContext, HistoryEntry, OperationRecorder};
pub use registry::{Registry, Structure};
pub use script::{split_statements, Statement};
