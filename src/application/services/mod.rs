//! Application services
//!
//! Concrete services that orchestrate the parser, executor and recorder.
//! They depend on I/O boundary traits (Clock) but are themselves concrete
//! structs, not traits.

mod interpreter;

pub use interpreter::{
    FailurePolicy, Interpreter, ScriptReport, StatementReport, StatementStatus,
};
