//! dsinterp: a command interpreter for classic data structures
//!
//! Statements such as `create arraylist with 1,2,3`, `tree.avl.insert 7` or
//! `build huffman with a:5,b:9` are parsed into canonical commands, checked
//! against the workspace and applied to one of seven structure engines.
//! Every statement is recorded in an in-memory history.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
