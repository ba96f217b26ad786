//! External command construction and execution.

pub mod command;

pub use command::{execute_chain, ChainResult, CommandChain, CommandSpec};
