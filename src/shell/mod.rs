//! Subprocess execution and cancellation.

pub mod cancel;
pub mod command;
pub mod fake;

pub use cancel::CancelFlag;
pub use command::{execute, CommandResult, Invocation, ProcessRunner, SystemRunner};
pub use fake::{FakeResponse, FakeRunner};
