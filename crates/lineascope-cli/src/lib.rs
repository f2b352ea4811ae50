//! Library surface for the `lineascope` binary.

pub mod cli;
pub mod output;
pub mod snapshot;
