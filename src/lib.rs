//! Integration harness for containerised Kafka Connect topologies.
//!
//! Brings a compose-defined cluster up, runs scenario steps against it
//! through [`CommandRunner`], and waits for eventually-consistent state with
//! [`poll_until_converged`].

mod config;
mod connect;
mod errors;
mod harness;
mod poll;
pub mod constants;
pub mod utils;

pub use config::*;
pub use connect::*;
pub use errors::*;
pub use harness::*;
pub use poll::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
