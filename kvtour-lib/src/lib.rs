//! The major components are:
//! * `tour`: the walk through strings, lists, sets, hashes and a pipeline.
//! * `clients`: an async `Client` and a `BlockingClient` speaking RESP over TCP.
//! * `store`: the `KvStore` capability set the tour runs against.
//! * `memory`: an in-process `KvStore`, used by the tests.
//! * `cmd`: request builders for the supported Redis commands.
//! * `frame`: represents a single Redis protocol frame.

#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]

pub mod clients;
pub use clients::{BlockingClient, Client};

pub mod cmd;
pub use cmd::Command;

pub mod config;
pub use config::Config;

mod connection;
pub use connection::Connection;

pub mod error;
pub use error::{Error, ErrorKind, Result};

pub mod frame;
pub use frame::Frame;

pub mod memory;
pub use memory::MemoryStore;

mod parse;
use parse::Parse;

pub mod pipeline;
pub use pipeline::Pipeline;

pub mod store;
pub use store::KvStore;

pub mod tour;

/// Default port that a redis server listens on.
pub const DEFAULT_PORT: u16 = 6379;
