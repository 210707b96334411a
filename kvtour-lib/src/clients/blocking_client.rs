//! Minimal blocking Redis client implementation
//!
//! Provides a blocking connect and methods for issuing the supported commands.

use crate::cmd::Protocol;
use crate::clients::Client;
use crate::{Config, Frame, KvStore, Pipeline};
use tokio::runtime::Runtime;

/// Established connection with a Redis server.
///
/// Wraps the async [`Client`] together with a current-thread runtime; every
/// call blocks the caller until the reply arrives or the timeout elapses.
///
/// Must not be used from inside another tokio runtime.
#[derive(Debug)]
pub struct BlockingClient {
    /// The asynchronous `Client`.
    inner: Client,

    /// A `current_thread` runtime for executing operations on the
    /// asynchronous client in a blocking manner.
    rt: Runtime,
}

impl BlockingClient {
    /// Establish a connection with the Redis server described by `config`.
    pub fn connect(config: &Config) -> crate::Result<BlockingClient> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let inner = rt.block_on(Client::connect(config))?;

        Ok(BlockingClient { inner, rt })
    }
}

impl KvStore for BlockingClient {
    fn request<C: Protocol>(&mut self, cmd: C) -> crate::Result<C::Output> {
        self.rt.block_on(self.inner.request(cmd))
    }

    fn submit(&mut self, pipeline: Pipeline) -> crate::Result<Vec<Frame>> {
        self.rt.block_on(self.inner.submit(pipeline))
    }
}
