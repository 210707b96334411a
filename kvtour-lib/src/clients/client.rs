//! Redis client implementation
//!
//! Provides an async connect and methods for issuing the supported commands.

use crate::cmd::{transaction, Protocol, Select};
use crate::pipeline::{self, Pipeline};
use crate::{Command, Config, Connection, Error, Frame};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time;
use tracing::{debug, instrument, warn};

/// Backed by a single `TcpStream`.
///
/// Every round trip is bounded by the configured operation timeout. The
/// typed operations come from [`KvStore`](crate::KvStore) through
/// [`BlockingClient`](crate::BlockingClient); this type only moves frames.
#[derive(Debug)]
pub struct Client {
    connection: Connection,
    op_timeout: Duration,

    /// Set once a round trip fails half way; late replies may still arrive.
    broken: bool,
}

impl Client {
    /// Establish a connection with the Redis server described by `config`.
    ///
    /// A non-zero `config.db` is selected before the client is handed back.
    #[instrument(skip(config), fields(addr = %config.addr()))]
    pub async fn connect(config: &Config) -> crate::Result<Client> {
        let connecting = TcpStream::connect(config.addr());
        let stream = match time::timeout(config.connect_timeout, connecting).await {
            Ok(stream) => stream.map_err(Error::Connect)?,
            Err(_) => {
                return Err(Error::Timeout {
                    op: "connect",
                    after: config.connect_timeout,
                })
            }
        };
        debug!("connected");

        let mut client = Client {
            connection: Connection::new(stream),
            op_timeout: config.op_timeout,
            broken: false,
        };

        if config.db != 0 {
            client.request(Select::new(config.db)).await?;
        }

        Ok(client)
    }

    /// Send one command and decode its reply.
    #[instrument(skip(self))]
    pub async fn request<C: Protocol>(&mut self, cmd: C) -> crate::Result<C::Output> {
        let cmd: Command = cmd.into();
        let op = cmd.get_name();
        let frame = cmd.into_frame();
        debug!(request = ?frame);

        let mut replies = self.round_trip(op, &[frame]).await?;

        let response = replies.pop().ok_or(Error::ConnectionReset)?;
        match response {
            Frame::Error(msg) => Err(Error::Server(msg)),
            frame => C::parse_response(frame),
        }
    }

    /// Send every queued command in a single write, then collect the replies.
    ///
    /// An atomic pipeline fails as a whole if the server refuses to queue a
    /// command or discards the transaction.
    #[instrument(skip(self))]
    pub async fn submit(&mut self, pipeline: Pipeline) -> crate::Result<Vec<Frame>> {
        let atomic = pipeline.is_atomic();
        let count = pipeline.len();
        let frames = pipeline.into_frames();
        debug!(atomic, count, "submitting pipeline");

        let replies = self.round_trip("pipeline", &frames).await?;

        let replies = if atomic {
            transaction::unwrap_transaction(replies, count)?
        } else {
            replies
        };

        pipeline::check_replies(replies)
    }

    /// Run one exchange under the operation timeout.
    ///
    /// After a failure every later call returns [`Error::ConnectionReset`]
    /// without touching the socket.
    async fn round_trip(&mut self, op: &'static str, frames: &[Frame]) -> crate::Result<Vec<Frame>> {
        if self.broken {
            return Err(Error::ConnectionReset);
        }

        let after = self.op_timeout;
        let result = match time::timeout(after, self.exchange(frames)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout { op, after }),
        };

        if let Err(err) = &result {
            warn!(op, cause = %err, "connection out of step, closing");
            self.broken = true;
        }

        result
    }

    /// Write `frames` in one go and read back exactly one reply per frame.
    async fn exchange(&mut self, frames: &[Frame]) -> crate::Result<Vec<Frame>> {
        self.connection.write_frames(frames).await?;

        let mut replies = Vec::with_capacity(frames.len());
        for _ in frames {
            let response = self.connection.read_frame().await?;
            debug!(?response);

            match response {
                Some(frame) => replies.push(frame),
                None => return Err(Error::ConnectionReset),
            }
        }

        Ok(replies)
    }
}
