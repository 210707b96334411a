use std::io;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong between the tour and the store.
#[derive(Error, Debug)]
pub enum Error {
    #[error("could not connect: {0}")]
    Connect(#[source] io::Error),

    #[error("{op} timed out after {after:?}")]
    Timeout { op: &'static str, after: Duration },

    #[error("connection reset by server")]
    ConnectionReset,

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// An error reply sent by the store, e.g. `WRONGTYPE ...`.
    #[error("{0}")]
    Server(String),

    /// `EXEC` answered with a null reply.
    #[error("transaction aborted by server")]
    TransactionAborted,

    #[error("protocol error; {0}")]
    Protocol(String),
}

/// How far an error reaches: connectivity problems end the tour, the rest
/// only end the group they happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connectivity,
    Operation,
    Other,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Connect(_) | Error::Timeout { .. } | Error::ConnectionReset | Error::Io(_) => {
                ErrorKind::Connectivity
            }
            Error::Server(_) | Error::TransactionAborted => ErrorKind::Operation,
            Error::Protocol(_) => ErrorKind::Other,
        }
    }

    pub fn is_connectivity(&self) -> bool {
        self.kind() == ErrorKind::Connectivity
    }
}

impl From<crate::frame::Error> for Error {
    fn from(src: crate::frame::Error) -> Error {
        Error::Protocol(src.to_string())
    }
}
