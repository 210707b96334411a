//!
//! Utility for walking a reply array
//!

use crate::Frame;

use bytes::Bytes;
use std::{fmt, str, vec};

/// Multi-value replies (`LRANGE`, `SMEMBERS`, `HGETALL`, `EXEC`) arrive as
/// array frames. A `Parse` is initialized with the array frame and provides a
/// cursor-like API over its entries.
#[derive(Debug)]
pub(crate) struct Parse {
    frames: vec::IntoIter<Frame>,
}

#[derive(Debug)]
pub(crate) enum ParseError {
    /// Attempting to extract a value failed due to the frame being fully consumed.
    EndOfStream,

    Other(crate::Error),
}

impl Parse {
    /// Returns `Err` if `frame` is not an array frame.
    pub(crate) fn new(frame: Frame) -> Result<Parse, ParseError> {
        let array = match frame {
            Frame::Array(array) => array,
            other => return Err(format!("expected array, got {:?}", other).into()),
        };

        Ok(Parse {
            frames: array.into_iter(),
        })
    }

    pub(crate) fn next(&mut self) -> Result<Frame, ParseError> {
        self.frames.next().ok_or(ParseError::EndOfStream)
    }

    pub(crate) fn has_remaining(&self) -> bool {
        self.frames.len() > 0
    }

    /// Decode the next entry as a UTF-8 string.
    pub(crate) fn next_string(&mut self) -> Result<String, ParseError> {
        match self.next()? {
            // Both `Simple` and `Bulk` representation may be strings.
            Frame::Simple(s) => Ok(s),
            Frame::Bulk(data) => decode_utf8(data).map_err(ParseError::Other),
            other => Err(format!("expected simple frame or bulk frame, got {:?}", other).into()),
        }
    }

    /// Decode every remaining entry as a string.
    pub(crate) fn into_strings(mut self) -> Result<Vec<String>, ParseError> {
        let mut out = Vec::with_capacity(self.frames.len());
        while self.has_remaining() {
            out.push(self.next_string()?);
        }

        Ok(out)
    }
}

/// Replies are always decoded; a value that is not valid UTF-8 is a protocol error.
pub(crate) fn decode_utf8(data: Bytes) -> crate::Result<String> {
    String::from_utf8(data.to_vec()).map_err(|_| crate::Error::Protocol("invalid string".into()))
}

impl From<String> for ParseError {
    fn from(src: String) -> ParseError {
        ParseError::Other(crate::Error::Protocol(src))
    }
}

impl From<&str> for ParseError {
    fn from(src: &str) -> ParseError {
        src.to_string().into()
    }
}

impl From<ParseError> for crate::Error {
    fn from(src: ParseError) -> crate::Error {
        match src {
            ParseError::EndOfStream => crate::Error::Protocol("unexpected end of array".into()),
            ParseError::Other(err) => err,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EndOfStream => write!(f, "protocol error; unexpected end of array"),
            ParseError::Other(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ParseError {}
