//! Provides a type representing a Redis protocol frame as well as utilities for
//! parsing frames from a byte array.

use bytes::{Buf, Bytes};
use std::fmt;
use std::io::Cursor;
use std::num::TryFromIntError;
use std::string::FromUtf8Error;

/// A frame in the Redis protocol (RESP2).
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    Simple(String),
    Error(String),
    Integer(i64),
    Bulk(Bytes),
    /// Both the null bulk string `$-1` and the null array `*-1`.
    Null,
    Array(Vec<Frame>),
}

#[derive(Debug)]
pub enum Error {
    /// Not enough data is available to parse a message
    Incomplete,

    /// Invalid message encoding
    Other(String),
}

/// Helpers for assembling a request array one argument at a time.
pub(crate) trait PushFrame {
    fn push_bulk(&mut self, bytes: Bytes);

    fn push_int(&mut self, value: i64);
}

impl PushFrame for Vec<Frame> {
    fn push_bulk(&mut self, bytes: Bytes) {
        self.push(Frame::Bulk(bytes));
    }

    /// Redis expects every request argument as a bulk string, numbers included.
    fn push_int(&mut self, value: i64) {
        self.push(Frame::Bulk(Bytes::from(value.to_string())));
    }
}

impl From<Vec<Frame>> for Frame {
    fn from(frames: Vec<Frame>) -> Frame {
        Frame::Array(frames)
    }
}

impl Frame {
    /// Checks if an entire message can be decoded from `src`. On success the
    /// cursor is left just past the end of the frame.
    pub fn check(src: &mut Cursor<&[u8]>) -> Result<(), Error> {
        match get_u8(src)? {
            b'+' | b'-' => {
                get_line(src)?;
                Ok(())
            }
            b':' => {
                let _ = get_signed(src)?;
                Ok(())
            }
            b'$' => {
                let len = get_signed(src)?;
                if len < 0 {
                    // `$-1\r\n`
                    return Ok(());
                }
                // Skip the payload and the trailing "\r\n".
                skip(src, usize::try_from(len)? + 2)
            }
            b'*' => {
                let len = get_signed(src)?;
                for _ in 0..len.max(0) {
                    Frame::check(src)?;
                }
                Ok(())
            }
            actual => Err(format!("protocol error; invalid frame type byte `{}`", actual).into()),
        }
    }

    /// The message has already been validated with `check`.
    pub fn parse(src: &mut Cursor<&[u8]>) -> Result<Frame, Error> {
        match get_u8(src)? {
            b'+' => {
                let line = get_line(src)?.to_vec();
                Ok(Frame::Simple(String::from_utf8(line)?))
            }
            b'-' => {
                let line = get_line(src)?.to_vec();
                Ok(Frame::Error(String::from_utf8(line)?))
            }
            b':' => Ok(Frame::Integer(get_signed(src)?)),
            b'$' => {
                let len = get_signed(src)?;
                if len < 0 {
                    return Ok(Frame::Null);
                }
                let len = usize::try_from(len)?;
                let n = len + 2;

                if src.remaining() < n {
                    return Err(Error::Incomplete);
                }

                let data = Bytes::copy_from_slice(&src.chunk()[..len]);
                skip(src, n)?;

                Ok(Frame::Bulk(data))
            }
            b'*' => {
                let len = get_signed(src)?;
                if len < 0 {
                    return Ok(Frame::Null);
                }
                let len = usize::try_from(len)?;
                let mut out = Vec::with_capacity(len);

                for _ in 0..len {
                    out.push(Frame::parse(src)?);
                }

                Ok(Frame::Array(out))
            }
            actual => Err(format!("protocol error; invalid frame type byte `{}`", actual).into()),
        }
    }

    /// Converts the frame to an "unexpected frame" error
    pub(crate) fn to_error(&self) -> crate::Error {
        crate::Error::Protocol(format!("unexpected frame: {}", self))
    }
}

impl PartialEq<&str> for Frame {
    fn eq(&self, other: &&str) -> bool {
        match self {
            Frame::Simple(s) => s.eq(other),
            Frame::Bulk(s) => s.eq(other),
            _ => false,
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        use std::str;

        match self {
            Frame::Simple(response) => write!(fmt, "{}", response),
            Frame::Error(msg) => write!(fmt, "error: {}", msg),
            Frame::Integer(num) => write!(fmt, "{}", num),
            Frame::Bulk(msg) => match str::from_utf8(msg) {
                Ok(string) => write!(fmt, "{}", string),
                Err(_) => write!(fmt, "{:?}", msg),
            },
            Frame::Null => write!(fmt, "(nil)"),
            Frame::Array(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(fmt, " ")?;
                    }
                    write!(fmt, "{}", part)?;
                }

                Ok(())
            }
        }
    }
}

fn get_u8(src: &mut Cursor<&[u8]>) -> Result<u8, Error> {
    if !src.has_remaining() {
        return Err(Error::Incomplete);
    }

    Ok(src.get_u8())
}

fn skip(src: &mut Cursor<&[u8]>, n: usize) -> Result<(), Error> {
    if src.remaining() < n {
        return Err(Error::Incomplete);
    }

    src.advance(n);
    Ok(())
}

/// Read a signed decimal terminated by "\r\n". Lengths of `-1` encode null.
fn get_signed(src: &mut Cursor<&[u8]>) -> Result<i64, Error> {
    use atoi::atoi;

    let line = get_line(src)?;

    atoi::<i64>(line).ok_or_else(|| "protocol error; invalid frame format".into())
}

/// Find a line
fn get_line<'a>(src: &mut Cursor<&'a [u8]>) -> Result<&'a [u8], Error> {
    let start = src.position() as usize;
    let end = src.get_ref().len().saturating_sub(1);

    for i in start..end {
        if src.get_ref()[i] == b'\r' && src.get_ref()[i + 1] == b'\n' {
            // We found a line, update the position to be *after* the \n
            src.set_position((i + 2) as u64);

            return Ok(&src.get_ref()[start..i]);
        }
    }

    Err(Error::Incomplete)
}

impl From<String> for Error {
    fn from(src: String) -> Error {
        Error::Other(src)
    }
}

impl From<&str> for Error {
    fn from(src: &str) -> Error {
        src.to_string().into()
    }
}

impl From<FromUtf8Error> for Error {
    fn from(_src: FromUtf8Error) -> Error {
        "protocol error; invalid frame format".into()
    }
}

impl From<TryFromIntError> for Error {
    fn from(_src: TryFromIntError) -> Error {
        "protocol error; invalid frame format".into()
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Incomplete => write!(fmt, "stream ended early"),
            Error::Other(err) => write!(fmt, "{}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(raw: &[u8]) -> Result<Frame, Error> {
        let mut buf = Cursor::new(raw);
        Frame::check(&mut buf)?;
        let len = buf.position() as usize;
        assert_eq!(len, raw.len(), "check must consume the whole frame");

        buf.set_position(0);
        Frame::parse(&mut buf)
    }

    #[test]
    fn parses_scalar_replies() {
        assert_eq!(decode(b"+PONG\r\n").unwrap(), Frame::Simple("PONG".into()));
        assert_eq!(decode(b":-3\r\n").unwrap(), Frame::Integer(-3));
        assert_eq!(
            decode(b"-WRONGTYPE bad\r\n").unwrap(),
            Frame::Error("WRONGTYPE bad".into())
        );
        assert_eq!(decode(b"$-1\r\n").unwrap(), Frame::Null);
        assert_eq!(decode(b"*-1\r\n").unwrap(), Frame::Null);
    }

    #[test]
    fn parses_utf8_bulk_by_byte_length() {
        let value = "張三";
        let raw = format!("${}\r\n{}\r\n", value.len(), value);

        assert_eq!(decode(raw.as_bytes()).unwrap(), Frame::Bulk(Bytes::from(value)));
    }

    #[test]
    fn parses_nested_array() {
        let frame = decode(b"*2\r\n+OK\r\n*1\r\n:1\r\n").unwrap();

        assert_eq!(
            frame,
            Frame::Array(vec![
                Frame::Simple("OK".into()),
                Frame::Array(vec![Frame::Integer(1)]),
            ])
        );
    }

    #[test]
    fn partial_input_is_incomplete() {
        for raw in [&b"$5\r\nhel"[..], b"*2\r\n+OK\r\n", b"+PON"] {
            let mut buf = Cursor::new(raw);
            assert!(matches!(Frame::check(&mut buf), Err(Error::Incomplete)));
        }
    }

    #[test]
    fn rejects_unknown_type_byte() {
        let mut buf = Cursor::new(&b"!oops\r\n"[..]);
        assert!(matches!(Frame::check(&mut buf), Err(Error::Other(_))));
    }

    #[test]
    fn compares_against_str() {
        assert!(Frame::Simple("QUEUED".into()) == "QUEUED");
        assert!(Frame::Bulk(Bytes::from("OK")) == "OK");
        assert!(Frame::Integer(1) != "1");
    }
}
