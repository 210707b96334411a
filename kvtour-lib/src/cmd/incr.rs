use crate::cmd::Protocol;
use crate::frame::PushFrame;
use crate::Frame;
use bytes::Bytes;

/// Increments the number stored at key by one. A missing key counts as `0`.
///
/// The store rejects values that are not base-10 64 bit signed integers.
#[derive(Debug, Clone, PartialEq)]
pub struct Incr {
    key: String,
}

impl Incr {
    pub fn new(key: impl ToString) -> Incr {
        Incr {
            key: key.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Protocol for Incr {
    type Output = i64;

    /// ```text
    /// INCR key
    /// ```
    fn into_frame(self) -> Frame {
        let mut frame: Vec<Frame> = vec![];
        frame.push_bulk(Bytes::from("incr".as_bytes()));
        frame.push_bulk(Bytes::from(self.key.into_bytes()));

        frame.into()
    }

    fn parse_response(frame: Frame) -> crate::Result<i64> {
        match frame {
            Frame::Integer(n) => Ok(n),
            frame => Err(frame.to_error()),
        }
    }
}
