use crate::cmd::{ok_reply, Protocol};
use crate::frame::PushFrame;
use crate::Frame;
use bytes::Bytes;
use std::time::Duration;

/// Set `key` `value`.
///
/// If `key` already holds a value, it is overwritten, regardless of its type.
/// Any previous time to live associated with the key is discarded on successful
/// SET operation.
///
/// The expiration is sent with millisecond precision (`PX`).
#[derive(Debug, Clone, PartialEq)]
pub struct Set {
    key: String,
    value: Bytes,
    /// When to expire the key
    expire: Option<Duration>,
}

impl Set {
    pub fn new(key: impl ToString, value: Bytes, expire: Option<Duration>) -> Set {
        Set {
            key: key.to_string(),
            value,
            expire,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Bytes {
        &self.value
    }

    pub fn expire(&self) -> Option<Duration> {
        self.expire
    }
}

impl Protocol for Set {
    type Output = ();

    /// ```text
    /// SET key value [PX milliseconds]
    /// ```
    fn into_frame(self) -> Frame {
        let mut frame: Vec<Frame> = vec![];
        frame.push_bulk(Bytes::from("set".as_bytes()));
        frame.push_bulk(Bytes::from(self.key.into_bytes()));
        frame.push_bulk(self.value);
        if let Some(ms) = self.expire {
            frame.push_bulk(Bytes::from("px".as_bytes()));
            frame.push_int(i64::try_from(ms.as_millis()).unwrap_or(i64::MAX));
        }

        frame.into()
    }

    fn parse_response(frame: Frame) -> crate::Result<()> {
        ok_reply(frame)
    }
}
