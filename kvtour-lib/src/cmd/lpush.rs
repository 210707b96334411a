use crate::cmd::{count_reply, Protocol};
use crate::frame::PushFrame;
use crate::Frame;
use bytes::Bytes;

/// Insert all the specified values at the head of the list stored at key.
///
/// Elements are inserted one after the other, so `LPUSH key a b c` leaves
/// the list as `c b a`. Replies with the length of the list after the push.
#[derive(Debug, Clone, PartialEq)]
pub struct LPush {
    key: String,
    values: Vec<Bytes>,
}

impl LPush {
    pub fn new<I, V>(key: impl ToString, values: I) -> LPush
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        LPush {
            key: key.to_string(),
            values: values
                .into_iter()
                .map(|v| Bytes::copy_from_slice(v.as_ref().as_bytes()))
                .collect(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn values(&self) -> &[Bytes] {
        &self.values
    }
}

impl Protocol for LPush {
    type Output = u64;

    /// ```text
    /// LPUSH key element [element ...]
    /// ```
    fn into_frame(self) -> Frame {
        let mut frame: Vec<Frame> = vec![];
        frame.push_bulk(Bytes::from("lpush".as_bytes()));
        frame.push_bulk(Bytes::from(self.key.into_bytes()));
        for value in self.values {
            frame.push_bulk(value);
        }

        frame.into()
    }

    fn parse_response(frame: Frame) -> crate::Result<u64> {
        count_reply(frame)
    }
}
