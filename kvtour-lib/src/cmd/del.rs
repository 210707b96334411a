use crate::cmd::{count_reply, Protocol};
use crate::frame::PushFrame;
use crate::Frame;
use bytes::Bytes;

/// Removes the specified keys. A key is ignored if it does not exist.
///
/// Replies with the number of keys that were removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Del {
    keys: Vec<String>,
}

impl Del {
    pub fn new<I, K>(keys: I) -> Del
    where
        I: IntoIterator<Item = K>,
        K: ToString,
    {
        Del {
            keys: keys.into_iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

impl Protocol for Del {
    type Output = u64;

    /// ```text
    /// DEL key [key ...]
    /// ```
    fn into_frame(self) -> Frame {
        let mut frame: Vec<Frame> = vec![];
        frame.push_bulk(Bytes::from("del".as_bytes()));
        for key in self.keys {
            frame.push_bulk(Bytes::from(key.into_bytes()));
        }

        frame.into()
    }

    fn parse_response(frame: Frame) -> crate::Result<u64> {
        count_reply(frame)
    }
}
