use crate::cmd::Protocol;
use crate::frame::PushFrame;
use crate::{Frame, Parse};
use bytes::Bytes;

/// Returns the specified elements of the list stored at key.
///
/// `start` and `stop` are zero-based and inclusive. Negative offsets count
/// from the tail, so `0 -1` is the whole list.
#[derive(Debug, Clone, PartialEq)]
pub struct LRange {
    key: String,
    start: i64,
    stop: i64,
}

impl LRange {
    pub fn new(key: impl ToString, start: i64, stop: i64) -> LRange {
        LRange {
            key: key.to_string(),
            start,
            stop,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn stop(&self) -> i64 {
        self.stop
    }
}

impl Protocol for LRange {
    type Output = Vec<String>;

    /// ```text
    /// LRANGE key start stop
    /// ```
    fn into_frame(self) -> Frame {
        let mut frame: Vec<Frame> = vec![];
        frame.push_bulk(Bytes::from("lrange".as_bytes()));
        frame.push_bulk(Bytes::from(self.key.into_bytes()));
        frame.push_int(self.start);
        frame.push_int(self.stop);

        frame.into()
    }

    fn parse_response(frame: Frame) -> crate::Result<Vec<String>> {
        Ok(Parse::new(frame)?.into_strings()?)
    }
}
