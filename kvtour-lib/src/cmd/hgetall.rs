use crate::cmd::Protocol;
use crate::frame::PushFrame;
use crate::{Frame, Parse};
use bytes::Bytes;
use std::collections::BTreeMap;

/// Returns all fields and values of the hash stored at key.
///
/// The reply is a flat array alternating field and value.
#[derive(Debug, Clone, PartialEq)]
pub struct HGetAll {
    key: String,
}

impl HGetAll {
    pub fn new(key: impl ToString) -> HGetAll {
        HGetAll {
            key: key.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Protocol for HGetAll {
    type Output = BTreeMap<String, String>;

    /// ```text
    /// HGETALL key
    /// ```
    fn into_frame(self) -> Frame {
        let mut frame: Vec<Frame> = vec![];
        frame.push_bulk(Bytes::from("hgetall".as_bytes()));
        frame.push_bulk(Bytes::from(self.key.into_bytes()));

        frame.into()
    }

    fn parse_response(frame: Frame) -> crate::Result<BTreeMap<String, String>> {
        let mut parse = Parse::new(frame)?;
        let mut out = BTreeMap::new();

        while parse.has_remaining() {
            let field = parse.next_string()?;
            let value = parse.next_string()?;
            out.insert(field, value);
        }

        Ok(out)
    }
}
