use crate::cmd::Protocol;
use crate::frame::PushFrame;
use crate::{Frame, Parse};
use bytes::Bytes;
use std::collections::BTreeSet;

/// Returns all the members of the set value stored at key.
///
/// The store sends members in no particular order; they are collected into a
/// sorted set so printing is stable.
#[derive(Debug, Clone, PartialEq)]
pub struct SMembers {
    key: String,
}

impl SMembers {
    pub fn new(key: impl ToString) -> SMembers {
        SMembers {
            key: key.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Protocol for SMembers {
    type Output = BTreeSet<String>;

    /// ```text
    /// SMEMBERS key
    /// ```
    fn into_frame(self) -> Frame {
        let mut frame: Vec<Frame> = vec![];
        frame.push_bulk(Bytes::from("smembers".as_bytes()));
        frame.push_bulk(Bytes::from(self.key.into_bytes()));

        frame.into()
    }

    fn parse_response(frame: Frame) -> crate::Result<BTreeSet<String>> {
        Ok(Parse::new(frame)?.into_strings()?.into_iter().collect())
    }
}
