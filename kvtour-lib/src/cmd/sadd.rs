use crate::cmd::{count_reply, Protocol};
use crate::frame::PushFrame;
use crate::Frame;
use bytes::Bytes;

/// Add the specified members to the set stored at key.
///
/// Members already in the set are ignored. Replies with the number of
/// members that were actually added.
#[derive(Debug, Clone, PartialEq)]
pub struct SAdd {
    key: String,
    members: Vec<Bytes>,
}

impl SAdd {
    pub fn new<I, M>(key: impl ToString, members: I) -> SAdd
    where
        I: IntoIterator<Item = M>,
        M: AsRef<str>,
    {
        SAdd {
            key: key.to_string(),
            members: members
                .into_iter()
                .map(|m| Bytes::copy_from_slice(m.as_ref().as_bytes()))
                .collect(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn members(&self) -> &[Bytes] {
        &self.members
    }
}

impl Protocol for SAdd {
    type Output = u64;

    /// ```text
    /// SADD key member [member ...]
    /// ```
    fn into_frame(self) -> Frame {
        let mut frame: Vec<Frame> = vec![];
        frame.push_bulk(Bytes::from("sadd".as_bytes()));
        frame.push_bulk(Bytes::from(self.key.into_bytes()));
        for member in self.members {
            frame.push_bulk(member);
        }

        frame.into()
    }

    fn parse_response(frame: Frame) -> crate::Result<u64> {
        count_reply(frame)
    }
}
