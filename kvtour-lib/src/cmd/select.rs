use crate::cmd::{ok_reply, Protocol};
use crate::frame::PushFrame;
use crate::Frame;
use bytes::Bytes;

/// Select the logical database for the rest of the connection.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    db: u32,
}

impl Select {
    pub fn new(db: u32) -> Select {
        Select { db }
    }

    pub fn db(&self) -> u32 {
        self.db
    }
}

impl Protocol for Select {
    type Output = ();

    /// ```text
    /// SELECT index
    /// ```
    fn into_frame(self) -> Frame {
        let mut frame: Vec<Frame> = vec![];
        frame.push_bulk(Bytes::from("select".as_bytes()));
        frame.push_int(i64::from(self.db));

        frame.into()
    }

    fn parse_response(frame: Frame) -> crate::Result<()> {
        ok_reply(frame)
    }
}
