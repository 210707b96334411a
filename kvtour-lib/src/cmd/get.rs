use crate::cmd::Protocol;
use crate::frame::PushFrame;
use crate::parse::decode_utf8;
use crate::Frame;
use bytes::Bytes;

/// Get the value of key.
///
/// If the key does not exist the special value nil is returned. An error is
/// returned if the value stored at key is not a string, because GET only
/// handles string values.
#[derive(Debug, Clone, PartialEq)]
pub struct Get {
    key: String,
}

impl Get {
    pub fn new(key: impl ToString) -> Get {
        Get {
            key: key.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Protocol for Get {
    type Output = Option<String>;

    /// ```text
    /// GET key
    /// ```
    fn into_frame(self) -> Frame {
        let mut frame: Vec<Frame> = vec![];
        frame.push_bulk(Bytes::from("get".as_bytes()));
        frame.push_bulk(Bytes::from(self.key.into_bytes()));

        frame.into()
    }

    /// Both `Simple` and `Bulk` frames are accepted. `Null` represents the
    /// key not being present.
    fn parse_response(frame: Frame) -> crate::Result<Option<String>> {
        match frame {
            Frame::Simple(value) => Ok(Some(value)),
            Frame::Bulk(value) => decode_utf8(value).map(Some),
            Frame::Null => Ok(None),
            frame => Err(frame.to_error()),
        }
    }
}
