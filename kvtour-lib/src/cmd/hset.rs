use crate::cmd::{count_reply, Protocol};
use crate::frame::PushFrame;
use crate::Frame;
use bytes::Bytes;

/// Sets fields in the hash stored at key. Existing fields are overwritten.
///
/// Replies with the number of fields that were newly created.
#[derive(Debug, Clone, PartialEq)]
pub struct HSet {
    key: String,
    fields: Vec<(String, Bytes)>,
}

impl HSet {
    pub fn new(key: impl ToString, field: impl ToString, value: impl AsRef<str>) -> HSet {
        HSet {
            key: key.to_string(),
            fields: vec![],
        }
        .field(field, value)
    }

    /// Add another field/value pair to the same request.
    pub fn field(mut self, field: impl ToString, value: impl AsRef<str>) -> HSet {
        self.fields.push((
            field.to_string(),
            Bytes::copy_from_slice(value.as_ref().as_bytes()),
        ));
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn fields(&self) -> &[(String, Bytes)] {
        &self.fields
    }
}

impl Protocol for HSet {
    type Output = u64;

    /// ```text
    /// HSET key field value [field value ...]
    /// ```
    fn into_frame(self) -> Frame {
        let mut frame: Vec<Frame> = vec![];
        frame.push_bulk(Bytes::from("hset".as_bytes()));
        frame.push_bulk(Bytes::from(self.key.into_bytes()));
        for (field, value) in self.fields {
            frame.push_bulk(Bytes::from(field.into_bytes()));
            frame.push_bulk(value);
        }

        frame.into()
    }

    fn parse_response(frame: Frame) -> crate::Result<u64> {
        count_reply(frame)
    }
}
