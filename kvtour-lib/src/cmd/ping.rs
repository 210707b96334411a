use crate::cmd::Protocol;
use crate::frame::PushFrame;
use crate::parse::decode_utf8;
use crate::Frame;
use bytes::Bytes;

/// Returns PONG if no argument is provided, otherwise return a copy of the argument as a bulk.
///
/// This command is often used to test if a connection is still alive, or to measure latency.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ping {
    echo: Option<Bytes>,
}

impl Ping {
    pub fn new(echo: Option<Bytes>) -> Ping {
        Ping { echo }
    }

    pub fn echo(&self) -> Option<&Bytes> {
        self.echo.as_ref()
    }
}

impl Protocol for Ping {
    type Output = String;

    /// ```text
    /// PING [message]
    /// ```
    fn into_frame(self) -> Frame {
        let mut frame: Vec<Frame> = vec![];
        frame.push_bulk(Bytes::from("ping".as_bytes()));
        if let Some(msg) = self.echo {
            frame.push_bulk(msg);
        }

        frame.into()
    }

    fn parse_response(frame: Frame) -> crate::Result<String> {
        match frame {
            Frame::Simple(value) => Ok(value),
            Frame::Bulk(value) => decode_utf8(value),
            frame => Err(frame.to_error()),
        }
    }
}
