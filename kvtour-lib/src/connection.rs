use crate::frame::{self, Frame};
use bytes::{Buf, BufMut, BytesMut};
use std::io::{self, Cursor};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;

/// `Connection` reads and writes `Frame`s on the underlying `TcpStream`.
///
/// `read_buf` is filled up until there are enough bytes to create a full frame. Once this happens,
/// the `Connection` creates the frame and returns it to the caller.
#[derive(Debug)]
pub struct Connection {
    stream: BufWriter<TcpStream>,
    // The buffer for reading frames.
    read_buf: BytesMut,
}

const BUF_SIZE: usize = 4 * 1024;

impl Connection {
    pub fn new(stream: TcpStream) -> Connection {
        Connection {
            stream: BufWriter::new(stream),
            read_buf: BytesMut::with_capacity(BUF_SIZE),
        }
    }

    /// Read a single `Frame` value from the underlying stream.
    ///
    /// The function waits until it has retrieved enough data to parse a frame.
    /// Any data remaining in the read buffer after the frame has been parsed is
    /// kept there for the next call to `read_frame`.
    ///
    /// # Returns
    ///
    /// On success, the received frame is returned. If the `TcpStream`
    /// is closed in a way that doesn't break a frame in half, it returns
    /// `None`. Otherwise, an error is returned.
    pub async fn read_frame(&mut self) -> crate::Result<Option<Frame>> {
        loop {
            if let Some(frame) = self.parse_frame()? {
                return Ok(Some(frame));
            }

            // `0` indicates "end of stream".
            if 0 == self.stream.read_buf(&mut self.read_buf).await? {
                // For this to be a clean shutdown, there should be no data in the read buffer.
                if self.read_buf.is_empty() {
                    return Ok(None);
                }
                return Err(crate::Error::ConnectionReset);
            }
        }
    }

    /// Tries to parse a frame from the buffer. If the buffer contains enough
    /// data, the frame is returned and the data removed from the buffer. If not
    /// enough data has been buffered yet, `Ok(None)` is returned.
    fn parse_frame(&mut self) -> crate::Result<Option<Frame>> {
        use frame::Error::Incomplete;

        let mut buf = Cursor::new(&self.read_buf[..]);

        // Checking is much cheaper than parsing and avoids allocating until
        // the whole frame has arrived.
        match Frame::check(&mut buf) {
            Ok(()) => {
                let len = buf.position() as usize;

                buf.set_position(0);
                let frame = Frame::parse(&mut buf)?;
                self.read_buf.advance(len);

                Ok(Some(frame))
            }
            Err(Incomplete) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write a single `Frame` to the underlying stream.
    pub async fn write_frame(&mut self, frame: &Frame) -> io::Result<()> {
        self.write_frames(std::slice::from_ref(frame)).await
    }

    /// Write several frames back to back and flush once, so a pipeline leaves
    /// in a single write.
    pub async fn write_frames(&mut self, frames: &[Frame]) -> io::Result<()> {
        let mut out = BytesMut::new();
        for frame in frames {
            encode(frame, &mut out);
        }

        self.stream.write_all(&out).await?;
        self.stream.flush().await
    }
}

fn encode(frame: &Frame, dst: &mut BytesMut) {
    match frame {
        Frame::Simple(val) => {
            dst.put_u8(b'+');
            dst.put_slice(val.as_bytes());
            dst.put_slice(b"\r\n");
        }
        Frame::Error(val) => {
            dst.put_u8(b'-');
            dst.put_slice(val.as_bytes());
            dst.put_slice(b"\r\n");
        }
        Frame::Integer(val) => {
            dst.put_u8(b':');
            encode_decimal(*val, dst);
        }
        Frame::Null => dst.put_slice(b"$-1\r\n"),
        Frame::Bulk(val) => {
            dst.put_u8(b'$');
            encode_decimal(val.len() as i64, dst);
            dst.put_slice(val);
            dst.put_slice(b"\r\n");
        }
        Frame::Array(val) => {
            dst.put_u8(b'*');
            encode_decimal(val.len() as i64, dst);
            for entry in val {
                encode(entry, dst);
            }
        }
    }
}

fn encode_decimal(val: i64, dst: &mut BytesMut) {
    dst.put_slice(val.to_string().as_bytes());
    dst.put_slice(b"\r\n");
}
