//! `MULTI` / `EXEC` framing for atomic pipelines.

use crate::frame::PushFrame;
use crate::Frame;
use bytes::Bytes;

/// ```text
/// MULTI
/// ```
pub(crate) fn multi() -> Frame {
    let mut frame: Vec<Frame> = vec![];
    frame.push_bulk(Bytes::from("multi".as_bytes()));
    frame.into()
}

/// ```text
/// EXEC
/// ```
pub(crate) fn exec() -> Frame {
    let mut frame: Vec<Frame> = vec![];
    frame.push_bulk(Bytes::from("exec".as_bytes()));
    frame.into()
}

/// Every command sent between `MULTI` and `EXEC` must be acknowledged with `+QUEUED`.
pub(crate) fn queued_reply(frame: Frame) -> crate::Result<()> {
    match frame {
        Frame::Simple(ref s) if s == "QUEUED" => Ok(()),
        other => Err(other.to_error()),
    }
}

/// `EXEC` answers with one reply per queued command, or null when the
/// transaction was discarded.
pub(crate) fn exec_reply(frame: Frame, expected: usize) -> crate::Result<Vec<Frame>> {
    match frame {
        Frame::Array(replies) if replies.len() == expected => Ok(replies),
        Frame::Null => Err(crate::Error::TransactionAborted),
        other => Err(other.to_error()),
    }
}

/// Unwrap the replies to `MULTI cmd... EXEC` into the replies of the queued
/// commands. `count` is the number of queued commands.
pub(crate) fn unwrap_transaction(mut replies: Vec<Frame>, count: usize) -> crate::Result<Vec<Frame>> {
    let exec = replies
        .pop()
        .ok_or_else(|| crate::Error::Protocol("missing EXEC reply".into()))?;
    let mut replies = replies.into_iter();

    match replies.next() {
        Some(Frame::Error(msg)) => return Err(crate::Error::Server(msg)),
        Some(frame) => super::ok_reply(frame)?,
        None => return Err(crate::Error::Protocol("missing MULTI reply".into())),
    }

    // A command rejected while queuing makes the server discard the whole
    // transaction; its message is more useful than the EXECABORT that follows.
    for reply in replies {
        match reply {
            Frame::Error(msg) => return Err(crate::Error::Server(msg)),
            other => queued_reply(other)?,
        }
    }

    match exec {
        Frame::Error(msg) => Err(crate::Error::Server(msg)),
        other => exec_reply(other, count),
    }
}
