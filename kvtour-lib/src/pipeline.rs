use crate::cmd::{transaction, Command, Incr, Set};
use crate::Frame;
use bytes::Bytes;

/// Commands queued client side and sent in one round trip.
///
/// A pipeline is atomic by default: the queued commands are wrapped in
/// `MULTI`/`EXEC` so the server runs them back to back without interleaving
/// commands from other clients. There is no `WATCH`, so nothing is rolled
/// back if one of the commands fails at run time.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    commands: Vec<Command>,
    atomic: bool,
}

impl Default for Pipeline {
    fn default() -> Pipeline {
        Pipeline::new()
    }
}

impl Pipeline {
    pub fn new() -> Pipeline {
        Pipeline {
            commands: vec![],
            atomic: true,
        }
    }

    /// Plain pipelining, without the `MULTI`/`EXEC` wrapper.
    pub fn non_atomic() -> Pipeline {
        Pipeline {
            commands: vec![],
            atomic: false,
        }
    }

    pub fn is_atomic(&self) -> bool {
        self.atomic
    }

    pub fn push(&mut self, cmd: impl Into<Command>) -> &mut Pipeline {
        self.commands.push(cmd.into());
        self
    }

    pub fn set(&mut self, key: &str, value: &str) -> &mut Pipeline {
        self.push(Set::new(key, Bytes::copy_from_slice(value.as_bytes()), None))
    }

    pub fn incr(&mut self, key: &str) -> &mut Pipeline {
        self.push(Incr::new(key))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub(crate) fn into_commands(self) -> Vec<Command> {
        self.commands
    }

    /// The request frames in send order.
    pub(crate) fn into_frames(self) -> Vec<Frame> {
        let atomic = self.atomic;
        let mut frames = Vec::with_capacity(self.commands.len() + 2);

        if atomic {
            frames.push(transaction::multi());
        }
        frames.extend(self.commands.into_iter().map(Command::into_frame));
        if atomic {
            frames.push(transaction::exec());
        }

        frames
    }
}

/// The batch fails as a whole when any queued command was answered with an error.
pub(crate) fn check_replies(replies: Vec<Frame>) -> crate::Result<Vec<Frame>> {
    if let Some(Frame::Error(msg)) = replies.iter().find(|r| matches!(r, Frame::Error(_))) {
        return Err(crate::Error::Server(msg.clone()));
    }

    Ok(replies)
}
