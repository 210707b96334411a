//! Request builders for the commands the tour issues.
//!
//! Each command knows how to turn itself into a request [`Frame`] and how to
//! decode the reply it expects back.

mod ping;
pub use ping::Ping;

mod select;
pub use select::Select;

mod get;
pub use get::Get;

mod set;
pub use set::Set;

mod del;
pub use del::Del;

mod incr;
pub use incr::Incr;

mod lpush;
pub use lpush::LPush;

mod lrange;
pub use lrange::LRange;

mod sadd;
pub use sadd::SAdd;

mod smembers;
pub use smembers::SMembers;

mod hset;
pub use hset::HSet;

mod hgetall;
pub use hgetall::HGetAll;

pub(crate) mod transaction;

use crate::Frame;

/// A request the client can send, paired with the shape of its reply.
pub trait Protocol: Into<Command> + std::fmt::Debug {
    type Output;

    fn into_frame(self) -> Frame;

    /// Error replies never reach this point; the caller turns them into
    /// [`crate::Error::Server`] first.
    fn parse_response(frame: Frame) -> crate::Result<Self::Output>;
}

/// Any command, so heterogeneous commands can be queued in one [`crate::Pipeline`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Ping(Ping),
    Select(Select),
    Get(Get),
    Set(Set),
    Del(Del),
    Incr(Incr),
    LPush(LPush),
    LRange(LRange),
    SAdd(SAdd),
    SMembers(SMembers),
    HSet(HSet),
    HGetAll(HGetAll),
}

impl Command {
    pub fn into_frame(self) -> Frame {
        match self {
            Command::Ping(cmd) => cmd.into_frame(),
            Command::Select(cmd) => cmd.into_frame(),
            Command::Get(cmd) => cmd.into_frame(),
            Command::Set(cmd) => cmd.into_frame(),
            Command::Del(cmd) => cmd.into_frame(),
            Command::Incr(cmd) => cmd.into_frame(),
            Command::LPush(cmd) => cmd.into_frame(),
            Command::LRange(cmd) => cmd.into_frame(),
            Command::SAdd(cmd) => cmd.into_frame(),
            Command::SMembers(cmd) => cmd.into_frame(),
            Command::HSet(cmd) => cmd.into_frame(),
            Command::HGetAll(cmd) => cmd.into_frame(),
        }
    }

    /// Returns the command name.
    pub fn get_name(&self) -> &'static str {
        match self {
            Command::Ping(_) => "ping",
            Command::Select(_) => "select",
            Command::Get(_) => "get",
            Command::Set(_) => "set",
            Command::Del(_) => "del",
            Command::Incr(_) => "incr",
            Command::LPush(_) => "lpush",
            Command::LRange(_) => "lrange",
            Command::SAdd(_) => "sadd",
            Command::SMembers(_) => "smembers",
            Command::HSet(_) => "hset",
            Command::HGetAll(_) => "hgetall",
        }
    }
}

macro_rules! impl_into_command {
    ($($cmd:ident),* $(,)?) => {
        $(
            impl From<$cmd> for Command {
                fn from(cmd: $cmd) -> Command {
                    Command::$cmd(cmd)
                }
            }
        )*
    };
}

impl_into_command!(Ping, Select, Get, Set, Del, Incr, LPush, LRange, SAdd, SMembers, HSet, HGetAll);

/// Replies that report how many elements were touched.
pub(crate) fn count_reply(frame: Frame) -> crate::Result<u64> {
    match frame {
        Frame::Integer(n) => u64::try_from(n).map_err(|_| Frame::Integer(n).to_error()),
        other => Err(other.to_error()),
    }
}

/// `+OK`
pub(crate) fn ok_reply(frame: Frame) -> crate::Result<()> {
    match frame {
        Frame::Simple(ref s) if s == "OK" => Ok(()),
        other => Err(other.to_error()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn args(frame: Frame) -> Vec<String> {
        match frame {
            Frame::Array(parts) => parts.iter().map(ToString::to_string).collect(),
            other => panic!("not an array: {:?}", other),
        }
    }

    #[test]
    fn command_dispatches_to_builder() {
        let cmd: Command = LRange::new("fruits", 0, -1).into();

        assert_eq!(cmd.get_name(), "lrange");
        assert_eq!(args(cmd.into_frame()), ["lrange", "fruits", "0", "-1"]);
    }

    #[test]
    fn set_with_expiry_uses_px() {
        let cmd = Set::new("temp_key", Bytes::from("臨時數據"), Some(std::time::Duration::from_secs(5)));

        assert_eq!(args(cmd.into_frame()), ["set", "temp_key", "臨時數據", "px", "5000"]);
    }

    #[test]
    fn variadic_commands_keep_argument_order() {
        let push = LPush::new("fruits", ["蘋果", "香蕉", "橙子"]);
        assert_eq!(args(push.into_frame()), ["lpush", "fruits", "蘋果", "香蕉", "橙子"]);

        let add = SAdd::new("skills", ["Python", "Java", "Redis"]);
        assert_eq!(args(add.into_frame()), ["sadd", "skills", "Python", "Java", "Redis"]);

        let hset = HSet::new("user:1", "name", "李四").field("age", "25");
        assert_eq!(args(hset.into_frame()), ["hset", "user:1", "name", "李四", "age", "25"]);
    }

    #[test]
    fn count_reply_rejects_negative() {
        assert_eq!(count_reply(Frame::Integer(3)).unwrap(), 3);
        assert!(count_reply(Frame::Integer(-1)).is_err());
        assert!(count_reply(Frame::Null).is_err());
    }
}
