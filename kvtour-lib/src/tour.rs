//! A guided walk through the basic Redis data types.
//!
//! After a liveness check the tour runs five groups in order: strings,
//! lists, sets, hashes and an atomic pipeline. Connect and liveness failures
//! end the tour before any group runs; a failing group is reported and the
//! next group still runs. Nothing is retried.

use crate::{BlockingClient, Config, Error, ErrorKind, Frame, KvStore, Pipeline};
use std::fmt;
use std::io::Write;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// One step of the tour after the liveness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Strings,
    Lists,
    Sets,
    Hashes,
    Transaction,
}

impl Group {
    /// In running order.
    pub const ALL: [Group; 5] = [
        Group::Strings,
        Group::Lists,
        Group::Sets,
        Group::Hashes,
        Group::Transaction,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Group::Strings => "字串操作示例",
            Group::Lists => "列表操作示例",
            Group::Sets => "集合操作示例",
            Group::Hashes => "雜湊表操作示例",
            Group::Transaction => "事務示例",
        }
    }
}

/// How a tour ended.
#[derive(Debug)]
pub enum Summary {
    /// Connect or liveness check failed; no group ran.
    Aborted(Error),
    /// Every group ran; `failures` lists the ones that reported an error.
    Completed { failures: Vec<(Group, Error)> },
}

impl Summary {
    pub fn is_aborted(&self) -> bool {
        matches!(self, Summary::Aborted(_))
    }

    pub fn failures(&self) -> &[(Group, Error)] {
        match self {
            Summary::Aborted(_) => &[],
            Summary::Completed { failures } => failures.as_slice(),
        }
    }
}

/// Connect to the server described by `config` and run the tour, printing
/// to `out`.
pub fn run<W: Write>(config: &Config, out: &mut W) -> Summary {
    info!(addr = %config.addr(), db = config.db, "connecting");

    match BlockingClient::connect(config) {
        Ok(mut client) => run_with(&mut client, out),
        Err(err) => {
            Console::new(out).unreachable(&err);
            Summary::Aborted(err)
        }
    }
}

/// Run the tour against an already connected store.
#[instrument(skip_all)]
pub fn run_with<S: KvStore, W: Write>(store: &mut S, out: &mut W) -> Summary {
    let mut console = Console::new(out);

    if let Err(err) = store.ping() {
        console.unreachable(&err);
        return Summary::Aborted(err);
    }

    let mut failures = vec![];
    for group in Group::ALL {
        console.say(format_args!("\n=== {} ===", group.title()));

        let result = match group {
            Group::Strings => strings(store, &mut console),
            Group::Lists => lists(store, &mut console),
            Group::Sets => sets(store, &mut console),
            Group::Hashes => hashes(store, &mut console),
            Group::Transaction => transaction(store, &mut console),
        };

        if let Err(err) = result {
            warn!(?group, kind = ?err.kind(), cause = %err, "group failed");
            console.group_failed(group, &err);
            failures.push((group, err));
        }
    }

    info!(failed = failures.len(), "tour finished");
    Summary::Completed { failures }
}

fn strings<S: KvStore, W: Write>(store: &mut S, console: &mut Console<'_, W>) -> crate::Result<()> {
    store.set("name", "張三")?;
    let name = store.get("name")?;
    console.say(format_args!("獲取名字: {}", Nullable(name)));

    store.set_expires("temp_key", "臨時數據", Duration::from_secs(5))?;
    let temp = store.get("temp_key")?;
    console.say(format_args!("臨時數據: {}", Nullable(temp)));

    Ok(())
}

fn lists<S: KvStore, W: Write>(store: &mut S, console: &mut Console<'_, W>) -> crate::Result<()> {
    store.del("fruits")?;
    store.lpush("fruits", &["蘋果", "香蕉", "橙子"])?;
    let fruits = store.lrange("fruits", 0, -1)?;
    console.say(format_args!("水果列表: {:?}", fruits));

    Ok(())
}

fn sets<S: KvStore, W: Write>(store: &mut S, console: &mut Console<'_, W>) -> crate::Result<()> {
    store.sadd("skills", &["Python", "Java", "Redis"])?;
    let skills = store.smembers("skills")?;
    console.say(format_args!("技能集合: {:?}", skills));

    Ok(())
}

fn hashes<S: KvStore, W: Write>(store: &mut S, console: &mut Console<'_, W>) -> crate::Result<()> {
    for (field, value) in [("name", "李四"), ("age", "25"), ("city", "北京")] {
        store.hset("user:1", field, value)?;
    }
    let user = store.hgetall("user:1")?;
    console.say(format_args!("用戶資訊: {:?}", user));

    Ok(())
}

fn transaction<S: KvStore, W: Write>(
    store: &mut S,
    console: &mut Console<'_, W>,
) -> crate::Result<()> {
    let mut pipeline = Pipeline::new();
    pipeline.set("transaction_key", "事務測試").incr("counter");

    let replies = store.submit(pipeline)?;
    console.say(format_args!("事務執行成功"));
    if let Some(Frame::Integer(counter)) = replies.get(1) {
        console.say(format_args!("計數器: {}", counter));
    }

    Ok(())
}

/// Human-readable output. A failed write is logged, never fatal.
struct Console<'a, W> {
    out: &'a mut W,
}

impl<'a, W: Write> Console<'a, W> {
    fn new(out: &'a mut W) -> Console<'a, W> {
        Console { out }
    }

    fn say(&mut self, line: fmt::Arguments<'_>) {
        if let Err(err) = writeln!(self.out, "{}", line) {
            warn!(cause = %err, "failed to write console output");
        }
    }

    fn unreachable(&mut self, err: &Error) {
        warn!(kind = ?err.kind(), cause = %err, "store unreachable, tour aborted");

        if err.is_connectivity() {
            self.say(format_args!("無法連接到 Redis 伺服器。請確保 Redis 伺服器已啟動。"));
            self.say(format_args!("錯誤訊息: {}", err));
        } else {
            self.say(format_args!("發生未知錯誤: {}", err));
        }
    }

    fn group_failed(&mut self, group: Group, err: &Error) {
        match (group, err.kind()) {
            (Group::Transaction, _) => self.say(format_args!("事務執行失敗: {}", err)),
            (_, ErrorKind::Other) => self.say(format_args!("發生未知錯誤: {}", err)),
            (_, ErrorKind::Connectivity | ErrorKind::Operation) => {
                self.say(format_args!("Redis 操作出錯: {}", err));
            }
        }
    }
}

/// Prints a missing value the way `redis-cli` does.
struct Nullable(Option<String>);

impl fmt::Display for Nullable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => write!(f, "{}", value),
            None => write!(f, "(nil)"),
        }
    }
}
