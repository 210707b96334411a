//! An in-process stand-in for a Redis server.
//!
//! `MemoryStore` applies the same [`Command`]s the network client sends and
//! answers with the same [`Frame`]s a server would, so the tour and anything
//! else written against [`KvStore`] can be exercised without a server.

use crate::cmd::{Command, Protocol};
use crate::pipeline::{self, Pipeline};
use crate::{Error, Frame, KvStore};
use bytes::Bytes;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

const WRONGTYPE: &str = "WRONGTYPE Operation against a key holding the wrong kind of value";
const NOT_AN_INTEGER: &str = "ERR value is not an integer or out of range";
const INVALID_EXPIRE: &str = "ERR invalid expire time in 'set' command";

/// Shared handle to the store state.
///
/// Cloning is shallow, so a test can keep one handle to inspect the data
/// while another is lent to the code under test.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
struct State {
    entries: HashMap<String, Entry>,

    /// Tracks key TTLs, sorted by when they expire.
    expirations: BTreeSet<(Instant, String)>,

    /// When set, every call fails as if the server went away.
    offline: bool,
}

#[derive(Debug)]
struct Entry {
    data: Value,

    expires_at: Option<Instant>,
}

#[derive(Debug)]
enum Value {
    Str(Bytes),
    List(VecDeque<Bytes>),
    Set(HashSet<Bytes>),
    Hash(HashMap<String, Bytes>),
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// Simulate the server becoming unreachable (or reachable again).
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Remaining time to live of `key`, `None` for missing or persistent keys.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let mut state = self.lock();
        let now = Instant::now();
        state.purge_expired_keys(now);

        state
            .entries
            .get(key)
            .and_then(|entry| entry.expires_at)
            .map(|when| when.saturating_duration_since(now))
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KvStore for MemoryStore {
    fn request<C: Protocol>(&mut self, cmd: C) -> crate::Result<C::Output> {
        let reply = {
            let mut state = self.lock();
            state.ensure_online()?;
            state.apply(cmd.into(), Instant::now())
        };

        match reply {
            Frame::Error(msg) => Err(Error::Server(msg)),
            frame => C::parse_response(frame),
        }
    }

    /// The whole batch is applied under one lock, so nothing interleaves.
    fn submit(&mut self, pipeline: Pipeline) -> crate::Result<Vec<Frame>> {
        let replies: Vec<Frame> = {
            let mut state = self.lock();
            state.ensure_online()?;
            let now = Instant::now();

            pipeline
                .into_commands()
                .into_iter()
                .map(|cmd| state.apply(cmd, now))
                .collect()
        };

        pipeline::check_replies(replies)
    }
}

impl State {
    fn ensure_online(&self) -> crate::Result<()> {
        if self.offline {
            let err = io::Error::new(io::ErrorKind::ConnectionRefused, "store is offline");
            return Err(Error::Io(err));
        }

        Ok(())
    }

    /// Purge all keys that expired at or before `now`.
    fn purge_expired_keys(&mut self, now: Instant) {
        while let Some((when, key)) = self.expirations.iter().next().cloned() {
            if when > now {
                return;
            }

            debug!(key = %key, "expired");
            self.entries.remove(&key);
            self.expirations.remove(&(when, key));
        }
    }

    fn remove(&mut self, key: &str) -> Option<Entry> {
        let entry = self.entries.remove(key)?;
        if let Some(when) = entry.expires_at {
            self.expirations.remove(&(when, key.to_string()));
        }

        Some(entry)
    }

    /// Entry for a write of a given type, created empty when missing.
    fn entry_or_insert(&mut self, key: &str, empty: impl FnOnce() -> Value) -> &mut Value {
        &mut self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry {
                data: empty(),
                expires_at: None,
            })
            .data
    }

    fn apply(&mut self, cmd: Command, now: Instant) -> Frame {
        self.purge_expired_keys(now);
        debug!(cmd = cmd.get_name(), "apply");

        match cmd {
            Command::Ping(ping) => match ping.echo() {
                Some(echo) => Frame::Bulk(echo.clone()),
                None => Frame::Simple("PONG".to_string()),
            },
            Command::Select(select) if select.db() < 16 => ok(),
            Command::Select(_) => Frame::Error("ERR DB index is out of range".to_string()),
            Command::Get(get) => match self.entries.get(get.key()).map(|e| &e.data) {
                Some(Value::Str(data)) => Frame::Bulk(data.clone()),
                Some(_) => wrong_type(),
                None => Frame::Null,
            },
            Command::Set(set) => {
                let expires_at = match set.expire().map(|ttl| now.checked_add(ttl)) {
                    Some(None) => return Frame::Error(INVALID_EXPIRE.to_string()),
                    Some(when) => when,
                    None => None,
                };
                self.remove(set.key());

                if let Some(when) = expires_at {
                    self.expirations.insert((when, set.key().to_string()));
                }
                self.entries.insert(
                    set.key().to_string(),
                    Entry {
                        data: Value::Str(set.value().clone()),
                        expires_at,
                    },
                );

                ok()
            }
            Command::Del(del) => {
                let removed = del
                    .keys()
                    .iter()
                    .filter(|key| self.remove(key).is_some())
                    .count();

                integer(removed)
            }
            Command::Incr(incr) => self.incr(incr.key()),
            Command::LPush(push) => match self.entry_or_insert(push.key(), || Value::List(VecDeque::new())) {
                Value::List(list) => {
                    for value in push.values() {
                        list.push_front(value.clone());
                    }
                    integer(list.len())
                }
                _ => wrong_type(),
            },
            Command::LRange(range) => match self.entries.get(range.key()).map(|e| &e.data) {
                Some(Value::List(list)) => {
                    let items = match range_bounds(list.len(), range.start(), range.stop()) {
                        Some((start, stop)) => list
                            .range(start..=stop)
                            .map(|v| Frame::Bulk(v.clone()))
                            .collect(),
                        None => vec![],
                    };
                    Frame::Array(items)
                }
                Some(_) => wrong_type(),
                None => Frame::Array(vec![]),
            },
            Command::SAdd(add) => match self.entry_or_insert(add.key(), || Value::Set(HashSet::new())) {
                Value::Set(set) => {
                    let added = add
                        .members()
                        .iter()
                        .filter(|member| set.insert((*member).clone()))
                        .count();
                    integer(added)
                }
                _ => wrong_type(),
            },
            Command::SMembers(members) => match self.entries.get(members.key()).map(|e| &e.data) {
                Some(Value::Set(set)) => Frame::Array(set.iter().map(|m| Frame::Bulk(m.clone())).collect()),
                Some(_) => wrong_type(),
                None => Frame::Array(vec![]),
            },
            Command::HSet(hset) => match self.entry_or_insert(hset.key(), || Value::Hash(HashMap::new())) {
                Value::Hash(hash) => {
                    let created = hset
                        .fields()
                        .iter()
                        .filter(|(field, value)| hash.insert(field.clone(), value.clone()).is_none())
                        .count();
                    integer(created)
                }
                _ => wrong_type(),
            },
            Command::HGetAll(hgetall) => match self.entries.get(hgetall.key()).map(|e| &e.data) {
                Some(Value::Hash(hash)) => Frame::Array(
                    hash.iter()
                        .flat_map(|(field, value)| {
                            [Frame::Bulk(Bytes::from(field.clone())), Frame::Bulk(value.clone())]
                        })
                        .collect(),
                ),
                Some(_) => wrong_type(),
                None => Frame::Array(vec![]),
            },
        }
    }

    /// Keeps any TTL already set on the key.
    fn incr(&mut self, key: &str) -> Frame {
        let data = self.entry_or_insert(key, || Value::Str(Bytes::from_static(b"0")));

        match data {
            Value::Str(current) => {
                let next = std::str::from_utf8(current)
                    .ok()
                    .and_then(|s| s.parse::<i64>().ok())
                    .and_then(|n| n.checked_add(1));

                match next {
                    Some(n) => {
                        *current = Bytes::from(n.to_string());
                        Frame::Integer(n)
                    }
                    None => Frame::Error(NOT_AN_INTEGER.to_string()),
                }
            }
            _ => wrong_type(),
        }
    }
}

/// Resolve `LRANGE` offsets against a list of `len` elements. Negative
/// offsets count from the tail, `stop` is inclusive and clamped to the end.
fn range_bounds(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    let len = i64::try_from(len).ok()?;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if start > stop || start >= len {
        return None;
    }

    Some((usize::try_from(start).ok()?, usize::try_from(stop).ok()?))
}

fn ok() -> Frame {
    Frame::Simple("OK".to_string())
}

fn wrong_type() -> Frame {
    Frame::Error(WRONGTYPE.to_string())
}

fn integer(n: usize) -> Frame {
    Frame::Integer(i64::try_from(n).unwrap_or(i64::MAX))
}
