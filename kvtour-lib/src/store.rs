use crate::cmd::{Del, Get, HGetAll, HSet, Incr, LPush, LRange, Ping, Protocol, SAdd, SMembers, Set};
use crate::{Frame, Pipeline};
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// The capability set the tour needs from a key-value store.
///
/// Implementors only provide [`request`](KvStore::request) and
/// [`submit`](KvStore::submit); the typed operations are built on top of them.
/// Every call blocks until the store answers.
pub trait KvStore {
    /// Send one command and decode its reply. Error replies become
    /// [`crate::Error::Server`].
    fn request<C: Protocol>(&mut self, cmd: C) -> crate::Result<C::Output>;

    /// Send a batch in one round trip, returning one reply per queued command.
    fn submit(&mut self, pipeline: Pipeline) -> crate::Result<Vec<Frame>>;

    fn ping(&mut self) -> crate::Result<String> {
        self.request(Ping::default())
    }

    fn get(&mut self, key: &str) -> crate::Result<Option<String>> {
        self.request(Get::new(key))
    }

    fn set(&mut self, key: &str, value: &str) -> crate::Result<()> {
        self.request(Set::new(key, Bytes::copy_from_slice(value.as_bytes()), None))
    }

    fn set_expires(&mut self, key: &str, value: &str, ttl: Duration) -> crate::Result<()> {
        self.request(Set::new(key, Bytes::copy_from_slice(value.as_bytes()), Some(ttl)))
    }

    /// Returns the number of keys removed; a missing key is not an error.
    fn del(&mut self, key: &str) -> crate::Result<u64> {
        self.request(Del::new([key]))
    }

    fn incr(&mut self, key: &str) -> crate::Result<i64> {
        self.request(Incr::new(key))
    }

    /// Head insertion: the last value pushed ends up first.
    fn lpush(&mut self, key: &str, values: &[&str]) -> crate::Result<u64> {
        self.request(LPush::new(key, values))
    }

    fn lrange(&mut self, key: &str, start: i64, stop: i64) -> crate::Result<Vec<String>> {
        self.request(LRange::new(key, start, stop))
    }

    fn sadd(&mut self, key: &str, members: &[&str]) -> crate::Result<u64> {
        self.request(SAdd::new(key, members))
    }

    fn smembers(&mut self, key: &str) -> crate::Result<BTreeSet<String>> {
        self.request(SMembers::new(key))
    }

    fn hset(&mut self, key: &str, field: &str, value: &str) -> crate::Result<u64> {
        self.request(HSet::new(key, field, value))
    }

    fn hgetall(&mut self, key: &str) -> crate::Result<BTreeMap<String, String>> {
        self.request(HGetAll::new(key))
    }
}
