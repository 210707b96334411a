use crate::DEFAULT_PORT;
use std::time::Duration;

/// Where the store lives and how long to wait for it.
///
/// There is no outside source for these values; `Config::default()` is what
/// the `kvtour` binary uses, the setters exist for tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Logical database selected right after connecting.
    pub db: u32,
    pub connect_timeout: Duration,
    /// Bounds every single request/reply round trip.
    pub op_timeout: Duration,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            db: 0,
            connect_timeout: Duration::from_secs(1),
            op_timeout: Duration::from_secs(1),
        }
    }
}

impl Config {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn with_addr(mut self, host: impl ToString, port: u16) -> Config {
        self.host = host.to_string();
        self.port = port;
        self
    }

    pub fn with_db(mut self, db: u32) -> Config {
        self.db = db;
        self
    }

    pub fn with_timeouts(mut self, connect: Duration, op: Duration) -> Config {
        self.connect_timeout = connect;
        self.op_timeout = op;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();

        assert_eq!(config.addr(), "localhost:6379");
        assert_eq!(config.db, 0);
        assert_eq!(config.connect_timeout, Duration::from_secs(1));
        assert_eq!(config.op_timeout, Duration::from_secs(1));
    }

    #[test]
    fn setters_keep_other_fields() {
        let config = Config::default()
            .with_addr("127.0.0.1", 7000)
            .with_db(2);

        assert_eq!(config.addr(), "127.0.0.1:7000");
        assert_eq!(config.db, 2);
        assert_eq!(config.op_timeout, Duration::from_secs(1));
    }
}
