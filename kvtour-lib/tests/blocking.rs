mod support;

use kvtour_lib::tour::{self, Summary};
use kvtour_lib::{Config, Frame};
use std::thread;
use support::{args, bulk, simple};

/// Run a scripted peer on its own thread and runtime, so the blocking
/// client under test owns the calling thread.
fn spawn_peer(replies: Vec<Frame>) -> (Config, thread::JoinHandle<Vec<Frame>>) {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    std_listener.set_nonblocking(true).unwrap();
    let port = std_listener.local_addr().unwrap().port();

    let handle = thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            support::serve(listener, replies).await
        })
    });

    (Config::default().with_addr("127.0.0.1", port), handle)
}

#[test]
fn tour_over_the_wire() {
    let replies = vec![
        simple("PONG"),
        simple("OK"),
        bulk("張三"),
        simple("OK"),
        bulk("臨時數據"),
        Frame::Integer(1),
        Frame::Integer(3),
        Frame::Array(vec![bulk("橙子"), bulk("香蕉"), bulk("蘋果")]),
        Frame::Integer(3),
        Frame::Array(vec![bulk("Redis"), bulk("Python"), bulk("Java")]),
        Frame::Integer(1),
        Frame::Integer(1),
        Frame::Integer(1),
        Frame::Array(vec![
            bulk("name"),
            bulk("李四"),
            bulk("age"),
            bulk("25"),
            bulk("city"),
            bulk("北京"),
        ]),
        simple("OK"),
        simple("QUEUED"),
        simple("QUEUED"),
        Frame::Array(vec![simple("OK"), Frame::Integer(5)]),
    ];
    let (config, peer) = spawn_peer(replies);

    let mut out = Vec::new();
    let summary = tour::run(&config, &mut out);
    let out = String::from_utf8(out).unwrap();

    assert!(summary.failures().is_empty(), "{:?}", summary);
    assert!(out.contains(r#"水果列表: ["橙子", "香蕉", "蘋果"]"#));
    assert!(out.contains("計數器: 5"));

    let names: Vec<String> = peer
        .join()
        .unwrap()
        .iter()
        .map(|request| args(request)[0].clone())
        .collect();
    assert_eq!(
        names,
        [
            "ping", "set", "get", "set", "get", "del", "lpush", "lrange", "sadd", "smembers",
            "hset", "hset", "hset", "hgetall", "multi", "set", "incr", "exec",
        ]
    );
}

#[test]
fn unreachable_server_prints_hint_and_stops() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = Config::default().with_addr("127.0.0.1", port);

    let mut out = Vec::new();
    let summary = tour::run(&config, &mut out);
    let out = String::from_utf8(out).unwrap();

    assert!(matches!(summary, Summary::Aborted(ref err) if err.is_connectivity()));
    assert!(out.contains("無法連接到 Redis 伺服器"));
    assert!(out.contains("錯誤訊息: "));
    assert!(!out.contains("==="));
}
