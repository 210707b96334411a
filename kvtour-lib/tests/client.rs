mod support;

use kvtour_lib::cmd::{Get, HGetAll, LPush, LRange, Ping, SAdd, SMembers, Set};
use kvtour_lib::{Client, Config, Connection, Error, ErrorKind, Frame, Pipeline};
use bytes::Bytes;
use std::time::Duration;
use support::{args, bulk, config_for, serve, simple};
use tokio::net::TcpListener;

async fn listener() -> TcpListener {
    TcpListener::bind("127.0.0.1:0").await.unwrap()
}

#[tokio::test]
async fn ping_get_and_missing_key() {
    let listener = listener().await;
    let config = config_for(&listener);
    let peer = tokio::spawn(serve(listener, vec![simple("PONG"), bulk("張三"), Frame::Null]));

    let mut client = Client::connect(&config).await.unwrap();
    assert_eq!(client.request(Ping::default()).await.unwrap(), "PONG");
    assert_eq!(client.request(Get::new("name")).await.unwrap().as_deref(), Some("張三"));
    assert_eq!(client.request(Get::new("missing")).await.unwrap(), None);

    let requests = peer.await.unwrap();
    assert_eq!(args(&requests[0]), ["ping"]);
    assert_eq!(args(&requests[1]), ["get", "name"]);
    assert_eq!(args(&requests[2]), ["get", "missing"]);
}

#[tokio::test]
async fn set_with_expiry_sends_milliseconds() {
    let listener = listener().await;
    let config = config_for(&listener);
    let peer = tokio::spawn(serve(listener, vec![simple("OK")]));

    let mut client = Client::connect(&config).await.unwrap();
    let value = Bytes::from("臨時數據");
    client
        .request(Set::new("temp_key", value, Some(Duration::from_secs(5))))
        .await
        .unwrap();

    let requests = peer.await.unwrap();
    assert_eq!(args(&requests[0]), ["set", "temp_key", "臨時數據", "px", "5000"]);
}

#[tokio::test]
async fn collections_are_decoded() {
    let listener = listener().await;
    let config = config_for(&listener);
    let replies = vec![
        Frame::Integer(3),
        Frame::Array(vec![bulk("橙子"), bulk("香蕉"), bulk("蘋果")]),
        Frame::Array(vec![bulk("Redis"), bulk("Java"), bulk("Python")]),
        Frame::Array(vec![bulk("name"), bulk("李四"), bulk("age"), bulk("25")]),
    ];
    let peer = tokio::spawn(serve(listener, replies));

    let mut client = Client::connect(&config).await.unwrap();
    assert_eq!(client.request(LPush::new("fruits", ["蘋果", "香蕉", "橙子"])).await.unwrap(), 3);
    assert_eq!(
        client.request(LRange::new("fruits", 0, -1)).await.unwrap(),
        ["橙子", "香蕉", "蘋果"]
    );

    let skills: Vec<String> = client.request(SMembers::new("skills")).await.unwrap().into_iter().collect();
    assert_eq!(skills, ["Java", "Python", "Redis"]);

    let user = client.request(HGetAll::new("user:1")).await.unwrap();
    assert_eq!(user["name"], "李四");
    assert_eq!(user["age"], "25");

    let requests = peer.await.unwrap();
    assert_eq!(args(&requests[1]), ["lrange", "fruits", "0", "-1"]);
}

#[tokio::test]
async fn error_reply_is_operation_error() {
    let listener = listener().await;
    let config = config_for(&listener);
    let wrongtype = "WRONGTYPE Operation against a key holding the wrong kind of value";
    tokio::spawn(serve(listener, vec![Frame::Error(wrongtype.into())]));

    let mut client = Client::connect(&config).await.unwrap();
    let err = client.request(SAdd::new("skills", ["Rust"])).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Operation);
    assert_eq!(err.to_string(), wrongtype);
}

#[tokio::test]
async fn non_zero_db_is_selected_on_connect() {
    let listener = listener().await;
    let config = config_for(&listener).with_db(3);
    let peer = tokio::spawn(serve(listener, vec![simple("OK"), simple("PONG")]));

    let mut client = Client::connect(&config).await.unwrap();
    client.request(Ping::default()).await.unwrap();

    let requests = peer.await.unwrap();
    assert_eq!(args(&requests[0]), ["select", "3"]);
    assert_eq!(args(&requests[1]), ["ping"]);
}

#[tokio::test]
async fn atomic_pipeline_round_trip() {
    let listener = listener().await;
    let config = config_for(&listener);
    let replies = vec![
        simple("OK"),
        simple("QUEUED"),
        simple("QUEUED"),
        Frame::Array(vec![simple("OK"), Frame::Integer(8)]),
    ];
    let peer = tokio::spawn(serve(listener, replies));

    let mut client = Client::connect(&config).await.unwrap();
    let mut pipeline = Pipeline::new();
    pipeline.set("transaction_key", "事務測試").incr("counter");

    let results = client.submit(pipeline).await.unwrap();
    assert_eq!(results, vec![simple("OK"), Frame::Integer(8)]);

    let names: Vec<String> = peer
        .await
        .unwrap()
        .iter()
        .map(|request| args(request)[0].clone())
        .collect();
    assert_eq!(names, ["multi", "set", "incr", "exec"]);
}

#[tokio::test]
async fn discarded_transaction_is_reported() {
    let listener = listener().await;
    let config = config_for(&listener);
    let replies = vec![simple("OK"), simple("QUEUED"), Frame::Null];
    tokio::spawn(serve(listener, replies));

    let mut client = Client::connect(&config).await.unwrap();
    let mut pipeline = Pipeline::new();
    pipeline.incr("counter");

    let err = client.submit(pipeline).await.unwrap_err();
    assert!(matches!(err, Error::TransactionAborted));
}

#[tokio::test]
async fn plain_pipeline_fails_on_error_reply() {
    let listener = listener().await;
    let config = config_for(&listener);
    let replies = vec![
        simple("OK"),
        Frame::Error("ERR value is not an integer or out of range".into()),
    ];
    tokio::spawn(serve(listener, replies));

    let mut client = Client::connect(&config).await.unwrap();
    let mut pipeline = Pipeline::non_atomic();
    pipeline.set("transaction_key", "事務測試").incr("transaction_key");

    let err = client.submit(pipeline).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Operation);
}

#[tokio::test]
async fn silent_server_times_out() {
    let listener = listener().await;
    let config = config_for(&listener)
        .with_timeouts(Duration::from_millis(500), Duration::from_millis(50));
    tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let mut connection = Connection::new(socket);
        let _ = connection.read_frame().await;
        tokio::time::sleep(Duration::from_secs(2)).await;
    });

    let mut client = Client::connect(&config).await.unwrap();
    let err = client.request(Ping::default()).await.unwrap_err();

    assert!(matches!(err, Error::Timeout { op: "ping", .. }));
    assert!(err.is_connectivity());
}

#[tokio::test]
async fn closed_connection_is_connectivity_error() {
    let listener = listener().await;
    let config = config_for(&listener);
    tokio::spawn(serve(listener, vec![]));

    let mut client = Client::connect(&config).await.unwrap();
    let err = client.request(Ping::default()).await.unwrap_err();

    assert!(err.is_connectivity());
}

#[tokio::test]
async fn refused_connection() {
    let port = {
        let listener = listener().await;
        listener.local_addr().unwrap().port()
    };
    let config = Config::default().with_addr("127.0.0.1", port);

    let err = Client::connect(&config).await.unwrap_err();
    assert!(matches!(err, Error::Connect(_)));
    assert!(err.is_connectivity());
}

#[tokio::test]
async fn late_reply_is_never_read_as_the_next_answer() {
    let listener = listener().await;
    let config = config_for(&listener)
        .with_timeouts(Duration::from_millis(500), Duration::from_millis(50));
    tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let mut connection = Connection::new(socket);
        let _ = connection.read_frame().await;
        tokio::time::sleep(Duration::from_millis(150)).await;
        let _ = connection.write_frame(&bulk("value-of-a")).await;
        let _ = connection.read_frame().await;
        let _ = connection.write_frame(&bulk("value-of-b")).await;
    });

    let mut client = Client::connect(&config).await.unwrap();
    let err = client.request(Get::new("a")).await.unwrap_err();
    assert!(matches!(err, Error::Timeout { op: "get", .. }));

    // Give the late reply time to land in the socket.
    tokio::time::sleep(Duration::from_millis(200)).await;

    let err = client.request(Get::new("b")).await.unwrap_err();
    assert!(matches!(err, Error::ConnectionReset));

    let mut pipeline = Pipeline::new();
    pipeline.incr("counter");
    let err = client.submit(pipeline).await.unwrap_err();
    assert!(matches!(err, Error::ConnectionReset));
}
