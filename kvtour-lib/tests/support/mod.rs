#![allow(dead_code)]

use bytes::Bytes;
use kvtour_lib::{Config, Connection, Frame};
use std::time::Duration;
use tokio::net::TcpListener;

/// Accept a single connection and answer each request with the next scripted
/// reply. Returns the requests in the order they arrived.
pub async fn serve(listener: TcpListener, replies: Vec<Frame>) -> Vec<Frame> {
    let (socket, _) = listener.accept().await.unwrap();
    let mut connection = Connection::new(socket);
    let mut requests = vec![];

    for reply in replies {
        match connection.read_frame().await.unwrap() {
            Some(request) => requests.push(request),
            None => break,
        }
        connection.write_frame(&reply).await.unwrap();
    }

    requests
}

/// A config pointing at `listener` with short timeouts.
pub fn config_for(listener: &TcpListener) -> Config {
    let port = listener.local_addr().unwrap().port();
    Config::default()
        .with_addr("127.0.0.1", port)
        .with_timeouts(Duration::from_millis(500), Duration::from_millis(500))
}

pub fn args(frame: &Frame) -> Vec<String> {
    match frame {
        Frame::Array(parts) => parts.iter().map(ToString::to_string).collect(),
        other => panic!("request is not an array: {:?}", other),
    }
}

pub fn simple(s: &str) -> Frame {
    Frame::Simple(s.to_string())
}

pub fn bulk(s: &str) -> Frame {
    Frame::Bulk(Bytes::copy_from_slice(s.as_bytes()))
}
