//! Long-poll lifecycle over a real listener.
//!
//! Validates that a `/watch` request holds exactly one file watch while its
//! client is connected, and that the watch is released as soon as the client
//! closes the connection, with no change to the file.
//!
//! Kept in its own test binary: it counts inotify descriptors for the whole
//! process, so no other watch test may run alongside it.

#![cfg(target_os = "linux")]

use csvhtml_core::serve::{listen, ServeState};
use csvhtml_core::ServiceOptions;
use csvhtml_render::InputSource;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

const WATCH_REQUEST: &[u8] = b"GET /watch HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n";

/// Open inotify instances in this process (one per live watch session).
fn inotify_fds() -> usize {
    std::fs::read_dir("/proc/self/fd")
        .expect("procfs available")
        .filter_map(Result::ok)
        .filter_map(|entry| std::fs::read_link(entry.path()).ok())
        .filter(|target| target.to_string_lossy().contains("inotify"))
        .count()
}

/// Poll until the inotify count reaches `expected`, or give up after ~5s.
async fn settle_at(expected: usize) -> usize {
    for _ in 0..100 {
        if inotify_fds() == expected {
            return expected;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    inotify_fds()
}

#[actix_web::test]
async fn client_disconnect_releases_watch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.csv");
    std::fs::write(&path, "a\n1\n").unwrap();

    let options = ServiceOptions {
        input: InputSource::File(path.clone()),
        serve: Some("127.0.0.1:0".to_string()),
        ..ServiceOptions::default()
    };
    let state = ServeState::new(&options, options.render_config().unwrap());
    let shutdown = state.shutdown_token();
    let (server, addrs) = listen("127.0.0.1:0", &state).unwrap();
    let handle = server.handle();
    actix_web::rt::spawn(server);
    let addr = addrs[0];

    assert_eq!(inotify_fds(), 0);

    // Abandoned poll: the watch goes away with the connection.
    let mut abandoned = TcpStream::connect(addr).await.unwrap();
    abandoned.write_all(WATCH_REQUEST).await.unwrap();
    assert_eq!(settle_at(1).await, 1, "an open long-poll holds one watch");

    drop(abandoned);
    assert_eq!(
        settle_at(0).await,
        0,
        "watch must be released once the client disconnects"
    );

    // A connected client is still signalled on change.
    let mut client = TcpStream::connect(addr).await.unwrap();
    client.write_all(WATCH_REQUEST).await.unwrap();
    assert_eq!(settle_at(1).await, 1);

    std::fs::write(&path, "a\n2\n").unwrap();
    let mut response = Vec::new();
    tokio::time::timeout(Duration::from_secs(10), client.read_to_end(&mut response))
        .await
        .expect("long-poll should answer after the change")
        .unwrap();
    let response = String::from_utf8_lossy(&response);
    assert!(response.starts_with("HTTP/1.1 200"), "got {response}");
    assert!(response.ends_with("\r\n\r\nOK"), "got {response}");
    assert_eq!(settle_at(0).await, 0);

    shutdown.cancel();
    handle.stop(true).await;
}
