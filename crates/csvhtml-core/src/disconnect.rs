//! Peer-close detection for long-polls.
//!
//! actix-web keeps polling a handler after its client hangs up, so a `/watch`
//! request would otherwise hold its file watch until the next change. Every
//! accepted socket is duplicated by [`track_connection`]; a long-poll then
//! peeks at that copy and cancels its token once the peer closes.

use actix_web::dev::Extensions;
use actix_web::HttpRequest;
use std::any::Any;
use std::io;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Pause between checks while the peer has unread bytes queued.
const PENDING_RECHECK: Duration = Duration::from_millis(250);

/// Duplicate of an accepted connection's socket, kept as connection data.
#[cfg(unix)]
#[derive(Debug)]
pub struct PeerSocket(std::os::fd::OwnedFd);

/// `HttpServer::on_connect` hook: remember the socket of each TCP connection.
///
/// The copy lives as long as the connection's data, which the dispatcher
/// drops when the connection ends.
pub fn track_connection(conn: &dyn Any, data: &mut Extensions) {
    #[cfg(unix)]
    if let Some(stream) = conn.downcast_ref::<actix_web::rt::net::TcpStream>() {
        use std::os::fd::AsFd;
        match stream.as_fd().try_clone_to_owned() {
            Ok(fd) => {
                data.insert(PeerSocket(fd));
            }
            Err(e) => debug!(error = %e, "cannot duplicate connection socket"),
        }
    }
    #[cfg(not(unix))]
    let _ = (conn, data);
}

/// Watches one request's connection; dropping it stops the watch.
#[derive(Debug)]
pub struct PeerMonitor(JoinHandle<()>);

impl Drop for PeerMonitor {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Cancel `token` once the client behind `req` closes its connection.
///
/// `None` when the connection is untracked (in-process test requests, or a
/// platform without fd duplication); the token then only follows its parent.
pub fn cancel_on_close(req: &HttpRequest, token: CancellationToken) -> Option<PeerMonitor> {
    let stream = peer_stream(req)?;
    let handle = actix_web::rt::spawn(async move {
        wait_for_close(&stream).await;
        debug!("client closed connection");
        token.cancel();
    });
    Some(PeerMonitor(handle))
}

#[cfg(unix)]
fn peer_stream(req: &HttpRequest) -> Option<TcpStream> {
    let socket = req.conn_data::<PeerSocket>()?;
    let stream = socket.0.try_clone().and_then(|fd| {
        let stream = std::net::TcpStream::from(fd);
        stream.set_nonblocking(true)?;
        TcpStream::from_std(stream)
    });
    match stream {
        Ok(stream) => Some(stream),
        Err(e) => {
            debug!(error = %e, "cannot watch connection for close");
            None
        }
    }
}

#[cfg(not(unix))]
fn peer_stream(_req: &HttpRequest) -> Option<TcpStream> {
    None
}

/// Resolve once the peer has shut down or reset the connection.
async fn wait_for_close(stream: &TcpStream) {
    let mut buf = [0u8; 1];
    loop {
        match stream.peek(&mut buf).await {
            Ok(0) => return,
            // Unread request bytes belong to the dispatcher; look again later.
            Ok(_) => tokio::time::sleep(PENDING_RECHECK).await,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => {
                trace!(error = %e, "connection error");
                return;
            }
        }
    }
}
