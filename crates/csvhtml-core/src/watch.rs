//! Change notification for the `/watch` long-poll.
//!
//! A [`WatchSession`] watches exactly one file for the lifetime of one HTTP
//! connection. [`WatchSession::wait`] resolves once:
//!
//! - `Watching → Signaled`: the file changed and is non-empty
//! - `Watching → Failed`: stat or watcher error
//! - `Watching → Cancelled`: the cancellation token fired
//!
//! A missing file (atomic replace in progress) or an empty file (truncated,
//! about to be rewritten) keeps the session watching.

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Errors that end a watch session.
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("create watcher: {0}")]
    Create(#[source] notify::Error),

    #[error("add file to watcher: {}: {source}", path.display())]
    Register {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("stat file {}: {source}", path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("watcher error: {0}")]
    Watcher(#[source] notify::Error),

    #[error("watcher stopped delivering events")]
    Closed,
}

/// Session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Watching,
    Signaled,
    Failed,
    Cancelled,
}

/// How a session that did not fail ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    /// File changed and has content; the client should reload.
    Changed,
    /// The connection (or server) went away first.
    Cancelled,
}

/// What a stat after a change event says about the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeCheck {
    /// Non-empty file: signal.
    Ready,
    /// File is gone, presumably mid-replace: keep watching.
    Replacing,
    /// File is empty, presumably mid-rewrite: keep watching.
    Truncated,
}

/// Classify the file length read after a change event.
pub fn classify(len: io::Result<u64>) -> io::Result<ChangeCheck> {
    match len {
        Ok(0) => Ok(ChangeCheck::Truncated),
        Ok(_) => Ok(ChangeCheck::Ready),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(ChangeCheck::Replacing),
        Err(e) => Err(e),
    }
}

/// Opens and reads (including our own renders of the file) are not changes.
fn is_access_only(event: &Event) -> bool {
    matches!(event.kind, EventKind::Access(_))
}

/// A file watch scoped to one long-poll request.
pub struct WatchSession {
    path: PathBuf,
    _watcher: RecommendedWatcher,
    events: UnboundedReceiver<Event>,
    errors: UnboundedReceiver<notify::Error>,
    state: WatchState,
}

impl std::fmt::Debug for WatchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchSession")
            .field("path", &self.path)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl WatchSession {
    /// Acquire a watch on `path`. Failure here is final; nothing retries.
    pub fn start(path: impl Into<PathBuf>) -> Result<Self, WatchError> {
        let path = path.into();
        let (event_tx, events) = mpsc::unbounded_channel();
        let (error_tx, errors) = mpsc::unbounded_channel();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            // Receivers are dropped once the session resolves; late events are moot.
            match res {
                Ok(event) => {
                    let _ = event_tx.send(event);
                }
                Err(err) => {
                    let _ = error_tx.send(err);
                }
            }
        })
        .map_err(WatchError::Create)?;

        watcher
            .watch(&path, RecursiveMode::NonRecursive)
            .map_err(|source| WatchError::Register {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), "watch registered");
        Ok(Self {
            path,
            _watcher: watcher,
            events,
            errors,
            state: WatchState::Watching,
        })
    }

    /// Block until the file changes, the watcher fails, or `cancel` fires.
    ///
    /// Consumes the session: one connection gets at most one signal.
    pub async fn wait(mut self, cancel: &CancellationToken) -> Result<WatchOutcome, WatchError> {
        let result = self.next_outcome(cancel).await;
        self.state = match &result {
            Ok(WatchOutcome::Changed) => WatchState::Signaled,
            Ok(WatchOutcome::Cancelled) => WatchState::Cancelled,
            Err(_) => WatchState::Failed,
        };
        debug!(path = %self.path.display(), state = ?self.state, "watch resolved");
        result
    }

    async fn next_outcome(&mut self, cancel: &CancellationToken) -> Result<WatchOutcome, WatchError> {
        let Self {
            path,
            events,
            errors,
            ..
        } = self;

        loop {
            tokio::select! {
                event = events.recv() => {
                    let event = event.ok_or(WatchError::Closed)?;
                    if is_access_only(&event) {
                        trace!(kind = ?event.kind, "ignoring access event");
                        continue;
                    }
                    debug!(kind = ?event.kind, "File changed");

                    let len = tokio::fs::metadata(&*path).await.map(|m| m.len());
                    let check = classify(len).map_err(|source| WatchError::Stat {
                        path: path.clone(),
                        source,
                    })?;
                    match check {
                        ChangeCheck::Ready => return Ok(WatchOutcome::Changed),
                        ChangeCheck::Replacing => debug!("file missing, waiting for replacement"),
                        ChangeCheck::Truncated => debug!("file empty, waiting for rewrite"),
                    }
                }
                Some(err) = errors.recv() => return Err(WatchError::Watcher(err)),
                _ = cancel.cancelled() => return Ok(WatchOutcome::Cancelled),
            }
        }
    }
}

impl Drop for WatchSession {
    fn drop(&mut self) {
        trace!(path = %self.path.display(), state = ?self.state, "watch released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tokio::time::timeout;

    #[test]
    fn test_classify() {
        assert_eq!(classify(Ok(12)).unwrap(), ChangeCheck::Ready);
        assert_eq!(classify(Ok(0)).unwrap(), ChangeCheck::Truncated);
        assert_eq!(
            classify(Err(io::Error::from(io::ErrorKind::NotFound))).unwrap(),
            ChangeCheck::Replacing
        );
        assert!(classify(Err(io::Error::from(io::ErrorKind::PermissionDenied))).is_err());
    }

    #[test]
    fn test_access_events_ignored() {
        let open = Event::new(EventKind::Access(notify::event::AccessKind::Any));
        let modify = Event::new(EventKind::Modify(notify::event::ModifyKind::Any));
        assert!(is_access_only(&open));
        assert!(!is_access_only(&modify));
    }

    #[tokio::test]
    async fn test_missing_path_fails_to_register() {
        let dir = tempfile::tempdir().unwrap();
        let err = WatchSession::start(dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, WatchError::Register { .. }), "got {err:?}");
        assert!(err.to_string().starts_with("add file to watcher"));
    }

    #[tokio::test]
    async fn test_cancellation_ends_wait() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "a\n1\n").unwrap();

        let session = WatchSession::start(&path).unwrap();

        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let outcome = timeout(Duration::from_secs(5), session.wait(&token))
            .await
            .expect("wait should end on cancellation")
            .unwrap();
        assert_eq!(outcome, WatchOutcome::Cancelled);
    }

    #[tokio::test]
    async fn test_truncate_then_rewrite_signals_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "a\n1\n").unwrap();

        let session = WatchSession::start(&path).unwrap();
        let token = CancellationToken::new();
        let mut wait = Box::pin(session.wait(&token));

        fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&path)
            .unwrap();
        assert!(
            timeout(Duration::from_millis(300), &mut wait).await.is_err(),
            "an empty file must not signal"
        );

        fs::write(&path, "a\n2\n").unwrap();
        let outcome = timeout(Duration::from_secs(5), &mut wait)
            .await
            .expect("rewrite should signal")
            .unwrap();
        assert_eq!(outcome, WatchOutcome::Changed);
    }

    #[tokio::test]
    async fn test_reading_file_does_not_signal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "a\n1\n").unwrap();

        let session = WatchSession::start(&path).unwrap();
        let token = CancellationToken::new();
        let mut wait = Box::pin(session.wait(&token));

        let _ = fs::read_to_string(&path).unwrap();
        assert!(timeout(Duration::from_millis(300), &mut wait).await.is_err());

        token.cancel();
        let outcome = timeout(Duration::from_secs(5), &mut wait).await.unwrap().unwrap();
        assert_eq!(outcome, WatchOutcome::Cancelled);
    }
}
