//! HTTP serve mode.
//!
//! - `GET /` renders the input from scratch on every request
//! - `GET /watch` long-polls for a change to the input file (live reload only)
//!
//! Handlers share nothing mutable; each render opens and parses the input
//! itself.

use crate::disconnect;
use crate::options::ServiceOptions;
use crate::watch::{WatchOutcome, WatchSession};

use actix_web::dev::Server;
use actix_web::http::header::ContentType;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use csvhtml_render::{DocumentGenerator, InputSource, RenderConfig, WATCH_ROUTE};
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Body of a successful `/watch` response.
pub const WATCH_ACK: &str = "OK";

/// Errors that stop the server itself.
#[derive(Error, Debug)]
pub enum ServeError {
    #[error("listen on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Server(#[source] std::io::Error),
}

/// Shared, read-only state handed to every handler.
#[derive(Debug, Clone)]
pub struct ServeState {
    generator: DocumentGenerator,
    input: InputSource,
    watched: Option<PathBuf>,
    shutdown: CancellationToken,
}

impl ServeState {
    pub fn new(options: &ServiceOptions, config: RenderConfig) -> Self {
        Self {
            generator: DocumentGenerator::new(config),
            input: options.input.clone(),
            watched: options.watched_path().map(PathBuf::from),
            shutdown: CancellationToken::new(),
        }
    }

    /// Token cancelled on shutdown; ends every open long-poll.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn live_reload(&self) -> bool {
        self.watched.is_some()
    }
}

/// Register routes. `/watch` exists only when live reload is eligible.
pub fn routes(state: ServeState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let live_reload = state.live_reload();
        cfg.app_data(web::Data::new(state))
            .route("/", web::get().to(index));
        if live_reload {
            cfg.route(WATCH_ROUTE, web::get().to(watch));
        }
    }
}

async fn index(state: web::Data<ServeState>) -> HttpResponse {
    let generator = state.generator.clone();
    let input = state.input.clone();

    match web::block(move || generator.generate(&input)).await {
        Ok(Ok(html)) => HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(html),
        Ok(Err(e)) => {
            warn!(error = %e, "render failed");
            plain_error(format!("render document: {e}"))
        }
        Err(e) => {
            error!(error = %e, "render task failed");
            plain_error(format!("render document: {e}"))
        }
    }
}

async fn watch(req: HttpRequest, state: web::Data<ServeState>) -> HttpResponse {
    let Some(path) = state.watched.clone() else {
        return HttpResponse::NotFound().finish();
    };

    let session = match WatchSession::start(path) {
        Ok(session) => session,
        Err(e) => {
            warn!(error = %e, "watch setup failed");
            return plain_error(e.to_string());
        }
    };

    // Cancelled by server shutdown or by the client closing its connection.
    let cancel = state.shutdown.child_token();
    let _peer = disconnect::cancel_on_close(&req, cancel.clone());
    match session.wait(&cancel).await {
        Ok(WatchOutcome::Changed) => HttpResponse::Ok()
            .content_type(ContentType::plaintext())
            .body(WATCH_ACK),
        Ok(WatchOutcome::Cancelled) => {
            debug!("long-poll cancelled");
            HttpResponse::ServiceUnavailable().finish()
        }
        Err(e) => {
            warn!(error = %e, "watch failed");
            plain_error(e.to_string())
        }
    }
}

fn plain_error(message: String) -> HttpResponse {
    HttpResponse::InternalServerError()
        .content_type(ContentType::plaintext())
        .body(message)
}

/// Accept Go-style `:port` addresses as all-interfaces.
pub fn normalize_addr(addr: &str) -> String {
    if addr.starts_with(':') {
        format!("0.0.0.0{addr}")
    } else {
        addr.to_string()
    }
}

/// Bind `addr` and build the server without starting to poll it.
///
/// Returns the server together with the addresses actually bound, which
/// differ from `addr` for port 0.
pub fn listen(addr: &str, state: &ServeState) -> Result<(Server, Vec<SocketAddr>), ServeError> {
    let bind_addr = normalize_addr(addr);
    let factory_state = state.clone();
    let bound = HttpServer::new(move || App::new().configure(routes(factory_state.clone())))
        .on_connect(disconnect::track_connection)
        .disable_signals()
        .shutdown_timeout(1)
        .bind(bind_addr.as_str())
        .map_err(|source| ServeError::Bind {
            addr: bind_addr.clone(),
            source,
        })?;
    let addrs = bound.addrs();
    Ok((bound.run(), addrs))
}

/// Bind `addr` and serve until Ctrl-C.
///
/// Bind failure is returned before any request is accepted.
pub async fn serve(addr: &str, state: ServeState) -> Result<(), ServeError> {
    let shutdown = state.shutdown_token();

    if let Some(path) = &state.watched {
        info!("Watching {} for changes", path.display());
    }

    let (server, addrs) = listen(addr, &state)?;
    for bound in &addrs {
        info!("Serving on {}", bound);
    }

    let handle = server.handle();
    actix_web::rt::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutting down");
            shutdown.cancel();
            handle.stop(true).await;
        }
    });

    server.await.map_err(ServeError::Server)
}
