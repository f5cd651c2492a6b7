use std::io::{self, Cursor, Read};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, error, info, warn};
use serde::Serialize;
use tiny_http::{Header, Request, Response};

use crate::config::{ConfigError, ServerConfig};
use crate::handler::{self, FailureResponse};

const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to bind {address}: {reason}")]
    Bind { address: String, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// The parts of an HTTP request the router looks at.
#[derive(Debug, Clone, Copy)]
pub struct Incoming<'a> {
    pub method: &'a str,
    pub url: &'a str,
    pub origin: Option<&'a str>,
    pub request_method: Option<&'a str>,
    pub request_headers: Option<&'a str>,
    pub body: &'a [u8],
}

impl<'a> Incoming<'a> {
    pub fn new(method: &'a str, url: &'a str) -> Self {
        Self {
            method,
            url,
            origin: None,
            request_method: None,
            request_headers: None,
            body: &[],
        }
    }

    pub fn with_origin(mut self, origin: &'a str) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Method announced by a CORS preflight
    pub fn with_request_method(mut self, method: &'a str) -> Self {
        self.request_method = Some(method);
        self
    }

    pub fn with_body(mut self, body: &'a [u8]) -> Self {
        self.body = body;
        self
    }

    /// Request path without the query string
    pub fn path(&self) -> &'a str {
        self.url.split('?').next().unwrap_or(self.url)
    }
}

/// A fully formed reply, independent of the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

impl Reply {
    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self {
                status,
                headers: vec![("Content-Type", JSON_CONTENT_TYPE.to_string())],
                body,
            },
            Err(e) => {
                error!("Failed to serialize response: {}", e);
                Self::failure(500, "Internal server error")
            }
        }
    }

    fn failure(status: u16, message: impl Into<String>) -> Self {
        Self::json(status, &FailureResponse::new(message))
    }

    fn empty(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(field, _)| field.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json_body(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_slice(&self.body)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Root,
    Operation,
    Process,
}

fn endpoint_for(config: &ServerConfig, path: &str) -> Option<Endpoint> {
    if path == "/" {
        Some(Endpoint::Root)
    } else if path == config.operation_path {
        Some(Endpoint::Operation)
    } else if path == config.process_path {
        Some(Endpoint::Process)
    } else {
        None
    }
}

/// Maps a request onto a reply. Performs no I/O.
pub fn route(config: &ServerConfig, incoming: &Incoming<'_>) -> Reply {
    let path = incoming.path();
    let Some(endpoint) = endpoint_for(config, path) else {
        return with_cors(config, incoming, Reply::failure(404, format!("Not found: {}", path)));
    };

    let reply = match (incoming.method, endpoint) {
        ("OPTIONS", _) => return preflight(config, incoming, endpoint),
        ("GET", Endpoint::Root) => Reply::json(200, &handler::root()),
        ("GET", Endpoint::Operation) => Reply::json(200, &handler::get_operation_code()),
        ("POST", Endpoint::Process) if incoming.body.len() > config.max_body_bytes => {
            warn!("Rejecting {} byte body on {}", incoming.body.len(), path);
            Reply::failure(413, "Request body too large")
        }
        ("POST", Endpoint::Process) => match handler::handle_process_request(incoming.body) {
            Ok(response) => Reply::json(200, &response),
            Err(e) => {
                warn!("{}", e);
                Reply::json(400, &FailureResponse::from(&e))
            }
        },
        (method, _) => {
            let mut reply = Reply::failure(405, format!("Method {} not allowed on {}", method, path));
            reply.headers.push(("Allow", allowed_for(endpoint).to_string()));
            reply
        }
    };

    with_cors(config, incoming, reply)
}

fn allowed_for(endpoint: Endpoint) -> &'static str {
    match endpoint {
        Endpoint::Root | Endpoint::Operation => "GET, OPTIONS",
        Endpoint::Process => "POST, OPTIONS",
    }
}

fn is_method_allowed(endpoint: Endpoint, method: &str) -> bool {
    allowed_for(endpoint)
        .split(", ")
        .any(|allowed| allowed.eq_ignore_ascii_case(method.trim()))
}

fn preflight(config: &ServerConfig, incoming: &Incoming<'_>, endpoint: Endpoint) -> Reply {
    match (incoming.origin, incoming.request_method) {
        (Some(origin), _) if !config.is_origin_allowed(origin) => {
            debug!("Preflight from disallowed origin {}", origin);
            Reply::failure(400, "Disallowed CORS origin")
        }
        (_, Some(method)) if !is_method_allowed(endpoint, method) => {
            debug!("Preflight for disallowed method {} on {}", method, incoming.path());
            let mut reply = Reply::failure(400, "Disallowed CORS method");
            reply.headers.push(("Allow", allowed_for(endpoint).to_string()));
            reply
        }
        _ => {
            let mut reply = with_cors(config, incoming, Reply::empty(204));
            reply.headers.push(("Access-Control-Allow-Methods", allowed_for(endpoint).to_string()));
            reply.headers.push((
                "Access-Control-Allow-Headers",
                incoming.request_headers.unwrap_or("*").to_string(),
            ));
            reply
        }
    }
}

// Credentials are allowed, so the origin is echoed instead of answering "*".
fn with_cors(config: &ServerConfig, incoming: &Incoming<'_>, mut reply: Reply) -> Reply {
    if let Some(origin) = incoming.origin {
        if config.is_origin_allowed(origin) {
            reply.headers.push(("Access-Control-Allow-Origin", origin.to_string()));
            reply.headers.push(("Access-Control-Allow-Credentials", "true".to_string()));
            reply.headers.push(("Vary", "Origin".to_string()));
        }
    }
    reply
}

/// HTTP front for the classifier, built from an injected [`ServerConfig`].
pub struct Server {
    config: Arc<ServerConfig>,
    http: Arc<tiny_http::Server>,
    shutdown: Arc<AtomicBool>,
    in_flight: Arc<AtomicUsize>,
}

impl Server {
    /// Validates the configuration and binds the listening socket.
    pub fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        config.validate()?;
        let address = config.bind_address();
        let http = tiny_http::Server::http(&address).map_err(|e| ServerError::Bind {
            address: address.clone(),
            reason: e.to_string(),
        })?;
        info!("Listening on {}", address);
        Ok(Self {
            config: Arc::new(config),
            http: Arc::new(http),
            shutdown: Arc::new(AtomicBool::new(false)),
            in_flight: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Address the socket is actually bound to (resolves port 0)
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.http.server_addr().to_ip()
    }

    /// Accepts requests on the current thread until shut down.
    ///
    /// Each request is read and answered on its own worker thread, so a slow
    /// client never holds up the others. Past `max_in_flight` requests the
    /// server answers 503 straight away.
    pub fn serve(&self) {
        loop {
            match self.http.recv() {
                Ok(request) => self.dispatch(request),
                Err(_) if self.shutdown.load(Ordering::SeqCst) => break,
                Err(e) => error!("Failed to accept request: {}", e),
            }
        }
        info!("Server stopped");
    }

    /// Serves requests on a background thread.
    pub fn spawn(self) -> ServerHandle {
        let addr = self.local_addr();
        let http = Arc::clone(&self.http);
        let shutdown = Arc::clone(&self.shutdown);
        let thread = thread::spawn(move || self.serve());
        ServerHandle {
            addr,
            http,
            shutdown,
            thread: Some(thread),
        }
    }

    fn dispatch(&self, request: Request) {
        let Some(slot) = InFlightSlot::acquire(&self.in_flight, self.config.max_in_flight) else {
            warn!("Too many requests in flight, rejecting {} {}", request.method(), request.url());
            send(request, Reply::failure(503, "Server busy"));
            return;
        };

        let config = Arc::clone(&self.config);
        let spawned = thread::Builder::new()
            .name("tokenclass-worker".into())
            .spawn(move || {
                let _slot = slot;
                respond(&config, request);
            });
        if let Err(e) = spawned {
            error!("Failed to spawn worker thread: {}", e);
        }
    }
}

/// Counts a request as in flight until dropped.
struct InFlightSlot(Arc<AtomicUsize>);

impl InFlightSlot {
    fn acquire(counter: &Arc<AtomicUsize>, max: usize) -> Option<Self> {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| (n < max).then_some(n + 1))
            .ok()
            .map(|_| Self(Arc::clone(counter)))
    }
}

impl Drop for InFlightSlot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Read limit for a body: one byte past the maximum detects an oversized body.
fn body_read_limit(max_body_bytes: usize) -> u64 {
    u64::try_from(max_body_bytes).unwrap_or(u64::MAX).saturating_add(1)
}

fn send(request: Request, reply: Reply) {
    let (method, url) = (request.method().to_string(), request.url().to_string());
    if let Err(e) = request.respond(into_response(reply)) {
        error!("Failed to send response for {} {}: {}", method, url, e);
    }
}

fn respond(config: &ServerConfig, mut request: Request) {
    let mut body = Vec::new();
    let limit = body_read_limit(config.max_body_bytes);
    if let Err(e) = request.as_reader().take(limit).read_to_end(&mut body) {
        warn!("Failed to read request body: {}", e);
        send(request, Reply::failure(400, "Unreadable request body"));
        return;
    }

    let method = request.method().to_string();
    let url = request.url().to_string();
    let origin = header_value(&request, "Origin");
    let request_method = header_value(&request, "Access-Control-Request-Method");
    let request_headers = header_value(&request, "Access-Control-Request-Headers");
    let incoming = Incoming {
        method: &method,
        url: &url,
        origin: origin.as_deref(),
        request_method: request_method.as_deref(),
        request_headers: request_headers.as_deref(),
        body: &body,
    };

    let reply = route(config, &incoming);
    debug!("{} {} -> {}", method, url, reply.status);
    send(request, reply);
}

/// Handle to a server running on a background thread. Dropping it stops the server.
pub struct ServerHandle {
    addr: Option<SocketAddr>,
    http: Arc<tiny_http::Server>,
    shutdown: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.addr
    }

    /// Base URL for clients, e.g. `http://127.0.0.1:8000`
    pub fn base_url(&self) -> Option<String> {
        self.addr.map(|addr| format!("http://{}", addr))
    }

    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.http.unblock();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("Server thread panicked");
            }
        }
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

fn header_value(request: &Request, name: &'static str) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|h| h.field.equiv(name))
        .map(|h| h.value.as_str().to_string())
}

fn into_response(reply: Reply) -> Response<Cursor<Vec<u8>>> {
    let mut response = Response::from_data(reply.body).with_status_code(reply.status);
    for (field, value) in reply.headers {
        match Header::from_bytes(field.as_bytes(), value.as_bytes()) {
            Ok(header) => response = response.with_header(header),
            Err(()) => warn!("Dropping invalid header {}: {:?}", field, value),
        }
    }
    response
}
