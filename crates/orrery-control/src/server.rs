//! HTTP control server implementation.

use std::io::{Cursor, Read};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use orrery_sim::{ControlEvent, ControlSender, SimulationSnapshot, SliderDescriptor};
use serde::{Deserialize, Serialize};
use tiny_http::{Header, Method, Request, Response, Server};
use tracing::{debug, info, warn};

/// Snapshot shared between the main loop (writer) and the server (reader).
pub type SharedSnapshot = Arc<Mutex<SimulationSnapshot>>;

#[derive(Debug, thiserror::Error)]
pub enum ControlServerError {
    #[error("Failed to bind to port {port}: {error}")]
    BindError { port: u16, error: String },
    #[error("Failed to spawn server thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// HTTP server for the control API.
/// Runs on a background thread so requests never block a tick.
pub struct ControlServer {
    port: u16,
    actual_port: Option<u16>,
    server: Option<Arc<Server>>,
    handle: Option<JoinHandle<()>>,
}

#[derive(Deserialize)]
struct SpeedRequest {
    body: String,
    value: f64,
}

#[derive(Deserialize)]
struct Command {
    command: String,
}

/// `queued` means the event reached the simulation's queue. Whether it was
/// applied shows up in the next `/state` or `/controls` response.
#[derive(Serialize)]
struct QueuedResponse {
    queued: bool,
}

#[derive(Serialize)]
struct CommandResponse {
    executed: bool,
    command: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    tick: u64,
}

#[derive(Serialize)]
struct ControlsResponse {
    sliders: Vec<SliderDescriptor>,
    pause_label: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

type HttpResponse = Response<Cursor<Vec<u8>>>;

impl ControlServer {
    /// Creates a stopped server for `port`. Port 0 lets the OS choose.
    pub fn new(port: u16) -> Self {
        Self {
            port,
            actual_port: None,
            server: None,
            handle: None,
        }
    }

    /// Bind to localhost and serve requests on a background thread.
    pub fn start(
        &mut self,
        snapshot: SharedSnapshot,
        sender: ControlSender,
    ) -> Result<(), ControlServerError> {
        let server = Server::http(format!("127.0.0.1:{}", self.port)).map_err(|e| {
            ControlServerError::BindError {
                port: self.port,
                error: e.to_string(),
            }
        })?;

        let actual_port = server
            .server_addr()
            .to_ip()
            .map(|addr| addr.port())
            .unwrap_or(self.port);
        self.actual_port = Some(actual_port);

        let server = Arc::new(server);
        let thread_server = Arc::clone(&server);
        let handle = std::thread::Builder::new()
            .name("control-server".to_string())
            .spawn(move || Self::run_server(&thread_server, &snapshot, &sender))
            .map_err(ControlServerError::Spawn)?;

        info!("Control server listening on http://127.0.0.1:{actual_port}");
        self.server = Some(server);
        self.handle = Some(handle);
        Ok(())
    }

    /// Unblock the server thread and wait for it to finish.
    pub fn stop(&mut self) {
        if let Some(server) = self.server.take() {
            server.unblock();
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Returns the bound port once started, else the requested one.
    pub fn actual_port(&self) -> u16 {
        self.actual_port.unwrap_or(self.port)
    }

    fn run_server(server: &Server, snapshot: &SharedSnapshot, sender: &ControlSender) {
        for request in server.incoming_requests() {
            if let Err(e) = Self::handle_request(request, snapshot, sender) {
                warn!("Control server error: {e}");
            }
        }
        debug!("Control server stopped");
    }

    fn handle_request(
        mut request: Request,
        snapshot: &SharedSnapshot,
        sender: &ControlSender,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let path = request
            .url()
            .split('?')
            .next()
            .unwrap_or_default()
            .to_string();
        let method = request.method().clone();
        debug!("{method} {path}");

        let response = match (&method, path.as_str()) {
            (&Method::Get, "/health") => {
                let tick = lock(snapshot)?.tick;
                json_response(&HealthResponse { status: "ok", tick })?
            }
            (&Method::Get, "/state") => {
                let state = lock(snapshot)?.clone();
                json_response(&state)?
            }
            (&Method::Get, "/controls") => {
                let state = lock(snapshot)?;
                json_response(&ControlsResponse {
                    sliders: state.sliders.clone(),
                    pause_label: state.pause_label.clone(),
                })?
            }
            (&Method::Post, "/speed") => {
                let mut body = String::new();
                request.as_reader().read_to_string(&mut body)?;
                match serde_json::from_str::<SpeedRequest>(&body) {
                    Ok(speed) => {
                        let queued = sender.set_speed(&speed.body, speed.value);
                        json_response(&QueuedResponse { queued })?
                    }
                    Err(e) => bad_request(&e.to_string())?,
                }
            }
            (&Method::Post, "/pause") => {
                let queued = sender.toggle_pause();
                json_response(&QueuedResponse { queued })?
            }
            (&Method::Post, "/command") => {
                let mut body = String::new();
                request.as_reader().read_to_string(&mut body)?;
                match serde_json::from_str::<Command>(&body) {
                    Ok(command) => {
                        let executed = match command.command.as_str() {
                            "quit" => sender.send(ControlEvent::Quit),
                            _ => false,
                        };
                        json_response(&CommandResponse {
                            executed,
                            command: command.command,
                        })?
                    }
                    Err(e) => bad_request(&e.to_string())?,
                }
            }
            _ => Response::from_string("Not Found").with_status_code(404),
        };

        request.respond(response)?;
        Ok(())
    }
}

impl Drop for ControlServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn lock(
    snapshot: &SharedSnapshot,
) -> Result<std::sync::MutexGuard<'_, SimulationSnapshot>, Box<dyn std::error::Error + Send + Sync>>
{
    snapshot.lock().map_err(|_| "snapshot lock poisoned".into())
}

fn json_response<T: Serialize>(
    value: &T,
) -> Result<HttpResponse, Box<dyn std::error::Error + Send + Sync>> {
    let json = serde_json::to_string(value)?;
    let mut response = Response::from_string(json);
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        response = response.with_header(header);
    }
    Ok(response)
}

fn bad_request(message: &str) -> Result<HttpResponse, Box<dyn std::error::Error + Send + Sync>> {
    Ok(json_response(&ErrorResponse {
        error: message.to_string(),
    })?
    .with_status_code(400))
}
