//! In-process engine driven by injected requests.
//!
//! `LoopbackEngine` behaves like an AgentX session whose master lives in the
//! same process: [`LoopbackClient`] handles play the role of the NMS and
//! the master, sending requests that the engine serves from inside
//! [`Engine::poll`], on the polling thread, exactly like a socket-backed
//! engine would.
//!
//! # Example
//!
//! ```rust
//! use snmp_subagent::engine::LoopbackEngine;
//! use snmp_subagent::handler::integer_handler;
//! use snmp_subagent::{Agent, AgentConfig, Value, oid};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # fn main() -> snmp_subagent::Result<()> {
//! let engine = LoopbackEngine::new();
//! let client = engine.client();
//!
//! let config = AgentConfig::default().poll_timeout(Duration::from_millis(10));
//! let agent = Arc::new(Agent::with_config(engine, config));
//! agent.register_scalar("answer", oid!(1, 3, 6, 1, 4, 1, 50000, 1), integer_handler(|_| Ok(42)))?;
//! agent.initialize("/var/run/agentx.sock")?;
//!
//! let runner = {
//!     let agent = Arc::clone(&agent);
//!     std::thread::spawn(move || agent.run())
//! };
//!
//! let response = client.get(&oid!(1, 3, 6, 1, 4, 1, 50000, 1, 0))?;
//! assert_eq!(response.varbinds[0].value, Value::Integer(42));
//!
//! agent.request_stop();
//! runner.join().expect("poll thread panicked")?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::error::{EngineOperation, Error, Result};
use crate::handler::{RequestChain, Response};
use crate::oid::Oid;
use crate::value::Value;
use crate::varbind::VarBind;

use super::{
    Engine, InitOptions, OidTable, RegistrationHandle, RequestCallback, RequestMode,
    ScalarRegistration,
};

/// How long a [`LoopbackClient`] waits for a reply by default.
pub const DEFAULT_CLIENT_TIMEOUT: Duration = Duration::from_secs(5);

struct Injected {
    mode: RequestMode,
    oid: Oid,
    reply: mpsc::Sender<Response>,
}

struct Binding {
    registration: ScalarRegistration,
    callback: Arc<dyn RequestCallback>,
}

/// In-process [`Engine`].
///
/// - `initialize` may be called once.
/// - `register_scalar` needs an initialized engine and rejects a root OID
///   that is already registered.
/// - `poll` waits for one injected request, then drains whatever else is
///   already queued. Each request goes to the registration with the
///   longest root OID prefixing it; OIDs outside every registration answer
///   `noSuchObject` without touching any callback.
pub struct LoopbackEngine {
    inbox: mpsc::Receiver<Injected>,
    sender: mpsc::Sender<Injected>,
    options: Option<InitOptions>,
    table: OidTable<Binding>,
    next_handle: u32,
}

impl LoopbackEngine {
    /// Create an uninitialized engine.
    pub fn new() -> Self {
        let (sender, inbox) = mpsc::channel();
        Self {
            inbox,
            sender,
            options: None,
            table: OidTable::new(),
            next_handle: 1,
        }
    }

    /// A client handle for injecting requests.
    pub fn client(&self) -> LoopbackClient {
        LoopbackClient {
            tx: self.sender.clone(),
            timeout: DEFAULT_CLIENT_TIMEOUT,
        }
    }

    /// Options passed to `initialize`, if it has run.
    pub fn options(&self) -> Option<&InitOptions> {
        self.options.as_ref()
    }

    /// Registrations in OID order.
    pub fn registrations(&self) -> impl Iterator<Item = &ScalarRegistration> {
        self.table.iter().map(|(_, binding)| &binding.registration)
    }

    fn serve(&self, request: Injected) {
        let Injected { mode, oid, reply } = request;

        let response = match self.table.longest_prefix(&oid) {
            Some((_, binding)) => {
                tracing::trace!(
                    oid = %oid,
                    handler = %binding.registration.name,
                    %mode,
                    "loopback request matched registration"
                );
                let mut requests = RequestChain::single(oid);
                let status = binding
                    .callback
                    .on_request(&binding.registration, mode, &mut requests);
                Response::from_status(status, requests.into_varbinds())
            }
            None => {
                tracing::trace!(oid = %oid, %mode, "no registration covers OID");
                Response::success(vec![VarBind::new(oid, Value::NoSuchObject)])
            }
        };

        // The client may have timed out and gone away
        let _ = reply.send(response);
    }
}

impl Default for LoopbackEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LoopbackEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoopbackEngine")
            .field("options", &self.options)
            .field("registrations", &self.table.len())
            .finish()
    }
}

impl Engine for LoopbackEngine {
    fn initialize(&mut self, options: &InitOptions) -> Result<()> {
        if self.options.is_some() {
            return Err(Error::engine(
                EngineOperation::Initialize,
                "engine already initialized",
            ));
        }
        tracing::debug!(
            app_name = %options.app_name,
            master_socket = %options.master_socket,
            role = ?options.role,
            "loopback engine initialized"
        );
        self.options = Some(options.clone());
        Ok(())
    }

    fn register_scalar(
        &mut self,
        registration: ScalarRegistration,
        callback: Arc<dyn RequestCallback>,
    ) -> Result<RegistrationHandle> {
        if self.options.is_none() {
            return Err(Error::engine(
                EngineOperation::Register,
                "engine not initialized",
            ));
        }

        let root = registration.root_oid.clone();
        let binding = Binding {
            registration,
            callback,
        };
        if !self.table.insert(root.clone(), binding) {
            return Err(Error::engine(
                EngineOperation::Register,
                format!("OID {} already registered", root),
            ));
        }

        let handle = RegistrationHandle(self.next_handle);
        self.next_handle += 1;
        Ok(handle)
    }

    fn poll(&mut self, timeout: Duration) {
        match self.inbox.recv_timeout(timeout) {
            Ok(request) => self.serve(request),
            // The engine keeps a sender, so this can only be a timeout
            Err(_) => return,
        }
        while let Ok(request) = self.inbox.try_recv() {
            self.serve(request);
        }
    }
}

/// Handle for injecting requests into a [`LoopbackEngine`].
///
/// Cheap to clone and usable from any thread. Each call blocks until the
/// polling thread has served the request.
#[derive(Debug, Clone)]
pub struct LoopbackClient {
    tx: mpsc::Sender<Injected>,
    timeout: Duration,
}

impl LoopbackClient {
    /// Set how long to wait for each reply.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send a GET for `oid`.
    pub fn get(&self, oid: &Oid) -> Result<Response> {
        self.request(RequestMode::Get, oid)
    }

    /// Send a request of any mode for `oid`.
    pub fn request(&self, mode: RequestMode, oid: &Oid) -> Result<Response> {
        let (reply, rx) = mpsc::channel();
        self.tx
            .send(Injected {
                mode,
                oid: oid.clone(),
                reply,
            })
            .map_err(|_| Error::EngineClosed)?;

        let start = Instant::now();
        match rx.recv_timeout(self.timeout) {
            Ok(response) => Ok(response),
            Err(RecvTimeoutError::Timeout) => Err(Error::Timeout {
                elapsed: start.elapsed(),
            }),
            Err(RecvTimeoutError::Disconnected) => Err(Error::EngineClosed),
        }
    }
}
