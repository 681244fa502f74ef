//! Protocol engine abstraction.
//!
//! The engine owns everything on the wire: PDU encoding, the AgentX
//! session with the master agent, access control and the MIB tree. The
//! agent only needs three things from it:
//!
//! - [`Engine::initialize`] - become an AgentX subagent of the master
//! - [`Engine::register_scalar`] - bind a scalar OID to a callback
//! - [`Engine::poll`] - wait for transport I/O and serve requests
//!
//! During `poll` the engine calls the registered [`RequestCallback`]
//! synchronously, on the polling thread, once per request that falls under
//! a registration. The callback's [`ErrorStatus`] becomes the response
//! status.
//!
//! [`LoopbackEngine`] is a complete in-process engine: requests are
//! injected by [`LoopbackClient`] handles instead of arriving from a master
//! agent.

mod loopback;
mod oid_table;

pub use loopback::{DEFAULT_CLIENT_TIMEOUT, LoopbackClient, LoopbackEngine};
pub use oid_table::OidTable;

use std::sync::Arc;
use std::time::Duration;

use crate::error::{ErrorStatus, Result};
use crate::handler::RequestChain;
use crate::oid::Oid;

/// Role the engine plays in the SNMP deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentRole {
    /// Standalone master agent.
    Master,
    /// AgentX subagent attached to a master.
    Subagent,
}

/// Options for [`Engine::initialize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitOptions {
    /// Application name; the engine reads `<app_name>.conf` files.
    pub app_name: String,
    /// AgentX master address.
    pub master_socket: String,
    /// Agent role.
    pub role: AgentRole,
    /// Initialize the VACM/USM access-control subsystems.
    pub access_control: bool,
}

impl InitOptions {
    /// Options for an AgentX subagent with access control enabled.
    pub fn subagent(app_name: impl Into<String>, master_socket: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            master_socket: master_socket.into(),
            role: AgentRole::Subagent,
            access_control: true,
        }
    }
}

/// Operation kind of an inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum RequestMode {
    /// GET.
    Get,
    /// GETNEXT.
    GetNext,
    /// GETBULK.
    GetBulk,
    /// Any SET phase.
    Set,
}

impl std::fmt::Display for RequestMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::GetNext => write!(f, "GETNEXT"),
            Self::GetBulk => write!(f, "GETBULK"),
            Self::Set => write!(f, "SET"),
        }
    }
}

/// Access a registration advertises to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerCapability {
    /// GET/GETNEXT only.
    ReadOnly,
    /// GET/GETNEXT and SET.
    ReadWrite,
}

/// A scalar registration as the engine sees it.
///
/// The engine keeps it for its handler table and passes it back to the
/// callback on every request, so the callback knows which name and root
/// OID the request arrived under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarRegistration {
    /// Handler name.
    pub name: String,
    /// Root OID of the scalar.
    pub root_oid: Oid,
    /// Advertised access.
    pub capability: HandlerCapability,
}

impl ScalarRegistration {
    /// Length of the root OID.
    pub fn root_oid_len(&self) -> usize {
        self.root_oid.len()
    }
}

/// Opaque handle returned by a successful engine registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistrationHandle(pub u32);

/// Callback the engine invokes for each request under a registration.
pub trait RequestCallback: Send + Sync {
    /// Handle one request; the returned status is sent to the manager.
    fn on_request(
        &self,
        registration: &ScalarRegistration,
        mode: RequestMode,
        requests: &mut RequestChain,
    ) -> ErrorStatus;
}

/// An SNMP protocol engine.
///
/// All methods are called from one thread at a time; the agent serializes
/// access. `Send` is required so an agent can be built on one thread and
/// polled on another.
pub trait Engine: Send {
    /// Configure the engine. Called once, before any registration is bound.
    fn initialize(&mut self, options: &InitOptions) -> Result<()>;

    /// Register a scalar and bind it to `callback`.
    ///
    /// An `Err` (e.g. the OID is already registered) is fatal to start-up.
    fn register_scalar(
        &mut self,
        registration: ScalarRegistration,
        callback: Arc<dyn RequestCallback>,
    ) -> Result<RegistrationHandle>;

    /// Wait up to `timeout` for transport I/O and serve what arrived,
    /// invoking callbacks synchronously.
    fn poll(&mut self, timeout: Duration);
}
