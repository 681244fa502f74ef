//! AgentX subagent facade.
//!
//! [`Agent`] ties the pieces together:
//!
//! - the lifecycle controller ([`Agent::initialize`], [`Agent::run`],
//!   [`Agent::request_stop`], [`Agent::is_running`])
//! - the registry of scalar OIDs ([`Agent::register_scalar`])
//! - the dispatcher every registration is bound to, which routes GETs to
//!   handlers by name
//!
//! # Example
//!
//! ```rust
//! use snmp_subagent::engine::LoopbackEngine;
//! use snmp_subagent::handler::integer_handler;
//! use snmp_subagent::{Agent, ErrorStatus, Value, oid};
//! use std::sync::Arc;
//!
//! # fn main() -> snmp_subagent::Result<()> {
//! let engine = LoopbackEngine::new();
//! let client = engine.client();
//!
//! let agent = Arc::new(Agent::new(engine));
//! agent.initialize("/var/run/agentx.sock")?;
//! agent.register_scalar(
//!     "temperature",
//!     oid!(1, 3, 6, 1, 4, 1, 50000, 1),
//!     integer_handler(|_| Ok(21)),
//! )?;
//!
//! let runner = {
//!     let agent = Arc::clone(&agent);
//!     std::thread::spawn(move || agent.run())
//! };
//!
//! let response = client.get(&oid!(1, 3, 6, 1, 4, 1, 50000, 1, 0))?;
//! assert_eq!(response.error_status, ErrorStatus::NoError);
//! assert_eq!(response.first().map(|vb| &vb.value), Some(&Value::Integer(21)));
//!
//! agent.request_stop();
//! runner.join().expect("poll thread panicked")?;
//! assert!(!agent.is_running());
//! # Ok(())
//! # }
//! ```
//!
//! # Threading
//!
//! `Agent` is `Sync`: share it behind an `Arc`. [`Agent::run`] blocks the
//! calling thread and holds the engine until it returns, so registration
//! and initialization must happen before polling starts. Stopping is
//! cooperative: [`Agent::request_stop`] (or a [`StopHandle`]) sets a flag
//! that the loop checks after each poll, so the loop exits within one
//! [`poll_timeout`](AgentConfig::poll_timeout) plus the time the engine
//! spends serving what arrived.

mod dispatch;
mod lifecycle;
mod registry;

pub use lifecycle::StopHandle;
pub use registry::RegistrationEntry;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};

use crate::config::AgentConfig;
use crate::engine::{Engine, RequestCallback};
use crate::error::{Error, Result};

use dispatch::Dispatcher;
use lifecycle::AgentState;
use registry::Registry;

/// An AgentX subagent serving scalar OIDs through an [`Engine`].
pub struct Agent<E> {
    engine: Mutex<E>,
    registry: Mutex<Registry>,
    dispatcher: Arc<Dispatcher>,
    state: Arc<AgentState>,
    config: AgentConfig,
}

impl<E: Engine> Agent<E> {
    /// Create an agent over `engine` with the default configuration.
    pub fn new(engine: E) -> Self {
        Self::with_config(engine, AgentConfig::default())
    }

    /// Create an agent over `engine` with `config`.
    pub fn with_config(engine: E, config: AgentConfig) -> Self {
        Self {
            engine: Mutex::new(engine),
            registry: Mutex::new(Registry::default()),
            dispatcher: Arc::new(Dispatcher::new()),
            state: Arc::new(AgentState::default()),
            config,
        }
    }

    /// The agent's configuration.
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Snapshot of the registered scalars, in registration order.
    pub fn registrations(&self) -> Vec<RegistrationEntry> {
        self.lock_registry().entries().to_vec()
    }

    /// A handle that can stop this agent from any thread.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle::new(Arc::clone(&self.state))
    }

    /// The callback every registration is bound to.
    fn callback(&self) -> Arc<dyn RequestCallback> {
        self.dispatcher.clone()
    }

    /// Take the engine for a set-up operation.
    ///
    /// Never blocks behind the poll loop: while the engine is held it keeps
    /// retrying, and fails with [`Error::AgentRunning`] as soon as a run is
    /// in progress. This also covers a handler calling back into the agent
    /// from the polling thread.
    fn lock_engine(&self) -> Result<MutexGuard<'_, E>> {
        loop {
            match self.engine.try_lock() {
                Ok(guard) => return Ok(guard),
                Err(TryLockError::Poisoned(poisoned)) => return Ok(poisoned.into_inner()),
                Err(TryLockError::WouldBlock) if self.state.is_running() => {
                    return Err(Error::AgentRunning);
                }
                // Another set-up call holds it briefly
                Err(TryLockError::WouldBlock) => std::thread::yield_now(),
            }
        }
    }

    fn lock_registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E> std::fmt::Debug for Agent<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("config", &self.config)
            .field("initialized", &self.state.is_initialized())
            .field("running", &self.state.is_running())
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::LoopbackEngine;
    use crate::handler::integer_handler;
    use crate::oid;
    use std::time::Duration;

    #[test]
    fn test_setup_waiting_on_engine_fails_once_run_starts() {
        let agent = Arc::new(Agent::new(LoopbackEngine::new()));
        // Another set-up call holds the engine.
        let held = agent.engine.lock().unwrap();

        let registering = {
            let agent = Arc::clone(&agent);
            std::thread::spawn(move || {
                agent.register_scalar(
                    "temperature",
                    oid!(1, 3, 6, 1, 4, 1, 50000, 1),
                    integer_handler(|_| Ok(21)),
                )
            })
        };
        std::thread::sleep(Duration::from_millis(20));
        assert!(!registering.is_finished());

        // The poll loop claims the agent before the engine is released.
        assert!(agent.state.begin_run());
        let result = registering.join().unwrap();
        assert!(matches!(result, Err(Error::AgentRunning)));

        drop(held);
        agent.state.end_run();
        assert!(agent.registrations().is_empty());
    }

    #[test]
    fn test_debug_reports_state() {
        let agent = Agent::new(LoopbackEngine::new());
        let rendered = format!("{agent:?}");
        assert!(rendered.contains("initialized: false"));
        assert!(rendered.contains("running: false"));
    }
}
