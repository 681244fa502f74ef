//! Agent lifecycle: initialization, the poll loop and cooperative stop.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, PoisonError};

use crate::engine::{Engine, InitOptions};
use crate::error::{Error, Result};

use super::Agent;

const RUNNING: u8 = 0b01;
const STOP_REQUESTED: u8 = 0b10;

/// Lifecycle flags shared between the agent and its stop handles.
///
/// `running` and `stop_requested` share one atomic so that starting a run
/// (set running, clear stop) is a single transition. A stop request can
/// therefore never land between the two and be lost.
#[derive(Debug, Default)]
pub(crate) struct AgentState {
    engine_ready: AtomicBool,
    initialized: AtomicBool,
    flags: AtomicU8,
}

impl AgentState {
    /// The engine accepted its options; registrations can be bound.
    pub(crate) fn is_engine_ready(&self) -> bool {
        self.engine_ready.load(Ordering::Acquire)
    }

    pub(crate) fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    pub(crate) fn is_running(&self) -> bool {
        self.flags.load(Ordering::Acquire) & RUNNING != 0
    }

    pub(crate) fn is_stop_requested(&self) -> bool {
        self.flags.load(Ordering::Acquire) & STOP_REQUESTED != 0
    }

    pub(crate) fn request_stop(&self) {
        self.flags.fetch_or(STOP_REQUESTED, Ordering::AcqRel);
    }

    fn mark_engine_ready(&self) {
        self.engine_ready.store(true, Ordering::Release);
    }

    fn mark_initialized(&self) {
        self.initialized.store(true, Ordering::Release);
    }

    /// Enter the running state with the stop flag cleared.
    ///
    /// Returns `false` if a run is already in progress.
    pub(super) fn begin_run(&self) -> bool {
        self.flags
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |flags| {
                (flags & RUNNING == 0).then_some(RUNNING)
            })
            .is_ok()
    }

    /// Leave the running state. A pending stop request stays set until the
    /// next run begins.
    pub(super) fn end_run(&self) {
        self.flags.fetch_and(!RUNNING, Ordering::AcqRel);
    }
}

/// Clears the running flag when the poll loop exits, including by panic.
struct RunGuard<'a>(&'a AgentState);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.end_run();
    }
}

/// Cloneable handle for stopping an [`Agent`] from another thread.
///
/// Typically moved into a signal handler:
///
/// ```rust
/// use snmp_subagent::Agent;
/// use snmp_subagent::engine::LoopbackEngine;
///
/// let agent = Agent::new(LoopbackEngine::new());
/// let stop = agent.stop_handle();
///
/// std::thread::spawn(move || {
///     // e.g. on SIGTERM
///     stop.request_stop();
/// });
/// ```
#[derive(Debug, Clone)]
pub struct StopHandle {
    state: Arc<AgentState>,
}

impl StopHandle {
    pub(super) fn new(state: Arc<AgentState>) -> Self {
        Self { state }
    }

    /// Ask the poll loop to exit. See [`Agent::request_stop`].
    pub fn request_stop(&self) {
        self.state.request_stop();
    }

    /// Whether the poll loop is executing.
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }
}

impl<E: Engine> Agent<E> {
    /// Initialize the engine as an AgentX subagent of the master at
    /// `listen_address`.
    ///
    /// The engine is configured with the agent's
    /// [`app_name`](crate::AgentConfig::app_name) and with access control
    /// enabled. Scalars registered before this call are bound to the engine
    /// here, in registration order. The agent counts as initialized only
    /// once all of them are bound.
    ///
    /// If the engine refuses a deferred registration, that registration is
    /// dropped and its error returned. Calling `initialize` again binds the
    /// ones that remain; the engine itself is configured only once.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyInitialized`] after a successful call
    /// - [`Error::AgentRunning`] while the poll loop is active
    /// - [`Error::Engine`] if the engine refuses the options or a deferred
    ///   registration
    pub fn initialize(&self, listen_address: &str) -> Result<()> {
        let mut engine = self.lock_engine()?;
        if self.state.is_initialized() {
            return Err(Error::AlreadyInitialized);
        }

        if !self.state.is_engine_ready() {
            tracing::info!(
                app_name = %self.config.app_name,
                master_socket = listen_address,
                "initializing AgentX subagent"
            );
            let options = InitOptions::subagent(self.config.app_name.as_str(), listen_address);
            engine.initialize(&options)?;
            self.state.mark_engine_ready();
        }

        let callback = self.callback();
        if let Err(refused) = self.lock_registry().bind_pending(&mut *engine, &callback) {
            tracing::warn!(
                name = %refused.name,
                error = %refused.error,
                "engine refused deferred registration"
            );
            self.dispatcher.remove(&refused.name);
            return Err(refused.error);
        }

        self.state.mark_initialized();
        Ok(())
    }

    /// [`initialize`](Self::initialize) with the configured
    /// [`master_socket`](crate::AgentConfig::master_socket).
    pub fn initialize_from_config(&self) -> Result<()> {
        self.initialize(&self.config.master_socket)
    }

    /// Whether [`initialize`](Self::initialize) has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.state.is_initialized()
    }

    /// Run the poll loop on the calling thread until a stop is requested.
    ///
    /// Each iteration waits up to the configured
    /// [`poll_timeout`](crate::AgentConfig::poll_timeout) for the engine to
    /// serve requests; handler callbacks run on this thread. A stop request
    /// made before this call does not carry over: each run starts with the
    /// stop flag cleared.
    ///
    /// # Errors
    ///
    /// - [`Error::NotInitialized`] if [`initialize`](Self::initialize) has
    ///   not succeeded
    /// - [`Error::AlreadyRunning`] if another thread is in `run`
    pub fn run(&self) -> Result<()> {
        if !self.state.is_initialized() {
            return Err(Error::NotInitialized);
        }
        if !self.state.begin_run() {
            return Err(Error::AlreadyRunning);
        }
        let _running = RunGuard(&self.state);
        let mut engine = self.engine.lock().unwrap_or_else(PoisonError::into_inner);

        tracing::info!(
            poll_timeout = ?self.config.poll_timeout,
            "snmp agent running"
        );

        while !self.state.is_stop_requested() {
            engine.poll(self.config.poll_timeout);
        }

        tracing::info!("snmp agent has been stopped");
        Ok(())
    }

    /// Ask the poll loop to exit after the current poll returns.
    ///
    /// Non-blocking and safe to call from any thread, any number of times.
    /// Has no effect on a later run.
    pub fn request_stop(&self) {
        tracing::info!("stopping snmp agent");
        self.state.request_stop();
    }

    /// Whether the poll loop is executing.
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }
}
