//! Agent harness: a loopback-backed agent polled on a worker thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use snmp_subagent::engine::{LoopbackClient, LoopbackEngine};
use snmp_subagent::handler::{RequestChain, RequestContext, ScalarHandler};
use snmp_subagent::{Agent, AgentConfig, ErrorStatus, Result, Value};

/// Poll timeout used by test agents, short so stops are observed quickly.
pub const TEST_POLL_TIMEOUT: Duration = Duration::from_millis(10);

/// Install a fmt subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Block until `condition` holds, panicking after `timeout`.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + timeout;
    while !condition() {
        assert!(Instant::now() < deadline, "condition not met within {timeout:?}");
        std::thread::sleep(Duration::from_millis(1));
    }
}

/// Handler that writes a fixed value and counts its invocations.
#[derive(Debug)]
pub struct CountingHandler {
    value: Value,
    status: ErrorStatus,
    calls: AtomicUsize,
}

impl CountingHandler {
    /// Writes `value` and returns `noError`.
    pub fn new(value: impl Into<Value>) -> Arc<Self> {
        Arc::new(Self {
            value: value.into(),
            status: ErrorStatus::NoError,
            calls: AtomicUsize::new(0),
        })
    }

    /// Writes nothing and returns `status`.
    pub fn failing(status: ErrorStatus) -> Arc<Self> {
        Arc::new(Self {
            value: Value::Null,
            status,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ScalarHandler for CountingHandler {
    fn resolve(&self, _ctx: &RequestContext<'_>, requests: &mut RequestChain) -> ErrorStatus {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.status.is_ok() {
            requests.set_value(self.value.clone());
        }
        self.status
    }
}

/// Loopback agent plus a client for talking to it.
pub struct Harness {
    pub agent: Arc<Agent<LoopbackEngine>>,
    pub client: LoopbackClient,
}

impl Harness {
    /// Uninitialized agent over a fresh loopback engine.
    pub fn new() -> Self {
        init_tracing();
        let engine = LoopbackEngine::new();
        let client = engine.client().with_timeout(Duration::from_secs(5));
        let config = AgentConfig::default().poll_timeout(TEST_POLL_TIMEOUT);
        Self {
            agent: Arc::new(Agent::with_config(engine, config)),
            client,
        }
    }

    /// Start `run` on a worker thread and wait until it is polling.
    pub fn spawn(&self) -> JoinHandle<Result<()>> {
        let agent = Arc::clone(&self.agent);
        let runner = std::thread::spawn(move || agent.run());
        let agent = Arc::clone(&self.agent);
        wait_until(Duration::from_secs(5), || {
            agent.is_running() || runner.is_finished()
        });
        runner
    }

    /// Request a stop and wait for `run` to return its result.
    pub fn stop(&self, runner: JoinHandle<Result<()>>) -> Result<()> {
        self.agent.request_stop();
        runner.join().expect("poll thread panicked")
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
