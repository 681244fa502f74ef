//! ScalarHandler trait.

use std::sync::Arc;

use crate::error::ErrorStatus;

use super::{RequestChain, RequestContext};

/// Resolves the value of a registered scalar.
///
/// Implement this trait to provide the value behind a name passed to
/// [`Agent::register_scalar`](crate::agent::Agent::register_scalar). The
/// agent's dispatcher looks the handler up by that name whenever the engine
/// delivers a GET for the registered OID.
///
/// # Contract
///
/// - Write the typed value into `requests` (usually with
///   [`RequestChain::set_value`]) and return [`ErrorStatus::NoError`].
/// - On failure, return any other status. The dispatcher passes the status
///   through to the engine unmodified; it applies no retry or fallback.
///
/// # Blocking
///
/// `resolve` runs synchronously on the thread driving
/// [`Agent::run`](crate::agent::Agent::run), nested inside the engine's poll
/// call. No other request is served until it returns, and there is no
/// timeout: a handler that hangs hangs the whole agent.
///
/// # Bounds
///
/// The `'static` bound is required because handlers are stored as
/// `Arc<dyn ScalarHandler>` inside the dispatcher. Handlers must be
/// `Send + Sync` because the agent may be shared between the polling thread
/// and the thread that registered them.
///
/// # Example
///
/// ```rust
/// use snmp_subagent::ErrorStatus;
/// use snmp_subagent::handler::{RequestChain, RequestContext, ScalarHandler};
/// use std::sync::atomic::{AtomicU32, Ordering};
///
/// struct RequestCounter {
///     served: AtomicU32,
/// }
///
/// impl ScalarHandler for RequestCounter {
///     fn resolve(&self, _ctx: &RequestContext<'_>, requests: &mut RequestChain) -> ErrorStatus {
///         let served = self.served.fetch_add(1, Ordering::Relaxed) + 1;
///         requests.set_value(snmp_subagent::Value::Counter32(served));
///         ErrorStatus::NoError
///     }
/// }
/// ```
pub trait ScalarHandler: Send + Sync + 'static {
    /// Produce the value for a GET on the registered scalar.
    fn resolve(&self, ctx: &RequestContext<'_>, requests: &mut RequestChain) -> ErrorStatus;
}

impl<H: ScalarHandler + ?Sized> ScalarHandler for Arc<H> {
    fn resolve(&self, ctx: &RequestContext<'_>, requests: &mut RequestChain) -> ErrorStatus {
        (**self).resolve(ctx, requests)
    }
}

impl<H: ScalarHandler + ?Sized> ScalarHandler for Box<H> {
    fn resolve(&self, ctx: &RequestContext<'_>, requests: &mut RequestChain) -> ErrorStatus {
        (**self).resolve(ctx, requests)
    }
}
