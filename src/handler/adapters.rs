//! Closure-backed handlers for common scalar types.
//!
//! Most scalars just compute one value per GET. These adapters wrap a
//! closure returning that value and take care of writing it into the
//! request chain. A closure error is logged and answered with `genErr`.
//!
//! ```rust
//! use snmp_subagent::handler::{integer_handler, string_handler};
//!
//! let uptime = integer_handler(|_ctx| Ok(42));
//! let hostname = string_handler(|_ctx| Ok("gateway-1".to_string()));
//! # let _ = (uptime, hostname);
//! ```

use crate::error::ErrorStatus;
use crate::value::Value;

use super::{RequestChain, RequestContext, ScalarHandler};

/// Error type returned by handler closures.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// A [`ScalarHandler`] backed by a closure producing a [`Value`].
///
/// Built by [`value_handler`] and the typed helpers in this module.
pub struct ValueHandler<F> {
    f: F,
}

impl<F> ScalarHandler for ValueHandler<F>
where
    F: Fn(&RequestContext<'_>) -> Result<Value, HandlerError> + Send + Sync + 'static,
{
    fn resolve(&self, ctx: &RequestContext<'_>, requests: &mut RequestChain) -> ErrorStatus {
        match (self.f)(ctx) {
            Ok(value) => {
                requests.set_value(value);
                ErrorStatus::NoError
            }
            Err(error) => {
                tracing::warn!(
                    handler = ctx.handler_name,
                    oid = %ctx.root_oid,
                    error = %error,
                    "scalar handler failed"
                );
                ErrorStatus::GenErr
            }
        }
    }
}

impl<F> std::fmt::Debug for ValueHandler<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueHandler").finish_non_exhaustive()
    }
}

/// Handler answering with whatever [`Value`] the closure returns.
pub fn value_handler<F>(f: F) -> ValueHandler<F>
where
    F: Fn(&RequestContext<'_>) -> Result<Value, HandlerError> + Send + Sync + 'static,
{
    ValueHandler { f }
}

/// Handler answering with an INTEGER.
pub fn integer_handler<F>(f: F) -> impl ScalarHandler
where
    F: Fn(&RequestContext<'_>) -> Result<i32, HandlerError> + Send + Sync + 'static,
{
    value_handler(move |ctx: &RequestContext<'_>| f(ctx).map(Value::Integer))
}

/// Handler answering with a boolean.
///
/// SMI has no boolean type: the value travels as INTEGER 1 or 0 and the MIB
/// tells the manager how to read it.
pub fn boolean_handler<F>(f: F) -> impl ScalarHandler
where
    F: Fn(&RequestContext<'_>) -> Result<bool, HandlerError> + Send + Sync + 'static,
{
    value_handler(move |ctx: &RequestContext<'_>| f(ctx).map(Value::from))
}

/// Handler answering with an OCTET STRING.
pub fn string_handler<F>(f: F) -> impl ScalarHandler
where
    F: Fn(&RequestContext<'_>) -> Result<String, HandlerError> + Send + Sync + 'static,
{
    value_handler(move |ctx: &RequestContext<'_>| f(ctx).map(Value::from))
}
