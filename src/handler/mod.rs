//! Handler types for resolving scalar values.
//!
//! This module is the handler-resolution side of the agent:
//!
//! - [`ScalarHandler`] - Trait producing the value of one registered scalar
//! - [`RequestContext`] - Which registration a request arrived under
//! - [`RequestChain`], [`Request`] - The pending requests a handler writes into
//! - [`integer_handler`], [`boolean_handler`], [`string_handler`],
//!   [`value_handler`] - Closure adapters for the common cases
//! - [`SmiNode`], [`tree_handler`] - Serve a whole subtree of values from one
//!   registration
//! - [`Response`] - The answer the engine serializes
//!
//! # Overview
//!
//! Each scalar is registered with the [`Agent`](crate::agent::Agent) under a
//! unique name together with its handler. When the engine receives a GET
//! under the scalar's OID, the agent's dispatcher looks the handler up by
//! that name and calls [`ScalarHandler::resolve`]. The status it returns
//! goes back to the engine untouched.
//!
//! # Example
//!
//! ```rust
//! use snmp_subagent::handler::{RequestChain, RequestContext, ScalarHandler};
//! use snmp_subagent::{ErrorStatus, Value};
//!
//! struct Temperature;
//!
//! impl ScalarHandler for Temperature {
//!     fn resolve(&self, _ctx: &RequestContext<'_>, requests: &mut RequestChain) -> ErrorStatus {
//!         requests.set_value(Value::Integer(21));
//!         ErrorStatus::NoError
//!     }
//! }
//! ```

mod adapters;
mod context;
mod request;
mod results;
mod smi;
mod traits;

pub use adapters::{
    HandlerError, ValueHandler, boolean_handler, integer_handler, string_handler, value_handler,
};
pub use context::RequestContext;
pub use request::{Request, RequestChain};
pub use results::Response;
pub use smi::{SmiNode, TreeHandler, tree_handler};
pub use traits::ScalarHandler;
