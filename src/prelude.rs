//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```rust
//! use snmp_subagent::prelude::*;
//! ```
//!
//! This imports:
//! - Core types: [`Agent`], [`AgentConfig`], [`Oid`], [`Value`], [`VarBind`]
//! - Handlers: [`ScalarHandler`], [`RequestChain`], [`RequestContext`] and the
//!   closure adapters
//! - Error handling: [`Error`], [`ErrorStatus`], [`Result`]
//! - The [`oid!`] macro for OID construction

pub use crate::agent::{Agent, StopHandle};
pub use crate::config::AgentConfig;
pub use crate::engine::{Engine, LoopbackEngine};
pub use crate::error::{Error, ErrorStatus, Result};
pub use crate::handler::{
    RequestChain, RequestContext, ScalarHandler, SmiNode, boolean_handler, integer_handler,
    string_handler, tree_handler, value_handler,
};
pub use crate::oid::Oid;
pub use crate::value::Value;
pub use crate::varbind::VarBind;

#[doc(no_inline)]
pub use crate::oid;
