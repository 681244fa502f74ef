//! # snmp-subagent
//!
//! Serve SNMP scalar values from Rust as an AgentX subagent of an existing
//! master agent.
//!
//! The crate is a thin bridge: a protocol [`engine`] owns the wire while
//! the [`Agent`] owns the lifecycle, the registry of scalar OIDs and the
//! dispatch of GET requests to user [`handler`]s.
//!
//! ## Quick Start
//!
//! ```rust
//! use snmp_subagent::engine::LoopbackEngine;
//! use snmp_subagent::handler::string_handler;
//! use snmp_subagent::{Agent, Value, oid};
//! use std::sync::Arc;
//!
//! # fn main() -> snmp_subagent::Result<()> {
//! let engine = LoopbackEngine::new();
//! let client = engine.client();
//!
//! let agent = Arc::new(Agent::new(engine));
//! agent.initialize("/var/agentx/master")?;
//! agent.register_scalar(
//!     "site-name",
//!     oid!(1, 3, 6, 1, 4, 1, 50000, 3),
//!     string_handler(|_| Ok("rack-12".to_string())),
//! )?;
//!
//! let stop = agent.stop_handle();
//! let runner = {
//!     let agent = Arc::clone(&agent);
//!     std::thread::spawn(move || agent.run())
//! };
//!
//! let response = client.get(&oid!(1, 3, 6, 1, 4, 1, 50000, 3, 0))?;
//! assert_eq!(response.varbinds[0].value, Value::from("rack-12"));
//!
//! stop.request_stop();
//! runner.join().expect("poll thread panicked")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Request handling
//!
//! Only GET is served. Every other request mode under a registered OID is
//! answered with `genErr` and the handler is never called. For GET, the
//! status the handler returns is the status the manager sees.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events: `info` for lifecycle transitions and
//! registrations, `debug` per request, `warn` for handler failures. Install
//! any subscriber to see them.
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for [`AgentConfig`] and
//!   [`AgentConfig::from_json`]

pub mod agent;
pub mod config;
pub mod engine;
pub mod error;
pub mod handler;
pub mod oid;
pub mod prelude;
pub mod value;
pub mod varbind;

pub use agent::{Agent, RegistrationEntry, StopHandle};
pub use config::AgentConfig;
pub use error::{Error, ErrorStatus, Result};
pub use oid::Oid;
pub use value::Value;
pub use varbind::VarBind;
