//! Agent configuration.
//!
//! The process-level surface is small: where the AgentX master listens,
//! which application name the engine uses to find its `.conf` files, and
//! how long each poll waits for transport I/O.

use std::time::Duration;

/// Default AgentX master socket (net-snmp's compiled-in default).
pub const DEFAULT_MASTER_SOCKET: &str = "/var/agentx/master";

/// Default application name, used to locate `<app_name>.conf`.
pub const DEFAULT_APP_NAME: &str = "snmp-subagent";

/// Default wait per poll call.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(1);

/// Agent configuration.
///
/// ```rust
/// use snmp_subagent::AgentConfig;
/// use std::time::Duration;
///
/// let config = AgentConfig::default()
///     .master_socket("tcp:localhost:705")
///     .poll_timeout(Duration::from_millis(250));
/// assert_eq!(config.app_name, "snmp-subagent");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentConfig {
    /// Application name handed to the engine (selects `.conf` files).
    pub app_name: String,
    /// AgentX master address: a Unix socket path or `tcp:host:port`.
    pub master_socket: String,
    /// How long one poll waits for transport I/O.
    ///
    /// This bounds how quickly a stop request is observed.
    pub poll_timeout: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            master_socket: DEFAULT_MASTER_SOCKET.to_string(),
            poll_timeout: DEFAULT_POLL_TIMEOUT,
        }
    }
}

impl AgentConfig {
    /// Set the application name.
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    /// Set the AgentX master address.
    pub fn master_socket(mut self, addr: impl Into<String>) -> Self {
        self.master_socket = addr.into();
        self
    }

    /// Set the poll timeout.
    pub fn poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Parse a JSON configuration document. Missing fields keep their defaults.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
