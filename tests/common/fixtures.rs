//! Common test fixtures and constants.

use snmp_subagent::{Oid, oid};

// =============================================================================
// Enterprise subtree (1.3.6.1.4.1.50000.*)
// =============================================================================

/// Enterprise root used by the test scalars.
pub fn enterprise_subtree() -> Oid {
    oid!(1, 3, 6, 1, 4, 1, 50000)
}

/// Registration root of the temperature scalar.
pub fn temperature_oid() -> Oid {
    oid!(1, 3, 6, 1, 4, 1, 50000, 1)
}
/// Instance OID a manager GETs for the temperature scalar.
pub fn temperature_instance() -> Oid {
    oid!(1, 3, 6, 1, 4, 1, 50000, 1, 0)
}

pub fn healthy_oid() -> Oid {
    oid!(1, 3, 6, 1, 4, 1, 50000, 2)
}
pub fn healthy_instance() -> Oid {
    oid!(1, 3, 6, 1, 4, 1, 50000, 2, 0)
}

pub fn site_name_oid() -> Oid {
    oid!(1, 3, 6, 1, 4, 1, 50000, 3)
}
pub fn site_name_instance() -> Oid {
    oid!(1, 3, 6, 1, 4, 1, 50000, 3, 0)
}

// =============================================================================
// Test OIDs
// =============================================================================

/// OID outside every registration.
pub fn unregistered_oid() -> Oid {
    oid!(1, 3, 6, 1, 99, 99, 99, 0)
}

// =============================================================================
// Agent settings
// =============================================================================

/// Master socket path handed to `initialize`.
pub const MASTER_SOCKET: &str = "/var/run/agentx.sock";

/// Temperature reported by the counting handler.
pub const TEMPERATURE: i32 = 21;
