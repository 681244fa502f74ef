//! Request context for scalar handlers.

use crate::oid::Oid;

/// Request context passed to scalar handlers.
///
/// Identifies which registration the request arrived under. Borrowed from
/// the engine's registration for the extent of one dispatch.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    /// Name the scalar was registered under.
    pub handler_name: &'a str,
    /// Root OID of the registration.
    pub root_oid: &'a Oid,
}

impl RequestContext<'_> {
    /// Length of the root OID.
    pub fn root_oid_len(&self) -> usize {
        self.root_oid.len()
    }
}
