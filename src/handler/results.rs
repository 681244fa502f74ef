//! Response type assembled after a dispatch.

use crate::error::ErrorStatus;
use crate::varbind::VarBind;

/// Response to an SNMP request, as the engine would serialize it.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Variable bindings in the response
    pub varbinds: Vec<VarBind>,
    /// Error status (0 = no error)
    pub error_status: ErrorStatus,
    /// Error index (1-based index of problematic varbind, 0 if no error)
    pub error_index: i32,
}

impl Response {
    /// Create a successful response with the given varbinds.
    pub fn success(varbinds: Vec<VarBind>) -> Self {
        Self {
            varbinds,
            error_status: ErrorStatus::NoError,
            error_index: 0,
        }
    }

    /// Create an error response.
    pub fn error(error_status: ErrorStatus, error_index: i32, varbinds: Vec<VarBind>) -> Self {
        Self {
            varbinds,
            error_status,
            error_index,
        }
    }

    /// Build from a handler status: success, or an error pointing at the
    /// first varbind.
    pub fn from_status(error_status: ErrorStatus, varbinds: Vec<VarBind>) -> Self {
        if error_status.is_ok() {
            Self::success(varbinds)
        } else {
            Self::error(error_status, 1, varbinds)
        }
    }

    /// The first varbind, if any.
    pub fn first(&self) -> Option<&VarBind> {
        self.varbinds.first()
    }
}
