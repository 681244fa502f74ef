//! Error types for snmp-subagent.
//!
//! [`Error`] is returned by the agent's own operations (start-up,
//! registration, lifecycle misuse). [`ErrorStatus`] is the SNMP status code
//! that flows between the protocol engine, the dispatcher and handlers.

use std::time::Duration;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// OID validation error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OidErrorKind {
    /// Empty OID string.
    Empty,
    /// Invalid arc value.
    InvalidArc,
    /// OID has too many arcs (exceeds MAX_OID_LEN).
    TooManyArcs { count: usize, max: usize },
}

impl std::fmt::Display for OidErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty OID"),
            Self::InvalidArc => write!(f, "invalid arc value"),
            Self::TooManyArcs { count, max } => {
                write!(f, "OID has {} arcs, exceeds maximum {}", count, max)
            }
        }
    }
}

/// Reasons a scalar registration is refused before reaching the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationErrorKind {
    /// Handler name is empty.
    EmptyName,
    /// OID has no arcs.
    EmptyOid,
    /// Another scalar is already registered under this name.
    DuplicateName,
    /// Another scalar is already registered at this OID.
    DuplicateOid,
}

impl std::fmt::Display for RegistrationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "handler name is empty"),
            Self::EmptyOid => write!(f, "OID is empty"),
            Self::DuplicateName => write!(f, "handler name already registered"),
            Self::DuplicateOid => write!(f, "OID already registered"),
        }
    }
}

/// Engine operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineOperation {
    /// `initialize-agent`.
    Initialize,
    /// `register-scalar-handler`.
    Register,
}

impl std::fmt::Display for EngineOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialize => write!(f, "initialize"),
            Self::Register => write!(f, "register"),
        }
    }
}

/// SNMP error status codes (RFC 3416).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorStatus {
    NoError,
    TooBig,
    NoSuchName,
    BadValue,
    ReadOnly,
    GenErr,
    NoAccess,
    WrongType,
    WrongLength,
    WrongEncoding,
    WrongValue,
    NoCreation,
    InconsistentValue,
    ResourceUnavailable,
    CommitFailed,
    UndoFailed,
    AuthorizationError,
    NotWritable,
    InconsistentName,
    /// Unknown/future error status code.
    Unknown(i32),
}

impl ErrorStatus {
    /// Create from raw status code.
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Self::NoError,
            1 => Self::TooBig,
            2 => Self::NoSuchName,
            3 => Self::BadValue,
            4 => Self::ReadOnly,
            5 => Self::GenErr,
            6 => Self::NoAccess,
            7 => Self::WrongType,
            8 => Self::WrongLength,
            9 => Self::WrongEncoding,
            10 => Self::WrongValue,
            11 => Self::NoCreation,
            12 => Self::InconsistentValue,
            13 => Self::ResourceUnavailable,
            14 => Self::CommitFailed,
            15 => Self::UndoFailed,
            16 => Self::AuthorizationError,
            17 => Self::NotWritable,
            18 => Self::InconsistentName,
            other => Self::Unknown(other),
        }
    }

    /// Convert to raw status code.
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::NoError => 0,
            Self::TooBig => 1,
            Self::NoSuchName => 2,
            Self::BadValue => 3,
            Self::ReadOnly => 4,
            Self::GenErr => 5,
            Self::NoAccess => 6,
            Self::WrongType => 7,
            Self::WrongLength => 8,
            Self::WrongEncoding => 9,
            Self::WrongValue => 10,
            Self::NoCreation => 11,
            Self::InconsistentValue => 12,
            Self::ResourceUnavailable => 13,
            Self::CommitFailed => 14,
            Self::UndoFailed => 15,
            Self::AuthorizationError => 16,
            Self::NotWritable => 17,
            Self::InconsistentName => 18,
            Self::Unknown(code) => *code,
        }
    }

    /// Whether this status reports success.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::NoError)
    }
}

impl std::fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoError => write!(f, "noError"),
            Self::TooBig => write!(f, "tooBig"),
            Self::NoSuchName => write!(f, "noSuchName"),
            Self::BadValue => write!(f, "badValue"),
            Self::ReadOnly => write!(f, "readOnly"),
            Self::GenErr => write!(f, "genErr"),
            Self::NoAccess => write!(f, "noAccess"),
            Self::WrongType => write!(f, "wrongType"),
            Self::WrongLength => write!(f, "wrongLength"),
            Self::WrongEncoding => write!(f, "wrongEncoding"),
            Self::WrongValue => write!(f, "wrongValue"),
            Self::NoCreation => write!(f, "noCreation"),
            Self::InconsistentValue => write!(f, "inconsistentValue"),
            Self::ResourceUnavailable => write!(f, "resourceUnavailable"),
            Self::CommitFailed => write!(f, "commitFailed"),
            Self::UndoFailed => write!(f, "undoFailed"),
            Self::AuthorizationError => write!(f, "authorizationError"),
            Self::NotWritable => write!(f, "notWritable"),
            Self::InconsistentName => write!(f, "inconsistentName"),
            Self::Unknown(code) => write!(f, "unknown({})", code),
        }
    }
}

/// Library error type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Invalid OID format.
    #[error("invalid OID: {kind}")]
    InvalidOid {
        kind: OidErrorKind,
        input: Option<Box<str>>, // Only allocated when parsing string input
    },

    /// Scalar registration refused by the registry.
    #[error("cannot register scalar {name:?}: {kind}")]
    InvalidRegistration {
        name: String,
        kind: RegistrationErrorKind,
    },

    /// `run()` called before `initialize()`.
    #[error("agent has not been initialized")]
    NotInitialized,

    /// `initialize()` called more than once.
    #[error("agent is already initialized")]
    AlreadyInitialized,

    /// `run()` called while a poll loop is active.
    #[error("cannot run agent: it is already running")]
    AlreadyRunning,

    /// Operation needs the engine while the poll loop owns it.
    #[error("operation not permitted while the agent is polling")]
    AgentRunning,

    /// The protocol engine rejected an operation.
    #[error("engine {operation} failed: {message}")]
    Engine {
        operation: EngineOperation,
        message: Box<str>,
    },

    /// No reply from the engine in time.
    #[error("timeout after {elapsed:?}")]
    Timeout { elapsed: Duration },

    /// The engine went away before replying.
    #[error("engine closed")]
    EngineClosed,

    /// Configuration could not be parsed.
    #[cfg(feature = "serde")]
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid OID error from a kind (no input string).
    pub fn invalid_oid(kind: OidErrorKind) -> Self {
        Self::InvalidOid { kind, input: None }
    }

    /// Create an invalid OID error with the input string that failed.
    pub fn invalid_oid_with_input(kind: OidErrorKind, input: impl Into<Box<str>>) -> Self {
        Self::InvalidOid {
            kind,
            input: Some(input.into()),
        }
    }

    /// Create a registration error.
    pub fn registration(name: impl Into<String>, kind: RegistrationErrorKind) -> Self {
        Self::InvalidRegistration {
            name: name.into(),
            kind,
        }
    }

    /// Create an engine error.
    pub fn engine(operation: EngineOperation, message: impl Into<Box<str>>) -> Self {
        Self::Engine {
            operation,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_roundtrip_codes() {
        for code in 0..=18 {
            assert_eq!(ErrorStatus::from_i32(code).as_i32(), code);
        }
        assert_eq!(ErrorStatus::from_i32(99), ErrorStatus::Unknown(99));
        assert_eq!(ErrorStatus::GenErr.as_i32(), 5);
    }

    #[test]
    fn test_error_status_display() {
        assert_eq!(ErrorStatus::NoError.to_string(), "noError");
        assert_eq!(ErrorStatus::GenErr.to_string(), "genErr");
        assert_eq!(ErrorStatus::Unknown(42).to_string(), "unknown(42)");
        assert!(ErrorStatus::NoError.is_ok());
        assert!(!ErrorStatus::GenErr.is_ok());
    }

    #[test]
    fn test_error_display() {
        let err = Error::registration("", RegistrationErrorKind::EmptyName);
        assert_eq!(
            err.to_string(),
            "cannot register scalar \"\": handler name is empty"
        );

        let err = Error::engine(EngineOperation::Register, "OID collision");
        assert_eq!(err.to_string(), "engine register failed: OID collision");

        let err = Error::invalid_oid(OidErrorKind::Empty);
        assert_eq!(err.to_string(), "invalid OID: empty OID");
    }
}
