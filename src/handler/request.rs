//! Pending requests handed to a handler for one dispatch.

use crate::oid::Oid;
use crate::value::Value;
use crate::varbind::VarBind;

/// One pending request element.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    oid: Oid,
    value: Option<Value>,
}

impl Request {
    /// A request for `oid` with no value written yet.
    pub fn new(oid: Oid) -> Self {
        Self { oid, value: None }
    }

    /// The requested OID.
    pub fn oid(&self) -> &Oid {
        &self.oid
    }

    /// The value written by the handler, if any.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Write the typed value for this request.
    pub fn set_value(&mut self, value: impl Into<Value>) {
        self.value = Some(value.into());
    }

    /// Convert to a varbind; an unanswered request becomes `noSuchInstance`.
    pub fn into_varbind(self) -> VarBind {
        VarBind::new(self.oid, self.value.unwrap_or(Value::NoSuchInstance))
    }
}

/// The engine's pending request list for one callback invocation.
///
/// Handlers only write into it; the engine owns it and serializes the
/// result once the handler returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestChain {
    requests: Vec<Request>,
}

impl RequestChain {
    /// Create a chain from pending requests.
    pub fn new(requests: Vec<Request>) -> Self {
        Self { requests }
    }

    /// A chain holding a single request for `oid`.
    pub fn single(oid: Oid) -> Self {
        Self::new(vec![Request::new(oid)])
    }

    /// Number of pending requests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Whether the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// The head request.
    pub fn first(&self) -> Option<&Request> {
        self.requests.first()
    }

    /// Write `value` into the head request.
    ///
    /// Returns `false` if the chain is empty.
    pub fn set_value(&mut self, value: impl Into<Value>) -> bool {
        match self.requests.first_mut() {
            Some(request) => {
                request.set_value(value);
                true
            }
            None => false,
        }
    }

    /// Iterate over the pending requests.
    pub fn iter(&self) -> impl Iterator<Item = &Request> {
        self.requests.iter()
    }

    /// Iterate mutably, for handlers answering every element.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Request> {
        self.requests.iter_mut()
    }

    /// Consume the chain into response varbinds.
    pub fn into_varbinds(self) -> Vec<VarBind> {
        self.requests.into_iter().map(Request::into_varbind).collect()
    }
}
