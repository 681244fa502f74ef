//! Scalar OID registry.

use std::sync::Arc;

use crate::engine::{
    Engine, HandlerCapability, RegistrationHandle, RequestCallback, ScalarRegistration,
};
use crate::error::{Error, RegistrationErrorKind, Result};
use crate::handler::ScalarHandler;
use crate::oid::Oid;

use super::Agent;

/// A scalar registered with an [`Agent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationEntry {
    name: String,
    oid: Oid,
    handle: Option<RegistrationHandle>,
}

impl RegistrationEntry {
    fn new(name: String, oid: Oid) -> Self {
        Self {
            name,
            oid,
            handle: None,
        }
    }

    /// Handler name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Root OID.
    pub fn oid(&self) -> &Oid {
        &self.oid
    }

    /// Number of arcs in the root OID.
    pub fn oid_len(&self) -> usize {
        self.oid.len()
    }

    /// Engine handle, once bound.
    pub fn handle(&self) -> Option<RegistrationHandle> {
        self.handle
    }

    /// Whether the engine has accepted this registration.
    pub fn is_bound(&self) -> bool {
        self.handle.is_some()
    }

    fn bind<E: Engine + ?Sized>(
        &mut self,
        engine: &mut E,
        callback: &Arc<dyn RequestCallback>,
    ) -> Result<()> {
        tracing::info!(name = %self.name, oid = %self.oid, "registering scalar OID");

        let registration = ScalarRegistration {
            name: self.name.clone(),
            root_oid: self.oid.clone(),
            capability: HandlerCapability::ReadWrite,
        };
        let handle = engine.register_scalar(registration, Arc::clone(callback))?;
        self.handle = Some(handle);
        Ok(())
    }
}

/// A deferred registration the engine refused.
#[derive(Debug)]
pub(super) struct RefusedRegistration {
    pub(super) name: String,
    pub(super) error: Error,
}

/// Registration-ordered list of scalars.
#[derive(Debug, Default)]
pub(super) struct Registry {
    entries: Vec<RegistrationEntry>,
}

impl Registry {
    pub(super) fn entries(&self) -> &[RegistrationEntry] {
        &self.entries
    }

    fn check_unique(&self, name: &str, oid: &Oid) -> Option<RegistrationErrorKind> {
        self.entries.iter().find_map(|entry| {
            if entry.name == name {
                Some(RegistrationErrorKind::DuplicateName)
            } else if entry.oid == *oid {
                Some(RegistrationErrorKind::DuplicateOid)
            } else {
                None
            }
        })
    }

    /// Bind every entry the engine has not seen yet.
    ///
    /// Stops at the first refusal and removes the refused entry, so a
    /// later call carries on with the entries after it.
    pub(super) fn bind_pending<E: Engine + ?Sized>(
        &mut self,
        engine: &mut E,
        callback: &Arc<dyn RequestCallback>,
    ) -> std::result::Result<(), RefusedRegistration> {
        for idx in 0..self.entries.len() {
            if self.entries[idx].is_bound() {
                continue;
            }
            if let Err(error) = self.entries[idx].bind(engine, callback) {
                let refused = self.entries.remove(idx);
                return Err(RefusedRegistration {
                    name: refused.name,
                    error,
                });
            }
        }
        Ok(())
    }
}

impl<E: Engine> Agent<E> {
    /// Register a scalar OID served by `handler`.
    ///
    /// `name` identifies the handler: GET requests under `oid` are routed to
    /// it by this name. The scalar is registered read-write, but every
    /// request mode other than GET is answered with `genErr` without calling
    /// the handler.
    ///
    /// If the agent is already initialized the engine registration happens
    /// immediately, otherwise it is deferred to
    /// [`initialize`](Agent::initialize).
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRegistration`] for an empty name, an empty OID, or
    ///   a name or OID already in use
    /// - [`Error::AgentRunning`] while the poll loop is active
    /// - [`Error::Engine`] if the engine refuses the registration (for
    ///   instance, the OID is already registered). Nothing is recorded and
    ///   the caller should treat this as fatal to start-up.
    ///
    /// # Example
    ///
    /// ```rust
    /// use snmp_subagent::engine::LoopbackEngine;
    /// use snmp_subagent::handler::boolean_handler;
    /// use snmp_subagent::{Agent, oid};
    ///
    /// # fn main() -> snmp_subagent::Result<()> {
    /// let agent = Agent::new(LoopbackEngine::new());
    /// agent.initialize("/var/run/agentx.sock")?;
    /// agent.register_scalar("healthy", oid!(1, 3, 6, 1, 4, 1, 50000, 2), boolean_handler(|_| Ok(true)))?;
    ///
    /// let entries = agent.registrations();
    /// assert_eq!(entries[0].name(), "healthy");
    /// assert_eq!(entries[0].oid_len(), 8);
    /// assert!(entries[0].is_bound());
    /// # Ok(())
    /// # }
    /// ```
    pub fn register_scalar<H: ScalarHandler>(
        &self,
        name: impl Into<String>,
        oid: Oid,
        handler: H,
    ) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::registration(name, RegistrationErrorKind::EmptyName));
        }
        if oid.is_empty() {
            return Err(Error::registration(name, RegistrationErrorKind::EmptyOid));
        }
        if self.state.is_running() {
            return Err(Error::AgentRunning);
        }

        let mut engine = self.lock_engine()?;
        let mut registry = self.lock_registry();
        if let Some(kind) = registry.check_unique(&name, &oid) {
            return Err(Error::registration(name, kind));
        }

        let mut entry = RegistrationEntry::new(name, oid);
        if self.state.is_engine_ready() {
            entry.bind(&mut *engine, &self.callback())?;
        } else {
            tracing::debug!(
                name = %entry.name,
                oid = %entry.oid,
                "deferring registration until initialize"
            );
        }

        self.dispatcher.insert(entry.name.clone(), Arc::new(handler));
        registry.entries.push(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{InitOptions, RequestMode};
    use crate::error::{EngineOperation, ErrorStatus};
    use crate::handler::{RequestChain, RequestContext, integer_handler};
    use crate::oid;
    use std::time::Duration;

    /// Engine that records registrations and can be told to refuse them.
    #[derive(Default)]
    struct RecordingEngine {
        initialized: Option<InitOptions>,
        init_calls: usize,
        registered: Vec<ScalarRegistration>,
        callbacks: Vec<Arc<dyn RequestCallback>>,
        refuse: Option<Oid>,
    }

    impl Engine for RecordingEngine {
        fn initialize(&mut self, options: &InitOptions) -> Result<()> {
            self.initialized = Some(options.clone());
            self.init_calls += 1;
            Ok(())
        }

        fn register_scalar(
            &mut self,
            registration: ScalarRegistration,
            callback: Arc<dyn RequestCallback>,
        ) -> Result<RegistrationHandle> {
            if self.refuse.as_ref() == Some(&registration.root_oid) {
                return Err(Error::engine(
                    EngineOperation::Register,
                    format!("{} already registered", registration.root_oid),
                ));
            }
            self.registered.push(registration);
            self.callbacks.push(callback);
            Ok(RegistrationHandle(self.registered.len() as u32))
        }

        fn poll(&mut self, _timeout: Duration) {}
    }

    fn temperature() -> Oid {
        oid!(1, 3, 6, 1, 4, 1, 50000, 1)
    }

    #[test]
    fn test_register_after_initialize_binds_immediately() {
        let agent = Agent::new(RecordingEngine::default());
        agent.initialize("/var/run/agentx.sock").unwrap();
        agent
            .register_scalar("temperature", temperature(), integer_handler(|_| Ok(21)))
            .unwrap();

        let entries = agent.registrations();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name(), "temperature");
        assert_eq!(entries[0].oid(), &temperature());
        assert_eq!(entries[0].oid_len(), 8);
        assert_eq!(entries[0].handle(), Some(RegistrationHandle(1)));

        let engine = agent.engine.lock().unwrap();
        assert_eq!(engine.registered.len(), 1);
        assert_eq!(engine.registered[0].name, "temperature");
        assert_eq!(engine.registered[0].root_oid, temperature());
        assert_eq!(engine.registered[0].capability, HandlerCapability::ReadWrite);
    }

    #[test]
    fn test_register_before_initialize_is_deferred() {
        let agent = Agent::new(RecordingEngine::default());
        agent
            .register_scalar("temperature", temperature(), integer_handler(|_| Ok(21)))
            .unwrap();
        agent
            .register_scalar("humidity", oid!(1, 3, 6, 1, 4, 1, 50000, 2), integer_handler(|_| Ok(40)))
            .unwrap();

        assert!(agent.registrations().iter().all(|e| !e.is_bound()));
        assert!(agent.engine.lock().unwrap().registered.is_empty());

        agent.initialize("/var/run/agentx.sock").unwrap();

        assert!(agent.registrations().iter().all(RegistrationEntry::is_bound));
        let engine = agent.engine.lock().unwrap();
        let names: Vec<_> = engine.registered.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["temperature", "humidity"]);
    }

    #[test]
    fn test_register_rejects_empty_name_and_oid() {
        let agent = Agent::new(RecordingEngine::default());

        let err = agent
            .register_scalar("", temperature(), integer_handler(|_| Ok(1)))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidRegistration {
                kind: RegistrationErrorKind::EmptyName,
                ..
            }
        ));

        let err = agent
            .register_scalar("temperature", Oid::default(), integer_handler(|_| Ok(1)))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidRegistration {
                kind: RegistrationErrorKind::EmptyOid,
                ..
            }
        ));
        assert!(agent.registrations().is_empty());
    }

    #[test]
    fn test_register_rejects_duplicate_name() {
        let agent = Agent::new(RecordingEngine::default());
        agent.initialize("/var/run/agentx.sock").unwrap();
        agent
            .register_scalar("temperature", temperature(), integer_handler(|_| Ok(1)))
            .unwrap();

        let err = agent
            .register_scalar("temperature", oid!(1, 3, 6, 1, 4, 1, 50000, 9), integer_handler(|_| Ok(2)))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidRegistration {
                kind: RegistrationErrorKind::DuplicateName,
                ..
            }
        ));
        assert_eq!(agent.registrations().len(), 1);
        assert_eq!(agent.engine.lock().unwrap().registered.len(), 1);
    }

    #[test]
    fn test_engine_refusal_records_nothing() {
        let engine = RecordingEngine {
            refuse: Some(temperature()),
            ..Default::default()
        };
        let agent = Agent::new(engine);
        agent.initialize("/var/run/agentx.sock").unwrap();

        let err = agent
            .register_scalar("temperature", temperature(), integer_handler(|_| Ok(1)))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Engine {
                operation: EngineOperation::Register,
                ..
            }
        ));
        assert!(agent.registrations().is_empty());
        assert!(agent.dispatcher.handler("temperature").is_none());
    }

    #[test]
    fn test_register_rejects_duplicate_oid_before_initialize() {
        let agent = Agent::new(RecordingEngine::default());
        agent
            .register_scalar("a", temperature(), integer_handler(|_| Ok(1)))
            .unwrap();

        let err = agent
            .register_scalar("b", temperature(), integer_handler(|_| Ok(2)))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidRegistration {
                kind: RegistrationErrorKind::DuplicateOid,
                ..
            }
        ));
        assert!(agent.dispatcher.handler("b").is_none());

        agent.initialize("/var/run/agentx.sock").unwrap();
        assert_eq!(agent.registrations().len(), 1);
        assert!(agent.registrations()[0].is_bound());
    }

    #[test]
    fn test_refused_deferred_registration_leaves_agent_uninitialized() {
        let humidity = oid!(1, 3, 6, 1, 4, 1, 50000, 2);
        let site = oid!(1, 3, 6, 1, 4, 1, 50000, 3);
        let engine = RecordingEngine {
            refuse: Some(humidity.clone()),
            ..Default::default()
        };
        let agent = Agent::new(engine);
        agent
            .register_scalar("temperature", temperature(), integer_handler(|_| Ok(21)))
            .unwrap();
        agent
            .register_scalar("humidity", humidity, integer_handler(|_| Ok(40)))
            .unwrap();
        agent
            .register_scalar("site", site.clone(), integer_handler(|_| Ok(3)))
            .unwrap();

        let err = agent.initialize("/var/run/agentx.sock").unwrap_err();
        assert!(matches!(
            err,
            Error::Engine {
                operation: EngineOperation::Register,
                ..
            }
        ));
        assert!(!agent.is_initialized());
        assert!(matches!(agent.run(), Err(Error::NotInitialized)));
        assert!(agent.dispatcher.handler("humidity").is_none());

        let entries = agent.registrations();
        let names: Vec<_> = entries.iter().map(RegistrationEntry::name).collect();
        assert_eq!(names, ["temperature", "site"]);
        assert!(entries[0].is_bound());
        assert!(!entries[1].is_bound());

        // Retrying binds what is left without reconfiguring the engine.
        agent.initialize("/var/run/agentx.sock").unwrap();
        assert!(agent.is_initialized());
        assert!(agent.registrations().iter().all(RegistrationEntry::is_bound));

        let engine = agent.engine.lock().unwrap();
        assert_eq!(engine.init_calls, 1);
        let roots: Vec<_> = engine.registered.iter().map(|r| r.root_oid.clone()).collect();
        assert_eq!(roots, [temperature(), site]);
    }

    #[test]
    fn test_register_between_failed_and_retried_initialize_binds_now() {
        let humidity = oid!(1, 3, 6, 1, 4, 1, 50000, 2);
        let engine = RecordingEngine {
            refuse: Some(humidity.clone()),
            ..Default::default()
        };
        let agent = Agent::new(engine);
        agent
            .register_scalar("humidity", humidity, integer_handler(|_| Ok(40)))
            .unwrap();
        assert!(agent.initialize("/var/run/agentx.sock").is_err());

        agent
            .register_scalar("temperature", temperature(), integer_handler(|_| Ok(21)))
            .unwrap();
        assert!(agent.registrations()[0].is_bound());

        agent.initialize("/var/run/agentx.sock").unwrap();
        assert!(agent.is_initialized());
    }

    #[test]
    fn test_bound_callback_routes_to_handler() {
        let agent = Agent::new(RecordingEngine::default());
        agent.initialize("/var/run/agentx.sock").unwrap();
        agent
            .register_scalar("temperature", temperature(), integer_handler(|_| Ok(21)))
            .unwrap();

        let engine = agent.engine.lock().unwrap();
        let mut chain = RequestChain::single(temperature().child(0));
        let status = engine.callbacks[0].on_request(&engine.registered[0], RequestMode::Get, &mut chain);
        assert_eq!(status, ErrorStatus::NoError);
        assert_eq!(
            chain.first().and_then(|r| r.value()),
            Some(&crate::value::Value::Integer(21))
        );
    }

    #[test]
    fn test_custom_handler_type_registers() {
        struct Fixed;
        impl ScalarHandler for Fixed {
            fn resolve(&self, _ctx: &RequestContext<'_>, requests: &mut RequestChain) -> ErrorStatus {
                requests.set_value("fixed");
                ErrorStatus::NoError
            }
        }

        let agent = Agent::new(RecordingEngine::default());
        agent.register_scalar("fixed", temperature(), Fixed).unwrap();
        agent
            .register_scalar("shared", oid!(1, 3, 6, 1, 4, 1, 50000, 3), Arc::new(Fixed))
            .unwrap();
        assert_eq!(agent.registrations().len(), 2);
    }
}
