//! # FSM Registry
//!
//! Maps an entity type name to its compiled [`StateMachine`]. Callers that
//! only hold strings from a request or a database row (`"shipment"`,
//! `"arrived"`, `"closed"`) go through the registry; callers that know the
//! entity type at compile time can hold a machine directly.
//!
//! The standard registry is built once per process and shared read-only.
//! A custom registry is a plain value: build it at startup and inject it
//! where needed. Adding an entity type is a data change, not a code change.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::definitions::standard_machines;
use crate::error::{DefinitionError, TransitionError};
use crate::machine::{MachineDefinition, StateMachine, TransitionDescriptor};

/// Entity type → state machine.
#[derive(Debug, Clone, Default)]
pub struct FsmRegistry {
    machines: HashMap<String, StateMachine>,
}

static STANDARD: OnceLock<FsmRegistry> = OnceLock::new();

impl FsmRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh registry holding the standard machines
    /// (`lot`, `shipment`, `quote`, `order`, `invoice`).
    pub fn with_standard_machines() -> Self {
        let machines = standard_machines()
            .into_iter()
            .map(|m| (m.entity_type().to_string(), m))
            .collect();
        Self { machines }
    }

    /// The process-wide standard registry, built on first use.
    pub fn standard() -> &'static FsmRegistry {
        STANDARD.get_or_init(Self::with_standard_machines)
    }

    /// Add a compiled machine.
    ///
    /// # Errors
    ///
    /// `DuplicateEntityType` if a machine for the entity type exists.
    pub fn insert(&mut self, machine: StateMachine) -> Result<(), DefinitionError> {
        let entity_type = machine.entity_type().to_string();
        if self.machines.contains_key(&entity_type) {
            return Err(DefinitionError::DuplicateEntityType { entity_type });
        }
        tracing::debug!(entity_type = %entity_type, states = machine.states().len(), "state machine registered");
        self.machines.insert(entity_type, machine);
        Ok(())
    }

    /// Compile and add a definition.
    pub fn register(&mut self, def: MachineDefinition) -> Result<(), DefinitionError> {
        self.insert(StateMachine::compile(def)?)
    }

    /// Look up the machine for an entity type.
    pub fn machine(&self, entity_type: &str) -> Result<&StateMachine, TransitionError> {
        self.machines
            .get(entity_type)
            .ok_or_else(|| TransitionError::UnknownEntityType {
                entity_type: entity_type.to_string(),
            })
    }

    /// Approve or reject `from -> to` for an entity type.
    pub fn attempt_transition(
        &self,
        entity_type: &str,
        from: &str,
        to: &str,
    ) -> Result<TransitionDescriptor, TransitionError> {
        self.machine(entity_type)?.attempt_transition(from, to)
    }

    /// Outgoing edges of `state` for an entity type.
    pub fn get_transitions(
        &self,
        entity_type: &str,
        state: &str,
    ) -> Result<&[TransitionDescriptor], TransitionError> {
        Ok(self.machine(entity_type)?.get_transitions(state))
    }

    /// Whether `state` is terminal for an entity type.
    ///
    /// Fails with `UnknownEntityType` or `UnknownState` for names the
    /// registry does not know.
    pub fn is_terminal(&self, entity_type: &str, state: &str) -> Result<bool, TransitionError> {
        self.machine(entity_type)?.is_terminal(state)
    }

    /// Registered entity types, sorted.
    pub fn entity_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.machines.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}
