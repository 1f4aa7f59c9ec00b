//! # FSM Engine
//!
//! A table-driven state machine for one entity type. The machine is
//! compiled once from a [`MachineDefinition`] (or from typed [`Edge`]
//! constants) into an adjacency map `state -> [TransitionDescriptor]` and
//! is read-only afterwards, so any number of threads may consult it
//! without locking.
//!
//! ## Rules
//!
//! - A transition is allowed only if `(from, to)` is declared verbatim.
//!   There is no transitivity: `pending -> certified` is rejected even
//!   though `pending -> inspected -> graded -> certified` exists.
//! - Same-state moves are rejected unless declared.
//! - A declared state with no outgoing edges is terminal.
//! - `evidence_required` on a descriptor is advisory. The machine reports
//!   it; the caller decides whether an artifact is attached.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{DefinitionError, TransitionError};
use crate::status::EntityStatus;

/// A declared edge, as returned by lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionDescriptor {
    /// Source state.
    pub from: String,
    /// Target state.
    pub to: String,
    /// Whether completing this transition should be backed by an artifact.
    pub evidence_required: bool,
}

/// A typed edge used to write transition tables as constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge<S> {
    /// Source state.
    pub from: S,
    /// Target state.
    pub to: S,
    /// Whether the transition must be backed by evidence.
    pub evidence_required: bool,
}

impl<S> Edge<S> {
    /// An edge that needs no evidence.
    pub const fn open(from: S, to: S) -> Self {
        Self {
            from,
            to,
            evidence_required: false,
        }
    }

    /// An edge whose completion must be backed by evidence.
    pub const fn evidenced(from: S, to: S) -> Self {
        Self {
            from,
            to,
            evidence_required: true,
        }
    }
}

/// Serializable description of a machine, before compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineDefinition {
    /// Entity type governed by the machine.
    pub entity_type: String,
    /// Every valid state, in declaration order.
    pub states: Vec<String>,
    /// Declared edges, in declaration order.
    pub transitions: Vec<TransitionDescriptor>,
}

impl MachineDefinition {
    /// Start an empty definition for an entity type.
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            states: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Declare a state.
    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.states.push(state.into());
        self
    }

    /// Declare an edge.
    pub fn edge(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        evidence_required: bool,
    ) -> Self {
        self.transitions.push(TransitionDescriptor {
            from: from.into(),
            to: to.into(),
            evidence_required,
        });
        self
    }

    /// Build a definition from a status enum and its typed edge table.
    pub fn from_status_edges<S: EntityStatus>(edges: &[Edge<S>]) -> Self {
        Self {
            entity_type: S::ENTITY_TYPE.to_string(),
            states: S::ALL.iter().map(|s| s.as_str().to_string()).collect(),
            transitions: edges
                .iter()
                .map(|e| TransitionDescriptor {
                    from: e.from.as_str().to_string(),
                    to: e.to.as_str().to_string(),
                    evidence_required: e.evidence_required,
                })
                .collect(),
        }
    }
}

/// A compiled, read-only state machine for one entity type.
#[derive(Debug, Clone)]
pub struct StateMachine {
    entity_type: String,
    states: Vec<String>,
    adjacency: HashMap<String, Vec<TransitionDescriptor>>,
}

impl StateMachine {
    /// Compile a definition.
    ///
    /// # Errors
    ///
    /// Rejects definitions with no states, duplicate states, edges that
    /// name an undeclared state, and duplicate edges.
    pub fn compile(def: MachineDefinition) -> Result<Self, DefinitionError> {
        let entity_type = def.entity_type;
        if def.states.is_empty() {
            return Err(DefinitionError::NoStates { entity_type });
        }

        let mut adjacency: HashMap<String, Vec<TransitionDescriptor>> = HashMap::new();
        for state in &def.states {
            if adjacency.insert(state.clone(), Vec::new()).is_some() {
                return Err(DefinitionError::DuplicateState {
                    entity_type,
                    state: state.clone(),
                });
            }
        }

        let mut seen: HashSet<(String, String)> = HashSet::new();
        for t in def.transitions {
            for endpoint in [&t.from, &t.to] {
                if !adjacency.contains_key(endpoint) {
                    return Err(DefinitionError::UndeclaredState {
                        entity_type,
                        from: t.from.clone(),
                        to: t.to.clone(),
                        state: endpoint.clone(),
                    });
                }
            }
            if !seen.insert((t.from.clone(), t.to.clone())) {
                return Err(DefinitionError::DuplicateEdge {
                    entity_type,
                    from: t.from,
                    to: t.to,
                });
            }
            if let Some(out) = adjacency.get_mut(&t.from) {
                out.push(t);
            }
        }

        Ok(Self {
            entity_type,
            states: def.states,
            adjacency,
        })
    }

    /// Build a machine from a status enum and a typed edge table.
    ///
    /// Infallible: every state comes from `S::ALL` and every edge endpoint
    /// is an `S`. A repeated edge keeps its first declaration.
    pub fn for_status<S: EntityStatus>(edges: &[Edge<S>]) -> Self {
        let states: Vec<String> = S::ALL.iter().map(|s| s.as_str().to_string()).collect();
        let mut adjacency: HashMap<String, Vec<TransitionDescriptor>> = states
            .iter()
            .map(|s| (s.clone(), Vec::new()))
            .collect();

        for edge in edges {
            let out = adjacency.entry(edge.from.as_str().to_string()).or_default();
            if out.iter().any(|t| t.to == edge.to.as_str()) {
                continue;
            }
            out.push(TransitionDescriptor {
                from: edge.from.as_str().to_string(),
                to: edge.to.as_str().to_string(),
                evidence_required: edge.evidence_required,
            });
        }

        Self {
            entity_type: S::ENTITY_TYPE.to_string(),
            states,
            adjacency,
        }
    }

    /// Entity type governed by this machine.
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// Every valid state, in declaration order.
    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// Whether `state` is part of this entity type's status set.
    pub fn contains_state(&self, state: &str) -> bool {
        self.adjacency.contains_key(state)
    }

    /// Approve or reject `from -> to`.
    ///
    /// # Errors
    ///
    /// `UnknownState` if either name is not a declared state (checked for
    /// `from` first); `NoSuchTransition` if both exist but the edge is not
    /// declared.
    pub fn attempt_transition(
        &self,
        from: &str,
        to: &str,
    ) -> Result<TransitionDescriptor, TransitionError> {
        for state in [from, to] {
            if !self.contains_state(state) {
                tracing::warn!(
                    entity_type = %self.entity_type,
                    state,
                    "transition requested with unknown state"
                );
                return Err(TransitionError::UnknownState {
                    entity_type: self.entity_type.clone(),
                    state: state.to_string(),
                });
            }
        }

        match self.get_transitions(from).iter().find(|t| t.to == to) {
            Some(descriptor) => {
                tracing::debug!(
                    entity_type = %self.entity_type,
                    from,
                    to,
                    evidence_required = descriptor.evidence_required,
                    "transition approved"
                );
                Ok(descriptor.clone())
            }
            None => {
                tracing::debug!(entity_type = %self.entity_type, from, to, "transition rejected");
                Err(TransitionError::NoSuchTransition {
                    entity_type: self.entity_type.clone(),
                    from: from.to_string(),
                    to: to.to_string(),
                })
            }
        }
    }

    /// Typed variant of [`attempt_transition`](Self::attempt_transition).
    ///
    /// # Errors
    ///
    /// `UnknownEntityType` if `S` belongs to a different entity type than
    /// this machine; otherwise as `attempt_transition`.
    pub fn attempt<S: EntityStatus>(
        &self,
        from: S,
        to: S,
    ) -> Result<TransitionDescriptor, TransitionError> {
        if S::ENTITY_TYPE != self.entity_type {
            return Err(TransitionError::UnknownEntityType {
                entity_type: S::ENTITY_TYPE.to_string(),
            });
        }
        self.attempt_transition(from.as_str(), to.as_str())
    }

    /// Declared outgoing edges of `state`, in declaration order.
    ///
    /// Empty for terminal states and for names outside the status set.
    pub fn get_transitions(&self, state: &str) -> &[TransitionDescriptor] {
        self.adjacency.get(state).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `state` has no outgoing edges.
    ///
    /// # Errors
    ///
    /// `UnknownState` for names outside the status set, which have no
    /// edges but are not states of this machine.
    pub fn is_terminal(&self, state: &str) -> Result<bool, TransitionError> {
        if !self.contains_state(state) {
            return Err(TransitionError::UnknownState {
                entity_type: self.entity_type.clone(),
                state: state.to_string(),
            });
        }
        Ok(self.get_transitions(state).is_empty())
    }

    /// All terminal states, in declaration order.
    pub fn terminal_states(&self) -> Vec<&str> {
        self.states
            .iter()
            .filter(|s| self.get_transitions(s).is_empty())
            .map(String::as_str)
            .collect()
    }

    /// The machine as a serializable definition (declaration order kept).
    pub fn definition(&self) -> MachineDefinition {
        MachineDefinition {
            entity_type: self.entity_type.clone(),
            states: self.states.clone(),
            transitions: self
                .states
                .iter()
                .flat_map(|s| self.get_transitions(s).iter().cloned())
                .collect(),
        }
    }
}
