//! # State Machine Errors
//!
//! Two families. [`TransitionError`] is returned when a caller asks for a
//! transition; [`DefinitionError`] is returned when a transition table is
//! compiled and turns out to be malformed.

use thiserror::Error;

/// Rejection of a requested transition.
///
/// `UnknownState` and `UnknownEntityType` mean the caller passed a name the
/// registry has never heard of: a schema or wiring bug, never retried.
/// `NoSuchTransition` is the ordinary business outcome of asking for a move
/// the table does not declare (same-state, backward or skip-ahead).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// `from` or `to` is not in the entity type's status set.
    #[error("unknown {entity_type} state: {state:?}")]
    UnknownState {
        /// Entity type of the machine consulted.
        entity_type: String,
        /// The unrecognized state name.
        state: String,
    },

    /// Both states exist but no edge `from -> to` is declared.
    #[error("no {entity_type} transition from {from} to {to}")]
    NoSuchTransition {
        /// Entity type of the machine consulted.
        entity_type: String,
        /// Current state.
        from: String,
        /// Requested target state.
        to: String,
    },

    /// No machine is registered for the entity type.
    #[error("no state machine registered for entity type {entity_type:?}")]
    UnknownEntityType {
        /// The unrecognized entity type.
        entity_type: String,
    },
}

impl TransitionError {
    /// Whether the error points at a caller or schema bug rather than a
    /// legitimate business rejection.
    pub fn is_caller_bug(&self) -> bool {
        matches!(self, Self::UnknownState { .. } | Self::UnknownEntityType { .. })
    }
}

/// A transition table that cannot be compiled into a machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// The definition declares no states.
    #[error("{entity_type} declares no states")]
    NoStates {
        /// Entity type being defined.
        entity_type: String,
    },

    /// The same state name appears twice.
    #[error("{entity_type} declares state {state:?} more than once")]
    DuplicateState {
        /// Entity type being defined.
        entity_type: String,
        /// The repeated state.
        state: String,
    },

    /// An edge references a state that was not declared.
    #[error("{entity_type} edge {from} -> {to} references undeclared state {state:?}")]
    UndeclaredState {
        /// Entity type being defined.
        entity_type: String,
        /// Edge source.
        from: String,
        /// Edge target.
        to: String,
        /// The undeclared endpoint.
        state: String,
    },

    /// The same edge appears twice.
    #[error("{entity_type} declares edge {from} -> {to} more than once")]
    DuplicateEdge {
        /// Entity type being defined.
        entity_type: String,
        /// Edge source.
        from: String,
        /// Edge target.
        to: String,
    },

    /// A machine for this entity type is already registered.
    #[error("a state machine for {entity_type:?} is already registered")]
    DuplicateEntityType {
        /// The entity type registered twice.
        entity_type: String,
    },
}
