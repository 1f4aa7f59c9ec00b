//! # evtrail-state: Lifecycle State Machines
//!
//! Governs lifecycle transitions of business entities through explicit,
//! table-driven state machines.
//!
//! ## Components
//!
//! - **Status Registry** (`status.rs`): the valid states of each entity
//!   type as typed enums (`LotQualityStatus`, `ShipmentStatus`,
//!   `QuoteStatus`, `OrderStatus`, `InvoiceStatus`).
//!
//! - **FSM Engine** (`machine.rs`): compiles a transition table into a
//!   read-only adjacency map and answers `attempt_transition`,
//!   `get_transitions` and `is_terminal`.
//!
//! - **Standard tables** (`definitions.rs`): the reference lifecycles.
//!
//! - **Registry** (`registry.rs`): entity type name → machine, for callers
//!   holding untyped strings.
//!
//! ## Design
//!
//! Unlike a typestate encoding, the entity's current state arrives at
//! runtime from storage, so validity is a table lookup that returns
//! `Result`. The tables themselves are still written against typed enums,
//! so a standard table cannot name a state that does not exist.
//! Nothing here performs I/O or holds mutable state after construction.

pub mod definitions;
pub mod error;
pub mod machine;
pub mod registry;
pub mod status;

pub use error::{DefinitionError, TransitionError};
pub use machine::{Edge, MachineDefinition, StateMachine, TransitionDescriptor};
pub use registry::FsmRegistry;
pub use status::{
    EntityStatus, InvoiceStatus, LotQualityStatus, OrderStatus, QuoteStatus, ShipmentStatus,
    UnknownStatus,
};
