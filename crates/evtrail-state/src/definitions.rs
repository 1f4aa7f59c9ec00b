//! # Standard Transition Tables
//!
//! The reference lifecycles, written as typed edge constants.
//!
//! ```text
//! lot:       pending ─▶ inspected ─▶ graded ─┬▶ certified*   (terminal)
//!                                            └▶ rejected*    (terminal)
//!
//! shipment:  planned ─▶ packed ─▶ dispatched ─▶ arrived ─▶ closed*  (terminal)
//!
//! quote:     draft ─▶ sent ─┬▶ accepted ─▶ converted*  (terminal)
//!              │            ├▶ rejected                (terminal)
//!              │            ├▶ expired                 (terminal)
//!              └────────────┴▶ cancelled               (terminal)
//!
//! order:     pending ─▶ confirmed ─▶ fulfilled ─▶ closed*  (terminal)
//!              └───────────┴▶ cancelled                    (terminal)
//!
//! invoice:   draft ─▶ issued ─┬▶ paid*   (terminal)
//!                      │      └▶ void    (terminal)
//!                      └▶ overdue ─┬▶ paid*
//!                                  └▶ void
//! ```
//!
//! `*` marks edges with `evidence_required = true`.

use crate::machine::{Edge, StateMachine};
use crate::status::{InvoiceStatus, LotQualityStatus, OrderStatus, QuoteStatus, ShipmentStatus};

/// Lot quality lifecycle.
pub const LOT_QUALITY_EDGES: &[Edge<LotQualityStatus>] = {
    use LotQualityStatus::*;
    &[
        Edge::open(Pending, Inspected),
        Edge::open(Inspected, Graded),
        Edge::evidenced(Graded, Certified),
        Edge::evidenced(Graded, Rejected),
    ]
};

/// Shipment lifecycle.
pub const SHIPMENT_EDGES: &[Edge<ShipmentStatus>] = {
    use ShipmentStatus::*;
    &[
        Edge::open(Planned, Packed),
        Edge::open(Packed, Dispatched),
        Edge::open(Dispatched, Arrived),
        Edge::evidenced(Arrived, Closed),
    ]
};

/// Quote lifecycle.
pub const QUOTE_EDGES: &[Edge<QuoteStatus>] = {
    use QuoteStatus::*;
    &[
        Edge::open(Draft, Sent),
        Edge::open(Draft, Cancelled),
        Edge::open(Sent, Accepted),
        Edge::open(Sent, Rejected),
        Edge::open(Sent, Expired),
        Edge::open(Sent, Cancelled),
        Edge::evidenced(Accepted, Converted),
    ]
};

/// Order lifecycle.
pub const ORDER_EDGES: &[Edge<OrderStatus>] = {
    use OrderStatus::*;
    &[
        Edge::open(Pending, Confirmed),
        Edge::open(Pending, Cancelled),
        Edge::open(Confirmed, Fulfilled),
        Edge::open(Confirmed, Cancelled),
        Edge::evidenced(Fulfilled, Closed),
    ]
};

/// Invoice lifecycle.
pub const INVOICE_EDGES: &[Edge<InvoiceStatus>] = {
    use InvoiceStatus::*;
    &[
        Edge::open(Draft, Issued),
        Edge::evidenced(Issued, Paid),
        Edge::open(Issued, Void),
        Edge::open(Issued, Overdue),
        Edge::evidenced(Overdue, Paid),
        Edge::open(Overdue, Void),
    ]
};

/// Lot quality machine.
pub fn lot_quality() -> StateMachine {
    StateMachine::for_status(LOT_QUALITY_EDGES)
}

/// Shipment machine.
pub fn shipment() -> StateMachine {
    StateMachine::for_status(SHIPMENT_EDGES)
}

/// Quote machine.
pub fn quote() -> StateMachine {
    StateMachine::for_status(QUOTE_EDGES)
}

/// Order machine.
pub fn order() -> StateMachine {
    StateMachine::for_status(ORDER_EDGES)
}

/// Invoice machine.
pub fn invoice() -> StateMachine {
    StateMachine::for_status(INVOICE_EDGES)
}

/// Every standard machine.
pub fn standard_machines() -> Vec<StateMachine> {
    vec![lot_quality(), shipment(), quote(), order(), invoice()]
}
