//! # Status Registry
//!
//! The finite set of valid states for each entity type. Every status enum
//! implements [`EntityStatus`], which ties it to an entity type name and
//! exposes its wire names. The FSM engine works on those names; the enums
//! exist so that transition tables written in Rust cannot reference a state
//! that does not exist.
//!
//! ```text
//! lot        pending | inspected | graded | certified | rejected
//! shipment   planned | packed | dispatched | arrived | closed
//! quote      draft | sent | accepted | rejected | expired | cancelled | converted
//! order      pending | confirmed | fulfilled | closed | cancelled
//! invoice    draft | issued | overdue | paid | void
//! ```

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A status enum registered for one entity type.
pub trait EntityStatus: Copy + Eq + Display + FromStr + Send + Sync + 'static {
    /// Entity type name the statuses belong to (e.g. `"lot"`).
    const ENTITY_TYPE: &'static str;

    /// Every status, in declaration order.
    const ALL: &'static [Self];

    /// Wire name of this status.
    fn as_str(&self) -> &'static str;
}

/// A status name that is not part of an entity type's status set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {entity_type} status: {value:?}")]
pub struct UnknownStatus {
    /// Entity type whose status set was searched.
    pub entity_type: &'static str,
    /// The rejected input.
    pub value: String,
}

macro_rules! entity_status {
    (
        $(#[$meta:meta])*
        $name:ident, $entity_type:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl EntityStatus for $name {
            const ENTITY_TYPE: &'static str = $entity_type;
            const ALL: &'static [Self] = &[ $( Self::$variant, )+ ];

            fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $wire, )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownStatus;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $wire => Ok(Self::$variant), )+
                    _ => Err(UnknownStatus {
                        entity_type: $entity_type,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

entity_status! {
    /// Quality lifecycle of an agricultural lot.
    LotQualityStatus, "lot" {
        /// Received, not yet inspected.
        Pending => "pending",
        /// Physically inspected.
        Inspected => "inspected",
        /// Grade assigned.
        Graded => "graded",
        /// Certified against the grade (terminal).
        Certified => "certified",
        /// Failed certification (terminal).
        Rejected => "rejected",
    }
}

entity_status! {
    /// Movement lifecycle of a shipment.
    ShipmentStatus, "shipment" {
        /// Shipment planned.
        Planned => "planned",
        /// Goods packed.
        Packed => "packed",
        /// Handed to the carrier.
        Dispatched => "dispatched",
        /// Delivered at destination.
        Arrived => "arrived",
        /// Delivery confirmed and closed (terminal).
        Closed => "closed",
    }
}

entity_status! {
    /// Commercial quote lifecycle.
    QuoteStatus, "quote" {
        /// Being prepared.
        Draft => "draft",
        /// Sent to the customer.
        Sent => "sent",
        /// Accepted by the customer.
        Accepted => "accepted",
        /// Declined by the customer (terminal).
        Rejected => "rejected",
        /// Validity window lapsed (terminal).
        Expired => "expired",
        /// Withdrawn by the seller (terminal).
        Cancelled => "cancelled",
        /// Converted into an order (terminal).
        Converted => "converted",
    }
}

entity_status! {
    /// Sales order lifecycle.
    OrderStatus, "order" {
        /// Placed, awaiting confirmation.
        Pending => "pending",
        /// Confirmed by the seller.
        Confirmed => "confirmed",
        /// Goods or services delivered.
        Fulfilled => "fulfilled",
        /// Fulfilment accepted and closed (terminal).
        Closed => "closed",
        /// Cancelled before fulfilment (terminal).
        Cancelled => "cancelled",
    }
}

entity_status! {
    /// Invoice lifecycle.
    InvoiceStatus, "invoice" {
        /// Being prepared.
        Draft => "draft",
        /// Issued to the customer.
        Issued => "issued",
        /// Past due date, unpaid.
        Overdue => "overdue",
        /// Settled (terminal).
        Paid => "paid",
        /// Voided (terminal).
        Void => "void",
    }
}
