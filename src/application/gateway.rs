//! Remote collaborators and the messages that carry calls to them.
//!
//! The state machine never performs I/O. It emits an [`Effect`] describing
//! the call, something runs it, and the outcome comes back as a
//! [`Completion`] tagged with the same [`Ticket`].

use serde::Serialize;

use crate::domain::{
    AddressHint, CarrierCode, ClipboardError, FreightResult, GatewayError, PackageInfo, Person,
    ShipmentOffer,
};

/// Pricing and shipment-posting service.
pub trait ShippingGateway: Send + Sync {
    /// Returns the offers for a shipment, in the service's order.
    fn calculate_shipping(&self, request: &QuoteRequest) -> Result<Vec<ShipmentOffer>, GatewayError>;

    /// Posts the chosen quote and returns its tracking code.
    fn post_shipment(&self, request: &PostingRequest) -> Result<String, GatewayError>;
}

/// Address lookup by postal code.
pub trait AddressLookup: Send + Sync {
    /// `Ok(None)` when the service knows no address for `postal_code`.
    fn lookup(&self, postal_code: &str) -> Result<Option<AddressHint>, GatewayError>;
}

/// Body of the quote request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteRequest {
    pub sender: Person,
    pub receiver: Person,
    pub package: PackageInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostingRequest {
    pub carrier: CarrierCode,
    pub shipment_id: String,
}

impl PostingRequest {
    /// Request posting `freight`, with its carrier name mapped to a code.
    pub fn for_freight(freight: &FreightResult) -> Self {
        Self {
            carrier: freight.carrier_code(),
            shipment_id: freight.shipment_id.clone(),
        }
    }
}

/// Identifies one issued call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(pub u64);

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Work requested by the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LookupAddress { ticket: Ticket, postal_code: String },
    Quote { ticket: Ticket, request: QuoteRequest },
    Post { ticket: Ticket, request: PostingRequest },
    CopyToClipboard { text: String },
}

/// Outcome of an [`Effect`].
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    AddressLookedUp {
        ticket: Ticket,
        outcome: Result<Option<AddressHint>, GatewayError>,
    },
    Quoted {
        ticket: Ticket,
        outcome: Result<Vec<ShipmentOffer>, GatewayError>,
    },
    Posted {
        ticket: Ticket,
        outcome: Result<String, GatewayError>,
    },
    Copied { outcome: Result<(), ClipboardError> },
}

impl Effect {
    /// Runs a remote effect to completion on the current thread.
    ///
    /// Returns `None` for effects that are not remote calls.
    pub fn execute(
        self,
        shipping: &dyn ShippingGateway,
        lookup: &dyn AddressLookup,
    ) -> Option<Completion> {
        match self {
            Effect::LookupAddress { ticket, postal_code } => Some(Completion::AddressLookedUp {
                ticket,
                outcome: lookup.lookup(&postal_code),
            }),
            Effect::Quote { ticket, request } => Some(Completion::Quoted {
                ticket,
                outcome: shipping.calculate_shipping(&request),
            }),
            Effect::Post { ticket, request } => Some(Completion::Posted {
                ticket,
                outcome: shipping.post_shipment(&request),
            }),
            Effect::CopyToClipboard { .. } => None,
        }
    }

    /// Short name used in log lines.
    pub fn describe(&self) -> &'static str {
        match self {
            Effect::LookupAddress { .. } => "address lookup",
            Effect::Quote { .. } => "freight quote",
            Effect::Post { .. } => "shipment posting",
            Effect::CopyToClipboard { .. } => "clipboard copy",
        }
    }
}
