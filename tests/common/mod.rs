#![allow(dead_code)]

use std::sync::Mutex;

use postaqui::application::{AddressLookup, PostingRequest, QuoteRequest, ShippingGateway};
use postaqui::domain::{AddressHint, GatewayError, ShipmentOffer};

/// In-memory stand-in for both remote services.
#[derive(Default)]
pub struct FakeServices {
    pub offers: Vec<ShipmentOffer>,
    pub tracking_code: String,
    pub fail_quotes: bool,
    pub quotes: Mutex<Vec<QuoteRequest>>,
    pub postings: Mutex<Vec<PostingRequest>>,
    pub lookups: Mutex<Vec<String>>,
}

impl FakeServices {
    pub fn with_offer(carrier: &str, price: f64, tracking_code: &str) -> Self {
        Self {
            offers: vec![offer("frete123", carrier, price)],
            tracking_code: tracking_code.to_string(),
            ..Self::default()
        }
    }
}

impl ShippingGateway for FakeServices {
    fn calculate_shipping(&self, request: &QuoteRequest) -> Result<Vec<ShipmentOffer>, GatewayError> {
        self.quotes.lock().unwrap().push(request.clone());
        if self.fail_quotes {
            return Err(GatewayError::Status {
                endpoint: "shipping_calculate".to_string(),
                status: 500,
                body: "boom".to_string(),
            });
        }
        Ok(self.offers.clone())
    }

    fn post_shipment(&self, request: &PostingRequest) -> Result<String, GatewayError> {
        self.postings.lock().unwrap().push(request.clone());
        Ok(self.tracking_code.clone())
    }
}

impl AddressLookup for FakeServices {
    fn lookup(&self, postal_code: &str) -> Result<Option<AddressHint>, GatewayError> {
        self.lookups.lock().unwrap().push(postal_code.to_string());
        Ok(Some(AddressHint {
            state_code: "SP".to_string(),
            city: "São Paulo".to_string(),
            neighborhood: "Sé".to_string(),
            street: "Praça da Sé".to_string(),
        }))
    }
}

pub fn offer(id: &str, carrier: &str, price: f64) -> ShipmentOffer {
    ShipmentOffer {
        id: id.to_string(),
        carrier: carrier.to_string(),
        price,
        discount: 0.0,
    }
}
