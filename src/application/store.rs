//! The accumulated wizard data and the two remote orchestration operations.

use tracing::{info, warn};

use crate::application::gateway::{PostingRequest, QuoteRequest, ShippingGateway};
use crate::domain::{
    FormData, FreightResult, GatewayError, PackageInfo, Person, ShipmentOffer, WizardError,
    WizardResult,
};

/// Owns the [`FormData`] for one wizard session.
///
/// Each step commits its slice with a single replace. The quote and posting
/// operations are split into a request half and an apply half so the call
/// itself can run elsewhere. [`FormStore::calculate_freight`] and
/// [`FormStore::post_shipment`] run both halves back to back.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FormStore {
    form: FormData,
}

impl FormStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed sender. Default until the sender step is submitted.
    pub fn sender(&self) -> &Person {
        &self.form.sender
    }

    /// Committed receiver. Default until the receiver step is submitted.
    pub fn receiver(&self) -> &Person {
        &self.form.receiver
    }

    /// Committed package, set when the package step passes validation.
    pub fn package(&self) -> Option<&PackageInfo> {
        self.form.package.as_ref()
    }

    /// Latest freight result from a quote, if any.
    pub fn freight_result(&self) -> Option<&FreightResult> {
        self.form.freight_result.as_ref()
    }

    /// Tracking code of the posted shipment, if any.
    pub fn tracking_code(&self) -> Option<&str> {
        self.form.tracking_code.as_deref()
    }

    /// Replaces the sender slice. Callers validate first.
    pub fn commit_sender(&mut self, sender: Person) {
        self.form.sender = sender;
    }

    /// Replaces the receiver slice. Callers validate first.
    pub fn commit_receiver(&mut self, receiver: Person) {
        self.form.receiver = receiver;
    }

    /// Replaces the package slice. Freight and tracking code are untouched.
    pub fn commit_package(&mut self, package: PackageInfo) {
        self.form.package = Some(package);
    }

    /// Builds the quote request, failing if no package was committed.
    pub fn quote_request(&self) -> WizardResult<QuoteRequest> {
        let package = self.form.package.clone().ok_or(WizardError::MissingPackage)?;
        Ok(QuoteRequest {
            sender: self.form.sender.clone(),
            receiver: self.form.receiver.clone(),
            package,
        })
    }

    /// Commits the first offer as the freight result.
    ///
    /// An empty offer list or a failed call clears the freight result and
    /// the tracking code before the error is returned.
    pub fn apply_quote(
        &mut self,
        outcome: Result<Vec<ShipmentOffer>, GatewayError>,
    ) -> WizardResult<FreightResult> {
        let result = outcome
            .map_err(WizardError::from)
            .and_then(|offers| offers.first().map(FreightResult::from_offer).ok_or(WizardError::NoOffers));

        match result {
            Ok(freight) => {
                info!(carrier = %freight.carrier, price = freight.price, id = %freight.shipment_id, "freight calculated");
                self.form.freight_result = Some(freight.clone());
                Ok(freight)
            }
            Err(err) => {
                warn!(error = %err, "freight calculation failed");
                self.form.freight_result = None;
                self.form.tracking_code = None;
                Err(err)
            }
        }
    }

    /// Quote operation: request, call and apply in one go.
    pub fn calculate_freight(&mut self, gateway: &dyn ShippingGateway) -> WizardResult<FreightResult> {
        let request = self.quote_request()?;
        let outcome = gateway.calculate_shipping(&request);
        self.apply_quote(outcome)
    }

    /// Builds the posting request, failing if no freight was calculated.
    pub fn posting_request(&self) -> WizardResult<PostingRequest> {
        let freight = self.form.freight_result.as_ref().ok_or(WizardError::MissingFreight)?;
        Ok(PostingRequest::for_freight(freight))
    }

    /// Makes `freight` the quote to post, replacing whatever a late quote
    /// completion left in the store.
    pub fn select_freight(&mut self, freight: FreightResult) {
        self.form.freight_result = Some(freight);
    }

    /// Commits the tracking code, or clears it when the call failed.
    pub fn apply_posting(&mut self, outcome: Result<String, GatewayError>) -> WizardResult<String> {
        match outcome {
            Ok(code) => {
                info!(tracking_code = %code, "shipment posted");
                self.form.tracking_code = Some(code.clone());
                Ok(code)
            }
            Err(err) => {
                warn!(error = %err, "shipment posting failed");
                self.form.tracking_code = None;
                Err(err.into())
            }
        }
    }

    /// Posting operation: request, call and apply in one go.
    pub fn post_shipment(&mut self, gateway: &dyn ShippingGateway) -> WizardResult<String> {
        let request = self.posting_request()?;
        let outcome = gateway.post_shipment(&request);
        self.apply_posting(outcome)
    }

    /// Discards everything collected so far.
    pub fn reset(&mut self) {
        self.form = FormData::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CarrierCode;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockShipping {
        offers: Vec<ShipmentOffer>,
        fail_quote: bool,
        tracking_code: Option<String>,
        quote_calls: Mutex<Vec<QuoteRequest>>,
        post_calls: Mutex<Vec<PostingRequest>>,
    }

    impl ShippingGateway for MockShipping {
        fn calculate_shipping(&self, request: &QuoteRequest) -> Result<Vec<ShipmentOffer>, GatewayError> {
            self.quote_calls.lock().unwrap().push(request.clone());
            if self.fail_quote {
                return Err(GatewayError::Transport {
                    endpoint: "shipping_calculate".to_string(),
                    message: "connection refused".to_string(),
                });
            }
            Ok(self.offers.clone())
        }

        fn post_shipment(&self, request: &PostingRequest) -> Result<String, GatewayError> {
            self.post_calls.lock().unwrap().push(request.clone());
            self.tracking_code.clone().ok_or_else(|| GatewayError::Status {
                endpoint: "posting".to_string(),
                status: 500,
                body: "boom".to_string(),
            })
        }
    }

    fn offer(id: &str, carrier: &str, price: f64) -> ShipmentOffer {
        ShipmentOffer {
            id: id.to_string(),
            carrier: carrier.to_string(),
            price,
            discount: 0.0,
        }
    }

    fn filled_store() -> FormStore {
        let mut store = FormStore::new();
        store.commit_sender(Person::sender_example());
        store.commit_receiver(Person::receiver_example());
        store.commit_package(PackageInfo::example());
        store
    }

    fn freight(carrier: &str) -> FreightResult {
        FreightResult::from_offer(&offer("frete123", carrier, 42.5))
    }

    #[test]
    fn test_quote_without_package_is_a_precondition_error() {
        let gateway = MockShipping {
            offers: vec![offer("a", "Correios Pac", 1.0)],
            ..MockShipping::default()
        };
        let mut store = FormStore::new();
        store.form.freight_result = Some(freight("Azul Cargo"));

        let err = store.calculate_freight(&gateway).unwrap_err();

        assert_eq!(err, WizardError::MissingPackage);
        assert!(err.is_precondition());
        assert!(gateway.quote_calls.lock().unwrap().is_empty());
        assert_eq!(store.freight_result(), Some(&freight("Azul Cargo")));
    }

    #[test]
    fn test_quote_takes_first_offer() {
        let gateway = MockShipping {
            offers: vec![
                offer("first", "Jadlog Express", 30.0),
                offer("second", "Correios Pac", 10.0),
            ],
            ..MockShipping::default()
        };
        let mut store = filled_store();

        let freight = store.calculate_freight(&gateway).unwrap();

        assert_eq!(freight.shipment_id, "first");
        assert_eq!(freight.carrier, "Jadlog Express");
        assert_eq!(freight.price, 30.0);
        assert_eq!(store.freight_result(), Some(&freight));

        let calls = gateway.quote_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].sender, Person::sender_example());
        assert_eq!(calls[0].package, PackageInfo::example());
    }

    #[test]
    fn test_empty_offers_clear_previous_results() {
        let gateway = MockShipping::default();
        let mut store = filled_store();
        store.form.freight_result = Some(freight("Correios Pac"));
        store.form.tracking_code = Some("OLD".to_string());

        let err = store.calculate_freight(&gateway).unwrap_err();

        assert_eq!(err, WizardError::NoOffers);
        assert!(store.freight_result().is_none());
        assert!(store.tracking_code().is_none());
    }

    #[test]
    fn test_transport_failure_clears_and_resignals() {
        let gateway = MockShipping {
            fail_quote: true,
            ..MockShipping::default()
        };
        let mut store = filled_store();
        store.form.freight_result = Some(freight("Correios Pac"));

        let err = store.calculate_freight(&gateway).unwrap_err();

        assert!(matches!(err, WizardError::Gateway(GatewayError::Transport { .. })));
        assert!(!err.is_precondition());
        assert!(store.freight_result().is_none());
    }

    #[test]
    fn test_post_without_freight_is_a_precondition_error() {
        let gateway = MockShipping {
            tracking_code: Some("ABC123456789BR".to_string()),
            ..MockShipping::default()
        };
        let mut store = filled_store();
        store.form.tracking_code = Some("KEEP".to_string());

        let err = store.post_shipment(&gateway).unwrap_err();

        assert_eq!(err, WizardError::MissingFreight);
        assert!(gateway.post_calls.lock().unwrap().is_empty());
        assert_eq!(store.tracking_code(), Some("KEEP"));
    }

    #[test]
    fn test_post_maps_carrier_and_commits_code() {
        let gateway = MockShipping {
            tracking_code: Some("ABC123456789BR".to_string()),
            ..MockShipping::default()
        };
        let mut store = filled_store();
        store.form.freight_result = Some(freight("Azul Cargo"));

        let code = store.post_shipment(&gateway).unwrap();

        assert_eq!(code, "ABC123456789BR");
        assert_eq!(store.tracking_code(), Some("ABC123456789BR"));
        let calls = gateway.post_calls.lock().unwrap();
        assert_eq!(calls[0].carrier, CarrierCode::AzulCargo);
        assert_eq!(calls[0].shipment_id, "frete123");
    }

    #[test]
    fn test_post_unknown_carrier_falls_back_to_correios() {
        let mut store = filled_store();
        store.form.freight_result = Some(freight("Transportadora Nova"));
        let request = store.posting_request().unwrap();
        assert_eq!(request.carrier, CarrierCode::Correios);
    }

    #[test]
    fn test_post_failure_clears_tracking_code() {
        let gateway = MockShipping::default();
        let mut store = filled_store();
        store.form.freight_result = Some(freight("Correios Sedex"));
        store.form.tracking_code = Some("OLD".to_string());

        let err = store.post_shipment(&gateway).unwrap_err();

        assert!(matches!(err, WizardError::Gateway(GatewayError::Status { status: 500, .. })));
        assert!(store.tracking_code().is_none());
        assert!(store.freight_result().is_some());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut store = filled_store();
        store.form.freight_result = Some(freight("Correios Pac"));
        store.form.tracking_code = Some("ABC".to_string());

        store.reset();

        assert_eq!(store, FormStore::default());
        assert_eq!(store.sender(), &Person::default());
        assert!(store.package().is_none());
    }
}
