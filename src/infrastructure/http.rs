//! HTTP implementation of the remote collaborators.
//!
//! One blocking reqwest client serves the pricing/posting service and the
//! postal-code lookup service. Every call runs on a dispatcher worker thread,
//! never on the UI thread.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST | `{base}/shipping_calculate` | Freight quote |
//! | POST | `{base}/posting?carrier=CODE` | Post shipment, get tracking code |
//! | GET  | `{lookup}/ws/{cep}/json/` | Address by postal code |

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::application::{AddressLookup, PostingRequest, QuoteRequest, ShippingGateway};
use crate::domain::{AddressHint, GatewayError, ShipmentOffer};
use crate::infrastructure::config::ServiceConfig;

const QUOTE_ENDPOINT: &str = "shipping_calculate";
const POSTING_ENDPOINT: &str = "posting";
const LOOKUP_ENDPOINT: &str = "address_lookup";

#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    #[serde(default)]
    shipment: Vec<ShipmentOffer>,
}

#[derive(Debug, Serialize)]
struct PostingBody<'a> {
    calculated_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct PostingReceipt {
    code: String,
}

/// ViaCEP answer. On an unknown postal code only `erro` is present.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LookupAddress {
    uf: String,
    localidade: String,
    bairro: String,
    logradouro: String,
    erro: Option<serde_json::Value>,
}

impl LookupAddress {
    fn not_found(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag == "true",
            Some(_) => true,
            None => false,
        }
    }
}

/// Blocking HTTP client for the pricing, posting and address services.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
    address_lookup_url: Url,
}

impl HttpGateway {
    /// Builds the client with the configured timeout and a JSON content type.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Transport`] if the TLS backend cannot be initialized.
    pub fn new(config: &ServiceConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::CONTENT_TYPE,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers
            })
            .build()
            .map_err(|e| GatewayError::Transport {
                endpoint: "client_init".into(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            address_lookup_url: config.address_lookup_url.clone(),
        })
    }

    fn url(base: &Url, path: &str, endpoint: &str) -> Result<Url, GatewayError> {
        let raw = format!("{}/{}", base.as_str().trim_end_matches('/'), path);
        Url::parse(&raw).map_err(|e| GatewayError::Transport {
            endpoint: endpoint.into(),
            message: format!("invalid URL {raw}: {e}"),
        })
    }

    fn send(endpoint: &str, request: reqwest::blocking::RequestBuilder) -> Result<Response, GatewayError> {
        let response = request.send().map_err(|e| GatewayError::Transport {
            endpoint: endpoint.into(),
            message: e.to_string(),
        })?;

        let status = response.status();
        debug!(endpoint, status = status.as_u16(), "response received");
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GatewayError::Status {
                endpoint: endpoint.into(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    fn decode<T: DeserializeOwned>(endpoint: &str, response: Response) -> Result<T, GatewayError> {
        response.json::<T>().map_err(|e| GatewayError::Decode {
            endpoint: endpoint.into(),
            message: e.to_string(),
        })
    }
}

impl ShippingGateway for HttpGateway {
    fn calculate_shipping(&self, request: &QuoteRequest) -> Result<Vec<ShipmentOffer>, GatewayError> {
        let url = Self::url(&self.base_url, "shipping_calculate", QUOTE_ENDPOINT)?;
        let response = Self::send(QUOTE_ENDPOINT, self.client.post(url).json(request))?;
        let envelope: QuoteEnvelope = Self::decode(QUOTE_ENDPOINT, response)?;
        debug!(offers = envelope.shipment.len(), "quote offers received");
        Ok(envelope.shipment)
    }

    fn post_shipment(&self, request: &PostingRequest) -> Result<String, GatewayError> {
        let url = Self::url(&self.base_url, "posting", POSTING_ENDPOINT)?;
        let body = PostingBody {
            calculated_id: &request.shipment_id,
        };
        let builder = self
            .client
            .post(url)
            .query(&[("carrier", request.carrier.as_str())])
            .json(&body);
        let response = Self::send(POSTING_ENDPOINT, builder)?;
        let receipt: PostingReceipt = Self::decode(POSTING_ENDPOINT, response)?;
        Ok(receipt.code)
    }
}

impl AddressLookup for HttpGateway {
    fn lookup(&self, postal_code: &str) -> Result<Option<AddressHint>, GatewayError> {
        let path = format!("ws/{postal_code}/json/");
        let url = Self::url(&self.address_lookup_url, &path, LOOKUP_ENDPOINT)?;
        let response = Self::send(LOOKUP_ENDPOINT, self.client.get(url))?;
        let address: LookupAddress = Self::decode(LOOKUP_ENDPOINT, response)?;
        if address.not_found() {
            return Ok(None);
        }
        Ok(Some(AddressHint {
            state_code: address.uf,
            city: address.localidade,
            neighborhood: address.bairro,
            street: address.logradouro,
        }))
    }
}
