//! # HTTP gateway against mock servers
//!
//! The gateway uses reqwest's blocking client, which must neither be built
//! nor dropped inside a Tokio runtime. Every call is made inside
//! `tokio::task::spawn_blocking`, constructing the gateway there too.

use postaqui::application::{AddressLookup, PostingRequest, QuoteRequest, ShippingGateway};
use postaqui::domain::{CarrierCode, GatewayError, PackageInfo, Person};
use postaqui::infrastructure::{HttpGateway, ServiceConfig};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway(uri: &str) -> HttpGateway {
    let config = ServiceConfig::local(uri).expect("config");
    HttpGateway::new(&config).expect("gateway build")
}

fn quote_request() -> QuoteRequest {
    QuoteRequest {
        sender: Person::sender_example(),
        receiver: Person::receiver_example(),
        package: PackageInfo::example(),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn quote_returns_offers_in_service_order() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/shipping_calculate"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "shipment": [
                {"_id": "frete123", "carrier": "Correios Sedex", "price": 42.5, "discount": 0},
                {"_id": "frete456", "carrier": "Jadlog Package", "price": 30.0, "discount": 2.5}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let offers = tokio::task::spawn_blocking(move || gateway(&uri).calculate_shipping(&quote_request()))
        .await
        .expect("task")
        .expect("quote");

    assert_eq!(offers.len(), 2);
    assert_eq!(offers[0].id, "frete123");
    assert_eq!(offers[0].price, 42.5);
    assert_eq!(offers[1].carrier, "Jadlog Package");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn quote_body_uses_wire_field_names() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/shipping_calculate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"shipment": []})))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let offers = tokio::task::spawn_blocking(move || gateway(&uri).calculate_shipping(&quote_request()))
        .await
        .expect("task")
        .expect("quote");
    assert!(offers.is_empty());

    let requests = server.received_requests().await.expect("recording enabled");
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).expect("json body");
    assert_eq!(body["sender"]["fullname"], "João da Silva");
    assert_eq!(body["sender"]["cpf"], "123.456.789-00");
    assert_eq!(body["receiver"]["address"]["cep"], "20040-020");
    assert_eq!(body["receiver"]["address"]["uf"], "RJ");
    assert_eq!(body["package"]["ar"], true);
    assert_eq!(body["package"]["information"]["description"], "Books and magazines");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn quote_server_error_maps_to_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/shipping_calculate"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let err = tokio::task::spawn_blocking(move || gateway(&uri).calculate_shipping(&quote_request()))
        .await
        .expect("task")
        .unwrap_err();

    assert_eq!(
        err,
        GatewayError::Status {
            endpoint: "shipping_calculate".to_string(),
            status: 503,
            body: "maintenance".to_string(),
        }
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn quote_malformed_body_maps_to_decode() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/shipping_calculate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let uri = server.uri();
    let err = tokio::task::spawn_blocking(move || gateway(&uri).calculate_shipping(&quote_request()))
        .await
        .expect("task")
        .unwrap_err();

    assert!(matches!(err, GatewayError::Decode { ref endpoint, .. } if endpoint == "shipping_calculate"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn posting_sends_carrier_and_quote_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/posting"))
        .and(query_param("carrier", "AZUL_CARGO"))
        .and(body_json(serde_json::json!({"calculated_id": "frete123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": "ABC123456789BR"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let code = tokio::task::spawn_blocking(move || {
        gateway(&uri).post_shipment(&PostingRequest {
            carrier: CarrierCode::AzulCargo,
            shipment_id: "frete123".to_string(),
        })
    })
    .await
    .expect("task")
    .expect("posting");

    assert_eq!(code, "ABC123456789BR");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn lookup_maps_viacep_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ws/01001000/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "cep": "01001-000",
            "logradouro": "Praça da Sé",
            "complemento": "lado ímpar",
            "bairro": "Sé",
            "localidade": "São Paulo",
            "uf": "SP"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let hint = tokio::task::spawn_blocking(move || gateway(&uri).lookup("01001000"))
        .await
        .expect("task")
        .expect("lookup")
        .expect("address found");

    assert_eq!(hint.state_code, "SP");
    assert_eq!(hint.city, "São Paulo");
    assert_eq!(hint.neighborhood, "Sé");
    assert_eq!(hint.street, "Praça da Sé");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn lookup_unknown_postal_code_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ws/99999999/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"erro": true})))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let hint = tokio::task::spawn_blocking(move || gateway(&uri).lookup("99999999"))
        .await
        .expect("task")
        .expect("lookup");

    assert!(hint.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unreachable_server_maps_to_transport() {
    let err = tokio::task::spawn_blocking(|| gateway("http://127.0.0.1:1").lookup("01001000"))
        .await
        .expect("task")
        .unwrap_err();

    assert!(matches!(err, GatewayError::Transport { ref endpoint, .. } if endpoint == "address_lookup"));
}
