use serde::{Deserialize, Serialize};

/// Placeholder deadline, the pricing service does not report one.
pub const DEFAULT_DEADLINE_DAYS: u32 = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "cep")]
    pub postal_code: String,
    pub state: String,
    #[serde(rename = "uf")]
    pub state_code: String,
    pub city: String,
    pub neighborhood: String,
    pub street: String,
    pub number: String,
    #[serde(default)]
    pub complement: String,
}

impl Address {
    /// Overwrites the fields a postal-code lookup is authoritative for.
    ///
    /// Number and complement are left alone since the lookup service
    /// never returns them. The service has no state name, so the state
    /// field receives the region code.
    pub fn apply_lookup(&mut self, hint: &AddressHint) {
        self.state = hint.state_code.clone();
        self.state_code = hint.state_code.clone();
        self.city = hint.city.clone();
        self.neighborhood = hint.neighborhood.clone();
        self.street = hint.street.clone();
    }
}

/// Address fields resolved from a postal code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressHint {
    pub state_code: String,
    pub city: String,
    pub neighborhood: String,
    pub street: String,
}

/// Sender or receiver of a shipment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    #[serde(rename = "fullname")]
    pub full_name: String,
    #[serde(rename = "cpf")]
    pub tax_id: String,
    pub phone: String,
    pub email: String,
    pub address: Address,
}

impl Person {
    /// Sample sender in São Paulo, used by the "fill with example" action.
    pub fn sender_example() -> Self {
        Self {
            full_name: "João da Silva".to_string(),
            tax_id: "123.456.789-00".to_string(),
            phone: "(11) 98765-4321".to_string(),
            email: "joao@email.com".to_string(),
            address: Address {
                postal_code: "01001-000".to_string(),
                state: "SP".to_string(),
                state_code: "SP".to_string(),
                city: "São Paulo".to_string(),
                neighborhood: "Centro".to_string(),
                street: "Praça da Sé".to_string(),
                number: "100".to_string(),
                complement: "Sala 3".to_string(),
            },
        }
    }

    /// Sample receiver in Rio de Janeiro.
    pub fn receiver_example() -> Self {
        Self {
            full_name: "Maria Oliveira".to_string(),
            tax_id: "987.654.321-00".to_string(),
            phone: "(21) 98765-4321".to_string(),
            email: "maria.oliveira@email.com".to_string(),
            address: Address {
                postal_code: "20040-020".to_string(),
                state: "RJ".to_string(),
                state_code: "RJ".to_string(),
                city: "Rio de Janeiro".to_string(),
                neighborhood: "Centro".to_string(),
                street: "Rua da Alfândega".to_string(),
                number: "100".to_string(),
                complement: "Ap 202".to_string(),
            },
        }
    }
}

/// Content declaration attached to a package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub amount: String,
    pub quantity: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub weight: String,
    pub height: String,
    pub width: String,
    pub length: String,
    #[serde(rename = "reverse")]
    pub reverse_logistics: bool,
    #[serde(rename = "ar")]
    pub receipt_notice: bool,
    pub own_hands: bool,
    #[serde(rename = "information")]
    pub declaration: Declaration,
}

impl PackageInfo {
    /// Sample package whose description passes validation.
    pub fn example() -> Self {
        Self {
            weight: "1".to_string(),
            height: "10".to_string(),
            width: "15".to_string(),
            length: "20".to_string(),
            reverse_logistics: false,
            receipt_notice: true,
            own_hands: false,
            declaration: Declaration {
                amount: "150.00".to_string(),
                quantity: "2".to_string(),
                description: "Books and magazines".to_string(),
            },
        }
    }
}

/// One offer from the pricing service, in the order the service ranks them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentOffer {
    #[serde(rename = "_id")]
    pub id: String,
    pub carrier: String,
    pub price: f64,
    #[serde(default)]
    pub discount: f64,
}

/// The quote chosen for this shipment.
#[derive(Debug, Clone, PartialEq)]
pub struct FreightResult {
    pub price: f64,
    pub deadline_days: Option<u32>,
    pub carrier: String,
    pub shipment_id: String,
}

impl FreightResult {
    /// Takes price, carrier and id from `offer`.
    ///
    /// The service reports no deadline, so [`DEFAULT_DEADLINE_DAYS`] is used.
    pub fn from_offer(offer: &ShipmentOffer) -> Self {
        Self {
            price: offer.price,
            deadline_days: Some(DEFAULT_DEADLINE_DAYS),
            carrier: offer.carrier.clone(),
            shipment_id: offer.id.clone(),
        }
    }

    /// Price formatted as `R$ 42.50`.
    pub fn price_label(&self) -> String {
        format!("R$ {:.2}", self.price)
    }

    /// `"5 business days"`, or `"Undefined"` when the deadline is unknown.
    pub fn deadline_label(&self) -> String {
        match self.deadline_days {
            Some(days) => format!("{} business days", days),
            None => "Undefined".to_string(),
        }
    }

    /// Code of the carrier used when posting this quote.
    pub fn carrier_code(&self) -> CarrierCode {
        CarrierCode::from_display_name(&self.carrier)
    }
}

/// Carrier identifier understood by the shipment service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CarrierCode {
    Correios,
    Jadlog,
    AzulCargo,
}

impl CarrierCode {
    /// Maps a carrier display name to its code, falling back to Correios.
    pub fn from_display_name(name: &str) -> Self {
        match name {
            "Correios Pac" | "Correios Sedex" => CarrierCode::Correios,
            "Jadlog Express" | "Jadlog Package" => CarrierCode::Jadlog,
            "Azul Cargo" => CarrierCode::AzulCargo,
            _ => CarrierCode::Correios,
        }
    }

    /// Code as sent in the `carrier` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            CarrierCode::Correios => "CORREIOS",
            CarrierCode::Jadlog => "JADLOG",
            CarrierCode::AzulCargo => "AZUL_CARGO",
        }
    }
}

impl std::fmt::Display for CarrierCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the wizard has collected so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    pub sender: Person,
    pub receiver: Person,
    pub package: Option<PackageInfo>,
    pub freight_result: Option<FreightResult>,
    pub tracking_code: Option<String>,
}
