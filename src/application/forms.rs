//! In-progress drafts for the person and package steps.

use crate::application::gateway::Ticket;
use crate::domain::validation::keys;
use crate::domain::{
    FieldErrors, PackageInfo, Person, mask_phone, mask_postal_code, mask_tax_id,
    POSTAL_CODE_MASKED_LEN,
};

/// Which party a person step is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonRole {
    Sender,
    Receiver,
}

impl PersonRole {
    /// Heading shown on the step.
    pub fn title(self) -> &'static str {
        match self {
            PersonRole::Sender => "Sender",
            PersonRole::Receiver => "Receiver",
        }
    }

    /// Sample person used by the "fill with example" action.
    pub fn example(self) -> Person {
        match self {
            PersonRole::Sender => Person::sender_example(),
            PersonRole::Receiver => Person::receiver_example(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonField {
    FullName,
    TaxId,
    Phone,
    Email,
    PostalCode,
    State,
    StateCode,
    City,
    Neighborhood,
    Street,
    Number,
    Complement,
}

impl PersonField {
    /// Fields in display and focus order.
    pub const ALL: [PersonField; 12] = [
        PersonField::FullName,
        PersonField::TaxId,
        PersonField::Phone,
        PersonField::Email,
        PersonField::PostalCode,
        PersonField::State,
        PersonField::StateCode,
        PersonField::City,
        PersonField::Neighborhood,
        PersonField::Street,
        PersonField::Number,
        PersonField::Complement,
    ];

    /// Label shown next to the input. Required fields start with `*`.
    pub fn label(self) -> &'static str {
        match self {
            PersonField::FullName => "* Full name",
            PersonField::TaxId => "* CPF",
            PersonField::Phone => "* Phone",
            PersonField::Email => "* Email",
            PersonField::PostalCode => "* CEP",
            PersonField::State => "* State",
            PersonField::StateCode => "* UF",
            PersonField::City => "* City",
            PersonField::Neighborhood => "* Neighborhood",
            PersonField::Street => "* Street",
            PersonField::Number => "* Number",
            PersonField::Complement => "Complement (optional)",
        }
    }

    /// Key of this field in [`FieldErrors`].
    pub fn error_key(self) -> Option<&'static str> {
        match self {
            PersonField::FullName => Some(keys::FULL_NAME),
            PersonField::TaxId => Some(keys::TAX_ID),
            PersonField::Phone => Some(keys::PHONE),
            PersonField::Email => Some(keys::EMAIL),
            PersonField::PostalCode => Some(keys::POSTAL_CODE),
            PersonField::State => Some(keys::STATE),
            PersonField::StateCode => Some(keys::STATE_CODE),
            PersonField::City => Some(keys::CITY),
            PersonField::Neighborhood => Some(keys::NEIGHBORHOOD),
            PersonField::Street => Some(keys::STREET),
            PersonField::Number => Some(keys::NUMBER),
            PersonField::Complement => None,
        }
    }
}

/// Draft of a sender or receiver.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonForm {
    pub role: PersonRole,
    pub person: Person,
    pub focus: usize,
    pub errors: FieldErrors,
    /// Ticket of the latest postal-code lookup, if one is outstanding.
    pub lookup: Option<Ticket>,
}

impl PersonForm {
    /// Starts a draft from `person`, usually the slice already committed.
    pub fn new(role: PersonRole, person: Person) -> Self {
        Self {
            role,
            person,
            focus: 0,
            errors: FieldErrors::new(),
            lookup: None,
        }
    }

    /// Field that receives typed characters.
    pub fn focused(&self) -> PersonField {
        PersonField::ALL[self.focus]
    }

    /// Moves focus down, wrapping to the first field.
    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % PersonField::ALL.len();
    }

    /// Moves focus up, wrapping to the last field.
    pub fn focus_previous(&mut self) {
        self.focus = (self.focus + PersonField::ALL.len() - 1) % PersonField::ALL.len();
    }

    /// Current text of `field`, masked where the field has a mask.
    pub fn value(&self, field: PersonField) -> &str {
        let address = &self.person.address;
        match field {
            PersonField::FullName => &self.person.full_name,
            PersonField::TaxId => &self.person.tax_id,
            PersonField::Phone => &self.person.phone,
            PersonField::Email => &self.person.email,
            PersonField::PostalCode => &address.postal_code,
            PersonField::State => &address.state,
            PersonField::StateCode => &address.state_code,
            PersonField::City => &address.city,
            PersonField::Neighborhood => &address.neighborhood,
            PersonField::Street => &address.street,
            PersonField::Number => &address.number,
            PersonField::Complement => &address.complement,
        }
    }

    /// Validation message for `field` from the last submit, if any.
    pub fn error(&self, field: PersonField) -> Option<&str> {
        field.error_key().and_then(|key| self.errors.get(key))
    }

    /// Stores `raw` in `field`, masking the formatted fields.
    ///
    /// Returns true when the postal code changed and is now complete, which
    /// is the moment an address lookup should be issued.
    pub fn set_value(&mut self, field: PersonField, raw: &str) -> bool {
        let value = match field {
            PersonField::TaxId => mask_tax_id(raw),
            PersonField::Phone => mask_phone(raw),
            PersonField::PostalCode => mask_postal_code(raw),
            _ => raw.to_string(),
        };

        let address = &mut self.person.address;
        let slot = match field {
            PersonField::FullName => &mut self.person.full_name,
            PersonField::TaxId => &mut self.person.tax_id,
            PersonField::Phone => &mut self.person.phone,
            PersonField::Email => &mut self.person.email,
            PersonField::PostalCode => &mut address.postal_code,
            PersonField::State => &mut address.state,
            PersonField::StateCode => &mut address.state_code,
            PersonField::City => &mut address.city,
            PersonField::Neighborhood => &mut address.neighborhood,
            PersonField::Street => &mut address.street,
            PersonField::Number => &mut address.number,
            PersonField::Complement => &mut address.complement,
        };
        let changed = *slot != value;
        *slot = value;

        changed && field == PersonField::PostalCode && self.postal_code_complete()
    }

    /// Appends `c` to the focused field and re-applies its mask.
    ///
    /// Same return value as [`PersonForm::set_value`].
    pub fn push_char(&mut self, c: char) -> bool {
        let field = self.focused();
        let mut value = self.value(field).to_string();
        value.push(c);
        self.set_value(field, &value)
    }

    /// Removes the last character of the focused field.
    pub fn pop_char(&mut self) -> bool {
        let field = self.focused();
        let mut value = self.value(field).to_string();
        value.pop();
        self.set_value(field, &value)
    }

    /// Replaces the whole draft, as the "fill with example" action does.
    pub fn replace(&mut self, person: Person) -> bool {
        let changed = self.person.address.postal_code != person.address.postal_code;
        self.person = person;
        changed && self.postal_code_complete()
    }

    /// True once the postal code holds all eight digits (`#####-###`).
    pub fn postal_code_complete(&self) -> bool {
        self.person.address.postal_code.chars().count() == POSTAL_CODE_MASKED_LEN
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageField {
    Weight,
    Height,
    Width,
    Length,
    Amount,
    Quantity,
    Description,
    ReverseLogistics,
    ReceiptNotice,
    OwnHands,
}

impl PackageField {
    /// Fields in display and focus order.
    pub const ALL: [PackageField; 10] = [
        PackageField::Weight,
        PackageField::Height,
        PackageField::Width,
        PackageField::Length,
        PackageField::Amount,
        PackageField::Quantity,
        PackageField::Description,
        PackageField::ReverseLogistics,
        PackageField::ReceiptNotice,
        PackageField::OwnHands,
    ];

    /// Label shown next to the input.
    pub fn label(self) -> &'static str {
        match self {
            PackageField::Weight => "Weight (kg)",
            PackageField::Height => "Height (cm)",
            PackageField::Width => "Width (cm)",
            PackageField::Length => "Length (cm)",
            PackageField::Amount => "Declared amount (R$)",
            PackageField::Quantity => "Quantity",
            PackageField::Description => "* Description (min. 10 characters)",
            PackageField::ReverseLogistics => "Reverse logistics",
            PackageField::ReceiptNotice => "Receipt confirmation (AR)",
            PackageField::OwnHands => "Own hands delivery",
        }
    }

    /// True for the yes/no service flags, which toggle on space.
    pub fn is_toggle(self) -> bool {
        matches!(
            self,
            PackageField::ReverseLogistics | PackageField::ReceiptNotice | PackageField::OwnHands
        )
    }

    /// Key of this field in [`FieldErrors`]. Only the description is validated.
    pub fn error_key(self) -> Option<&'static str> {
        match self {
            PackageField::Description => Some(keys::DESCRIPTION),
            _ => None,
        }
    }
}

/// Draft of the package step.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageForm {
    pub package: PackageInfo,
    pub focus: usize,
    pub errors: FieldErrors,
    /// Ticket of the quote call in flight. Submitting is disabled while set.
    pub pending: Option<Ticket>,
    /// Message shown after a failed quote.
    pub failure: Option<String>,
}

impl PackageForm {
    /// Starts a draft from `package`, the committed one or the default.
    pub fn new(package: PackageInfo) -> Self {
        Self {
            package,
            focus: 0,
            errors: FieldErrors::new(),
            pending: None,
            failure: None,
        }
    }

    /// Field that receives typed characters.
    pub fn focused(&self) -> PackageField {
        PackageField::ALL[self.focus]
    }

    /// Moves focus down, wrapping to the first field.
    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % PackageField::ALL.len();
    }

    /// Moves focus up, wrapping to the last field.
    pub fn focus_previous(&mut self) {
        self.focus = (self.focus + PackageField::ALL.len() - 1) % PackageField::ALL.len();
    }

    /// True while a quote is in flight.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Text of a free-form field, `None` for flags.
    pub fn text(&self, field: PackageField) -> Option<&str> {
        let package = &self.package;
        match field {
            PackageField::Weight => Some(&package.weight),
            PackageField::Height => Some(&package.height),
            PackageField::Width => Some(&package.width),
            PackageField::Length => Some(&package.length),
            PackageField::Amount => Some(&package.declaration.amount),
            PackageField::Quantity => Some(&package.declaration.quantity),
            PackageField::Description => Some(&package.declaration.description),
            _ => None,
        }
    }

    /// State of a flag field, `None` for text fields.
    pub fn flag(&self, field: PackageField) -> Option<bool> {
        match field {
            PackageField::ReverseLogistics => Some(self.package.reverse_logistics),
            PackageField::ReceiptNotice => Some(self.package.receipt_notice),
            PackageField::OwnHands => Some(self.package.own_hands),
            _ => None,
        }
    }

    /// Validation message for `field` from the last submit, if any.
    pub fn error(&self, field: PackageField) -> Option<&str> {
        field.error_key().and_then(|key| self.errors.get(key))
    }

    fn text_mut(&mut self, field: PackageField) -> Option<&mut String> {
        let package = &mut self.package;
        match field {
            PackageField::Weight => Some(&mut package.weight),
            PackageField::Height => Some(&mut package.height),
            PackageField::Width => Some(&mut package.width),
            PackageField::Length => Some(&mut package.length),
            PackageField::Amount => Some(&mut package.declaration.amount),
            PackageField::Quantity => Some(&mut package.declaration.quantity),
            PackageField::Description => Some(&mut package.declaration.description),
            _ => None,
        }
    }

    /// Types into the focused text field, or toggles a focused flag on space.
    pub fn push_char(&mut self, c: char) {
        let field = self.focused();
        if field.is_toggle() {
            if c == ' ' {
                self.toggle(field);
            }
        } else if let Some(text) = self.text_mut(field) {
            text.push(c);
        }
    }

    /// Removes the last character of the focused text field. Flags are left alone.
    pub fn pop_char(&mut self) {
        let field = self.focused();
        if let Some(text) = self.text_mut(field) {
            text.pop();
        }
    }

    /// Flips a flag field. Text fields are ignored.
    pub fn toggle(&mut self, field: PackageField) {
        let package = &mut self.package;
        match field {
            PackageField::ReverseLogistics => package.reverse_logistics = !package.reverse_logistics,
            PackageField::ReceiptNotice => package.receipt_notice = !package.receipt_notice,
            PackageField::OwnHands => package.own_hands = !package.own_hands,
            _ => {}
        }
    }
}
