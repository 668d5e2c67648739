//! Application state and the wizard's step machine.
//!
//! Every step is a variant of [`Step`] carrying what that screen needs, so a
//! quote screen without a freight result cannot exist. [`App`] owns the
//! [`FormStore`] and is the only writer to it.

use tracing::{debug, info, warn};

use crate::application::forms::{PackageForm, PersonForm, PersonRole};
use crate::application::gateway::{Completion, Effect, PostingRequest, Ticket};
use crate::application::store::FormStore;
use crate::domain::{
    AddressHint, FreightResult, GatewayError, PackageInfo, PersonMessages, ShipmentOffer,
    digits, validate_package, validate_person,
};

/// Status shown when a quote fails, including an empty offer list.
pub const QUOTE_RETRY_MESSAGE: &str = "Could not calculate the freight. Please try again.";
/// Status shown when posting fails.
pub const POSTING_RETRY_MESSAGE: &str = "Could not generate the tracking code. Please try again.";

/// The quote screen. Always has a freight result to show.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteView {
    pub freight: FreightResult,
    /// Ticket of the posting call in flight.
    pub pending: Option<Ticket>,
    pub failure: Option<String>,
}

impl QuoteView {
    /// Shows `freight` with no posting in flight.
    pub fn new(freight: FreightResult) -> Self {
        Self {
            freight,
            pending: None,
            failure: None,
        }
    }

    /// True while the posting call is in flight.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }
}

/// The summary screen. Only reachable with a posted shipment.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub freight: FreightResult,
    pub tracking_code: String,
}

/// Current screen of the wizard.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Home,
    Sender(PersonForm),
    Receiver(PersonForm),
    Package(PackageForm),
    QuoteResult(QuoteView),
    Summary(Receipt),
}

impl Step {
    /// Position in the wizard, 0 for Home through 5 for Summary.
    pub fn index(&self) -> usize {
        match self {
            Step::Home => 0,
            Step::Sender(_) => 1,
            Step::Receiver(_) => 2,
            Step::Package(_) => 3,
            Step::QuoteResult(_) => 4,
            Step::Summary(_) => 5,
        }
    }

    /// Heading shown in the header and the body border.
    pub fn title(&self) -> &'static str {
        match self {
            Step::Home => "Welcome",
            Step::Sender(_) => "Sender information",
            Step::Receiver(_) => "Receiver information",
            Step::Package(_) => "Package information",
            Step::QuoteResult(_) => "Freight quote",
            Step::Summary(_) => "Order summary",
        }
    }
}

/// Main application state.
///
/// # Examples
///
/// ```
/// use postaqui::application::{App, Step};
///
/// let mut app = App::default();
/// assert!(matches!(app.step, Step::Home));
/// app.start();
/// assert_eq!(app.step.index(), 1);
/// ```
#[derive(Debug)]
pub struct App {
    pub store: FormStore,
    pub step: Step,
    /// Temporary status message to display
    pub status_message: Option<String>,
    pub should_quit: bool,
    messages: PersonMessages,
    next_ticket: u64,
}

impl Default for App {
    fn default() -> Self {
        Self {
            store: FormStore::default(),
            step: Step::Home,
            status_message: None,
            should_quit: false,
            messages: PersonMessages::default(),
            next_ticket: 0,
        }
    }
}

impl App {
    /// Creates an app on the Home step with an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn issue_ticket(&mut self) -> Ticket {
        self.next_ticket += 1;
        Ticket(self.next_ticket)
    }

    fn enter_sender(&mut self) {
        self.step = Step::Sender(PersonForm::new(PersonRole::Sender, self.store.sender().clone()));
    }

    fn enter_receiver(&mut self) {
        self.step = Step::Receiver(PersonForm::new(
            PersonRole::Receiver,
            self.store.receiver().clone(),
        ));
    }

    fn enter_package(&mut self) {
        let package = self.store.package().cloned().unwrap_or_default();
        self.step = Step::Package(PackageForm::new(package));
    }

    /// Home → Sender.
    pub fn start(&mut self) {
        if matches!(self.step, Step::Home) {
            self.enter_sender();
        }
    }

    /// Summary → Home, discarding everything collected.
    pub fn restart(&mut self) {
        info!("starting a new shipment");
        self.store.reset();
        self.status_message = None;
        self.step = Step::Home;
    }

    /// The "next" action of the current step.
    ///
    /// Returns the remote call to run when the step needs one to advance.
    pub fn submit(&mut self) -> Option<Effect> {
        self.status_message = None;
        match &mut self.step {
            Step::Home => {
                self.enter_sender();
                None
            }
            Step::Sender(form) | Step::Receiver(form) => {
                let role = form.role;
                if let Err(errors) = validate_person(&form.person, &self.messages) {
                    let fields: Vec<&str> = errors.iter().map(|(key, _)| key).collect();
                    debug!(role = role.title(), ?fields, "person validation failed");
                    form.errors = errors;
                    return None;
                }
                form.errors.clear();
                let person = form.person.clone();
                match role {
                    PersonRole::Sender => {
                        self.store.commit_sender(person);
                        self.enter_receiver();
                    }
                    PersonRole::Receiver => {
                        self.store.commit_receiver(person);
                        self.enter_package();
                    }
                }
                None
            }
            Step::Package(form) => {
                if form.is_busy() {
                    return None;
                }
                form.failure = None;
                if let Err(errors) = validate_package(&form.package) {
                    form.errors = errors;
                    return None;
                }
                form.errors.clear();
                let package = form.package.clone();
                self.request_quote(package)
            }
            Step::QuoteResult(view) => {
                if view.is_busy() {
                    return None;
                }
                view.failure = None;
                self.request_posting()
            }
            Step::Summary(_) => {
                self.restart();
                None
            }
        }
    }

    fn request_quote(&mut self, package: PackageInfo) -> Option<Effect> {
        self.store.commit_package(package);
        let request = match self.store.quote_request() {
            Ok(request) => request,
            Err(err) => {
                warn!(error = %err, "cannot request a quote");
                if let Step::Package(form) = &mut self.step {
                    form.failure = Some(err.to_string());
                }
                return None;
            }
        };
        let ticket = self.issue_ticket();
        if let Step::Package(form) = &mut self.step {
            form.pending = Some(ticket);
        }
        info!(%ticket, "requesting freight quote");
        Some(Effect::Quote { ticket, request })
    }

    /// Posts the quote on screen.
    ///
    /// A quote completion that landed after the user left the package step
    /// may have replaced the store's freight, so the shown one is committed
    /// again before the request is built.
    fn request_posting(&mut self) -> Option<Effect> {
        let ticket = self.issue_ticket();
        let Step::QuoteResult(view) = &mut self.step else {
            return None;
        };
        let freight = view.freight.clone();
        view.pending = Some(ticket);
        let request = PostingRequest::for_freight(&freight);
        self.store.select_freight(freight);
        info!(%ticket, carrier = %request.carrier, "posting shipment");
        Some(Effect::Post { ticket, request })
    }

    /// Returns to the previous step. Committed data is kept.
    pub fn back(&mut self) {
        self.status_message = None;
        match self.step {
            Step::Home | Step::Summary(_) => {}
            Step::Sender(_) => self.step = Step::Home,
            Step::Receiver(_) => self.enter_sender(),
            Step::Package(_) => self.enter_receiver(),
            Step::QuoteResult(_) => self.enter_package(),
        }
    }

    /// Moves focus to the next field of the current form, if any.
    pub fn focus_next(&mut self) {
        match &mut self.step {
            Step::Sender(form) | Step::Receiver(form) => form.focus_next(),
            Step::Package(form) => form.focus_next(),
            _ => {}
        }
    }

    /// Moves focus to the previous field of the current form, if any.
    pub fn focus_previous(&mut self) {
        match &mut self.step {
            Step::Sender(form) | Step::Receiver(form) => form.focus_previous(),
            Step::Package(form) => form.focus_previous(),
            _ => {}
        }
    }

    /// Types a character into the focused field.
    pub fn type_char(&mut self, c: char) -> Option<Effect> {
        match &mut self.step {
            Step::Sender(form) | Step::Receiver(form) => {
                if form.push_char(c) {
                    return self.request_lookup();
                }
            }
            Step::Package(form) => form.push_char(c),
            _ => {}
        }
        None
    }

    /// Deletes the last character of the focused field.
    ///
    /// Like [`App::type_char`], editing the postal code back into a complete
    /// value issues a new address lookup.
    pub fn delete_char(&mut self) -> Option<Effect> {
        match &mut self.step {
            Step::Sender(form) | Step::Receiver(form) => {
                if form.pop_char() {
                    return self.request_lookup();
                }
            }
            Step::Package(form) => form.pop_char(),
            _ => {}
        }
        None
    }

    /// Fills the current form with sample data.
    pub fn fill_example(&mut self) -> Option<Effect> {
        match &mut self.step {
            Step::Sender(form) | Step::Receiver(form) => {
                let example = form.role.example();
                if form.replace(example) {
                    return self.request_lookup();
                }
            }
            Step::Package(form) => form.package = PackageInfo::example(),
            _ => {}
        }
        None
    }

    fn request_lookup(&mut self) -> Option<Effect> {
        let ticket = self.issue_ticket();
        let (Step::Sender(form) | Step::Receiver(form)) = &mut self.step else {
            return None;
        };
        form.lookup = Some(ticket);
        let postal_code = digits(&form.person.address.postal_code);
        debug!(%ticket, postal_code = %postal_code, "looking up address");
        Some(Effect::LookupAddress { ticket, postal_code })
    }

    /// Copies the tracking code shown on the summary screen.
    pub fn copy_tracking_code(&mut self) -> Option<Effect> {
        match &self.step {
            Step::Summary(receipt) => Some(Effect::CopyToClipboard {
                text: receipt.tracking_code.clone(),
            }),
            _ => None,
        }
    }

    /// Applies the outcome of an earlier [`Effect`].
    pub fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::AddressLookedUp { ticket, outcome } => self.apply_lookup(ticket, outcome),
            Completion::Quoted { ticket, outcome } => self.apply_quote(ticket, outcome),
            Completion::Posted { ticket, outcome } => self.apply_posting(ticket, outcome),
            Completion::Copied { outcome } => {
                self.status_message = Some(match outcome {
                    Ok(()) => "Tracking code copied to clipboard".to_string(),
                    Err(err) => format!("Copy failed: {err}"),
                });
            }
        }
    }

    fn apply_lookup(&mut self, ticket: Ticket, outcome: Result<Option<AddressHint>, GatewayError>) {
        let form = match &mut self.step {
            Step::Sender(form) | Step::Receiver(form) if form.lookup == Some(ticket) => form,
            _ => {
                debug!(%ticket, "discarding superseded address lookup");
                return;
            }
        };
        form.lookup = None;
        match outcome {
            Ok(Some(hint)) => {
                debug!(%ticket, city = %hint.city, "address auto-filled");
                form.person.address.apply_lookup(&hint);
            }
            Ok(None) => debug!(%ticket, "postal code not found"),
            Err(err) => debug!(%ticket, error = %err, "address lookup failed"),
        }
    }

    fn apply_quote(&mut self, ticket: Ticket, outcome: Result<Vec<ShipmentOffer>, GatewayError>) {
        let result = self.store.apply_quote(outcome);
        let form = match &mut self.step {
            Step::Package(form) if form.pending == Some(ticket) => form,
            _ => {
                info!(%ticket, "quote completed after leaving the package step");
                return;
            }
        };
        form.pending = None;
        match result {
            Ok(freight) => self.step = Step::QuoteResult(QuoteView::new(freight)),
            Err(_) => form.failure = Some(QUOTE_RETRY_MESSAGE.to_string()),
        }
    }

    fn apply_posting(&mut self, ticket: Ticket, outcome: Result<String, GatewayError>) {
        let result = self.store.apply_posting(outcome);
        let view = match &mut self.step {
            Step::QuoteResult(view) if view.pending == Some(ticket) => view,
            _ => {
                info!(%ticket, "posting completed after leaving the quote step");
                return;
            }
        };
        view.pending = None;
        match result {
            Ok(tracking_code) => {
                let freight = view.freight.clone();
                self.step = Step::Summary(Receipt {
                    freight,
                    tracking_code,
                });
            }
            Err(_) => view.failure = Some(POSTING_RETRY_MESSAGE.to_string()),
        }
    }
}
