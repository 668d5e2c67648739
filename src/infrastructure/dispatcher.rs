//! Runs effects off the UI thread and hands completions back.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use tracing::{debug, warn};

use crate::application::{AddressLookup, Completion, Effect, ShippingGateway};
use crate::infrastructure::clipboard::ClipboardSink;

/// Executes [`Effect`]s for the UI loop.
///
/// Completions are collected on an unbounded channel and picked up with
/// [`Dispatcher::drain`] on the next tick.
pub struct Dispatcher {
    shipping: Arc<dyn ShippingGateway>,
    lookup: Arc<dyn AddressLookup>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    clipboard: ClipboardSink,
}

impl Dispatcher {
    /// Creates a dispatcher over the given services. The clipboard opens on first copy.
    pub fn new(shipping: Arc<dyn ShippingGateway>, lookup: Arc<dyn AddressLookup>) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            shipping,
            lookup,
            tx,
            rx,
            clipboard: ClipboardSink::default(),
        }
    }

    /// Remote calls get a worker thread each; clipboard copies run inline.
    pub fn dispatch(&mut self, effect: Effect) {
        debug!(effect = effect.describe(), "dispatching");

        if let Effect::CopyToClipboard { text } = effect {
            let outcome = self.clipboard.copy(&text);
            if let Err(e) = &outcome {
                warn!(error = %e, "clipboard copy failed");
            }
            let _ = self.tx.send(Completion::Copied { outcome });
            return;
        }

        let shipping = Arc::clone(&self.shipping);
        let lookup = Arc::clone(&self.lookup);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let what = effect.describe();
            if let Some(completion) = effect.execute(shipping.as_ref(), lookup.as_ref()) {
                if tx.send(completion).is_err() {
                    debug!(effect = what, "receiver gone, dropping completion");
                }
            }
        });
    }

    /// Completions that have arrived, without blocking.
    pub fn drain(&self) -> Vec<Completion> {
        self.rx.try_iter().collect()
    }

    /// Waits up to `timeout` for the next completion.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Completion> {
        match self.rx.recv_timeout(timeout) {
            Ok(completion) => Some(completion),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}
