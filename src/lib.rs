//! Postaqui - Shipping Quote Wizard Library
//!
//! A terminal wizard that collects sender, receiver and package details,
//! quotes the freight and posts the shipment for a tracking code.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
