pub mod errors;
pub mod masks;
pub mod models;
pub mod validation;

pub use errors::*;
pub use masks::*;
pub use models::*;
pub use validation::{FieldErrors, PersonMessages, validate_package, validate_person};
