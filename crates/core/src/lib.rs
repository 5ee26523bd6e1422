pub mod domain;

pub use domain::{DeleteMode, DomainError, Permissions};
