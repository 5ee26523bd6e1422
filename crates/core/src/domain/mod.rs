mod delete_mode;
mod error;
mod permissions;

pub use delete_mode::DeleteMode;
pub use error::DomainError;
pub use permissions::Permissions;
