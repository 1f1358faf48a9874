pub mod advisory;
pub mod condition;
pub mod error;
pub mod gate;
pub mod metadata;
pub mod ports;
pub mod project;
pub mod verdict;

// Handy re-exports to keep imports short elsewhere
pub use error::DomainError;
