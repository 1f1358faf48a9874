// src/domain/ports/mod.rs

pub mod conditions;

pub use conditions::ConditionSource;
