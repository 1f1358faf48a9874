// vigil/src/commands/mod.rs

pub mod check;
pub mod inspect;
pub mod list;
pub mod project;
pub mod validate;
