// vigil-core/src/domain/gate/mod.rs

pub mod evaluator;

pub use evaluator::GateEvaluator;
