pub mod casting;
pub mod evaluator;
pub mod runtime;
