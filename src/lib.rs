//! RuleEval - Runtime support for a typed rule-expression evaluator
//!
//! This crate provides the read-only builtin symbol table used during rule
//! evaluation: uniform lookup over literal values, generated values and
//! nested namespaces, with an independent declared-type channel that never
//! fails and never triggers value computation.

pub mod builtins;
pub mod core;
pub mod utils;
