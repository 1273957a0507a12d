//! gridcalc-engine - formula tokenizer, parser and evaluator.

pub mod engine;
