//! Test module for wiremodel-core
//!
//! Property-based tests (proptest) and unit tests for the transformers,
//! registries and the conversion engine.


#[cfg(test)]
pub mod error_tests;



#[cfg(test)]
pub mod signature_tests;

#[cfg(test)]
pub mod engine_tests;
