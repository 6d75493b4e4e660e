//! Integration tests for the full FluentPath pipeline

// Integration tests are in separate files:
// - external_constants.rs
// - test_context.rs
// - test_engine.rs

mod external_constants;
mod test_context;
mod test_engine;
