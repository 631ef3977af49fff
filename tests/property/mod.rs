//! Property-based tests for identity and collection guarantees

mod identity;
mod round_trip;
