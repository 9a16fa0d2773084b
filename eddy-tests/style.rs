//! Style Enforcement Tests
//!
//! Checks patterns clippy does not catch on its own.
//!
//! - `panic_enforcement` - Production code must propagate errors instead of
//!   calling `unwrap()` or `expect()`

#[path = "style/panic_enforcement.rs"]
mod panic_enforcement;
