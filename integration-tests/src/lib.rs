//! Cross-crate integration tests for the Quiver workspace.
//!
//! The tests live under `tests/`; this library is intentionally empty.
