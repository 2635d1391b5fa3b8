//! Workspace-level integration test package for parbench.
//!
//! The tests live under `tests/`; this library is intentionally empty.
