//! Integration-test host crate: all content lives in `tests/`.
