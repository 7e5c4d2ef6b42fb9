//! End-to-end authorization scenarios against the in-memory backend.
