//! Core internal state.
//!
//! This module contains the client-side state that outlives a single call:
//! the notification subscription.

pub(crate) mod subscription;
