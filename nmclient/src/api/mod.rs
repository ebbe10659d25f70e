//! Public API module.
//!
//! This module contains the user-facing API for the `nmclient` crate: the
//! client, the object handles, the models and the profile builder.

pub mod builders;
pub mod models;
pub mod network_manager;
pub mod objects;
