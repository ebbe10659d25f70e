//! Type definitions and constants.
//!
//! This module contains NetworkManager constants shared by the transport,
//! the handles and the models.

pub(crate) mod constants;
