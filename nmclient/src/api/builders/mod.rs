//! Builders for NetworkManager connection profiles.
//!
//! [`ProfileBuilder`] produces the nested settings dictionary expected by
//! `AddAndActivateConnection`. See the [`profile`] module for an example.

pub mod profile;

pub use profile::{Profile, ProfileBuilder};
