//! Conversion between caller-facing types and the provider wire format

pub mod google;
