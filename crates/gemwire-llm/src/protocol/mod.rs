//! Wire format types for the provider API
//!
//! Pure serde structs matching the provider's JSON. They are only used at the
//! serialization boundary; callers work with [`crate::types`].

pub mod google;
