//! Request signing for the platform's WBI-protected endpoints.
//!
//! Protected calls carry two extra query fields: `wts` (Unix seconds) and
//! `w_rid`, the MD5 of the canonical query string followed by a mixing key.
//! The mixing key is a fixed permutation of two rotating key fragments
//! published by the nav endpoint.

pub mod keys;
pub mod mixin;
pub mod params;

pub use keys::{KeyMaterial, fetch_key_material};
pub use mixin::MixingKey;
pub use params::{ParamValue, SignedParams, sign, sign_now};
