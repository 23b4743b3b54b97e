//! Deployable Application - Interpolation core and use cases
//!
//! This crate resolves `${name}` placeholders in build descriptors against a
//! prioritized chain of property sources. It performs no I/O itself; reading
//! and writing descriptors and reporting diagnostics go through the traits in
//! [`ports`].

pub mod error;
pub mod interpolation;
pub mod ports;
pub mod use_cases;

pub use error::{ApplicationError, ApplicationResult};
pub use interpolation::{InterpolationFailure, Interpolator, PropertySourceChain, resolve};
