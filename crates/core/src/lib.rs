//! Shared building blocks for the ad-spend analytics engine: input record
//! shapes, platform normalization policy, configuration, and errors.

pub mod config;
pub mod error;
pub mod platform;
pub mod types;

pub use config::AppConfig;
pub use error::{AdlensError, AdlensResult};
pub use platform::{PlatformRule, PlatformRules};
pub use types::{FieldValue, RawRecord};
