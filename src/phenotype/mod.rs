//! OSA phenotyping engine.

pub mod types;
pub mod normalize;
pub mod helpers;
pub mod detection;
pub mod confidence;
pub mod recommendations;
pub mod subtype;
pub mod messages;
pub mod guardrails;
pub mod referral;
pub mod summary;
pub mod engine;

pub use engine::DefaultPhenotypeEngine;
pub use normalize::{normalize, RawInput, RawValue};
pub use types::*;
