//! Constraint synthesis for tokenized visual formats
//!
//! This module takes the token sequence and resolves it against the caller's
//! metrics and views, producing ordered [`ConstraintRecord`]s.

pub mod config;
pub mod synthesizer;
pub mod types;

pub use config::{Adjacency, Axis, FormatDirection, LayoutOptions};
pub use synthesizer::{synthesize, synthesize_layout, Metrics, Views, SUPERVIEW_NAME};
pub use types::*;
