// triage-core/src/infrastructure/config/mod.rs

pub mod feedback;

pub use feedback::{FeedbackConfig, load_feedback_config};
