//! Synheart Coach - On-device productivity coaching from desktop activity logs
//!
//! Coach turns a log of application usage into a short list of actionable
//! suggestions through a deterministic pipeline: log adaptation → keyword
//! categorisation → pattern analyses → random selection → report encoding.
//!
//! ## Modules
//!
//! - **Analyses**: distracting apps, context switching, work hours, breaks,
//!   productive apps
//! - **Features**: productivity feature vector, model-free score, summaries
//! - **Processor**: session log held in an owned, lock-guarded store

pub mod adapter;
pub mod analysis;
pub mod classifier;
pub mod config;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod features;
pub mod store;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use classifier::KeywordClassifier;
pub use config::AnalyzerConfig;
pub use encoder::{ReportEncoder, REPORT_VERSION};
pub use engine::{recommendations_to_json, report_to_json, CoachProcessor, RecommendationEngine};
pub use error::CoachError;
pub use features::{productivity_score, summarize, FeatureExtractor};
pub use store::ActivityStore;
pub use types::{ActivityRecord, Category, CoachReport, Recommendation, RecommendationDetail};

/// Coach version embedded in all reports
pub const COACH_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "synheart-coach";
