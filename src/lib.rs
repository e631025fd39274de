//! `resumatch-core`: a deterministic resume-to-job relevance evaluation
//! pipeline. Each module below corresponds to one stage of the pipeline
//! (document extraction through feedback synthesis); `pipeline::run_pipeline`
//! composes all of them into a single evaluation.

pub mod backends;
pub mod config;
pub mod document;
pub mod error;
pub mod feedback;
pub mod job;
pub mod matcher;
pub mod models;
pub mod pipeline;
pub mod resume;
pub mod scoring;
pub mod skills;
pub mod skills_data;
pub mod textsim;

pub use config::{Config, Thresholds, Weights};
pub use error::{PipelineError, PipelineResult};
pub use models::EvaluationResult;
pub use pipeline::run_pipeline;
