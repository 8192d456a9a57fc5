//! Shared configuration, error classification, and request pipeline for the
//! dialog service
//!
//! This crate provides functionality used by both API surfaces:
//! - Configuration management following 12-factor principles
//! - The classified error contract and log severities
//! - Repository error types
//! - The ordered middleware pipeline and its surface-independent stages

pub mod config;
pub mod db;
pub mod error;
pub mod pipeline;

pub use db::RepositoryError;
pub use error::{Cause, ClassifiedError, PipelineError, Severity};
pub use pipeline::{
    handler_fn, Endpoint, ErrorLog, ErrorResponse, GuardedPipeline, Handler, Outcome, Pipeline,
    RequestResponseLog, Stage, MAX_BODY_BYTES,
};
