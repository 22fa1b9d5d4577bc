#![doc = "r2-cache-upload-core: core logic library for r2-cache-upload."]

//! This crate contains the data model and the upload pipeline for pushing the
//! CDN cache-control test files to one bucket per region.
//! Terminal interaction and the concrete storage client live in the CLI crate.
//!
//! # Usage
//! Build an [`config::UploadConfig`], hand [`pipeline::execute`] a factory for
//! an [`contract::ObjectStore`], and render the returned report with
//! [`report::render_summary`].

pub mod config;
pub mod contract;
pub mod error;
pub mod files;
pub mod pipeline;
pub mod report;
pub mod upload;
