//! # docsum core
//!
//! Shared, I/O-free logic for docsum: the document data model, the
//! [`Summarizer`](summarize::Summarizer) capability and its truncation
//! strategy, artifact naming rules, and the
//! [`ArtifactStore`](store::ArtifactStore) abstraction.
//!
//! This crate contains no tokio, HTTP, PDF parsing, or filesystem access.
//! Those live in the `docsum` app crate.

pub mod models;
pub mod naming;
pub mod store;
pub mod summarize;
