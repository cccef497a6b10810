//! # docsum
//!
//! Upload a plain-text or PDF document, get back a condensed summary that is
//! stored as a downloadable text artifact.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌────────────┐   ┌────────────┐   ┌──────────────┐
//! │  Upload  │──▶│  Extract   │──▶│ Summarize  │──▶│ ArtifactStore │
//! │ .txt/.pdf│   │ UTF-8/PDF  │   │ truncate / │   │  output/*.txt │
//! └──────────┘   └────────────┘   │   openai   │   └──────┬───────┘
//!                                 └────────────┘          │
//!                      ┌──────────────────────────────────┤
//!                      ▼                                  ▼
//!                 ┌──────────┐                      ┌──────────┐
//!                 │   CLI    │                      │   HTTP   │
//!                 │ (docsum) │                      │  (axum)  │
//!                 └──────────┘                      └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! docsum serve                          # http://0.0.0.0:8000
//! docsum summarize ./report.pdf         # run the pipeline on a local file
//! docsum list                           # stored summaries, oldest first
//! docsum get riassunto_20250101_120000.txt
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`extract`] | Plain-text and PDF text extraction |
//! | [`summarizer`] | Summarizer backends and provider selection |
//! | [`fs_store`] | Filesystem artifact store |
//! | [`pipeline`] | Upload → summary orchestration and error taxonomy |
//! | [`server`] | HTTP server |
//! | [`commands`] | CLI command implementations |

pub mod commands;
pub mod config;
pub mod extract;
pub mod fs_store;
pub mod pipeline;
pub mod server;
pub mod summarizer;

pub use docsum_core as core;
