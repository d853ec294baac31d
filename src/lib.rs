//! # labscan
//!
//! A submission ingestion and duplication analysis engine for lab-style
//! code submissions.
//!
//! labscan ingests a named set of text files from a submitter, persists it,
//! and computes exact-line overlap against every previously stored file
//! belonging to other submitters, reporting per-file-pair duplicate line
//! sets and a duplication percentage.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │    Ingest    │──▶│    SQLite    │──▶│   Matcher    │──▶│    Result    │
//! │  b64→files   │   │ atomic store │   │  line sets   │   │   matches    │
//! └──────────────┘   └──────┬───────┘   └──────────────┘   └──────────────┘
//!                           │
//!              ┌────────────┤
//!              ▼            ▼
//!         ┌─────────┐  ┌─────────┐
//!         │   CLI   │  │  HTTP   │
//!         │(labscan)│  │ (axum)  │
//!         └─────────┘  └─────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! labscan init                                  # create database
//! labscan owner add alice --name "Alice"        # register a submitter
//! labscan submit --owner alice --name "Lab 1" src/main.rs
//! labscan list                                  # list submissions
//! labscan serve                                 # start HTTP API
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`error`] | Pipeline error taxonomy |
//! | [`lines`] | Distinct-line-set extraction |
//! | [`store`] | Storage abstraction (SQLite + in-memory) |
//! | [`ingest`] | Payload decoding and atomic persistence |
//! | [`matcher`] | Pairwise line-intersection matching |
//! | [`analyze`] | Pipeline orchestration |
//! | [`server`] | HTTP API |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |

pub mod analyze;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod lines;
pub mod matcher;
pub mod migrate;
pub mod models;
pub mod server;
pub mod store;

pub use error::{Error, Result};
pub use models::{AnalysisResult, FileMatch, Owner, Submission, SubmissionSummary, SubmittedFile};
