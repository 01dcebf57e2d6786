#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for repo-trends
//!
//! This library holds all functionality for the `repo-trends` tool, which fetches
//! pseudo-trending GitHub repositories (the most-starred repositories matching a
//! language and recency filter) and reports them to the console, to a Markdown file,
//! and to a chat webhook.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`search`]: Query building and the retrying search client
//! - [`digest`]: Model-generated repository digests
//! - [`reports`]: Console, Markdown, and chat rendering
//! - [`webhook`]: Chat webhook delivery

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod commands;
pub mod digest;
pub mod reports;
pub mod search;
pub mod webhook;

pub use crate::commands::{Host, run};
