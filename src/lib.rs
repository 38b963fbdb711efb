//! cvforge — length-budget enforcement and LaTeX section editing for
//! generated résumés.
//!
//! The core is a deterministic pipeline over persisted JSON content
//! blocks: estimate rendered length, trim against fixed caps, iteratively
//! remove the least job-relevant content until a page target is met, then
//! render LaTeX through marker-based template edits. LLM ranking and PDF
//! compilation sit at the edges as optional collaborators.

pub mod budget;
pub mod compiler;
pub mod config;
pub mod errors;
pub mod estimate;
pub mod latex;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod reducer;
pub mod store;
