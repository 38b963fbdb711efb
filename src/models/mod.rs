//! Structured content blocks and the JD keyword block.
//!
//! Every persisted artifact carries a `status` discriminator; downstream
//! consumers must ignore the content of a block whose status is not
//! `success`. The typed accessors on [`ContentSet`] enforce that rule in
//! one place so the estimator, reducer, and renderer never re-check it.

pub mod blocks;
pub mod jd;

pub use blocks::{
    BlockStatus, ContentSet, EducationBlock, EducationEntry, ExperienceBlock, ExperienceEntry,
    ProjectEntry, ProjectsBlock, SkillsBlock, SummaryBlock,
};
pub use jd::JdBlock;
