//! LaTeX document handling.
//!
//! Documents are plain UTF-8 text with two editing contracts: named marker
//! blocks (`% BEGIN:<NAME>` .. `% END:<NAME>`) and `\section*{<Name>}`
//! headings. Every module here must preserve both contracts and never strip
//! the leading backslash of a control word.

pub mod builder;
pub mod compact;
pub mod editor;
pub mod escape;
pub mod integrity;
pub mod sections;

pub use builder::{render_document, section_is_empty, DEFAULT_TEMPLATE};
pub use compact::inject_compact_layout;
pub use editor::{apply_edits, EditReport, EditRequest};
pub use escape::escape_latex;
pub use integrity::scan_control_words;
pub use sections::{apply_section_removals, RemovalSet, SectionName};
