//! Paragraph-aware diffing of a document against its reformatted version.
//!
//! Both documents are normalized so that markup and layout differences do not
//! show up as changes, the result is aligned with Myers' algorithm, and every
//! change can be accepted individually. Accepted changes are stored as
//! anchor-based instructions and replayed onto the target file.

pub mod config;
pub mod constant;
pub mod diff;
pub mod error;
pub mod file;
pub mod history;
pub mod normalize;
pub mod replace;
pub mod session;

pub use diff::{
    Comparison, DiffEntry, DiffResult, DiffSummary, DiffType, compare_files, compare_texts,
    diff_texts,
};
pub use error::{ReconcileError, Result};
pub use normalize::{NormalizeOptions, ParagraphBlock, extract_paragraph_mappings, normalize_line};
pub use replace::{
    ReplacementInstruction, ReplacementMap, apply_replacements, apply_replacements_to_file,
};
pub use session::{DecisionState, Session};
