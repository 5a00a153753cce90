//! Replacement instructions and the patcher that replays them.
//!
//! An accepted diff entry becomes a [`ReplacementInstruction`]: the literal
//! snippet to add or remove plus an anchor line taken from the nearest
//! unchanged entry. Instructions are stored serialized in a
//! [`ReplacementMap`] until they are applied.

mod instruction;
mod map;
mod patcher;

pub use instruction::{
    AnchorPosition, InstructionKind, ReplacementInstruction, build_instruction, entry_key,
    find_matching_line,
};
pub use map::ReplacementMap;
pub use patcher::{apply, apply_instruction, apply_replacements, apply_replacements_to_file};
