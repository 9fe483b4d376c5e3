//! Library for reading and rewriting GMA model archives and their companion
//! TPL texture archives.
//!
//! Two operations are supported: extracting a subset of models (goal
//! markers, switches, or an exact name) into standalone, self-consistent
//! archive pairs, and merging two archive pairs into one with every stored
//! offset and texture reference rebased. Inputs are never modified; both
//! operations stream freshly built outputs.

/// Semantic classification of model names (goals, switches)
pub mod classify;
/// Error definitions
pub mod error;
/// Single-model extraction with texture deduplication and renumbering
pub mod extract;
/// Fixed layout constants for both container formats
pub mod format;
/// Parser for GMA model-archive files
pub mod gma;
/// Memory-mapped input loading and atomic output writing
pub mod io;
/// Pairwise archive merging with offset and texture-index rebasing
pub mod merge;
/// Shared winnow-based binary parsing utilities
pub mod parse;
/// Parser for TPL texture-archive files
pub mod tpl;

#[cfg(test)]
pub(crate) mod testutil;

/// A freshly built GMA/TPL pair, ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivePair {
    pub gma: Vec<u8>,
    pub tpl: Vec<u8>,
}
