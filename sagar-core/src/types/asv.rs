//! Amplicon sequence variant records.

use serde::{Deserialize, Serialize};

use super::{AsvId, ValidationError};

/// One amplicon sequence variant produced for an upload.
///
/// Immutable after construction; `length` always equals the sequence length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asv {
    pub id: AsvId,
    pub sequence: String,
    pub reads: u32,
    pub length: u32,
}

impl Asv {
    /// Bases allowed in a sequence.
    pub const ALPHABET: [char; 4] = ['A', 'T', 'G', 'C'];

    /// Validate and build an ASV record.
    pub fn new(id: AsvId, sequence: String, reads: u32) -> Result<Self, ValidationError> {
        if sequence.is_empty() {
            return Err(ValidationError::EmptySequence);
        }
        if let Some(bad) = sequence.chars().find(|c| !Self::ALPHABET.contains(c)) {
            return Err(ValidationError::InvalidBase(bad));
        }
        if reads == 0 {
            return Err(ValidationError::ZeroReads);
        }
        let length = sequence.len() as u32;
        Ok(Self {
            id,
            sequence,
            reads,
            length,
        })
    }
}
