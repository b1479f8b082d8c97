//! Taxonomic assignments.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{AsvId, ValidationError, check_range};

/// Species string used for unresolved ASVs.
pub const UNKNOWN_SPECIES: &str = "Unknown sp.";

/// Species assigned to an ASV.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SpeciesLabel {
    Known(String),
    Unknown,
}

impl SpeciesLabel {
    pub fn known(name: impl Into<String>) -> Self {
        Self::Known(name.into())
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// The species name, or `None` for an unresolved ASV.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Known(name) => Some(name),
            Self::Unknown => None,
        }
    }

    pub fn as_str(&self) -> &str {
        self.name().unwrap_or(UNKNOWN_SPECIES)
    }
}

impl fmt::Display for SpeciesLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for SpeciesLabel {
    fn from(value: String) -> Self {
        if value == UNKNOWN_SPECIES {
            Self::Unknown
        } else {
            Self::Known(value)
        }
    }
}

impl From<SpeciesLabel> for String {
    fn from(label: SpeciesLabel) -> Self {
        match label {
            SpeciesLabel::Known(name) => name,
            SpeciesLabel::Unknown => UNKNOWN_SPECIES.to_string(),
        }
    }
}

/// Classification of a single ASV against the reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonAssignment {
    pub asv_id: AsvId,
    pub species: SpeciesLabel,
    pub class: String,
    /// In `[0, 1]`.
    pub confidence: f64,
    pub is_novel: bool,
    /// In `[0, 100]`.
    pub pct_identity: f64,
}

impl TaxonAssignment {
    /// Validate and build an assignment.
    ///
    /// A novel assignment must use [`SpeciesLabel::Unknown`].
    pub fn new(
        asv_id: AsvId,
        species: SpeciesLabel,
        class: impl Into<String>,
        confidence: f64,
        is_novel: bool,
        pct_identity: f64,
    ) -> Result<Self, ValidationError> {
        check_range("confidence", confidence, 0.0, 1.0)?;
        check_range("pct_identity", pct_identity, 0.0, 100.0)?;
        if is_novel && !species.is_unknown() {
            return Err(ValidationError::NovelWithKnownSpecies(asv_id));
        }
        Ok(Self {
            asv_id,
            species,
            class: class.into(),
            confidence,
            is_novel,
            pct_identity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_label_round_trips_through_its_sentinel_string() {
        let json = serde_json::to_string(&SpeciesLabel::Unknown).unwrap();
        assert_eq!(json, "\"Unknown sp.\"");
        let parsed: SpeciesLabel = serde_json::from_str(&json).unwrap();
        assert!(parsed.is_unknown());
    }

    #[test]
    fn known_label_serializes_as_plain_name() {
        let json = serde_json::to_string(&SpeciesLabel::known("Octopus vulgaris")).unwrap();
        assert_eq!(json, "\"Octopus vulgaris\"");
    }

    #[test]
    fn rejects_confidence_above_one() {
        let err = TaxonAssignment::new(
            AsvId::from_index(1),
            SpeciesLabel::known("Octopus vulgaris"),
            "Cephalopoda",
            1.2,
            false,
            97.0,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutOfRange {
                field: "confidence",
                ..
            }
        ));
    }

    #[test]
    fn rejects_identity_outside_percent_range() {
        let err = TaxonAssignment::new(
            AsvId::from_index(1),
            SpeciesLabel::Unknown,
            "Cnidaria",
            0.5,
            true,
            101.0,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutOfRange {
                field: "pct_identity",
                ..
            }
        ));
    }

    #[test]
    fn novel_assignment_requires_unknown_species() {
        let err = TaxonAssignment::new(
            AsvId::from_index(9),
            SpeciesLabel::known("Aurelia aurita"),
            "Cnidaria",
            0.5,
            true,
            60.0,
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::NovelWithKnownSpecies(AsvId::from_index(9)));
    }
}
