//! Pipeline configuration.
//!
//! Every section is `#[serde(default)]`, so a partial TOML file only needs the
//! values it changes. The reference table and watch-lists are data, not code:
//! they live in [`ReferenceCatalog`] and can be replaced from config.

use rand::Rng;
use rand::distributions::uniform::SampleUniform;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from [`PipelineConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field}: range start must be below end")]
    EmptyRange { field: &'static str },

    #[error("{field}: {value} is not a probability")]
    Probability { field: &'static str, value: f64 },

    #[error("{field}: {value} is outside [{min}, {max}]")]
    OutOfBounds {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("reference table is empty")]
    EmptyReference,

    #[error("reference confidence for {0} is outside [0, 1]")]
    ReferenceConfidence(String),

    #[error("generator must produce at least one ASV")]
    ZeroAsvCount,

    #[error("generated read counts must be positive")]
    ZeroReads,

    #[error("sequence length must be positive")]
    ZeroSequenceLength,
}

/// Half-open range `[start, end)` sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange<T> {
    pub start: T,
    pub end: T,
}

impl<T> ValueRange<T>
where
    T: SampleUniform + PartialOrd + Copy,
{
    pub const fn new(start: T, end: T) -> Self {
        Self { start, end }
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> T {
        rng.gen_range(self.start..self.end)
    }

    pub fn contains(&self, value: T) -> bool {
        self.start <= value && value < self.end
    }

    fn check(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.start < self.end {
            Ok(())
        } else {
            Err(ConfigError::EmptyRange { field })
        }
    }
}

impl ValueRange<f64> {
    fn check_within(
        &self,
        field: &'static str,
        min: f64,
        max: f64,
    ) -> Result<(), ConfigError> {
        self.check(field)?;
        for value in [self.start, self.end] {
            if !value.is_finite() || value < min || value > max {
                return Err(ConfigError::OutOfBounds {
                    field,
                    value,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }
}

/// Complete configuration for a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Base seed; when set every upload gets a reproducible random stream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub generator: GeneratorConfig,
    pub classifier: ClassifierConfig,
    pub analyzer: AnalyzerConfig,
    pub alerts: AlertConfig,
    pub reference: ReferenceCatalog,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            generator: GeneratorConfig::default(),
            classifier: ClassifierConfig::default(),
            analyzer: AnalyzerConfig::default(),
            alerts: AlertConfig::default(),
            reference: ReferenceCatalog::default(),
        }
    }
}

impl PipelineConfig {
    /// Reject settings that would make a stage panic or emit invalid records.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let generator = &self.generator;
        generator.asv_count.check("generator.asv_count")?;
        if generator.asv_count.start == 0 {
            return Err(ConfigError::ZeroAsvCount);
        }
        generator.reads.check("generator.reads")?;
        if generator.reads.start == 0 {
            return Err(ConfigError::ZeroReads);
        }
        if generator.sequence_length == 0 {
            return Err(ConfigError::ZeroSequenceLength);
        }

        let classifier = &self.classifier;
        check_probability(
            "classifier.novelty_probability",
            classifier.novelty_probability,
        )?;
        classifier
            .novel_confidence
            .check_within("classifier.novel_confidence", 0.0, 1.0)?;
        classifier
            .novel_identity
            .check_within("classifier.novel_identity", 0.0, 100.0)?;
        classifier
            .known_identity
            .check_within("classifier.known_identity", 0.0, 100.0)?;

        let analyzer = &self.analyzer;
        analyzer
            .cluster_cohesion
            .check_within("analyzer.cluster_cohesion", 0.0, 1.0)?;
        analyzer
            .reproducibility
            .check_within("analyzer.reproducibility", 0.0, 1.0)?;

        check_probability(
            "alerts.novelty_alert_threshold",
            self.alerts.novelty_alert_threshold,
        )?;
        check_probability(
            "alerts.novelty_critical_threshold",
            self.alerts.novelty_critical_threshold,
        )?;

        self.reference.validate()
    }
}

fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Probability { field, value })
    }
}

/// Synthetic ASV generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of ASVs per upload.
    pub asv_count: ValueRange<u32>,
    /// Read count per ASV.
    pub reads: ValueRange<u32>,
    /// Length of every generated sequence.
    pub sequence_length: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            asv_count: ValueRange::new(20, 70),
            reads: ValueRange::new(100, 10_100),
            sequence_length: 250,
        }
    }
}

/// Mock taxonomy classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Chance that an ASV is flagged novel instead of matched.
    pub novelty_probability: f64,
    /// Confidence drawn for novel ASVs.
    pub novel_confidence: ValueRange<f64>,
    /// Percent identity drawn for novel ASVs.
    pub novel_identity: ValueRange<f64>,
    /// Percent identity drawn for matched ASVs.
    pub known_identity: ValueRange<f64>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            novelty_probability: 0.15,
            novel_confidence: ValueRange::new(0.3, 0.8),
            novel_identity: ValueRange::new(50.0, 80.0),
            known_identity: ValueRange::new(95.0, 100.0),
        }
    }
}

/// How unresolved ASVs are bucketed when counting species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownSpeciesPolicy {
    /// All unknown ASVs share one "Unknown sp." bucket.
    #[default]
    Pooled,
    /// Every unknown ASV is its own singleton species.
    Singleton,
}

/// Diversity and novelty analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Assignments below this percent identity get a novelty score.
    pub low_identity_threshold: f64,
    pub cluster_cohesion: ValueRange<f64>,
    pub reproducibility: ValueRange<f64>,
    pub unknown_species: UnknownSpeciesPolicy,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            low_identity_threshold: 85.0,
            cluster_cohesion: ValueRange::new(0.5, 1.0),
            reproducibility: ValueRange::new(0.6, 1.0),
            unknown_species: UnknownSpeciesPolicy::Pooled,
        }
    }
}

/// Novelty alert thresholds. Both comparisons are strict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Scores above this raise a `novel_species` alert.
    pub novelty_alert_threshold: f64,
    /// Scores above this make the alert `critical` instead of `medium`.
    pub novelty_critical_threshold: f64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            novelty_alert_threshold: 0.3,
            novelty_critical_threshold: 0.5,
        }
    }
}

/// A reference taxon the classifier can match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTaxon {
    pub species: String,
    pub class: String,
    /// Baseline confidence for a match, in `[0, 1]`.
    pub confidence: f64,
}

impl ReferenceTaxon {
    pub fn new(species: impl Into<String>, class: impl Into<String>, confidence: f64) -> Self {
        Self {
            species: species.into(),
            class: class.into(),
            confidence,
        }
    }
}

/// Reference taxonomy table plus conservation watch-lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceCatalog {
    pub taxa: Vec<ReferenceTaxon>,
    pub endangered: Vec<String>,
    pub invasive: Vec<String>,
}

impl Default for ReferenceCatalog {
    fn default() -> Self {
        Self {
            taxa: vec![
                ReferenceTaxon::new("Thunnus albacares", "Teleostei", 0.95),
                ReferenceTaxon::new("Carcharodon carcharias", "Chondrichthyes", 0.92),
                ReferenceTaxon::new("Tursiops truncatus", "Mammalia", 0.98),
                ReferenceTaxon::new("Chelonia mydas", "Reptilia", 0.94),
                ReferenceTaxon::new("Octopus vulgaris", "Cephalopoda", 0.89),
                ReferenceTaxon::new("Aurelia aurita", "Cnidaria", 0.87),
                ReferenceTaxon::new("Penaeus monodon", "Crustacea", 0.91),
                ReferenceTaxon::new("Rhincodon typus", "Chondrichthyes", 0.96),
            ],
            endangered: vec![
                "Rhincodon typus".to_string(),
                "Chelonia mydas".to_string(),
                "Carcharodon carcharias".to_string(),
            ],
            invasive: vec![
                "Pterois volitans".to_string(),
                "Caulerpa taxifolia".to_string(),
            ],
        }
    }
}

impl ReferenceCatalog {
    pub fn is_endangered(&self, species: &str) -> bool {
        self.endangered.iter().any(|s| s == species)
    }

    pub fn is_invasive(&self, species: &str) -> bool {
        self.invasive.iter().any(|s| s == species)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.taxa.is_empty() {
            return Err(ConfigError::EmptyReference);
        }
        if let Some(bad) = self
            .taxa
            .iter()
            .find(|t| !(0.0..=1.0).contains(&t.confidence))
        {
            return Err(ConfigError::ReferenceConfidence(bad.species.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn defaults_validate() {
        assert_eq!(PipelineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn default_catalog_matches_mock_reference() {
        let catalog = ReferenceCatalog::default();
        assert_eq!(catalog.taxa.len(), 8);
        assert!(catalog.is_endangered("Rhincodon typus"));
        assert!(catalog.is_invasive("Pterois volitans"));
        assert!(!catalog.is_endangered("Octopus vulgaris"));
    }

    #[test]
    fn rejects_inverted_range() {
        let mut config = PipelineConfig::default();
        config.classifier.novel_identity = ValueRange::new(80.0, 50.0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyRange {
                field: "classifier.novel_identity"
            })
        );
    }

    #[test]
    fn rejects_probability_above_one() {
        let mut config = PipelineConfig::default();
        config.classifier.novelty_probability = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Probability { .. })
        ));
    }

    #[test]
    fn rejects_empty_reference_and_zero_count() {
        let mut config = PipelineConfig::default();
        config.reference.taxa.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptyReference));

        let mut config = PipelineConfig::default();
        config.generator.asv_count = ValueRange::new(0, 5);
        assert_eq!(config.validate(), Err(ConfigError::ZeroAsvCount));
    }

    #[test]
    fn rejects_confidence_range_outside_unit_interval() {
        let mut config = PipelineConfig::default();
        config.classifier.novel_confidence = ValueRange::new(0.3, 1.4);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn range_samples_stay_half_open() {
        let range = ValueRange::new(20u32, 21);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            assert_eq!(range.sample(&mut rng), 20);
        }
        assert!(range.contains(20));
        assert!(!range.contains(21));
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let toml_str = r#"
seed = 7

[classifier]
novelty_probability = 0.5

[analyzer]
unknown_species = "singleton"
"#;
        let config: PipelineConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.classifier.novelty_probability, 0.5);
        assert_eq!(config.classifier.known_identity, ValueRange::new(95.0, 100.0));
        assert_eq!(config.analyzer.unknown_species, UnknownSpeciesPolicy::Singleton);
        assert_eq!(config.generator, GeneratorConfig::default());
        assert_eq!(config.reference, ReferenceCatalog::default());
    }

    #[test]
    fn watch_lists_can_be_replaced_from_toml() {
        let toml_str = r#"
[reference]
endangered = ["Dugong dugon"]

[[reference.taxa]]
species = "Dugong dugon"
class = "Mammalia"
confidence = 0.9
"#;
        let config: PipelineConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.reference.taxa.len(), 1);
        assert!(config.reference.is_endangered("Dugong dugon"));
        assert!(!config.reference.invasive.is_empty());
        assert_eq!(config.validate(), Ok(()));
    }
}
