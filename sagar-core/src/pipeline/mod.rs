//! The four analysis stages and the pure pipeline that chains them.
//!
//! Generator → Classifier → Analyzer → Alert Generator. Nothing here touches a
//! store; [`Pipeline::analyze`] is a pure function of the config, the upload id
//! and the random stream.

pub mod alerts;
pub mod classifier;
pub mod diversity;
pub mod generator;
pub mod novelty;

use chrono::Utc;
use rand::Rng;
use tracing::debug;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::types::{
    AbundanceSummary, Alert, AnalysisId, AnalysisResult, Asv, BiodiversityIndices, ClassCount,
    NoveltyScore, Provenance, TaxonAssignment, UploadId,
};

/// Everything one run computes, before persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub upload_id: UploadId,
    pub asvs: Vec<Asv>,
    pub taxa: Vec<TaxonAssignment>,
    pub novelty_scores: Vec<NoveltyScore>,
    pub indices: BiodiversityIndices,
    pub abundance: AbundanceSummary,
    pub alerts: Vec<Alert>,
    pub summary: String,
}

impl Analysis {
    /// Split into the persisted result record and its alerts.
    pub fn into_parts(self) -> (AnalysisResult, BiodiversityIndices, Vec<Alert>) {
        let result = AnalysisResult {
            id: AnalysisId::new(),
            upload_id: self.upload_id,
            asvs: self.asvs,
            taxa: self.taxa,
            novelty_scores: self.novelty_scores,
            biodiversity_indices: self.indices.report(),
            abundance: self.abundance,
            summary: self.summary,
            provenance: Provenance::now(),
            created_at: Utc::now(),
        };
        (result, self.indices, self.alerts)
    }
}

/// A validated pipeline configuration ready to run.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Validate `config` and build a pipeline.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run all four stages for one upload.
    pub fn analyze<R: Rng>(&self, upload_id: UploadId, rng: &mut R) -> Result<Analysis> {
        let config = &self.config;

        let asvs = generator::generate_asvs(&config.generator, rng)?;
        debug!(%upload_id, asvs = asvs.len(), "generated ASVs");

        let taxa = classifier::classify(&asvs, &config.classifier, &config.reference, rng)?;
        debug!(
            %upload_id,
            novel = taxa.iter().filter(|t| t.is_novel).count(),
            "classified ASVs"
        );

        let novelty_scores = novelty::score_novelty(&taxa, &config.analyzer, rng)?;
        let indices = diversity::biodiversity(
            &taxa,
            novelty_scores.len(),
            config.analyzer.unknown_species,
        );
        debug!(
            %upload_id,
            richness = indices.richness,
            shannon = indices.shannon,
            candidates = novelty_scores.len(),
            "computed diversity"
        );

        let alerts = alerts::generate_alerts(
            upload_id,
            &taxa,
            &novelty_scores,
            &config.reference,
            &config.alerts,
        );

        let abundance = abundance(&asvs, &taxa);
        let summary = summary_text(asvs.len(), &indices, novelty_scores.len());

        Ok(Analysis {
            upload_id,
            asvs,
            taxa,
            novelty_scores,
            indices,
            abundance,
            alerts,
            summary,
        })
    }
}

/// Read totals and per-class ASV counts, classes in order of first appearance.
fn abundance(asvs: &[Asv], taxa: &[TaxonAssignment]) -> AbundanceSummary {
    let mut class_distribution: Vec<ClassCount> = Vec::new();
    for taxon in taxa {
        match class_distribution.iter_mut().find(|c| c.name == taxon.class) {
            Some(entry) => entry.count += 1,
            None => class_distribution.push(ClassCount {
                name: taxon.class.clone(),
                count: 1,
            }),
        }
    }
    AbundanceSummary {
        total_reads: asvs.iter().map(|a| u64::from(a.reads)).sum(),
        unique_asvs: asvs.len(),
        class_distribution,
    }
}

fn summary_text(asv_count: usize, indices: &BiodiversityIndices, candidates: usize) -> String {
    let report = indices.report();
    format!(
        "Analysis complete. Found {asv_count} ASVs across {} species. Shannon diversity: {:.2}. {candidates} potential novel sequences detected.",
        report.richness, report.shannon
    )
}
