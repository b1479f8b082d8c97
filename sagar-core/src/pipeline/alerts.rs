//! Conservation alert generation.

use crate::config::{AlertConfig, ReferenceCatalog};
use crate::types::{Alert, AlertType, NoveltyScore, Severity, TaxonAssignment, UploadId};

/// Scan assignments against the watch-lists and novelty scores against the
/// thresholds.
///
/// Watch-list alerts come first, in assignment order, followed by novelty
/// alerts in score order. Every alert starts `active`. Nothing is
/// deduplicated; one alert is raised per matching assignment.
pub fn generate_alerts(
    upload_id: UploadId,
    taxa: &[TaxonAssignment],
    novelty_scores: &[NoveltyScore],
    reference: &ReferenceCatalog,
    config: &AlertConfig,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for taxon in taxa {
        let Some(species) = taxon.species.name() else {
            continue;
        };
        let confidence = percent(taxon.confidence);
        if reference.is_endangered(species) {
            alerts.push(Alert::new(
                upload_id,
                AlertType::Endangered,
                Severity::High,
                format!("Endangered Species Detected: {species}"),
                format!("Endangered species {species} detected with {confidence}% confidence."),
                species,
            ));
        }
        if reference.is_invasive(species) {
            alerts.push(Alert::new(
                upload_id,
                AlertType::Invasive,
                Severity::High,
                format!("Invasive Species Detected: {species}"),
                format!("Invasive species {species} detected with {confidence}% confidence."),
                species,
            ));
        }
    }

    for score in novelty_scores
        .iter()
        .filter(|s| s.novelty_score > config.novelty_alert_threshold)
    {
        let severity = if score.novelty_score > config.novelty_critical_threshold {
            Severity::Critical
        } else {
            Severity::Medium
        };
        alerts.push(Alert::new(
            upload_id,
            AlertType::NovelSpecies,
            severity,
            format!("Potential Novel Species: {}", score.asv_id),
            format!(
                "Novel sequence detected with {}% novelty score. Requires taxonomic verification.",
                percent(score.novelty_score)
            ),
            format!("Unknown ({})", score.asv_id),
        ));
    }

    alerts
}

fn percent(fraction: f64) -> u32 {
    (fraction * 100.0).round() as u32
}
