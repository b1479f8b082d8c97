//! Reviewer decisions on alerts.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::store::{AlertStore, Result};
use crate::types::{Alert, AlertId, AlertStatus};

/// Applies reviewer decisions to alerts.
///
/// `validated` and `rejected` are terminal: reviewing an alert twice fails with
/// [`StoreError::InvalidTransition`](crate::StoreError::InvalidTransition).
#[derive(Clone)]
pub struct AlertReview {
    store: Arc<dyn AlertStore>,
}

impl AlertReview {
    pub fn new(store: Arc<dyn AlertStore>) -> Self {
        Self { store }
    }

    /// Confirm an alert.
    #[instrument(skip(self))]
    pub async fn validate(&self, alert_id: AlertId) -> Result<Alert> {
        self.decide(alert_id, AlertStatus::Validated).await
    }

    /// Dismiss an alert as a false positive.
    #[instrument(skip(self))]
    pub async fn reject(&self, alert_id: AlertId) -> Result<Alert> {
        self.decide(alert_id, AlertStatus::Rejected).await
    }

    async fn decide(&self, alert_id: AlertId, status: AlertStatus) -> Result<Alert> {
        let alert = self.store.set_status(alert_id, status).await?;
        info!(%alert_id, %status, species = %alert.species_name, "alert reviewed");
        Ok(alert)
    }
}
