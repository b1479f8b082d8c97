use sagar_core::PipelineConfig;
use sagar_models::AssistantConfig;
use serde::{Deserialize, Serialize};

/// Final configuration with defaults applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SagarConfig {
    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub assistant: AssistantConfig,
}
