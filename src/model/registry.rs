use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::model::artifact::{FeatureName, ModelArtifact, ModelType, ModelVersion};

/// Feature subsets each model was trained on, fixed at model-creation
/// time. Artifacts must declare exactly these, in this order.
pub const BASELINE_FEATURES: [FeatureName; 2] =
    [FeatureName::DisplayValue, FeatureName::ProposedProcedure];

pub const IMPROVED_FEATURES: [FeatureName; 4] = [
    FeatureName::StartHour,
    FeatureName::TurnAroundTime,
    FeatureName::DisplayValue,
    FeatureName::ProposedProcedure,
];

/// Holds both pre-trained models for the lifetime of the process. Loaded
/// once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    baseline: ModelArtifact,
    improved: ModelArtifact,
}

impl ModelRegistry {
    /// Load both model artifacts. Paths fall back to the
    /// `BASELINE_MODEL_PATH` / `IMPROVED_MODEL_PATH` env vars, then to the
    /// conventional artifact names in the working directory.
    pub fn load(baseline_path: Option<PathBuf>, improved_path: Option<PathBuf>) -> Result<Self> {
        let baseline_path = baseline_path.unwrap_or_else(|| {
            PathBuf::from(
                std::env::var("BASELINE_MODEL_PATH")
                    .unwrap_or_else(|_| "baseline_model_v1.json".to_string()),
            )
        });

        let improved_path = improved_path.unwrap_or_else(|| {
            PathBuf::from(
                std::env::var("IMPROVED_MODEL_PATH")
                    .unwrap_or_else(|_| "improved_model_v2.json".to_string()),
            )
        });

        let baseline = ModelArtifact::from_file(&baseline_path)
            .with_context(|| "Failed to load baseline model")?;
        let improved = ModelArtifact::from_file(&improved_path)
            .with_context(|| "Failed to load improved model")?;

        let registry = Self::from_artifacts(baseline, improved)?;

        info!(
            "✅ Loaded baseline model from {} and improved model from {}",
            baseline_path.display(),
            improved_path.display()
        );

        Ok(registry)
    }

    /// Build a registry from already-deserialized artifacts, enforcing the
    /// identity and feature-subset contract of each slot.
    pub fn from_artifacts(baseline: ModelArtifact, improved: ModelArtifact) -> Result<Self> {
        baseline.validate()?;
        improved.validate()?;

        if baseline.version != ModelVersion::V1Old || baseline.model_type != ModelType::Baseline {
            bail!(
                "Baseline slot requires a v1_old/baseline artifact, got {}/{}",
                baseline.version.as_str(),
                baseline.model_type.as_str()
            );
        }

        if improved.version != ModelVersion::V2New || improved.model_type != ModelType::Improved {
            bail!(
                "Improved slot requires a v2_new/improved artifact, got {}/{}",
                improved.version.as_str(),
                improved.model_type.as_str()
            );
        }

        if baseline.features != BASELINE_FEATURES {
            bail!(
                "Baseline model must consume {:?}, artifact declares {:?}",
                BASELINE_FEATURES,
                baseline.features
            );
        }

        if improved.features != IMPROVED_FEATURES {
            bail!(
                "Improved model must consume {:?}, artifact declares {:?}",
                IMPROVED_FEATURES,
                improved.features
            );
        }

        Ok(Self { baseline, improved })
    }

    pub fn baseline(&self) -> &ModelArtifact {
        &self.baseline
    }

    pub fn improved(&self) -> &ModelArtifact {
        &self.improved
    }
}
