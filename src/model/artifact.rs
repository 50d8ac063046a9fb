use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::workflow::input::InputRecord;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelVersion {
    #[serde(rename = "v1_old")]
    V1Old,
    #[serde(rename = "v2_new")]
    V2New,
}

impl ModelVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelVersion::V1Old => "v1_old",
            ModelVersion::V2New => "v2_new",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelType {
    #[serde(rename = "baseline")]
    Baseline,
    #[serde(rename = "improved")]
    Improved,
}

impl ModelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Baseline => "baseline",
            ModelType::Improved => "improved",
        }
    }
}

/// Fields of the canonical input record a model may consume.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureName {
    StartHour,
    TurnAroundTime,
    DisplayValue,
    ProposedProcedure,
}

/// Serialized scoring model. The `features` list is the ordered subset of
/// the input record the model was trained on; numeric features contribute
/// `weight * value`, categorical features the fitted weight of the token.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ModelArtifact {
    pub version: ModelVersion,
    pub model_type: ModelType,
    pub features: Vec<FeatureName>,
    pub intercept: f64,
    #[serde(default)]
    pub numeric_weights: HashMap<FeatureName, f64>,
    #[serde(default)]
    pub category_weights: HashMap<FeatureName, HashMap<String, f64>>,
}

impl ModelArtifact {
    /// Deserialize an artifact from a JSON file. Errors here are startup
    /// errors, never per-request ones.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open model artifact {}", path.display()))?;

        let artifact: ModelArtifact = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to deserialize model artifact {}", path.display()))?;

        artifact.validate()?;

        Ok(artifact)
    }

    /// Every declared feature must carry weights, otherwise the artifact
    /// is corrupt.
    pub fn validate(&self) -> Result<()> {
        for feature in &self.features {
            let covered = match feature {
                FeatureName::StartHour | FeatureName::TurnAroundTime => {
                    self.numeric_weights.contains_key(feature)
                }
                FeatureName::DisplayValue | FeatureName::ProposedProcedure => self
                    .category_weights
                    .get(feature)
                    .map(|weights| !weights.is_empty())
                    .unwrap_or(false),
            };

            if !covered {
                bail!(
                    "Model artifact {} declares feature {:?} without weights",
                    self.version.as_str(),
                    feature
                );
            }
        }

        Ok(())
    }

    /// Score the input record against this model's feature subset.
    pub fn predict(&self, input: &InputRecord) -> Result<f64> {
        let mut score = self.intercept;

        for feature in &self.features {
            score += match feature {
                FeatureName::StartHour => {
                    self.numeric_weight(FeatureName::StartHour)? * f64::from(input.start_hour)
                }
                FeatureName::TurnAroundTime => {
                    self.numeric_weight(FeatureName::TurnAroundTime)?
                        * f64::from(input.turn_around_time)
                }
                FeatureName::DisplayValue => {
                    self.category_weight(FeatureName::DisplayValue, &input.display_value)?
                }
                FeatureName::ProposedProcedure => {
                    self.category_weight(FeatureName::ProposedProcedure, &input.proposed_procedure)?
                }
            };
        }

        Ok(score)
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            version: self.version,
            model_type: self.model_type,
            features: self.features.clone(),
        }
    }

    fn numeric_weight(&self, feature: FeatureName) -> Result<f64> {
        self.numeric_weights.get(&feature).copied().ok_or_else(|| {
            anyhow!(
                "Model {} has no weight for feature {:?}",
                self.version.as_str(),
                feature
            )
        })
    }

    fn category_weight(&self, feature: FeatureName, token: &str) -> Result<f64> {
        self.category_weights
            .get(&feature)
            .and_then(|weights| weights.get(token))
            .copied()
            .ok_or_else(|| {
                anyhow!(
                    "Model {} has no encoding for {:?} token '{}'",
                    self.version.as_str(),
                    feature,
                    token
                )
            })
    }
}

/// Read-only model metadata surfaced by the API.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ModelInfo {
    pub version: ModelVersion,
    pub model_type: ModelType,
    pub features: Vec<FeatureName>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn test_artifact() -> ModelArtifact {
        let mut category_weights = HashMap::new();
        category_weights.insert(
            FeatureName::DisplayValue,
            HashMap::from([("OR 1".to_string(), 2.0), ("OR 2".to_string(), 4.0)]),
        );
        category_weights.insert(
            FeatureName::ProposedProcedure,
            HashMap::from([("COLOSCP - COLONOSCOPY;".to_string(), 7.0)]),
        );

        ModelArtifact {
            version: ModelVersion::V2New,
            model_type: ModelType::Improved,
            features: vec![
                FeatureName::StartHour,
                FeatureName::TurnAroundTime,
                FeatureName::DisplayValue,
                FeatureName::ProposedProcedure,
            ],
            intercept: 10.0,
            numeric_weights: HashMap::from([
                (FeatureName::StartHour, 1.0),
                (FeatureName::TurnAroundTime, 0.5),
            ]),
            category_weights,
        }
    }

    #[test]
    fn test_predict_scores_declared_features() {
        let artifact = test_artifact();
        let input = InputRecord::new(8, 15, "OR 1", "COLOSCP - COLONOSCOPY;").unwrap();

        // 10 + 8 * 1.0 + 15 * 0.5 + 2.0 + 7.0
        let score = artifact.predict(&input).unwrap();
        assert_eq!(score, 34.5);
    }

    #[test]
    fn test_predict_ignores_undeclared_features() {
        let mut artifact = test_artifact();
        artifact.features = vec![FeatureName::DisplayValue, FeatureName::ProposedProcedure];

        let low = InputRecord::new(0, 0, "OR 1", "COLOSCP - COLONOSCOPY;").unwrap();
        let high = InputRecord::new(23, 120, "OR 1", "COLOSCP - COLONOSCOPY;").unwrap();

        // numeric fields are outside this model's subset
        assert_eq!(artifact.predict(&low).unwrap(), artifact.predict(&high).unwrap());
    }

    #[test]
    fn test_predict_unknown_token_fails() {
        let artifact = test_artifact();
        let input = InputRecord::new(8, 15, "Endo 3", "COLOSCP - COLONOSCOPY;").unwrap();

        let err = artifact.predict(&input).unwrap_err();
        assert!(err.to_string().contains("no encoding"));
    }

    #[test]
    fn test_validate_rejects_missing_weights() {
        let mut artifact = test_artifact();
        artifact.numeric_weights.remove(&FeatureName::StartHour);

        assert!(artifact.validate().is_err());
    }

    #[test]
    fn test_from_file_round_trip() {
        let artifact = test_artifact();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("improved_model_v2.json");
        let mut file = File::create(&path).unwrap();
        file.write_all(serde_json::to_string(&artifact).unwrap().as_bytes())
            .unwrap();

        let loaded = ModelArtifact::from_file(&path).unwrap();
        assert_eq!(loaded.version, ModelVersion::V2New);
        assert_eq!(loaded.features, artifact.features);
        assert_eq!(loaded.intercept, artifact.intercept);
    }

    #[test]
    fn test_from_file_missing_artifact_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_model.json");

        assert!(ModelArtifact::from_file(&path).is_err());
    }
}
