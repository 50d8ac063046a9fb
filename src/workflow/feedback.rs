use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

pub const FEEDBACK_SCORE_MIN: i32 = 1;
pub const FEEDBACK_SCORE_MAX: i32 = 5;
pub const DEFAULT_FEEDBACK_SCORE: i32 = 4;

/// One model's feedback pair. Readable with defaults at any time, but
/// only submittable once a prediction exists.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Feedback {
    pub score: i32,
    pub text: Option<String>,
}

impl Feedback {
    pub fn new(score: i32, text: Option<String>) -> Result<Self> {
        if !(FEEDBACK_SCORE_MIN..=FEEDBACK_SCORE_MAX).contains(&score) {
            return Err(anyhow!(
                "Feedback score must be between {} and {}, got {}",
                FEEDBACK_SCORE_MIN,
                FEEDBACK_SCORE_MAX,
                score
            ));
        }

        Ok(Self { score, text })
    }
}

impl Default for Feedback {
    fn default() -> Self {
        Self {
            score: DEFAULT_FEEDBACK_SCORE,
            text: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bounds() {
        assert!(Feedback::new(1, None).is_ok());
        assert!(Feedback::new(5, Some("great".to_string())).is_ok());
        assert!(Feedback::new(0, None).is_err());
        assert!(Feedback::new(6, None).is_err());
    }

    #[test]
    fn test_default_pair() {
        let feedback = Feedback::default();

        assert_eq!(feedback.score, 4);
        assert!(feedback.text.is_none());
    }
}
