use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

pub const START_HOUR_MIN: i32 = 0;
pub const START_HOUR_MAX: i32 = 23;
pub const DEFAULT_START_HOUR: i32 = 8;

pub const TURN_AROUND_TIME_MIN: i32 = 0;
pub const TURN_AROUND_TIME_MAX: i32 = 120;
pub const DEFAULT_TURN_AROUND_TIME: i32 = 15;

/// Operating theatre display values. Tokens are matched byte-for-byte
/// against the model encodings.
pub const DISPLAY_VALUES: [&str; 16] = [
    "OR 1", "OR 2", "OR 3", "OR 4", "OR 5", "OR 6", "OR 7", "OR 8", "OR 9", "OR 10", "OR 11",
    "OR 12", "Endo 1", "Endo 2", "Endo 3", "Endo 4",
];

/// Proposed procedure descriptions, trailing punctuation included.
pub const PROPOSED_PROCEDURES: [&str; 4] = [
    "COLOSCP - COLONOSCOPY;",
    "GASTSCP - GASTROSCOPY;",
    "GASTCOL - GASTROSCOPY & COLONOSCOPY;",
    "VIDEO LAPAROSCOPIC CHOLECYSTECTOMY;",
];

/// Canonical input record for a single prediction run. Immutable once
/// captured; both models read their feature subsets from it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InputRecord {
    pub start_hour: i32,
    pub turn_around_time: i32,
    pub display_value: String,
    pub proposed_procedure: String,
}

impl InputRecord {
    pub fn new(
        start_hour: i32,
        turn_around_time: i32,
        display_value: &str,
        proposed_procedure: &str,
    ) -> Result<Self> {
        if !(START_HOUR_MIN..=START_HOUR_MAX).contains(&start_hour) {
            return Err(anyhow!(
                "StartHour must be between {} and {}, got {}",
                START_HOUR_MIN,
                START_HOUR_MAX,
                start_hour
            ));
        }

        if !(TURN_AROUND_TIME_MIN..=TURN_AROUND_TIME_MAX).contains(&turn_around_time) {
            return Err(anyhow!(
                "TurnAroundTime must be between {} and {}, got {}",
                TURN_AROUND_TIME_MIN,
                TURN_AROUND_TIME_MAX,
                turn_around_time
            ));
        }

        if !DISPLAY_VALUES.contains(&display_value) {
            return Err(anyhow!("Unknown DisplayValue: {}", display_value));
        }

        if !PROPOSED_PROCEDURES.contains(&proposed_procedure) {
            return Err(anyhow!("Unknown ProposedProcedure: {}", proposed_procedure));
        }

        Ok(Self {
            start_hour,
            turn_around_time,
            display_value: display_value.to_string(),
            proposed_procedure: proposed_procedure.to_string(),
        })
    }

    /// Human-readable summary of the captured inputs, stable field order.
    pub fn summary(&self) -> String {
        format!(
            "StartHour={}, TurnAroundTime={}, DisplayValue={}, ProposedProcedure={}",
            self.start_hour, self.turn_around_time, self.display_value, self.proposed_procedure
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_input_record() {
        let record = InputRecord::new(8, 15, "OR 1", "COLOSCP - COLONOSCOPY;").unwrap();

        assert_eq!(record.start_hour, 8);
        assert_eq!(record.turn_around_time, 15);
        assert_eq!(record.display_value, "OR 1");
        assert_eq!(record.proposed_procedure, "COLOSCP - COLONOSCOPY;");
    }

    #[test]
    fn test_summary_format() {
        let record = InputRecord::new(8, 15, "OR 1", "COLOSCP - COLONOSCOPY;").unwrap();

        assert_eq!(
            record.summary(),
            "StartHour=8, TurnAroundTime=15, DisplayValue=OR 1, ProposedProcedure=COLOSCP - COLONOSCOPY;"
        );
    }

    #[test]
    fn test_boundary_values_accepted() {
        // declared inclusive bounds
        assert!(InputRecord::new(0, 0, "OR 1", "GASTSCP - GASTROSCOPY;").is_ok());
        assert!(InputRecord::new(23, 120, "Endo 4", "VIDEO LAPAROSCOPIC CHOLECYSTECTOMY;").is_ok());
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(InputRecord::new(24, 15, "OR 1", "COLOSCP - COLONOSCOPY;").is_err());
        assert!(InputRecord::new(-1, 15, "OR 1", "COLOSCP - COLONOSCOPY;").is_err());
        assert!(InputRecord::new(8, 121, "OR 1", "COLOSCP - COLONOSCOPY;").is_err());
    }

    #[test]
    fn test_unknown_tokens_rejected() {
        assert!(InputRecord::new(8, 15, "OR 13", "COLOSCP - COLONOSCOPY;").is_err());
        // token must match byte-for-byte, trailing punctuation included
        assert!(InputRecord::new(8, 15, "OR 1", "COLOSCP - COLONOSCOPY").is_err());
    }

    #[test]
    fn test_closed_set_sizes() {
        assert_eq!(DISPLAY_VALUES.len(), 16);
        assert_eq!(PROPOSED_PROCEDURES.len(), 4);
    }
}
