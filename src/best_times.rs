//! Best completion time per level
//!
//! Indexed by level position in the set; persisted with the rest of the
//! progress document.

use serde::{Deserialize, Serialize};

/// Fastest recorded completion (seconds) for each level index
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BestTimes {
    pub entries: Vec<Option<f32>>,
}

impl BestTimes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Best time for a level, if it was ever completed
    pub fn get(&self, level_index: usize) -> Option<f32> {
        self.entries.get(level_index).copied().flatten()
    }

    /// Check if a time would beat the current record
    pub fn qualifies(&self, level_index: usize, time: f32) -> bool {
        self.get(level_index).is_none_or(|best| time < best)
    }

    /// Store `time` (rounded to hundredths) if it beats the record
    ///
    /// Returns true when the record changed.
    pub fn record(&mut self, level_index: usize, time: f32) -> bool {
        if !time.is_finite() || !self.qualifies(level_index, time) {
            return false;
        }
        if self.entries.len() <= level_index {
            self.entries.resize(level_index + 1, None);
        }
        self.entries[level_index] = Some((time * 100.0).round() / 100.0);
        true
    }

    /// Number of levels with a recorded time
    pub fn completed(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }
}

/// Format seconds as `MM:SS`
pub fn format_time(seconds: f32) -> String {
    let total = seconds.max(0.0).floor() as u32;
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_fastest() {
        let mut times = BestTimes::new();
        assert!(times.record(2, 12.345));
        assert_eq!(times.get(2), Some(12.35));
        assert_eq!(times.get(0), None);
        assert_eq!(times.entries.len(), 3);

        assert!(!times.record(2, 20.0));
        assert!(times.record(2, 9.0));
        assert_eq!(times.get(2), Some(9.0));
        assert_eq!(times.completed(), 1);
    }

    #[test]
    fn test_rejects_non_finite() {
        let mut times = BestTimes::new();
        assert!(!times.record(0, f32::NAN));
        assert!(!times.record(0, f32::INFINITY));
        assert_eq!(times.completed(), 0);
    }

    #[test]
    fn test_json_shape() {
        let mut times = BestTimes::new();
        times.record(1, 4.5);
        assert_eq!(serde_json::to_string(&times).unwrap(), "[null,4.5]");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(59.9), "00:59");
        assert_eq!(format_time(125.0), "02:05");
        assert_eq!(format_time(-3.0), "00:00");
    }
}
