//! Lap sequence tracking and fastest/slowest classification

/// Ordered sequence of cumulative elapsed-time checkpoints.
///
/// Each recorded lap stores the stopwatch's cumulative elapsed
/// milliseconds at that moment; the lap's own duration (its delta) is
/// the difference from the previous checkpoint.
#[derive(Debug, Clone, Default)]
pub struct LapTracker {
    cumulative: Vec<u64>,
}

/// Index sets of the laps with the minimum and maximum delta.
///
/// Both sets are empty when fewer than two laps exist. Ties are all
/// included; when every delta is equal, every lap appears in both sets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LapHighlights {
    pub fastest: Vec<usize>,
    pub slowest: Vec<usize>,
}

impl LapTracker {
    /// Create an empty lap tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded laps
    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    /// Check whether no laps have been recorded
    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// Record a lap at the given cumulative elapsed time.
    /// Returns the new lap's delta (time since the previous checkpoint).
    pub fn record(&mut self, cumulative_ms: u64) -> u64 {
        let previous = self.cumulative.last().copied().unwrap_or(0);
        self.cumulative.push(cumulative_ms);
        cumulative_ms.saturating_sub(previous)
    }

    /// Remove all recorded laps
    pub fn clear(&mut self) {
        self.cumulative.clear();
    }

    /// Cumulative checkpoint values, oldest first
    pub fn cumulative(&self) -> &[u64] {
        &self.cumulative
    }

    /// Per-lap deltas: delta_i = cumulative_i - cumulative_(i-1),
    /// with the first lap's delta equal to its cumulative value.
    pub fn deltas(&self) -> Vec<u64> {
        self.cumulative
            .iter()
            .scan(0u64, |previous, &current| {
                let delta = current.saturating_sub(*previous);
                *previous = current;
                Some(delta)
            })
            .collect()
    }

    /// Classify laps as fastest/slowest by delta.
    pub fn classify(&self) -> LapHighlights {
        if self.cumulative.len() < 2 {
            return LapHighlights::default();
        }

        let deltas = self.deltas();
        let min = *deltas.iter().min().unwrap();
        let max = *deltas.iter().max().unwrap();

        let matching = |target: u64| {
            deltas
                .iter()
                .enumerate()
                .filter(|(_, &delta)| delta == target)
                .map(|(i, _)| i)
                .collect::<Vec<_>>()
        };

        LapHighlights {
            fastest: matching(min),
            slowest: matching(max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_lap_delta_equals_cumulative_value() {
        let mut laps = LapTracker::new();
        assert_eq!(laps.record(1234), 1234);
        assert_eq!(laps.deltas(), vec![1234]);
    }

    #[test]
    fn later_deltas_are_successive_differences() {
        let mut laps = LapTracker::new();
        laps.record(1000);
        assert_eq!(laps.record(2500), 1500);
        assert_eq!(laps.record(2600), 100);
        assert_eq!(laps.deltas(), vec![1000, 1500, 100]);
        assert_eq!(laps.cumulative(), &[1000, 2500, 2600]);
    }

    #[test]
    fn classify_marks_min_and_max_deltas() {
        let mut laps = LapTracker::new();
        laps.record(1000);
        laps.record(2500);
        laps.record(2600);

        let highlights = laps.classify();
        assert_eq!(highlights.fastest, vec![2]);
        assert_eq!(highlights.slowest, vec![1]);
    }

    #[test]
    fn classify_includes_all_ties() {
        let mut laps = LapTracker::new();
        laps.record(400);
        laps.record(500); // delta 100
        laps.record(600); // delta 100
        laps.record(1000); // delta 400, ties the first lap

        let highlights = laps.classify();
        assert_eq!(highlights.fastest, vec![1, 2]);
        assert_eq!(highlights.slowest, vec![0, 3]);
    }

    #[test]
    fn equal_deltas_mark_every_lap_both_ways() {
        let mut laps = LapTracker::new();
        laps.record(500);
        laps.record(1000);
        laps.record(1500);

        // min == max, so every lap is simultaneously fastest and slowest
        let highlights = laps.classify();
        assert_eq!(highlights.fastest, vec![0, 1, 2]);
        assert_eq!(highlights.slowest, vec![0, 1, 2]);
    }

    #[test]
    fn fewer_than_two_laps_yields_no_highlights() {
        let mut laps = LapTracker::new();
        assert_eq!(laps.classify(), LapHighlights::default());

        laps.record(900);
        let highlights = laps.classify();
        assert!(highlights.fastest.is_empty());
        assert!(highlights.slowest.is_empty());
    }

    #[test]
    fn clear_empties_the_sequence() {
        let mut laps = LapTracker::new();
        laps.record(100);
        laps.record(200);
        laps.clear();
        assert!(laps.is_empty());
        assert_eq!(laps.classify(), LapHighlights::default());
    }
}
