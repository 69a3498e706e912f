/// Tracks the best score seen so far and decides when a new one is worth recording
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricTracker {
    prev_max: u32,
    threshold: u32,
}

impl MetricTracker {
    /// A tracker that ignores scores at or below `threshold`
    pub fn new(threshold: u32) -> Self {
        Self {
            prev_max: 0,
            threshold,
        }
    }

    /// Best score committed so far
    pub fn prev_max(&self) -> u32 {
        self.prev_max
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Whether `observed` beats both the best committed score and the threshold
    pub fn is_milestone(&self, observed: u32) -> bool {
        observed > self.prev_max && observed > self.threshold
    }

    /// Make `score` the best seen so far
    pub fn commit(&mut self, score: u32) {
        self.prev_max = self.prev_max.max(score);
    }

    /// Check `observed` and commit it if it is a milestone
    ///
    /// **Returns** whether a milestone was declared
    pub fn observe(&mut self, observed: u32) -> bool {
        let milestone = self.is_milestone(observed);
        if milestone {
            self.commit(observed);
        }
        milestone
    }
}
