//! Score tracking for line clears.

/// Points for the first row of a sweep. Each further row in the same sweep doubles.
pub const BASE_LINE_POINTS: u32 = 10;

/// Points for clearing `rows` rows in one sweep: 10, 30, 70, 150, ...
pub fn points_for(rows: usize) -> u32 {
    let mut multiplier = 1u32;
    let mut total = 0u32;
    for _ in 0..rows {
        total = total.saturating_add(multiplier.saturating_mul(BASE_LINE_POINTS));
        multiplier = multiplier.saturating_mul(2);
    }
    total
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreTracker {
    score: u32,
    lines: u32,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Total rows cleared since the last reset.
    pub fn lines(&self) -> u32 {
        self.lines
    }

    /// Apply one sweep's result and return the points it earned. Zero rows is a no-op.
    pub fn record_sweep(&mut self, rows: usize) -> u32 {
        if rows == 0 {
            return 0;
        }
        let points = points_for(rows);
        self.score = self.score.saturating_add(points);
        self.lines = self.lines.saturating_add(rows as u32);
        points
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
