use crate::geometry::Point;

/// Tracks the agent's last observed position and reports when it failed to move.
#[derive(Clone, Debug)]
pub struct StallDetector {
    last: Option<Point>,
    epsilon: f64,
}

impl StallDetector {
    pub fn new(epsilon: f64) -> Self {
        Self {
            last: None,
            epsilon: epsilon.max(0.0),
        }
    }

    pub fn last_position(&self) -> Option<Point> {
        self.last
    }

    /// Compares `current` with the previous observation, then remembers
    /// `current`. The first observation never counts as a stall.
    pub fn observe(&mut self, current: Point) -> bool {
        let stalled = self.last.is_some_and(|prev| {
            (current.x - prev.x).abs() <= self.epsilon && (current.y - prev.y).abs() <= self.epsilon
        });
        self.last = Some(current);
        stalled
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_observation_is_never_a_stall() {
        let mut detector = StallDetector::new(0.0);
        assert!(!detector.observe(Point::new(10.0, 10.0)));
        assert_eq!(detector.last_position(), Some(Point::new(10.0, 10.0)));
    }

    #[test]
    fn identical_positions_stall() {
        let mut detector = StallDetector::new(0.0);
        detector.observe(Point::new(49.5, 60.3));
        assert!(detector.observe(Point::new(49.5, 60.3)));
    }

    #[test]
    fn jitter_within_epsilon_still_stalls() {
        let mut detector = StallDetector::new(1e-3);
        detector.observe(Point::new(49.5, 60.3));
        assert!(detector.observe(Point::new(49.5004, 60.2999)));
        assert!(!detector.observe(Point::new(49.6, 60.2999)));
    }

    #[test]
    fn judgement_uses_previous_value_before_update() {
        let mut detector = StallDetector::new(0.0);
        detector.observe(Point::new(1.0, 1.0));
        assert!(!detector.observe(Point::new(2.0, 1.0)));
        assert!(detector.observe(Point::new(2.0, 1.0)));
        assert!(!detector.observe(Point::new(1.0, 1.0)));
    }
}
