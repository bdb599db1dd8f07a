use crate::ease::Ease;

/// A value progressing `from` -> `to` over `duration_ms` under `ease`.
///
/// Sampling is a pure function of elapsed time; the caller decides what
/// "elapsed" means (usually `now - started_at` against the scheduler clock).
/// Out-of-range elapsed times clamp to the endpoints.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub duration_ms: u64,
    pub ease: Ease,
}

impl Tween {
    pub const fn new(from: f64, to: f64, duration_ms: u64, ease: Ease) -> Self {
        Self {
            from,
            to,
            duration_ms,
            ease,
        }
    }

    pub fn sample(&self, elapsed_ms: u64) -> f64 {
        if self.duration_ms == 0 {
            return if elapsed_ms == 0 { self.from } else { self.to };
        }
        let t = (elapsed_ms as f64 / self.duration_ms as f64).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * self.ease.apply(t)
    }

    pub fn finished(&self, elapsed_ms: u64) -> bool {
        elapsed_ms >= self.duration_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_midpoint() {
        let tw = Tween::new(0.0, 10.0, 100, Ease::Linear);
        assert_eq!(tw.sample(0), 0.0);
        assert_eq!(tw.sample(50), 5.0);
        assert_eq!(tw.sample(100), 10.0);
    }

    #[test]
    fn clamps_past_the_end() {
        let tw = Tween::new(1.0, 35.0, 1_500, Ease::Linear);
        assert_eq!(tw.sample(9_999), 35.0);
        assert!(tw.finished(1_500));
        assert!(!tw.finished(1_499));
    }

    #[test]
    fn zero_duration_snaps() {
        let tw = Tween::new(2.0, 3.0, 0, Ease::Linear);
        assert_eq!(tw.sample(0), 2.0);
        assert_eq!(tw.sample(1), 3.0);
    }
}
