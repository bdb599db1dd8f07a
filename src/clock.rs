/// An instant in milliseconds since the session origin.
///
/// The crate never reads a wall clock; the host advances time explicitly
/// through [`Scheduler`](crate::Scheduler), which is what makes every driver
/// testable against a simulated clock.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct TimeMs(pub u64);

impl TimeMs {
    pub const ZERO: Self = Self(0);

    pub fn saturating_add(self, ms: u64) -> Self {
        Self(self.0.saturating_add(ms))
    }

    /// Milliseconds elapsed since `earlier`; zero if `earlier` is later.
    pub fn since(self, earlier: TimeMs) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn since_is_saturating() {
        assert_eq!(TimeMs(500).since(TimeMs(200)), 300);
        assert_eq!(TimeMs(200).since(TimeMs(500)), 0);
    }
}
