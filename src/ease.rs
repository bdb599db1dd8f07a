use kurbo::{CubicBez, ParamCurve, Point};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    /// CSS-style cubic-bezier timing curve through (0,0) and (1,1).
    Bezier { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::Bezier { x1, y1, x2, y2 } => bezier_progress(x1, y1, x2, y2, t),
        }
    }
}

/// Evaluates a cubic-bezier timing curve at time fraction `t`.
///
/// The x axis is time and the y axis is progress. Control x values are
/// clamped to [0, 1] so x(u) stays monotone and invertible; control y values
/// are free, matching the CSS `cubic-bezier()` contract.
fn bezier_progress(x1: f64, y1: f64, x2: f64, y2: f64, t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let curve = CubicBez::new(
        Point::ZERO,
        Point::new(x1.clamp(0.0, 1.0), y1),
        Point::new(x2.clamp(0.0, 1.0), y2),
        Point::new(1.0, 1.0),
    );

    // Bisection on x(u) = t. 48 halvings puts u well below f64 curve noise.
    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    for _ in 0..48 {
        let mid = 0.5 * (lo + hi);
        if curve.eval(mid).x < t {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    curve.eval(0.5 * (lo + hi)).y
}
