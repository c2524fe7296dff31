//! Easing curves applied to the normalized animation time.

#[allow(missing_docs)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Interpolation {
    #[default]
    Linear,

    QuadraticIn,
    QuadraticOut,
    QuadraticInOut,

    CubicIn,
    CubicOut,
    CubicInOut,

    SineInOut,
}

impl Interpolation {
    /// Map a normalized time `t` to the eased progress.
    ///
    /// `t` is clamped to `0..=1`, and the result is exactly 0 at 0 and exactly 1 at 1.
    pub fn ease(self, t: f64) -> f64 {
        let p = t.clamp(0.0, 1.0);
        match self {
            Interpolation::Linear => p,

            Interpolation::QuadraticIn => p * p,
            Interpolation::QuadraticOut => -(p * (p - 2.0)),
            Interpolation::QuadraticInOut => {
                if p < 0.5 {
                    2.0 * p * p
                } else {
                    (-2.0 * p * p) + (4.0 * p) - 1.0
                }
            }

            Interpolation::CubicIn => p * p * p,
            Interpolation::CubicOut => {
                let f = p - 1.0;
                f * f * f + 1.0
            }
            Interpolation::CubicInOut => {
                if p < 0.5 {
                    4.0 * p * p * p
                } else {
                    let f = (2.0 * p) - 2.0;
                    0.5 * f * f * f + 1.0
                }
            }

            Interpolation::SineInOut => 0.5 * (1.0 - (p * std::f64::consts::PI).cos()),
        }
    }
}
