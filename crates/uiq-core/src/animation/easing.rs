//! Named easing curves.
//!
//! Each curve maps linear progress in `[0, 1]` to eased progress. Elastic and
//! back curves overshoot that range on purpose. Names are the usual
//! `easeInQuad` / `easeOutBounce` spellings and are matched case-sensitively;
//! an unknown name resolves to [`Easing::Linear`].
//!
//! ```
//! use uiq_core::Easing;
//!
//! let bounce = Easing::from_name("easeOutBounce");
//! assert_eq!(bounce, Easing::EaseOutBounce);
//! assert_eq!(Easing::from_name("wobble"), Easing::Linear);
//! ```

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    #[default]
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInQuint,
    EaseOutQuint,
    EaseInOutQuint,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInExpo,
    EaseOutExpo,
    EaseInOutExpo,
    EaseInCirc,
    EaseOutCirc,
    EaseInOutCirc,
    EaseInElastic,
    EaseOutElastic,
    EaseInOutElastic,
    EaseInBack,
    EaseOutBack,
    EaseInOutBack,
    EaseInBounce,
    EaseOutBounce,
    EaseInOutBounce,
}

impl Easing {
    pub const ALL: [Easing; 31] = [
        Self::Linear,
        Self::EaseInQuad,
        Self::EaseOutQuad,
        Self::EaseInOutQuad,
        Self::EaseInCubic,
        Self::EaseOutCubic,
        Self::EaseInOutCubic,
        Self::EaseInQuart,
        Self::EaseOutQuart,
        Self::EaseInOutQuart,
        Self::EaseInQuint,
        Self::EaseOutQuint,
        Self::EaseInOutQuint,
        Self::EaseInSine,
        Self::EaseOutSine,
        Self::EaseInOutSine,
        Self::EaseInExpo,
        Self::EaseOutExpo,
        Self::EaseInOutExpo,
        Self::EaseInCirc,
        Self::EaseOutCirc,
        Self::EaseInOutCirc,
        Self::EaseInElastic,
        Self::EaseOutElastic,
        Self::EaseInOutElastic,
        Self::EaseInBack,
        Self::EaseOutBack,
        Self::EaseInOutBack,
        Self::EaseInBounce,
        Self::EaseOutBounce,
        Self::EaseInOutBounce,
    ];

    /// Look up a curve by name, falling back to linear.
    pub fn from_name(name: &str) -> Self {
        Self::lookup(name).unwrap_or_default()
    }

    /// Exact lookup; `None` for unknown names.
    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|easing| easing.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseInQuad => "easeInQuad",
            Self::EaseOutQuad => "easeOutQuad",
            Self::EaseInOutQuad => "easeInOutQuad",
            Self::EaseInCubic => "easeInCubic",
            Self::EaseOutCubic => "easeOutCubic",
            Self::EaseInOutCubic => "easeInOutCubic",
            Self::EaseInQuart => "easeInQuart",
            Self::EaseOutQuart => "easeOutQuart",
            Self::EaseInOutQuart => "easeInOutQuart",
            Self::EaseInQuint => "easeInQuint",
            Self::EaseOutQuint => "easeOutQuint",
            Self::EaseInOutQuint => "easeInOutQuint",
            Self::EaseInSine => "easeInSine",
            Self::EaseOutSine => "easeOutSine",
            Self::EaseInOutSine => "easeInOutSine",
            Self::EaseInExpo => "easeInExpo",
            Self::EaseOutExpo => "easeOutExpo",
            Self::EaseInOutExpo => "easeInOutExpo",
            Self::EaseInCirc => "easeInCirc",
            Self::EaseOutCirc => "easeOutCirc",
            Self::EaseInOutCirc => "easeInOutCirc",
            Self::EaseInElastic => "easeInElastic",
            Self::EaseOutElastic => "easeOutElastic",
            Self::EaseInOutElastic => "easeInOutElastic",
            Self::EaseInBack => "easeInBack",
            Self::EaseOutBack => "easeOutBack",
            Self::EaseInOutBack => "easeInOutBack",
            Self::EaseInBounce => "easeInBounce",
            Self::EaseOutBounce => "easeOutBounce",
            Self::EaseInOutBounce => "easeInOutBounce",
        }
    }

    /// Eased progress for linear progress `p`. The input is not clamped.
    pub fn evaluate(self, p: f64) -> f64 {
        match self {
            Self::Linear => p,

            Self::EaseInQuad => p * p,
            Self::EaseOutQuad => -(p * (p - 2.0)),
            Self::EaseInOutQuad => {
                if p < 0.5 {
                    2.0 * p * p
                } else {
                    (-2.0 * p * p) + (4.0 * p) - 1.0
                }
            }

            Self::EaseInCubic => p * p * p,
            Self::EaseOutCubic => {
                let f = p - 1.0;
                f * f * f + 1.0
            }
            Self::EaseInOutCubic => {
                if p < 0.5 {
                    4.0 * p * p * p
                } else {
                    let f = (2.0 * p) - 2.0;
                    0.5 * f * f * f + 1.0
                }
            }

            Self::EaseInQuart => p * p * p * p,
            Self::EaseOutQuart => {
                let f = p - 1.0;
                f * f * f * (1.0 - p) + 1.0
            }
            Self::EaseInOutQuart => {
                if p < 0.5 {
                    8.0 * p * p * p * p
                } else {
                    let f = p - 1.0;
                    -8.0 * f * f * f * f + 1.0
                }
            }

            Self::EaseInQuint => p * p * p * p * p,
            Self::EaseOutQuint => {
                let f = p - 1.0;
                f * f * f * f * f + 1.0
            }
            Self::EaseInOutQuint => {
                if p < 0.5 {
                    16.0 * p * p * p * p * p
                } else {
                    let f = (2.0 * p) - 2.0;
                    0.5 * f * f * f * f * f + 1.0
                }
            }

            Self::EaseInSine => ((p - 1.0) * (PI / 2.0)).sin() + 1.0,
            Self::EaseOutSine => (p * (PI / 2.0)).sin(),
            Self::EaseInOutSine => 0.5 * (1.0 - (p * PI).cos()),

            Self::EaseInExpo => {
                if p == 0.0 {
                    p
                } else {
                    2f64.powf(10.0 * (p - 1.0))
                }
            }
            Self::EaseOutExpo => {
                if p == 1.0 {
                    p
                } else {
                    1.0 - 2f64.powf(-10.0 * p)
                }
            }
            Self::EaseInOutExpo => {
                if p == 0.0 || p == 1.0 {
                    p
                } else if p < 0.5 {
                    0.5 * 2f64.powf((20.0 * p) - 10.0)
                } else {
                    -0.5 * 2f64.powf((-20.0 * p) + 10.0) + 1.0
                }
            }

            Self::EaseInCirc => 1.0 - (1.0 - (p * p)).sqrt(),
            Self::EaseOutCirc => ((2.0 - p) * p).sqrt(),
            Self::EaseInOutCirc => {
                if p < 0.5 {
                    0.5 * (1.0 - (1.0 - 4.0 * (p * p)).sqrt())
                } else {
                    0.5 * ((-((2.0 * p) - 3.0) * ((2.0 * p) - 1.0)).sqrt() + 1.0)
                }
            }

            Self::EaseInElastic => (13.0 * (PI / 2.0) * p).sin() * 2f64.powf(10.0 * (p - 1.0)),
            Self::EaseOutElastic => {
                (-13.0 * (PI / 2.0) * (p + 1.0)).sin() * 2f64.powf(-10.0 * p) + 1.0
            }
            Self::EaseInOutElastic => {
                if p < 0.5 {
                    0.5 * (13.0 * (PI / 2.0) * (2.0 * p)).sin()
                        * 2f64.powf(10.0 * ((2.0 * p) - 1.0))
                } else {
                    0.5 * ((-13.0 * (PI / 2.0) * ((2.0 * p - 1.0) + 1.0)).sin()
                        * 2f64.powf(-10.0 * (2.0 * p - 1.0))
                        + 2.0)
                }
            }

            Self::EaseInBack => p * p * p - p * (p * PI).sin(),
            Self::EaseOutBack => {
                let f = 1.0 - p;
                1.0 - (f * f * f - f * (f * PI).sin())
            }
            Self::EaseInOutBack => {
                if p < 0.5 {
                    let f = 2.0 * p;
                    0.5 * (f * f * f - f * (f * PI).sin())
                } else {
                    let f = 1.0 - (2.0 * p - 1.0);
                    0.5 * (1.0 - (f * f * f - f * (f * PI).sin())) + 0.5
                }
            }

            Self::EaseInBounce => 1.0 - bounce_out(1.0 - p),
            Self::EaseOutBounce => bounce_out(p),
            Self::EaseInOutBounce => {
                if p < 0.5 {
                    0.5 * bounce_out(p * 2.0)
                } else {
                    0.5 * bounce_out(p * 2.0 - 1.0) + 0.5
                }
            }
        }
    }
}

/// Piecewise parabola over `[0, 4/11)`, `[4/11, 8/11)`, `[8/11, 9/10)` and
/// `[9/10, 1]`.
fn bounce_out(p: f64) -> f64 {
    if p < 4.0 / 11.0 {
        (121.0 * p * p) / 16.0
    } else if p < 8.0 / 11.0 {
        (363.0 / 40.0 * p * p) - (99.0 / 10.0 * p) + 17.0 / 5.0
    } else if p < 9.0 / 10.0 {
        (4356.0 / 361.0 * p * p) - (35442.0 / 1805.0 * p) + 16061.0 / 1805.0
    } else {
        (54.0 / 5.0 * p * p) - (513.0 / 25.0 * p) + 268.0 / 25.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn every_curve_starts_at_zero_and_ends_at_one() {
        for easing in Easing::ALL {
            assert!(
                approx_eq(easing.evaluate(0.0), 0.0),
                "{} at 0 = {}",
                easing.name(),
                easing.evaluate(0.0)
            );
            assert!(
                approx_eq(easing.evaluate(1.0), 1.0),
                "{} at 1 = {}",
                easing.name(),
                easing.evaluate(1.0)
            );
        }
    }

    #[test]
    fn bounce_matches_closed_form() {
        let expected = 363.0 / 40.0 * 0.25 - 99.0 / 10.0 * 0.5 + 17.0 / 5.0;
        assert_eq!(Easing::EaseOutBounce.evaluate(0.5), expected);
        assert_eq!(
            Easing::EaseInBounce.evaluate(0.5),
            1.0 - Easing::EaseOutBounce.evaluate(0.5)
        );
        assert!(approx_eq(Easing::EaseOutBounce.evaluate(0.2), 121.0 * 0.04 / 16.0));
        assert!(approx_eq(
            Easing::EaseOutBounce.evaluate(0.95),
            54.0 / 5.0 * 0.9025 - 513.0 / 25.0 * 0.95 + 268.0 / 25.0
        ));
    }

    #[test]
    fn back_curves_overshoot() {
        assert!(Easing::EaseInBack.evaluate(0.3) < 0.0);
        assert!(Easing::EaseOutBack.evaluate(0.7) > 1.0);
    }

    #[test]
    fn elastic_curves_match_closed_form_samples() {
        let samples = [
            (Easing::EaseOutElastic, 0.3, 0.876_538_957_425_607_7),
            (Easing::EaseInElastic, 0.7, 0.123_461_042_574_392_17),
            (Easing::EaseInOutElastic, 0.25, -0.011_048_543_456_039_811),
            (Easing::EaseInOutElastic, 0.75, 1.011_048_543_456_04),
        ];
        for (curve, p, expected) in samples {
            let actual = curve.evaluate(p);
            assert!(approx_eq(actual, expected), "{}({p}) = {actual}", curve.name());
        }
    }

    #[test]
    fn back_curves_match_closed_form_samples() {
        let expected_in = 0.3f64.powi(3) - 0.3 * (0.3 * PI).sin();
        assert!(approx_eq(Easing::EaseInBack.evaluate(0.3), expected_in));
        assert!(approx_eq(expected_in, -0.215_705_098_312_484_22));
        assert!(approx_eq(Easing::EaseOutBack.evaluate(0.7), 1.215_705_098_312_484_2));
        assert!(approx_eq(Easing::EaseInOutBack.evaluate(0.25), -0.1875));
    }

    #[test]
    fn in_out_curves_are_symmetric() {
        for easing in [
            Easing::EaseInOutQuad,
            Easing::EaseInOutCubic,
            Easing::EaseInOutQuart,
            Easing::EaseInOutQuint,
            Easing::EaseInOutSine,
            Easing::EaseInOutCirc,
        ] {
            assert!(approx_eq(easing.evaluate(0.5), 0.5), "{}", easing.name());
            assert!(
                approx_eq(easing.evaluate(0.25) + easing.evaluate(0.75), 1.0),
                "{}",
                easing.name()
            );
        }
    }

    #[test]
    fn name_lookup_is_exact() {
        for easing in Easing::ALL {
            assert_eq!(Easing::lookup(easing.name()), Some(easing));
        }
        assert_eq!(Easing::lookup("EaseOutBounce"), None);
        assert_eq!(Easing::from_name("swing"), Easing::Linear);
        assert_eq!(Easing::from_name(""), Easing::Linear);
    }

    #[test]
    fn serde_uses_curve_names() {
        let json = serde_json::to_string(&Easing::EaseInOutBack).unwrap();
        assert_eq!(json, "\"easeInOutBack\"");
        let parsed: Easing = serde_json::from_str("\"linear\"").unwrap();
        assert_eq!(parsed, Easing::Linear);
    }
}
