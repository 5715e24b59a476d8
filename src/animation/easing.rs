//! Easing curves for pointer transitions.
//!
//! Both curves map `t` in `[0, 1]` to progress with `f(0) = 0` and
//! `f(1) = 1`. Inputs outside that range are clamped.

use std::f64::consts::TAU;

use crate::config::PointerConfig;

/// Period of the elastic curve, as a fraction of the transition
pub const ELASTIC_PERIOD: f64 = 0.8;

/// `2^(-10 t)` rescaled so it hits exactly 0 at `t = 1`
fn tpmt(t: f64) -> f64 {
    (2f64.powf(-10.0 * t) - 0.0009765625) * 1.0009775171065494
}

/// Exponential ease-out: fast start, long tail.
pub fn ease_exp_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - tpmt(t)
}

/// Elastic ease-out with amplitude 1 and the given period. Overshoots
/// past 1 before settling.
pub fn ease_elastic_out_with_period(t: f64, period: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    let p = period / TAU;
    let s = 1f64.asin() * p;
    1.0 - tpmt(t) * ((t + s) / p).sin()
}

pub fn ease_elastic_out(t: f64) -> f64 {
    ease_elastic_out_with_period(t, ELASTIC_PERIOD)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    ExpOut,
    ElasticOut,
}

impl Easing {
    pub fn for_pointer(config: &PointerConfig) -> Self {
        if config.elastic {
            Easing::ElasticOut
        } else {
            Easing::ExpOut
        }
    }

    pub fn apply(self, t: f64) -> f64 {
        match self {
            Easing::ExpOut => ease_exp_out(t),
            Easing::ElasticOut => ease_elastic_out(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn endpoints_are_exact() {
        for easing in [Easing::ExpOut, Easing::ElasticOut] {
            assert!(easing.apply(0.0).abs() < EPS, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < EPS, "{easing:?} at 1");
        }
    }

    #[test]
    fn exp_out_is_monotonic() {
        let mut last = 0.0;
        for i in 1..=100 {
            let v = ease_exp_out(i as f64 / 100.0);
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn elastic_overshoots() {
        let peak = (1..100)
            .map(|i| ease_elastic_out(i as f64 / 100.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.0, "peak = {peak}");
    }

    #[test]
    fn inputs_are_clamped() {
        assert_eq!(ease_exp_out(-1.0), ease_exp_out(0.0));
        assert_eq!(ease_elastic_out(2.0), ease_elastic_out(1.0));
    }

    #[test]
    fn pointer_config_selects_curve() {
        let mut cfg = PointerConfig::default();
        assert_eq!(Easing::for_pointer(&cfg), Easing::ExpOut);
        cfg.elastic = true;
        assert_eq!(Easing::for_pointer(&cfg), Easing::ElasticOut);
    }
}
