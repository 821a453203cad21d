mod common;

use approx::assert_abs_diff_eq;
use choreo_animation_core::{Animation, AnimationCurve, CubicBezierCurve, Curve, SpringCurve};
use common::{alpha, logger, View, INCL};

#[derive(Debug)]
struct Smoothstep;

impl AnimationCurve for Smoothstep {
    fn adjusted_progress(&self, raw: f64) -> f64 {
        raw * raw * (3.0 - 2.0 * raw)
    }

    fn raw_progress(&self, adjusted: f64) -> Vec<f64> {
        // Monotonic on [0, 1]: bisect.
        let (mut lo, mut hi) = (0.0, 1.0);
        for _ in 0..60 {
            let mid = 0.5 * (lo + hi);
            if self.adjusted_progress(mid) < adjusted {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        vec![0.5 * (lo + hi)]
    }
}

#[test]
fn builtin_curves_hit_both_endpoints() {
    let curves = [
        Curve::Linear,
        Curve::ParabolicEaseIn,
        Curve::ParabolicEaseOut,
        Curve::SinusoidalEaseInEaseOut,
        CubicBezierCurve::ease_in_ease_out().into(),
        SpringCurve::default().into(),
    ];
    for curve in &curves {
        assert_abs_diff_eq!(curve.adjusted_progress(0.0), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(curve.adjusted_progress(1.0), 1.0, epsilon = 1e-9);
    }
}

#[test]
fn inverses_recover_raw_progress() {
    let curves = [
        Curve::ParabolicEaseIn,
        Curve::ParabolicEaseOut,
        Curve::SinusoidalEaseInEaseOut,
        CubicBezierCurve::ease_in().into(),
        CubicBezierCurve::ease_out().into(),
    ];
    for curve in &curves {
        for raw in [0.1, 0.35, 0.8] {
            let adjusted = curve.adjusted_progress(raw);
            let back = curve.first_raw_progress(adjusted).unwrap();
            assert_abs_diff_eq!(back, raw, epsilon = 1e-6);
        }
    }
}

#[test]
fn unreachable_progress_has_no_raw_timestamp() {
    assert_eq!(Curve::ParabolicEaseIn.first_raw_progress(1.5), None);
    assert_eq!(Curve::Linear.first_raw_progress(-0.1), None);
}

#[test]
fn ease_in_ease_out_is_symmetric() {
    let curve: Curve = CubicBezierCurve::ease_in_ease_out().into();
    assert_abs_diff_eq!(curve.adjusted_progress(0.5), 0.5, epsilon = 1e-9);
    let a = curve.adjusted_progress(0.2);
    let b = curve.adjusted_progress(0.8);
    assert_abs_diff_eq!(a + b, 1.0, epsilon = 1e-9);
}

#[test]
fn spring_blocks_fire_on_first_arrival() {
    let mut anim: Animation<View> = Animation::new();
    anim.curve = SpringCurve::default().into();
    anim.add_forward_execution(1.0, logger("arrived"));

    // The underdamped spring reaches 1 well before its raw end.
    let mut view = View::default();
    anim.execute_blocks(&mut view, 0.0, INCL, 0.3);
    assert_eq!(view.log, vec!["arrived"]);
}

#[test]
fn custom_curves_drive_rendering_and_blocks() {
    let mut anim = Animation::new();
    anim.curve = Curve::custom(Smoothstep);
    anim.add_keyframe(&alpha(), 0.0, 0.0)
        .add_keyframe(&alpha(), 1.0, 1.0)
        .add_forward_execution(0.5, logger("middle"));

    let mut view = View::default();
    anim.render(&mut view, 0.25);
    assert_abs_diff_eq!(view.alpha, 0.15625);

    anim.execute_blocks(&mut view, 0.0, INCL, 0.49);
    assert!(view.log.is_empty());
    anim.execute_blocks(&mut view, 0.49, INCL, 0.51);
    assert_eq!(view.log, vec!["middle"]);
}

#[test]
fn curves_compare_by_value_and_custom_by_identity() {
    assert_eq!(Curve::ParabolicEaseIn, Curve::ParabolicEaseIn);
    assert_ne!(Curve::Linear, Curve::ParabolicEaseOut);
    assert_eq!(
        Curve::from(CubicBezierCurve::ease_in()),
        Curve::from(CubicBezierCurve::new(0.42, 0.0, 1.0, 1.0))
    );

    let custom = Curve::custom(Smoothstep);
    assert_eq!(custom, custom.clone());
    assert_ne!(custom, Curve::custom(Smoothstep));
}

#[test]
fn degenerate_springs_still_render() {
    let springs = [
        SpringCurve::new(0.5, 0.0).with_natural_frequency(0.0),
        SpringCurve::new(1e8, 0.0),
    ];
    for spring in springs {
        let mut anim = Animation::new();
        anim.curve = spring.into();
        anim.add_keyframe(&alpha(), 0.0, 0.0)
            .add_keyframe(&alpha(), 0.5, 0.8)
            .add_keyframe(&alpha(), 1.0, 1.0);

        let mut view = View::default();
        for raw in [0.1, 0.5, 0.9] {
            anim.render(&mut view, raw);
            assert!(view.alpha.is_finite());
        }
        anim.render(&mut view, 1.0);
        assert_eq!(view.alpha, 1.0);
    }
}
