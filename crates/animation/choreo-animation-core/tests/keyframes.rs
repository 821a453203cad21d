mod common;

use approx::assert_abs_diff_eq;
use choreo_animation_core::{Animation, Curve, Property, Rect, Subelement};
use common::{alpha, frame, subview, subview_alpha, x, View};

fn fade_in() -> Animation<View> {
    let mut anim = Animation::new();
    anim.add_keyframe(&alpha(), 0.0, 0.0)
        .add_keyframe(&alpha(), 1.0, 1.0);
    anim
}

#[test]
fn keyframes_interpolate_between_brackets() {
    let mut anim = Animation::new();
    anim.add_keyframe(&x(), 0.0, 0.0)
        .add_keyframe(&x(), 0.5, 100.0)
        .add_keyframe(&x(), 1.0, 50.0);

    let mut view = View::default();
    anim.render(&mut view, 0.25);
    assert_abs_diff_eq!(view.x, 50.0);
    anim.render(&mut view, 0.75);
    assert_abs_diff_eq!(view.x, 75.0);
    anim.render(&mut view, 1.0);
    assert_abs_diff_eq!(view.x, 50.0);
}

#[test]
fn values_outside_the_keyframed_range_hold_the_nearest_end() {
    let mut anim = Animation::new();
    anim.add_keyframe(&x(), 0.25, 10.0)
        .add_keyframe(&x(), 0.75, 30.0);

    let mut view = View::default();
    anim.render(&mut view, 0.0);
    assert_eq!(view.x, 10.0);
    anim.render(&mut view, 1.0);
    assert_eq!(view.x, 30.0);
}

#[test]
fn curve_reshapes_progress_before_lookup() {
    let mut anim = fade_in();
    anim.curve = Curve::ParabolicEaseIn;

    let mut view = View::default();
    anim.render(&mut view, 0.5);
    assert_abs_diff_eq!(view.alpha, 0.25);
}

#[test]
fn structured_values_interpolate_componentwise() {
    let mut anim = Animation::new();
    anim.add_keyframe(&frame(), 0.0, Rect::new(0.0, 0.0, 10.0, 10.0))
        .add_keyframe(&frame(), 1.0, Rect::new(100.0, 50.0, 20.0, 30.0));

    let mut view = View::default();
    anim.render(&mut view, 0.5);
    assert_eq!(view.frame, Rect::new(50.0, 25.0, 15.0, 20.0));
}

#[test]
fn relative_keyframes_resolve_against_captured_values() {
    let mut anim = Animation::new();
    anim.add_relative_keyframe(&x(), 0.0, |v: &f64| *v)
        .add_relative_keyframe(&x(), 1.0, |v: &f64| v + 5.0);

    let mut view = View {
        x: 10.0,
        ..View::default()
    };
    anim.capture_initial_values(&view);
    anim.render(&mut view, 0.5);
    assert_abs_diff_eq!(view.x, 12.5);

    // Later frames keep resolving against the captured start.
    view.x = 100.0;
    anim.render(&mut view, 1.0);
    assert_abs_diff_eq!(view.x, 15.0);
}

#[test]
fn keyframes_of_another_value_type_replace_the_series() {
    let text_alpha: Property<View, String> = Property::new(
        "alpha",
        |v: &View| v.label.clone(),
        |v: &mut View, l| v.label = l,
    );

    let mut anim = fade_in();
    anim.add_keyframe(&text_alpha, 0.0, "hidden".to_string());
    assert_eq!(anim.keyframed_paths().len(), 1);

    let mut view = View::default();
    anim.render(&mut view, 0.5);
    assert_eq!(view.label, "hidden");
    assert_eq!(view.alpha, 0.0);
}

#[test]
fn child_window_clamps_outside_and_maps_inside() {
    let mut child = Animation::new();
    child
        .add_keyframe(&subview_alpha(), 0.0, 0.0)
        .add_keyframe(&subview_alpha(), 1.0, 1.0);
    let mut parent: Animation<View> = Animation::new();
    parent.add_child(child, &subview(), 0.3, 0.3).unwrap();

    let mut view = View::default();
    view.subview.alpha = 0.8;
    parent.render(&mut view, 0.2);
    assert_eq!(view.subview.alpha, 0.0);

    parent.render(&mut view, 0.45);
    assert_abs_diff_eq!(view.subview.alpha, 0.5, epsilon = 1e-12);

    parent.render(&mut view, 0.7);
    assert_eq!(view.subview.alpha, 1.0);
}

#[test]
fn pending_and_finished_children_settle_in_timeline_order() {
    let identity = Subelement::<View, View>::identity();
    let mut first = Animation::new();
    first.add_keyframe(&x(), 0.0, 10.0).add_keyframe(&x(), 1.0, 20.0);
    let mut second = Animation::new();
    second.add_keyframe(&x(), 0.0, 30.0).add_keyframe(&x(), 1.0, 40.0);

    let mut parent = Animation::new();
    parent
        .add_child(first, &identity, 0.2, 0.2)
        .unwrap()
        .add_child(second, &identity, 0.6, 0.2)
        .unwrap();

    let mut view = View::default();
    // Both pending: the earliest child's start state wins.
    parent.render(&mut view, 0.1);
    assert_eq!(view.x, 10.0);
    // Finished children are applied after pending ones.
    parent.render(&mut view, 0.5);
    assert_eq!(view.x, 20.0);
    // Both finished: the latest child's end state wins.
    parent.render(&mut view, 0.9);
    assert_eq!(view.x, 40.0);
}

#[test]
fn parent_keyframes_win_over_children() {
    let mut child = Animation::new();
    child
        .add_keyframe(&subview_alpha(), 0.0, 0.0)
        .add_keyframe(&subview_alpha(), 1.0, 1.0);
    let through = subview_alpha().through(&subview());
    assert_eq!(through.path().to_string(), "subview.alpha");

    let mut parent: Animation<View> = Animation::new();
    parent.add_child(child, &subview(), 0.0, 1.0).unwrap();
    parent.add_keyframe(&through, 0.0, 0.2);

    let mut view = View::default();
    parent.render(&mut view, 0.5);
    assert_eq!(view.subview.alpha, 0.2);
}

#[test]
fn per_frame_blocks_see_both_progress_values() {
    let mut anim = fade_in();
    anim.curve = Curve::ParabolicEaseIn;
    anim.add_per_frame_execution(|ctx| {
        let entry = format!("{:.2}/{:.2}", ctx.uncurved_progress, ctx.progress);
        ctx.element.log.push(entry);
    });

    let mut view = View::default();
    anim.render(&mut view, 0.5);
    assert_eq!(view.log, vec!["0.50/0.25"]);
    assert_abs_diff_eq!(view.alpha, 0.25);
}

#[test]
fn per_frame_blocks_of_inactive_children_do_not_run() {
    let mut child: Animation<View> = Animation::new();
    child.add_per_frame_execution(|ctx| ctx.element.log.push("child".to_string()));
    let mut parent = Animation::new();
    parent
        .add_child(child, &Subelement::identity(), 0.5, 0.5)
        .unwrap();

    let mut view = View::default();
    parent.render(&mut view, 0.25);
    assert!(view.log.is_empty());
    parent.render(&mut view, 0.75);
    assert_eq!(view.log, vec!["child"]);
}

#[test]
fn invalid_child_windows_are_rejected() {
    let mut parent: Animation<View> = Animation::new();
    assert!(parent
        .add_child(Animation::new(), &Subelement::identity(), 1.0, 0.1)
        .is_err());
    assert!(parent
        .add_child(Animation::new(), &Subelement::identity(), 0.5, 0.75)
        .is_err());
    assert_eq!(parent.child_count(), 0);
}
