mod common;

use std::rc::Rc;

use approx::assert_abs_diff_eq;
use choreo_animation_core::{
    optimize, Animation, AnimationGroup, AnimationStatus, CancelationBehavior, Curve, Subelement,
};
use common::{alpha, logger, shared, subview, subview_alpha, x, View, INCL};

fn fade_in() -> Animation<View> {
    let mut anim = Animation::new();
    anim.add_keyframe(&alpha(), 0.0, 0.0)
        .add_keyframe(&alpha(), 1.0, 1.0);
    anim
}

fn slide() -> Animation<View> {
    let mut anim = Animation::new();
    anim.add_keyframe(&x(), 0.0, 0.0).add_keyframe(&x(), 1.0, 10.0);
    anim
}

#[test]
fn group_members_run_on_their_windows() {
    let a = shared(View::default());
    let b = shared(View::default());
    let mut group = AnimationGroup::new();
    group
        .add_animation(fade_in(), Rc::clone(&a), 0.0, 0.5)
        .unwrap()
        .add_animation(slide(), Rc::clone(&b), 0.5, 0.5)
        .unwrap()
        .set_implicit_duration(1.0);

    let mut instance = group.perform();
    instance.tick(0.25);
    assert_abs_diff_eq!(a.borrow().alpha, 0.5);
    assert_eq!(b.borrow().x, 0.0);

    instance.tick(0.75);
    assert_eq!(a.borrow().alpha, 1.0);
    assert_abs_diff_eq!(b.borrow().x, 5.0);

    instance.tick(1.5);
    assert_eq!(b.borrow().x, 10.0);
    assert_eq!(instance.status(), AnimationStatus::Complete);
}

#[test]
fn nested_groups_compose_windows() {
    let view = shared(View::default());
    let mut inner = AnimationGroup::new();
    inner.add_animation(slide(), Rc::clone(&view), 0.0, 1.0).unwrap();

    let mut outer = AnimationGroup::new();
    outer.add_group(inner, 0.5, 0.5).unwrap();
    outer.set_implicit_duration(2.0);
    assert_eq!(outer.animation().child_count(), 1);

    let mut instance = outer.perform();
    instance.tick(0.5);
    assert_eq!(view.borrow().x, 0.0);
    instance.tick(1.5);
    assert_abs_diff_eq!(view.borrow().x, 5.0);
}

#[test]
fn group_blocks_reach_member_elements() {
    let view = shared(View::default());
    let mut member = Animation::new();
    member.add_execution(0.5, logger("on"), logger("off"));
    let mut group = AnimationGroup::new();
    group
        .add_animation(member, Rc::clone(&view), 0.0, 1.0)
        .unwrap()
        .set_implicit_duration(1.0);

    let mut instance = group.perform();
    instance.tick(0.75);
    assert_eq!(view.borrow().log, vec!["on"]);

    instance.cancel(CancelationBehavior::Revert);
    assert_eq!(view.borrow().log, vec!["on", "off"]);
}

fn sample(anim: &Animation<View>, raw: f64) -> View {
    let mut view = View::default();
    anim.render(&mut view, raw);
    view
}

#[test]
fn shadowed_child_keyframes_are_pruned() {
    let mut child = Animation::new();
    child
        .add_keyframe(&subview_alpha(), 0.0, 0.0)
        .add_keyframe(&subview_alpha(), 1.0, 1.0);
    let mut parent: Animation<View> = Animation::new();
    parent
        .add_child(child, &subview(), 0.25, 0.5)
        .unwrap()
        .add_keyframe(&subview_alpha().through(&subview()), 0.0, 0.2)
        .add_keyframe(&subview_alpha().through(&subview()), 1.0, 0.6);

    let optimized = optimize(&parent);
    assert_eq!(parent.child_count(), 1);
    assert_eq!(optimized.child_count(), 0);

    for raw in [0.0, 0.3, 0.5, 0.9, 1.0] {
        assert_eq!(sample(&optimized, raw), sample(&parent, raw));
    }
}

#[test]
fn children_keep_unshadowed_keyframes() {
    let mut child = Animation::new();
    child
        .add_keyframe(&subview_alpha().through(&subview()), 1.0, 1.0)
        .add_keyframe(&alpha(), 1.0, 1.0);
    let mut parent: Animation<View> = Animation::new();
    parent
        .add_child(child, &Subelement::identity(), 0.0, 1.0)
        .unwrap()
        .add_keyframe(&alpha(), 0.0, 0.5);

    let optimized = parent.optimized();
    assert_eq!(optimized.child_count(), 1);
    for raw in [0.0, 0.5, 1.0] {
        assert_eq!(sample(&optimized, raw), sample(&parent, raw));
    }
}

#[test]
fn shared_child_curves_are_hoisted() {
    let identity = Subelement::<View, View>::identity();
    let mut fade = fade_in();
    fade.curve = Curve::ParabolicEaseIn;
    let mut move_x = slide();
    move_x.curve = Curve::ParabolicEaseIn;

    let mut parent = Animation::new();
    parent
        .add_child(fade, &identity, 0.0, 1.0)
        .unwrap()
        .add_child(move_x, &identity, 0.0, 1.0)
        .unwrap();

    let optimized = optimize(&parent);
    assert_eq!(optimized.curve, Curve::ParabolicEaseIn);
    assert!(parent.curve.is_linear());

    for raw in [0.0, 0.2, 0.5, 0.77, 1.0] {
        assert_eq!(sample(&optimized, raw), sample(&parent, raw));
    }
}

#[test]
fn mixed_child_curves_are_left_alone() {
    let identity = Subelement::<View, View>::identity();
    let mut fade = fade_in();
    fade.curve = Curve::ParabolicEaseIn;
    let mut move_x = slide();
    move_x.curve = Curve::ParabolicEaseOut;

    let mut parent = Animation::new();
    parent
        .add_child(fade, &identity, 0.0, 1.0)
        .unwrap()
        .add_child(move_x, &identity, 0.0, 1.0)
        .unwrap();

    assert!(optimize(&parent).curve.is_linear());
}

#[test]
fn optimized_blocks_fire_at_the_same_times() {
    let identity = Subelement::<View, View>::identity();
    let mut child = fade_in();
    child.curve = Curve::ParabolicEaseIn;
    child.add_forward_execution(0.25, logger("quarter"));
    let mut parent = Animation::new();
    parent.add_child(child, &identity, 0.0, 1.0).unwrap();

    let mut optimized = optimize(&parent);
    assert_eq!(optimized.curve, Curve::ParabolicEaseIn);

    // Curved 0.25 is raw 0.5 either way.
    for anim in [&mut parent, &mut optimized] {
        let mut view = View::default();
        anim.execute_blocks(&mut view, 0.0, INCL, 0.49);
        assert!(view.log.is_empty());
        anim.execute_blocks(&mut view, 0.49, INCL, 0.51);
        assert_eq!(view.log, vec!["quarter"]);
    }
}
