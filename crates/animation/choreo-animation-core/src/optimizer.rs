//! Semantics-preserving rewrites of an animation tree.
//!
//! - Dead-keyframe pruning: a descendant's keyframes for a property that an
//!   ancestor also keyframes are always overwritten, so they are removed;
//!   children left without content are dropped.
//! - Curve hoisting: a linear, content-free node whose content-bearing
//!   children all span its whole timeline with the same non-linear curve takes
//!   that curve over and the children become linear.

use hashbrown::HashSet;
use log::debug;

use crate::animation::child::AnimationNode;
use crate::animation::Animation;
use crate::curve::Curve;
use crate::property::PropertyPath;

/// Returns an optimized copy of `animation`.
pub fn optimize<E: 'static>(animation: &Animation<E>) -> Animation<E> {
    let mut optimized = animation.clone();
    let pruned = prune_shadowed(&mut optimized, &HashSet::new());
    let hoisted = hoist_curves(&mut optimized);
    debug!(
        "optimizer pruned {} keyframe series, hoisted {} curve(s)",
        pruned, hoisted
    );
    optimized
}

impl<E: 'static> Animation<E> {
    /// See [`optimize`].
    pub fn optimized(&self) -> Animation<E> {
        optimize(self)
    }
}

/// `shadowed` holds paths, relative to `node`, that an ancestor keyframes.
fn prune_shadowed(node: &mut dyn AnimationNode, shadowed: &HashSet<PropertyPath>) -> usize {
    let mut removed = node.remove_keyframes(shadowed);

    let mut covered = shadowed.clone();
    covered.extend(node.keyframe_paths());

    for index in 0..node.child_count() {
        let prefix = node.child_path(index).clone();
        let inherited: HashSet<PropertyPath> = covered
            .iter()
            .filter_map(|path| path.strip_prefix(&prefix))
            .collect();
        removed += prune_shadowed(node.child_node_mut(index), &inherited);
    }

    node.retain_children(&mut |child: &dyn AnimationNode| !child.is_empty());
    removed
}

fn hoist_curves(node: &mut dyn AnimationNode) -> usize {
    let mut hoisted = 0;
    if let Some(curve) = hoistable_curve(node) {
        for index in 0..node.child_count() {
            if !node.child_node(index).is_empty() {
                node.child_node_mut(index).set_curve(Curve::Linear);
            }
        }
        node.set_curve(curve);
        hoisted += 1;
    }
    for index in 0..node.child_count() {
        hoisted += hoist_curves(node.child_node_mut(index));
    }
    hoisted
}

fn hoistable_curve(node: &dyn AnimationNode) -> Option<Curve> {
    if !node.curve().is_linear() || node.has_own_content() {
        return None;
    }
    let mut shared: Option<&Curve> = None;
    for index in 0..node.child_count() {
        let child = node.child_node(index);
        if child.is_empty() {
            continue;
        }
        // Per-frame blocks observe raw progress, which hoisting would change.
        if node.child_span(index) != (0.0, 1.0) || child.has_per_frame_blocks() {
            return None;
        }
        match shared {
            None => shared = Some(child.curve()),
            Some(curve) if curve == child.curve() => {}
            Some(_) => return None,
        }
    }
    shared.filter(|curve| !curve.is_linear()).cloned()
}
