//! Update decision engine.
//!
//! On every prop delivery, compare the previous snapshot with the next one
//! and decide between tearing elements down and rebuilding them, patching
//! existing elements in place, or doing nothing at all.
//!
//! Comparison is by value over the relevant config subtrees, so callers may
//! hand in freshly built props every time.

use crate::config::GaugeProps;

/// Which pointer representation a snapshot uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerMode {
    /// `value` + `pointer`
    Single,
    /// Non-empty `pointers` list
    Multi,
}

impl PointerMode {
    pub fn of(props: &GaugeProps) -> Self {
        if props.is_multi_pointer() {
            PointerMode::Multi
        } else {
            PointerMode::Single
        }
    }
}

/// A switch between single and multi pointer mode. The elements of the
/// `from` mode must be cleared before the `to` mode draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSwitch {
    pub from: PointerMode,
    pub to: PointerMode,
}

/// Element categories to tear down and recreate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RebuildSet {
    pub arcs: bool,
    pub ticks: bool,
    pub pointers: bool,
    pub value_label: bool,
}

impl RebuildSet {
    pub const ALL: RebuildSet = RebuildSet {
        arcs: true,
        ticks: true,
        pointers: true,
        value_label: true,
    };

    pub fn any(&self) -> bool {
        self.arcs || self.ticks || self.pointers || self.value_label
    }

    /// Does the change move geometry (and so need a fresh layout pass)?
    pub fn affects_layout(&self) -> bool {
        self.arcs || self.ticks || self.value_label
    }
}

/// In-place updates for elements that survive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatchSet {
    /// Pointer positions and value label text
    pub values: bool,
    /// Pointer color, length, width or animation settings
    pub pointer_style: bool,
}

impl PatchSet {
    pub fn any(&self) -> bool {
        self.values || self.pointer_style
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    /// First props for this gauge: build everything
    Initial,
    /// Recreate the listed categories; other categories may still need patching
    StructuralRebuild { rebuild: RebuildSet, patch: PatchSet },
    /// Keep every element, update attributes only
    IncrementalPatch(PatchSet),
    /// Nothing relevant changed; perform zero element operations
    NoOp,
}

/// The decision for one prop delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdatePlan {
    pub kind: UpdateKind,
    pub mode_switch: Option<ModeSwitch>,
}

impl UpdatePlan {
    pub fn is_rebuild(&self) -> bool {
        matches!(
            self.kind,
            UpdateKind::Initial | UpdateKind::StructuralRebuild { .. }
        )
    }

    pub fn is_incremental(&self) -> bool {
        matches!(self.kind, UpdateKind::IncrementalPatch(_))
    }

    pub fn is_noop(&self) -> bool {
        self.kind == UpdateKind::NoOp
    }

    /// Categories that will be torn down
    pub fn rebuild_set(&self) -> RebuildSet {
        match self.kind {
            UpdateKind::Initial => RebuildSet::ALL,
            UpdateKind::StructuralRebuild { rebuild, .. } => rebuild,
            _ => RebuildSet::default(),
        }
    }

    /// Patches to apply to surviving elements
    pub fn patch_set(&self) -> PatchSet {
        match self.kind {
            UpdateKind::StructuralRebuild { patch, .. } | UpdateKind::IncrementalPatch(patch) => {
                patch
            }
            _ => PatchSet::default(),
        }
    }
}

/// A mode switch only counts when the previous snapshot explicitly set
/// `pointers`. Going from unset to set is how multi-pointer gauges mount.
fn mode_switch(prev: &GaugeProps, next: &GaugeProps) -> Option<ModeSwitch> {
    prev.pointers.as_ref()?;
    let from = PointerMode::of(prev);
    let to = PointerMode::of(next);
    (from != to).then_some(ModeSwitch { from, to })
}

fn pointers_need_rebuild(prev: &GaugeProps, next: &GaugeProps) -> bool {
    let before = prev.pointer_values();
    let after = next.pointer_values();
    before.len() != after.len()
        || before
            .iter()
            .zip(&after)
            .any(|((_, a), (_, b))| !a.same_shape(b))
}

fn pointer_values_changed(prev: &GaugeProps, next: &GaugeProps) -> bool {
    let before = prev.pointer_values();
    let after = next.pointer_values();
    before.iter().zip(&after).any(|((a, _), (b, _))| a != b)
}

fn pointer_style_changed(prev: &GaugeProps, next: &GaugeProps) -> bool {
    let before = prev.pointer_values();
    let after = next.pointer_values();
    before.iter().zip(&after).any(|((_, a), (_, b))| a != b)
}

/// Classify the change from `prev` to `next`.
pub fn decide_update(prev: Option<&GaugeProps>, next: &GaugeProps) -> UpdatePlan {
    let Some(prev) = prev else {
        return UpdatePlan {
            kind: UpdateKind::Initial,
            mode_switch: None,
        };
    };

    if prev == next {
        return UpdatePlan {
            kind: UpdateKind::NoOp,
            mode_switch: None,
        };
    }

    let switch = mode_switch(prev, next);

    let geometry_changed = prev.gauge_type != next.gauge_type
        || prev.min_value != next.min_value
        || prev.max_value != next.max_value
        || prev.arc != next.arc;

    let rebuild = if geometry_changed {
        RebuildSet::ALL
    } else {
        RebuildSet {
            arcs: false,
            ticks: prev.labels.tick_labels != next.labels.tick_labels,
            pointers: switch.is_some() || pointers_need_rebuild(prev, next),
            value_label: prev.labels.value_label != next.labels.value_label,
        }
    };

    let patch = PatchSet {
        values: prev.value != next.value || pointer_values_changed(prev, next),
        pointer_style: !rebuild.pointers && pointer_style_changed(prev, next),
    };

    let kind = if rebuild.any() {
        UpdateKind::StructuralRebuild { rebuild, patch }
    } else if patch.any() {
        UpdateKind::IncrementalPatch(patch)
    } else {
        // Differences only in fields nothing is drawn from
        UpdateKind::NoOp
    };

    crate::log::debug!(?kind, ?switch, "update decision");

    UpdatePlan {
        kind,
        mode_switch: switch,
    }
}
