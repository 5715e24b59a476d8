//! Gauge renderer
//!
//! This module is organized into submodules:
//! - `scene`: the retained element store and its operation log
//! - `arc`, `pointer`, `ticks`: drawing of arc bands, pointers and ticks
//! - `measure`: content measurement for the second layout pass
//! - `svg`: SVG generation
//! - `context`: per-gauge runtime state
//! - `defaults`: renderer settings
//!
//! A [`Gauge`] ties them together. Layout is a two-pass protocol: the first
//! pass draws a hidden scene with generous padding, a [`Measure`]
//! implementation reports what was actually drawn, and the refit layout is
//! committed only when it differs meaningfully from the committed one.

pub mod arc;
pub mod context;
pub mod defaults;
pub mod measure;
pub mod pointer;
pub mod scene;
pub mod svg;
pub mod ticks;

pub use context::{GaugeRuntimeState, LayoutTicket, PendingLayout};
pub use measure::{Measure, SceneMeasurer};
pub use scene::{Category, Element, ElementId, Node, Scene, SceneOp, TextAnchor};

use std::cell::RefCell;
use std::rc::Rc;

use crate::animation::{
    AnimationCoordinator, PointerContext, PointerTransition, SharedPointerContext,
    pointer_animation,
};
use crate::config::{GaugeProps, GaugeType, PointerConfig, PointerType, format_value, percent_of};
use crate::errors::{GaugeError, GeometryError};
use crate::layout::padding::padded_profile;
use crate::layout::{
    DEFAULT_MARGIN, DEFAULT_STABILITY_TOLERANCE, Layout, MAX_MARGIN, PaddingConfig,
    calculate_layout_from_measured_bounds, calculate_optimal_radius, is_layout_stable,
    sanitize_container, tick_scale_factor, validate_layout,
};
use crate::types::{Bounds, Point, Size};
use crate::update::{UpdateKind, UpdatePlan, decide_update};

/// Result of completing a layout request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutOutcome {
    /// A new layout was committed and the scene redrawn
    Committed(Layout),
    /// The refit layout was within tolerance of the committed one, which
    /// stays in place untouched
    Unchanged(Layout),
}

impl LayoutOutcome {
    pub fn layout(&self) -> &Layout {
        match self {
            LayoutOutcome::Committed(l) | LayoutOutcome::Unchanged(l) => l,
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, LayoutOutcome::Committed(_))
    }
}

/// Baseline drop of the value label below the arc opening, relative to its
/// font size
const VALUE_LABEL_DROP: f64 = 0.3;

// ============================================================================
// Drawing
// ============================================================================

/// First-pass layout: the dynamic padding model, scaled up so nothing drawn
/// can fall outside the surface before it is measured.
fn provisional_layout(container: Size, props: &GaugeProps, margin: f64) -> Layout {
    let config = PaddingConfig::from_props(props);
    let profile = padded_profile(
        container.width,
        container.height,
        props.gauge_type,
        margin,
        &config,
    )
    .scaled(defaults::PROVISIONAL_PADDING_SCALE);
    let radius = calculate_optimal_radius(container.width, container.height, profile, margin);
    Layout::from_radius(radius, &profile, props.arc.width)
}

fn value_label_node(props: &GaugeProps, layout: &Layout) -> Node {
    let cfg = &props.labels.value_label;
    let value = props
        .pointer_values()
        .first()
        .map_or(props.value, |(v, _)| *v);
    let font = cfg.font_size * tick_scale_factor(layout.outer_radius);
    let baseline = match props.gauge_type {
        GaugeType::Semicircle => font,
        ty => layout.outer_radius * ty.arc_bottom_extent() + font * VALUE_LABEL_DROP,
    };
    let fill = if cfg.match_color_with_arc {
        arc::color_at(props, value).unwrap_or_else(|| cfg.color.clone())
    } else {
        cfg.color.clone()
    };
    Node::Text {
        position: Point::new(0.0, baseline),
        text: format_value(value, cfg.max_decimal_digits),
        font_size: font,
        fill,
        anchor: TextAnchor::Middle,
    }
}

/// Pointer nodes at their currently displayed positions. Only the visible
/// scene records the drawn path back into the animation context.
fn pointer_nodes(
    props: &GaugeProps,
    layout: &Layout,
    pointers: &[SharedPointerContext],
    record_paths: bool,
) -> Vec<Node> {
    props
        .pointer_values()
        .iter()
        .zip(pointers)
        .map(|((_, config), ctx)| {
            let mut ctx = ctx.borrow_mut();
            let (node, path) =
                pointer::pointer_node(config, layout, props.gauge_type, ctx.displayed_percent());
            if record_paths {
                ctx.path = path;
            }
            node
        })
        .collect()
}

fn draw_category(
    scene: &mut Scene,
    category: Category,
    props: &GaugeProps,
    layout: &Layout,
    pointers: &[SharedPointerContext],
) {
    let nodes = match category {
        Category::Arcs => arc::arc_nodes(props, layout),
        Category::Ticks => ticks::tick_nodes(props, layout),
        Category::Pointers => pointer_nodes(props, layout, pointers, scene.is_visible()),
        Category::ValueLabel if props.labels.value_label.hide => Vec::new(),
        Category::ValueLabel => vec![value_label_node(props, layout)],
    };
    for (index, node) in nodes.into_iter().enumerate() {
        scene.create(category, index, node);
    }
}

fn draw_all(
    scene: &mut Scene,
    props: &GaugeProps,
    layout: &Layout,
    pointers: &[SharedPointerContext],
) {
    for category in Category::ALL {
        draw_category(scene, category, props, layout, pointers);
    }
}

fn patch_pointers(
    scene: &mut Scene,
    props: &GaugeProps,
    layout: &Layout,
    pointers: &[SharedPointerContext],
) {
    let nodes = pointer_nodes(props, layout, pointers, scene.is_visible());
    for (index, node) in nodes.into_iter().enumerate() {
        scene.patch(Category::Pointers, index, node);
    }
}

fn patch_value_label(scene: &mut Scene, props: &GaugeProps, layout: &Layout) {
    if !props.labels.value_label.hide {
        scene.patch(Category::ValueLabel, 0, value_label_node(props, layout));
    }
}

/// Do `prev` and `next` differ in anything that moves the drawn extent?
///
/// Covers the padding model's inputs and every pointer's footprint. Such a
/// change can arrive as an in-place patch (a longer needle) and still need
/// a fresh layout.
fn layout_inputs_changed(prev: &GaugeProps, next: &GaugeProps) -> bool {
    if PaddingConfig::from_props(prev) != PaddingConfig::from_props(next) {
        return true;
    }
    let footprint = |c: &PointerConfig| (c.pointer_type, c.length, c.width, c.hide);
    let before = prev.pointer_values();
    let after = next.pointer_values();
    before.len() != after.len()
        || before
            .iter()
            .zip(&after)
            .any(|((_, a), (_, b))| footprint(*a) != footprint(*b))
}

// ============================================================================
// Two-pass refit
// ============================================================================

/// Does content measured relative to the center fit the layout's viewBox?
fn fits(layout: &Layout, measured: &Bounds) -> bool {
    layout.view_box.contains(
        &measured.translated(layout.gauge_center),
        defaults::CONTAINMENT_EPSILON,
    )
}

/// Measure the hidden scene and refit until the content fits.
///
/// Decorations with a clamped scale (text on small gauges) do not shrink
/// with the radius, so one refit can leave an overflow that the next
/// rounds absorb. Content that still overflows after
/// [`REFINE_PASSES`](defaults::REFINE_PASSES) rounds is an error: a clipped
/// gauge is never returned.
fn refine_pending<M: Measure + ?Sized>(
    pending: PendingLayout,
    props: &GaugeProps,
    pointers: &[SharedPointerContext],
    measurer: &mut M,
) -> Result<Layout, GeometryError> {
    let PendingLayout {
        container,
        mut layout,
        mut scene,
        ..
    } = pending;

    let mut bounds = measurer.measure(&scene);
    let mut refits = 0;
    while let Some(measured) = bounds {
        if refits > 0 && fits(&layout, &measured) {
            break;
        }
        if refits == defaults::REFINE_PASSES {
            crate::log::warn!(
                width = container.width,
                height = container.height,
                refits,
                "content still exceeds the viewBox after refitting"
            );
            return Err(GeometryError::ContentOverflow {
                width: measured.width,
                height: measured.height,
                view_width: layout.view_box.width,
                view_height: layout.view_box.height,
            });
        }
        let next = calculate_layout_from_measured_bounds(
            container.width,
            container.height,
            measured,
            props.gauge_type,
            props.arc.width,
            &layout,
        )?;
        validate_layout(&next)?;

        scene = Scene::hidden();
        draw_all(&mut scene, props, &next, pointers);
        layout = next;
        bounds = measurer.measure(&scene);
        refits += 1;
    }

    validate_layout(&layout)?;
    Ok(layout)
}

// ============================================================================
// Gauge
// ============================================================================

/// One gauge instance: its props, committed layout, drawn elements and
/// pointer animations.
pub struct Gauge {
    id: String,
    coordinator: Option<AnimationCoordinator>,
    margin: f64,
    tolerance: f64,
    state: GaugeRuntimeState,
}

impl std::fmt::Debug for Gauge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gauge")
            .field("id", &self.id)
            .field("layout", &self.state.layout)
            .field("elements", &self.state.scene.elements().len())
            .field("generation", &self.state.generation)
            .finish()
    }
}

impl Gauge {
    /// `id` must be unique among gauges sharing a coordinator; animation
    /// ids are derived from it.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            coordinator: None,
            margin: DEFAULT_MARGIN,
            tolerance: DEFAULT_STABILITY_TOLERANCE,
            state: GaugeRuntimeState::new(),
        }
    }

    /// Animate pointer transitions on `coordinator`. Without one, pointers
    /// jump straight to their targets.
    pub fn with_coordinator(mut self, coordinator: AnimationCoordinator) -> Self {
        self.coordinator = Some(coordinator);
        self
    }

    /// Container margin per side, as a fraction of each dimension
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = if margin.is_finite() {
            margin.clamp(0.0, MAX_MARGIN)
        } else {
            DEFAULT_MARGIN
        };
        self
    }

    pub fn with_stability_tolerance(mut self, tolerance: f64) -> Self {
        if tolerance.is_finite() && tolerance > 0.0 {
            self.tolerance = tolerance;
        }
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn props(&self) -> Option<&GaugeProps> {
        self.state.props.as_ref()
    }

    /// The committed layout
    pub fn layout(&self) -> Option<&Layout> {
        self.state.layout.as_ref()
    }

    pub fn scene(&self) -> &Scene {
        &self.state.scene
    }

    /// Drain the visible scene's operation log
    pub fn take_ops(&mut self) -> Vec<SceneOp> {
        self.state.scene.take_ops()
    }

    pub fn state(&self) -> &GaugeRuntimeState {
        &self.state
    }

    /// Do the current props need a new layout pass?
    pub fn needs_layout(&self) -> bool {
        self.state.needs_layout
    }

    /// Snapshot of each pointer's animation state
    pub fn pointer_contexts(&self) -> Vec<PointerContext> {
        self.state
            .pointers
            .iter()
            .map(|ctx| ctx.borrow().clone())
            .collect()
    }

    /// Coordinator id of the animation driving pointer `index`
    pub fn animation_id(&self, index: usize) -> String {
        format!("{}/pointer-{}", self.id, index)
    }

    /// Match the pointer contexts to `props`: one per drawn pointer, each
    /// aimed at its value. Moved pointers animate through the coordinator
    /// when configured to, and jump otherwise.
    fn sync_pointer_contexts(&mut self, props: &GaugeProps, stagger: bool) {
        let values = props.pointer_values();

        while self.state.pointers.len() > values.len() {
            self.state.pointers.pop();
            let id = self.animation_id(self.state.pointers.len());
            if let Some(coordinator) = &self.coordinator {
                coordinator.unregister(&id);
            }
        }
        while self.state.pointers.len() < values.len() {
            self.state
                .pointers
                .push(Rc::new(RefCell::new(PointerContext::at(0.0))));
        }

        for (index, ((value, config), ctx)) in values.iter().zip(&self.state.pointers).enumerate() {
            let percent = percent_of(*value, props.min_value, props.max_value);
            let mut context = ctx.borrow_mut();
            context.should_draw_path = !config.hide && config.pointer_type != PointerType::Blob;
            if !context.retarget(percent) {
                continue;
            }
            match &self.coordinator {
                Some(coordinator) if config.animate => {
                    drop(context);
                    let offset = if stagger {
                        coordinator.stagger_delay(0.0)
                    } else {
                        0.0
                    };
                    coordinator.register(
                        self.animation_id(index),
                        defaults::POINTER_PRIORITY - index as i32,
                        pointer_animation(
                            Rc::clone(ctx),
                            PointerTransition::from_config(config, offset),
                        ),
                    );
                }
                _ => context.settle(percent),
            }
        }
    }

    /// Deliver new props and apply the resulting update plan to the drawn
    /// elements.
    ///
    /// Categories being rebuilt are all cleared before any is recreated. A
    /// no-op plan touches no element. When the plan affects geometry,
    /// [`needs_layout`](Self::needs_layout) turns true and any outstanding
    /// layout ticket goes stale.
    pub fn set_props(&mut self, props: GaugeProps) -> UpdatePlan {
        let plan = decide_update(self.state.props.as_ref(), &props);
        crate::log::debug!(gauge = %self.id, kind = ?plan.kind, "props delivered");

        if plan.is_noop() {
            self.state.props = Some(props);
            return plan;
        }

        let rebuild = plan.rebuild_set();
        let patch = plan.patch_set();
        let initial = plan.kind == UpdateKind::Initial;
        let geometry_moved = self
            .state
            .props
            .as_ref()
            .is_none_or(|prev| layout_inputs_changed(prev, &props));

        self.sync_pointer_contexts(&props, initial);

        if let Some(layout) = self.state.layout {
            let state = &mut self.state;
            if plan.mode_switch.is_some() {
                state.scene.clear(Category::Pointers);
            }
            let categories: Vec<Category> = Category::ALL
                .into_iter()
                .filter(|c| c.in_set(&rebuild))
                .collect();
            for &category in &categories {
                state.scene.clear(category);
            }
            for &category in &categories {
                draw_category(&mut state.scene, category, &props, &layout, &state.pointers);
            }
            if patch.any() && !rebuild.pointers {
                patch_pointers(&mut state.scene, &props, &layout, &state.pointers);
            }
            if patch.values && !rebuild.value_label {
                patch_value_label(&mut state.scene, &props, &layout);
            }
        }

        // Patched elements may still outgrow the committed viewBox
        if initial || rebuild.affects_layout() || geometry_moved {
            self.state.needs_layout = true;
            self.state.bump_generation();
        }
        self.state.props = Some(props);
        plan
    }

    /// Start a layout pass for a `width x height` container: draw the hidden
    /// first pass and hand out its ticket. Any earlier ticket goes stale.
    pub fn request_layout(&mut self, width: f64, height: f64) -> Result<LayoutTicket, GaugeError> {
        let props = self.state.props.as_ref().ok_or(GaugeError::NotInitialized)?;
        let container = sanitize_container(width, height);
        let layout = provisional_layout(container, props, self.margin);
        let mut scene = Scene::hidden();
        draw_all(&mut scene, props, &layout, &self.state.pointers);

        let ticket = LayoutTicket(self.state.bump_generation());
        crate::log::debug!(
            gauge = %self.id,
            ticket = ticket.0,
            width = container.width,
            height = container.height,
            radius = layout.outer_radius,
            "layout pass 1"
        );
        self.state.pending = Some(PendingLayout {
            ticket,
            container,
            layout,
            scene,
        });
        Ok(ticket)
    }

    /// The hidden first-pass scene awaiting measurement, as SVG
    pub fn pending_svg(&self) -> Option<String> {
        self.state
            .pending
            .as_ref()
            .map(|p| svg::render_svg(&p.scene, &p.layout))
    }

    /// Finish the layout pass for `ticket`: measure, refit, validate, and
    /// commit unless the result is within tolerance of the committed layout
    /// and no prop change has asked for a new one.
    ///
    /// A superseded ticket is rejected without touching any state. On a
    /// geometry error the committed layout stays as it was.
    pub fn complete_layout<M: Measure + ?Sized>(
        &mut self,
        ticket: LayoutTicket,
        measurer: &mut M,
    ) -> Result<LayoutOutcome, GaugeError> {
        let current = self.state.generation;
        let pending = match self.state.pending.take() {
            Some(p) if p.ticket == ticket => p,
            other => {
                self.state.pending = other;
                crate::log::debug!(
                    gauge = %self.id,
                    ticket = ticket.0,
                    current,
                    "stale layout ticket discarded"
                );
                return Err(GaugeError::StaleLayoutTicket {
                    ticket: ticket.0,
                    current,
                });
            }
        };

        let props = self.state.props.as_ref().ok_or(GaugeError::NotInitialized)?;
        let candidate = match refine_pending(pending, props, &self.state.pointers, measurer) {
            Ok(layout) => layout,
            Err(err) => {
                crate::log::warn!(
                    gauge = %self.id,
                    error = %err,
                    "refit failed; keeping last good layout"
                );
                return Err(err.into());
            }
        };

        // Props that moved the drawn extent always redraw
        if let Some(committed) = self.state.layout.filter(|_| !self.state.needs_layout) {
            if is_layout_stable(Some(&committed), &candidate, self.tolerance) {
                crate::log::debug!(gauge = %self.id, "layout stable; skipping re-commit");
                return Ok(LayoutOutcome::Unchanged(committed));
            }
        }

        self.commit(candidate);
        crate::log::info!(
            gauge = %self.id,
            radius = candidate.outer_radius,
            view_box = %candidate.view_box,
            "layout committed"
        );
        Ok(LayoutOutcome::Committed(candidate))
    }

    /// Both passes in one call, measuring with [`SceneMeasurer`]
    pub fn resize(&mut self, width: f64, height: f64) -> Result<LayoutOutcome, GaugeError> {
        let ticket = self.request_layout(width, height)?;
        self.complete_layout(ticket, &mut SceneMeasurer)
    }

    fn commit(&mut self, layout: Layout) {
        let state = &mut self.state;
        let Some(props) = state.props.as_ref() else {
            return;
        };
        state.scene.clear_all();
        state.scene.set_opacity(1.0);
        draw_all(&mut state.scene, props, &layout, &state.pointers);
        state.layout = Some(layout);
        state.needs_layout = false;
    }

    /// Move pointer elements to their animated positions. Call once per
    /// frame while animations run.
    pub fn refresh_pointers(&mut self) {
        let state = &mut self.state;
        if let (Some(props), Some(layout)) = (state.props.as_ref(), state.layout.as_ref()) {
            patch_pointers(&mut state.scene, props, layout, &state.pointers);
        }
    }

    /// The committed scene as SVG, or `None` when no valid layout was ever
    /// committed.
    pub fn render_svg(&mut self) -> Option<String> {
        self.refresh_pointers();
        let layout = self.state.layout.as_ref()?;
        Some(svg::render_svg(&self.state.scene, layout))
    }

    fn unregister_animations(&self) {
        if let Some(coordinator) = &self.coordinator {
            for index in 0..self.state.pointers.len() {
                coordinator.unregister(&self.animation_id(index));
            }
        }
    }

    /// Stop this gauge's animations and drop all of its state.
    pub fn unmount(&mut self) {
        self.unregister_animations();
        self.state.scene.clear_all();
        self.state = GaugeRuntimeState::new();
        crate::log::debug!(gauge = %self.id, "unmounted");
    }
}

impl Drop for Gauge {
    fn drop(&mut self) {
        self.unregister_animations();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::FrameQueue;
    use crate::config::{ArcConfig, PointerConfig, PointerSpec, SubArc, Tick};
    use crate::update::ModeSwitch;

    fn mounted(props: GaugeProps) -> Gauge {
        let mut gauge = Gauge::new("g");
        gauge.set_props(props);
        gauge.resize(400.0, 300.0).unwrap();
        gauge.take_ops();
        gauge
    }

    fn creates(ops: &[SceneOp], category: Category) -> usize {
        ops.iter()
            .filter(|op| matches!(op, SceneOp::Create { category: c, .. } if *c == category))
            .count()
    }

    #[test]
    fn layout_before_props_is_rejected() {
        let mut gauge = Gauge::new("g");
        assert_eq!(gauge.request_layout(100.0, 100.0), Err(GaugeError::NotInitialized));
        assert_eq!(gauge.render_svg(), None);
    }

    #[test]
    fn first_layout_commits_and_draws_everything() {
        let gauge = mounted(GaugeProps::default());
        let scene = gauge.scene();
        assert_eq!(scene.count(Category::Arcs), 3);
        assert_eq!(scene.count(Category::Ticks), 2);
        assert_eq!(scene.count(Category::Pointers), 1);
        assert_eq!(scene.count(Category::ValueLabel), 1);
        assert!(scene.is_visible());
        assert!(!gauge.needs_layout());
    }

    #[test]
    fn pass_one_scene_is_hidden() {
        let mut gauge = Gauge::new("g");
        gauge.set_props(GaugeProps::default());
        gauge.request_layout(300.0, 200.0).unwrap();
        let svg = gauge.pending_svg().unwrap();
        assert!(svg.contains("opacity: 0"));
    }

    #[test]
    fn noop_update_touches_nothing() {
        let mut gauge = mounted(GaugeProps::default().with_value(40.0));
        let plan = gauge.set_props(GaugeProps::default().with_value(40.0));
        assert!(plan.is_noop());
        assert!(gauge.take_ops().is_empty());
    }

    #[test]
    fn value_change_patches_without_recreating() {
        let mut gauge = mounted(GaugeProps::default().with_value(40.0));
        gauge.set_props(GaugeProps::default().with_value(60.0));
        let ops = gauge.take_ops();
        assert!(!ops.is_empty());
        assert!(ops.iter().all(|op| matches!(op, SceneOp::Patch { .. })), "{ops:?}");
        assert_eq!(gauge.scene().count(Category::Pointers), 1);
    }

    #[test]
    fn structural_rebuild_clears_before_creating() {
        let mut gauge = mounted(GaugeProps::default());
        let arc = ArcConfig::default()
            .with_sub_arcs(vec![SubArc::new(50.0, "#0f0"), SubArc::new(100.0, "#f00")]);
        gauge.set_props(GaugeProps::default().with_arc(arc));
        let ops = gauge.take_ops();
        let first_create = ops.iter().position(|op| matches!(op, SceneOp::Create { .. })).unwrap();
        let last_remove = ops.iter().rposition(|op| matches!(op, SceneOp::Remove { .. })).unwrap();
        assert!(last_remove < first_create);
        assert_eq!(gauge.scene().count(Category::Arcs), 2);
        assert_eq!(gauge.scene().count(Category::Pointers), 1);
        assert!(gauge.needs_layout());
    }

    #[test]
    fn pointer_type_change_recreates_pointer_only() {
        let mut gauge = mounted(GaugeProps::default());
        let arrow = PointerConfig::default().with_type(PointerType::Arrow);
        gauge.set_props(GaugeProps::default().with_pointer(arrow));
        let ops = gauge.take_ops();
        assert!(ops.iter().all(|op| op.category() == Category::Pointers));
        assert_eq!(creates(&ops, Category::Pointers), 1);
        assert_eq!(gauge.scene().count(Category::Pointers), 1);
        assert!(gauge.needs_layout(), "a different shape has a different extent");
    }

    fn content_fits(gauge: &Gauge) -> bool {
        let layout = gauge.layout().unwrap();
        let measured = SceneMeasurer.measure(gauge.scene()).unwrap();
        layout
            .view_box
            .contains(&measured.translated(layout.gauge_center), 0.01)
    }

    #[test]
    fn longer_needle_patches_in_place_and_requests_layout() {
        let mut gauge = mounted(GaugeProps::new(GaugeType::Semicircle));
        let long = PointerConfig::default().with_length(1.6);
        let plan = gauge.set_props(GaugeProps::new(GaugeType::Semicircle).with_pointer(long));
        assert!(plan.is_incremental());
        assert!(gauge.needs_layout());

        gauge.resize(400.0, 300.0).unwrap();
        assert!(!gauge.needs_layout());
        assert!(content_fits(&gauge));
    }

    #[test]
    fn pointer_shape_change_refits_the_view_box() {
        let mut gauge = mounted(GaugeProps::new(GaugeType::Semicircle));
        let blob = PointerConfig::default().with_type(PointerType::Blob);
        gauge.set_props(GaugeProps::new(GaugeType::Semicircle).with_pointer(blob));
        assert!(gauge.needs_layout());
        gauge.resize(400.0, 300.0).unwrap();
        assert!(content_fits(&gauge));
    }

    #[test]
    fn pointer_color_change_keeps_the_layout() {
        let mut gauge = mounted(GaugeProps::default());
        let red = PointerConfig::default().with_color("#f00");
        let plan = gauge.set_props(GaugeProps::default().with_pointer(red));
        assert!(plan.is_incremental());
        assert!(!gauge.needs_layout());
    }

    #[test]
    fn mode_switch_never_duplicates_pointers() {
        let two = vec![PointerSpec::new(20.0), PointerSpec::new(80.0)];
        let mut gauge = mounted(GaugeProps::default().with_pointers(two));
        assert_eq!(gauge.scene().count(Category::Pointers), 2);

        let plan = gauge.set_props(GaugeProps::default().with_pointers(vec![]));
        assert!(matches!(plan.mode_switch, Some(ModeSwitch { .. })));
        assert_eq!(gauge.scene().count(Category::Pointers), 1);
        assert_eq!(gauge.pointer_contexts().len(), 1);
    }

    #[test]
    fn tick_change_redraws_ticks_and_requests_layout() {
        let mut gauge = mounted(GaugeProps::default());
        gauge.set_props(GaugeProps::default().with_ticks(vec![Tick::new(50.0)]));
        assert_eq!(gauge.scene().count(Category::Ticks), 3);
        assert!(gauge.needs_layout());
    }

    #[test]
    fn stale_ticket_is_rejected() {
        let mut gauge = Gauge::new("g");
        gauge.set_props(GaugeProps::default());
        let old = gauge.request_layout(300.0, 200.0).unwrap();
        let new = gauge.request_layout(300.0, 100.0).unwrap();
        assert_eq!(
            gauge.complete_layout(old, &mut SceneMeasurer),
            Err(GaugeError::StaleLayoutTicket {
                ticket: old.generation(),
                current: new.generation()
            })
        );
        assert!(gauge.layout().is_none());
        assert!(gauge.complete_layout(new, &mut SceneMeasurer).unwrap().is_committed());
    }

    #[test]
    fn geometry_prop_change_invalidates_outstanding_ticket() {
        let mut gauge = Gauge::new("g");
        gauge.set_props(GaugeProps::default());
        let ticket = gauge.request_layout(300.0, 200.0).unwrap();
        gauge.set_props(GaugeProps::default().with_range(0.0, 500.0));
        assert!(matches!(
            gauge.complete_layout(ticket, &mut SceneMeasurer),
            Err(GaugeError::StaleLayoutTicket { .. })
        ));
    }

    #[test]
    fn bad_measurement_keeps_last_good_layout() {
        let mut gauge = mounted(GaugeProps::default());
        let good = *gauge.layout().unwrap();
        let ticket = gauge.request_layout(200.0, 100.0).unwrap();
        let mut broken = |_: &Scene| Some(Bounds::new(0.0, 0.0, f64::NAN, 1.0));
        let err = gauge.complete_layout(ticket, &mut broken).unwrap_err();
        assert!(matches!(err, GaugeError::Geometry(GeometryError::InvalidBounds { .. })));
        assert_eq!(gauge.layout(), Some(&good));
    }

    #[test]
    fn content_that_never_fits_is_not_committed() {
        let mut gauge = mounted(GaugeProps::default());
        let good = *gauge.layout().unwrap();
        let ticket = gauge.request_layout(200.0, 100.0).unwrap();
        let mut oversized = |_: &Scene| Some(Bounds::new(-1000.0, -1000.0, 2000.0, 2000.0));
        let err = gauge.complete_layout(ticket, &mut oversized).unwrap_err();
        assert!(matches!(err, GaugeError::Geometry(GeometryError::ContentOverflow { .. })));
        assert_eq!(gauge.layout(), Some(&good));
        assert!(gauge.render_svg().is_some());
    }

    #[test]
    fn overflow_on_first_layout_leaves_nothing_to_render() {
        let mut gauge = Gauge::new("g");
        gauge.set_props(GaugeProps::default());
        let ticket = gauge.request_layout(200.0, 100.0).unwrap();
        let mut oversized = |_: &Scene| Some(Bounds::new(-1000.0, -1000.0, 2000.0, 2000.0));
        assert!(gauge.complete_layout(ticket, &mut oversized).is_err());
        assert!(gauge.layout().is_none());
        assert_eq!(gauge.render_svg(), None);
    }

    #[test]
    fn jittered_resize_is_stable() {
        let mut gauge = mounted(GaugeProps::default());
        let outcome = gauge.resize(400.2, 300.1).unwrap();
        assert!(!outcome.is_committed());
        assert!(gauge.take_ops().is_empty());
    }

    #[test]
    fn animated_pointer_moves_over_frames() {
        let queue = FrameQueue::new();
        let coordinator = AnimationCoordinator::new(queue.clone());
        let mut gauge = Gauge::new("g").with_coordinator(coordinator.clone());
        let pointer = PointerConfig {
            animation_delay: 0.0,
            animation_duration: 100.0,
            ..PointerConfig::default()
        };
        gauge.set_props(GaugeProps::default().with_value(100.0).with_pointer(pointer));
        gauge.resize(400.0, 300.0).unwrap();
        assert!(coordinator.is_registered("g/pointer-0"));

        coordinator.tick(0.0);
        let start = gauge.pointer_contexts()[0].displayed_percent();
        coordinator.tick(50.0);
        coordinator.tick(200.0);
        let end = gauge.pointer_contexts()[0].displayed_percent();
        assert!(start < 0.01);
        assert_eq!(end, 1.0);
        assert!(!coordinator.is_running());

        gauge.take_ops();
        gauge.refresh_pointers();
        assert!(gauge.take_ops().iter().all(|op| op.category() == Category::Pointers));
    }

    #[test]
    fn unmount_unregisters_animations() {
        let coordinator = AnimationCoordinator::new(FrameQueue::new());
        let mut gauge = Gauge::new("g").with_coordinator(coordinator.clone());
        let two = vec![PointerSpec::new(30.0), PointerSpec::new(60.0)];
        gauge.set_props(GaugeProps::default().with_pointers(two));
        assert_eq!(coordinator.active_count(), 2);
        gauge.unmount();
        assert_eq!(coordinator.active_count(), 0);
        assert!(!coordinator.is_running());
        assert!(gauge.props().is_none());
    }

    #[test]
    fn dropping_a_gauge_unregisters_animations() {
        let coordinator = AnimationCoordinator::new(FrameQueue::new());
        {
            let mut gauge = Gauge::new("g").with_coordinator(coordinator.clone());
            gauge.set_props(GaugeProps::default());
            assert!(coordinator.is_registered("g/pointer-0"));
        }
        assert_eq!(coordinator.active_count(), 0);
    }
}
