//! Per-gauge runtime state.
//!
//! Everything a gauge instance remembers between render passes lives in
//! one explicit struct, owned by the [`Gauge`](super::Gauge) and handed to
//! the drawing functions by reference.

use super::scene::Scene;
use crate::animation::SharedPointerContext;
use crate::config::GaugeProps;
use crate::layout::Layout;
use crate::types::Size;

/// Identifies one layout request. Only the most recent ticket can complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayoutTicket(pub(crate) u64);

impl LayoutTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// A first pass waiting for its measurement
#[derive(Debug, Clone)]
pub struct PendingLayout {
    pub ticket: LayoutTicket,
    pub container: Size,
    /// Generously padded provisional layout
    pub layout: Layout,
    /// Hidden scene drawn at `layout`
    pub scene: Scene,
}

#[derive(Debug, Default)]
pub struct GaugeRuntimeState {
    /// Last props delivered, for diffing
    pub props: Option<GaugeProps>,
    /// Last committed layout; the last-known-good geometry
    pub layout: Option<Layout>,
    pub pending: Option<PendingLayout>,
    /// Bumped on every layout request and on every geometry-affecting
    /// prop change
    pub generation: u64,
    /// The visible element tree
    pub scene: Scene,
    /// One per drawn pointer, index-aligned with the pointer elements
    pub pointers: Vec<SharedPointerContext>,
    /// Props changed in a way the committed layout does not account for
    pub needs_layout: bool,
}

impl GaugeRuntimeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate any outstanding layout request
    pub fn bump_generation(&mut self) -> u64 {
        self.generation += 1;
        self.pending = None;
        self.generation
    }
}
