//! Gauge configuration: the prop bundle a caller hands to a [`crate::Gauge`].
//!
//! Everything here is plain data compared by value. The update decision
//! engine diffs these structs field by field, so callers may build fresh
//! values for every render.

use std::f64::consts::PI;

/// Gauge family. Each has its own angular span and padding profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GaugeType {
    Semicircle,
    Radial,
    #[default]
    Grafana,
}

impl GaugeType {
    pub const ALL: [GaugeType; 3] = [GaugeType::Semicircle, GaugeType::Radial, GaugeType::Grafana];

    /// Arc start and end angles in radians, measured clockwise from 12 o'clock.
    pub fn angles(self) -> (f64, f64) {
        match self {
            GaugeType::Semicircle => (-PI / 2.0 + 0.02, PI / 2.0 - 0.02),
            GaugeType::Radial => (-PI / 1.37, PI / 1.37),
            GaugeType::Grafana => (-PI / 1.6, PI / 1.6),
        }
    }

    /// How far the arc's footprint reaches below the center line, as a
    /// fraction of the outer radius. Zero for semicircles.
    pub fn arc_bottom_extent(self) -> f64 {
        match self {
            GaugeType::Semicircle => 0.0,
            _ => {
                let (_, end) = self.angles();
                (-end.cos()).max(0.0)
            }
        }
    }
}

/// One colored band of the arc, ending at `limit` (in value units).
#[derive(Debug, Clone, PartialEq)]
pub struct SubArc {
    pub limit: Option<f64>,
    pub color: String,
    /// Show a tick at this sub-arc's limit
    pub show_tick: bool,
}

impl SubArc {
    pub fn new(limit: f64, color: impl Into<String>) -> Self {
        Self {
            limit: Some(limit),
            color: color.into(),
            show_tick: false,
        }
    }

    pub fn with_tick(mut self) -> Self {
        self.show_tick = true;
        self
    }
}

/// Arc band configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ArcConfig {
    /// Band thickness as a fraction of the outer radius, in [0, 1]
    pub width: f64,
    /// Angular gap between sub-arcs, in radians
    pub padding: f64,
    pub corner_radius: f64,
    pub sub_arcs: Vec<SubArc>,
    /// Equal segments instead of explicit `sub_arcs`
    pub nb_sub_arcs: Option<usize>,
    pub color_array: Vec<String>,
}

impl Default for ArcConfig {
    fn default() -> Self {
        Self {
            width: 0.2,
            padding: 0.05,
            corner_radius: 7.0,
            sub_arcs: vec![
                SubArc::new(33.0, "#5BE12C"),
                SubArc::new(66.0, "#F5CD19"),
                SubArc::new(100.0, "#EA4228"),
            ],
            nb_sub_arcs: None,
            color_array: Vec::new(),
        }
    }
}

impl ArcConfig {
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn with_sub_arcs(mut self, sub_arcs: Vec<SubArc>) -> Self {
        self.sub_arcs = sub_arcs;
        self.nb_sub_arcs = None;
        self
    }

    pub fn with_segments(mut self, count: usize, colors: Vec<String>) -> Self {
        self.nb_sub_arcs = Some(count);
        self.color_array = colors;
        self.sub_arcs.clear();
        self
    }

    /// Resolve the configured bands into `(from, to, color)` value ranges.
    ///
    /// Limits outside `[min, max]` are clamped; a band without a limit
    /// extends to `max`.
    pub fn segments(&self, min: f64, max: f64) -> Vec<(f64, f64, String)> {
        let span = max - min;
        if let Some(n) = self.nb_sub_arcs.filter(|n| *n > 0) {
            let step = span / n as f64;
            return (0..n)
                .map(|i| {
                    let color = if self.color_array.is_empty() {
                        DEFAULT_COLORS[i % DEFAULT_COLORS.len()].to_string()
                    } else {
                        self.color_array[i % self.color_array.len()].clone()
                    };
                    (min + step * i as f64, min + step * (i + 1) as f64, color)
                })
                .collect();
        }

        let mut out = Vec::with_capacity(self.sub_arcs.len());
        let mut from = min;
        for sub in &self.sub_arcs {
            let to = sub.limit.unwrap_or(max).clamp(min, max);
            if to > from {
                out.push((from, to, sub.color.clone()));
                from = to;
            }
        }
        if out.is_empty() {
            out.push((min, max, DEFAULT_COLORS[0].to_string()));
        }
        out
    }
}

const DEFAULT_COLORS: [&str; 3] = ["#5BE12C", "#F5CD19", "#EA4228"];

/// Pointer shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerType {
    #[default]
    Needle,
    Blob,
    Arrow,
}

/// Pointer configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PointerConfig {
    pub pointer_type: PointerType,
    pub color: String,
    pub base_color: String,
    /// Length as a fraction of the outer radius; values above 1 overshoot the arc
    pub length: f64,
    pub width: f64,
    pub animate: bool,
    pub elastic: bool,
    /// Milliseconds
    pub animation_duration: f64,
    /// Milliseconds
    pub animation_delay: f64,
    pub hide: bool,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            pointer_type: PointerType::Needle,
            color: "#464A4F".to_string(),
            base_color: "white".to_string(),
            length: 0.70,
            width: 20.0,
            animate: true,
            elastic: false,
            animation_duration: 3000.0,
            animation_delay: 100.0,
            hide: false,
        }
    }
}

impl PointerConfig {
    pub fn with_type(mut self, pointer_type: PointerType) -> Self {
        self.pointer_type = pointer_type;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_length(mut self, length: f64) -> Self {
        self.length = length;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn without_animation(mut self) -> Self {
        self.animate = false;
        self
    }

    /// Properties whose change forces the pointer element to be recreated.
    /// Color, length and width are patched in place.
    pub fn same_shape(&self, other: &PointerConfig) -> bool {
        self.pointer_type == other.pointer_type
            && self.hide == other.hide
            && self.base_color == other.base_color
    }
}

/// One pointer in multi-pointer mode
#[derive(Debug, Clone, PartialEq)]
pub struct PointerSpec {
    pub value: f64,
    /// Falls back to the gauge-level pointer config
    pub config: Option<PointerConfig>,
}

impl PointerSpec {
    pub fn new(value: f64) -> Self {
        Self { value, config: None }
    }

    pub fn with_config(mut self, config: PointerConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// Where tick marks sit relative to the arc
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickType {
    #[default]
    Outer,
    Inner,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickLineConfig {
    pub length: f64,
    pub width: f64,
    pub distance_from_arc: f64,
    pub color: String,
    pub hide: bool,
}

impl Default for TickLineConfig {
    fn default() -> Self {
        Self {
            length: 7.0,
            width: 1.0,
            distance_from_arc: 3.0,
            color: "rgb(173 172 171)".to_string(),
            hide: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickValueConfig {
    pub font_size: f64,
    pub max_decimal_digits: usize,
    pub color: String,
    pub hide: bool,
}

impl Default for TickValueConfig {
    fn default() -> Self {
        Self {
            font_size: 10.0,
            max_decimal_digits: 2,
            color: "rgb(173 172 171)".to_string(),
            hide: false,
        }
    }
}

/// A tick at a given value
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub value_config: Option<TickValueConfig>,
    pub line_config: Option<TickLineConfig>,
}

impl Tick {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            value_config: None,
            line_config: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickLabels {
    pub tick_type: TickType,
    pub hide_min_max: bool,
    pub ticks: Vec<Tick>,
    pub default_tick_line: TickLineConfig,
    pub default_tick_value: TickValueConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueLabel {
    pub font_size: f64,
    pub max_decimal_digits: usize,
    pub match_color_with_arc: bool,
    pub color: String,
    pub hide: bool,
}

impl Default for ValueLabel {
    fn default() -> Self {
        Self {
            font_size: 35.0,
            max_decimal_digits: 2,
            match_color_with_arc: false,
            color: "#fff".to_string(),
            hide: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabelsConfig {
    pub value_label: ValueLabel,
    pub tick_labels: TickLabels,
}

/// The full prop bundle for one gauge
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeProps {
    pub gauge_type: GaugeType,
    pub value: f64,
    pub min_value: f64,
    pub max_value: f64,
    pub arc: ArcConfig,
    pub pointer: PointerConfig,
    /// Multi-pointer mode when set and non-empty
    pub pointers: Option<Vec<PointerSpec>>,
    pub labels: LabelsConfig,
}

impl Default for GaugeProps {
    fn default() -> Self {
        Self {
            gauge_type: GaugeType::default(),
            value: 33.0,
            min_value: 0.0,
            max_value: 100.0,
            arc: ArcConfig::default(),
            pointer: PointerConfig::default(),
            pointers: None,
            labels: LabelsConfig::default(),
        }
    }
}

impl GaugeProps {
    pub fn new(gauge_type: GaugeType) -> Self {
        Self {
            gauge_type,
            ..Self::default()
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    pub fn with_arc(mut self, arc: ArcConfig) -> Self {
        self.arc = arc;
        self
    }

    pub fn with_pointer(mut self, pointer: PointerConfig) -> Self {
        self.pointer = pointer;
        self
    }

    pub fn with_pointers(mut self, pointers: Vec<PointerSpec>) -> Self {
        self.pointers = Some(pointers);
        self
    }

    pub fn with_ticks(mut self, ticks: Vec<Tick>) -> Self {
        self.labels.tick_labels.ticks = ticks;
        self
    }

    pub fn with_tick_type(mut self, tick_type: TickType) -> Self {
        self.labels.tick_labels.tick_type = tick_type;
        self
    }

    pub fn with_value_label(mut self, value_label: ValueLabel) -> Self {
        self.labels.value_label = value_label;
        self
    }

    pub fn is_multi_pointer(&self) -> bool {
        self.pointers.as_ref().is_some_and(|p| !p.is_empty())
    }

    /// `(value, config)` for every pointer that should be drawn, in index order.
    pub fn pointer_values(&self) -> Vec<(f64, &PointerConfig)> {
        match &self.pointers {
            Some(list) if !list.is_empty() => list
                .iter()
                .map(|p| (p.value, p.config.as_ref().unwrap_or(&self.pointer)))
                .collect(),
            _ => vec![(self.value, &self.pointer)],
        }
    }

    /// Longest pointer length among the drawn pointers
    pub fn max_pointer_length(&self) -> f64 {
        self.pointer_values()
            .iter()
            .filter(|(_, cfg)| !cfg.hide)
            .map(|(_, cfg)| cfg.length)
            .fold(0.0, f64::max)
    }
}

/// Position of `value` within `[min, max]`, clamped to `[0, 1]`.
/// A degenerate range maps everything to 0.
pub fn percent_of(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if !span.is_finite() || span <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    ((value - min) / span).clamp(0.0, 1.0)
}

/// Format a number with at most `digits` decimals, trimming trailing zeros.
pub fn format_value(value: f64, digits: usize) -> String {
    let mut s = format!("{value:.digits$}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" { "0".to_string() } else { s }
}
