//! Render a gauge to stdout as SVG.
//!
//! Usage: `render_gauge [semicircle|radial|grafana] [width] [height] [value]`
//!
//! Set `RUST_LOG=svgauge=debug` to see the layout passes.

use svgauge::{
    AnimationCoordinator, FrameQueue, Gauge, GaugeProps, GaugeType, LayoutOutcome, PointerConfig,
    SceneMeasurer, Tick,
};
use tracing_subscriber::EnvFilter;

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let gauge_type = match args.next().as_deref() {
        Some("radial") => GaugeType::Radial,
        Some("grafana") => GaugeType::Grafana,
        _ => GaugeType::Semicircle,
    };
    let mut number = |default: f64| {
        args.next()
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(default)
    };
    let width = number(400.0);
    let height = number(300.0);
    let value = number(62.0);

    let queue = FrameQueue::new();
    let coordinator = AnimationCoordinator::new(queue.clone());
    let props = GaugeProps::new(gauge_type)
        .with_value(value)
        .with_pointer(PointerConfig {
            animation_duration: 600.0,
            ..PointerConfig::default()
        })
        .with_ticks(vec![Tick::new(25.0), Tick::new(50.0), Tick::new(75.0)]);

    let mut gauge = Gauge::new("demo").with_coordinator(coordinator.clone());
    gauge.set_props(props);

    let ticket = gauge.request_layout(width, height)?;
    match gauge.complete_layout(ticket, &mut SceneMeasurer)? {
        LayoutOutcome::Committed(layout) => tracing::info!(
            radius = layout.outer_radius,
            view_box = %layout.view_box,
            "layout committed"
        ),
        LayoutOutcome::Unchanged(_) => tracing::info!("layout unchanged"),
    }

    // Drive the pointer animation to completion on a simulated 60 fps clock
    let mut frame = 0u32;
    while queue.take_pending() {
        coordinator.tick(f64::from(frame) * 1000.0 / 60.0);
        gauge.refresh_pointers();
        frame += 1;
    }
    tracing::info!(frames = frame, "animation finished");

    if let Some(svg) = gauge.render_svg() {
        println!("{svg}");
    }
    Ok(())
}
