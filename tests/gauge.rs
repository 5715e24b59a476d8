//! End-to-end behavior of a gauge instance: two-pass layout, update
//! handling and rendered output.

use regex_lite::Regex;
use svgauge::render::{Category, Scene, SceneOp};
use svgauge::{
    ArcConfig, Bounds, Gauge, GaugeError, GaugeProps, GaugeType, GeometryError, LayoutOutcome,
    Measure, PointerConfig, PointerSpec, SceneMeasurer, SubArc, Tick, UpdateKind, ValueLabel,
    decide_update,
};

fn mounted(props: GaugeProps, width: f64, height: f64) -> Gauge {
    let mut gauge = Gauge::new("test");
    gauge.set_props(props);
    gauge.resize(width, height).unwrap();
    gauge.take_ops();
    gauge
}

/// `(width, height)` from the root element's viewBox attribute
fn view_box(svg: &str) -> (f64, f64) {
    let re = Regex::new(r#"viewBox="([-\d.]+) ([-\d.]+) ([-\d.]+) ([-\d.]+)""#).unwrap();
    let caps = re.captures(svg).expect("svg has a viewBox");
    (caps[3].parse().unwrap(), caps[4].parse().unwrap())
}

#[test]
fn semicircle_400_by_300_renders_inside_its_container() {
    let mut gauge = mounted(GaugeProps::new(GaugeType::Semicircle), 400.0, 300.0);
    let layout = *gauge.layout().unwrap();
    assert!((layout.inner_radius - layout.outer_radius * 0.8).abs() < 1e-9);
    assert!(layout.view_box.height < layout.view_box.width);
    assert_eq!(layout.gauge_center.x, layout.view_box.width / 2.0);

    let svg = gauge.render_svg().unwrap();
    let (w, h) = view_box(&svg);
    assert!(w <= 400.01 && h <= 300.01, "{w}x{h}");
    assert!(!svg.contains("opacity"));
}

#[test]
fn shrinking_300_by_200_to_300_by_100_recomputes() {
    let mut gauge = mounted(GaugeProps::new(GaugeType::Semicircle), 300.0, 200.0);
    let before = gauge.layout().unwrap().outer_radius;

    let outcome = gauge.resize(300.0, 100.0).unwrap();
    assert!(matches!(outcome, LayoutOutcome::Committed(_)));
    let after = gauge.layout().unwrap();
    assert!(after.outer_radius < before);
    assert!(after.view_box.height <= 100.01);
}

#[test]
fn drawn_content_fits_the_committed_view_box() {
    for gauge_type in GaugeType::ALL {
        let sizes = [
            (300.0, 200.0),
            (400.0, 300.0),
            (600.0, 400.0),
            (350.0, 350.0),
            (800.0, 250.0),
        ];
        for (w, h) in sizes {
            let props = GaugeProps::new(gauge_type)
                .with_ticks(vec![Tick::new(25.0), Tick::new(50.0), Tick::new(75.0)]);
            let gauge = mounted(props, w, h);
            let layout = gauge.layout().unwrap();
            let content = SceneMeasurer.measure(gauge.scene()).unwrap();
            let placed = content.translated(layout.gauge_center);
            assert!(
                layout.view_box.contains(&placed, 0.01),
                "{gauge_type:?} {w}x{h}: {placed:?} outside {:?}",
                layout.view_box
            );
            assert!(layout.view_box.width <= w + 0.01 && layout.view_box.height <= h + 0.01);
        }
    }
}

#[test]
fn tiny_containers_either_fit_or_refuse_to_commit() {
    for gauge_type in GaugeType::ALL {
        for (w, h) in [(20.0, 20.0), (40.0, 30.0), (60.0, 45.0), (80.0, 60.0), (120.0, 90.0)] {
            let mut gauge = Gauge::new("small");
            gauge.set_props(GaugeProps::new(gauge_type).with_ticks(vec![Tick::new(50.0)]));
            match gauge.resize(w, h) {
                Ok(_) => {
                    let layout = *gauge.layout().unwrap();
                    let content = SceneMeasurer.measure(gauge.scene()).unwrap();
                    let placed = content.translated(layout.gauge_center);
                    assert!(
                        layout.view_box.contains(&placed, 0.01),
                        "{gauge_type:?} {w}x{h}: {placed:?} outside {:?}",
                        layout.view_box
                    );
                    assert!(layout.view_box.width <= w + 0.01);
                    assert!(layout.view_box.height <= h + 0.01);
                }
                Err(err) => {
                    assert!(
                        matches!(err, GaugeError::Geometry(GeometryError::ContentOverflow { .. })),
                        "{gauge_type:?} {w}x{h}: {err:?}"
                    );
                    assert!(gauge.layout().is_none());
                    assert_eq!(gauge.render_svg(), None);
                }
            }
        }
    }
}

#[test]
fn long_running_value_stream_keeps_the_op_log_bounded() {
    let mut gauge = mounted(GaugeProps::default(), 400.0, 300.0);
    for i in 0..1000 {
        gauge.set_props(GaugeProps::default().with_value(f64::from(i % 100)));
        gauge.render_svg().unwrap();
    }
    let live = gauge.scene().elements().len();
    assert!(live > 0);
    assert!(gauge.scene().ops().len() <= 2 * live, "{} ops", gauge.scene().ops().len());
}

#[test]
fn two_pass_protocol_with_a_host_measurer() {
    let mut gauge = Gauge::new("host");
    gauge.set_props(GaugeProps::new(GaugeType::Radial));
    let ticket = gauge.request_layout(400.0, 400.0).unwrap();
    assert!(gauge.pending_svg().unwrap().contains("opacity: 0"));
    assert!(gauge.layout().is_none());

    let mut calls = 0;
    let mut measurer = |scene: &Scene| {
        calls += 1;
        assert!(!scene.is_visible(), "only the hidden pass is measured");
        SceneMeasurer.measure(scene)
    };
    let outcome = gauge.complete_layout(ticket, &mut measurer).unwrap();
    assert!(outcome.is_committed());
    assert!(calls >= 2);
    assert!(gauge.pending_svg().is_none());
}

#[test]
fn overlapping_requests_resolve_to_the_latest() {
    let mut gauge = Gauge::new("race");
    gauge.set_props(GaugeProps::default());
    let first = gauge.request_layout(300.0, 200.0).unwrap();
    let second = gauge.request_layout(300.0, 100.0).unwrap();

    let err = gauge.complete_layout(first, &mut SceneMeasurer).unwrap_err();
    assert!(matches!(err, GaugeError::StaleLayoutTicket { .. }));

    let outcome = gauge.complete_layout(second, &mut SceneMeasurer).unwrap();
    assert!(outcome.layout().view_box.height <= 100.01);
}

#[test]
fn failed_measurement_renders_last_good_layout() {
    let mut gauge = mounted(GaugeProps::default(), 400.0, 300.0);
    let good = gauge.render_svg().unwrap();

    let ticket = gauge.request_layout(200.0, 150.0).unwrap();
    let mut broken = |_: &Scene| Some(Bounds::new(0.0, 0.0, 0.0, 10.0));
    assert!(gauge.complete_layout(ticket, &mut broken).is_err());
    assert_eq!(gauge.render_svg().unwrap(), good);
}

#[test]
fn gauge_without_layout_renders_nothing() {
    let mut gauge = Gauge::new("empty");
    gauge.set_props(GaugeProps::default());
    assert_eq!(gauge.render_svg(), None);
}

#[test]
fn update_classification() {
    let value_50 = GaugeProps::default().with_value(50.0);
    let value_51 = GaugeProps::default().with_value(51.0);
    let plan = decide_update(Some(&value_50), &value_51);
    assert!(plan.is_incremental() && !plan.is_rebuild());

    let arc = ArcConfig::default()
        .with_sub_arcs(vec![SubArc::new(50.0, "green"), SubArc::new(100.0, "red")]);
    let two = GaugeProps::default().with_arc(arc);
    let plan = decide_update(Some(&GaugeProps::default()), &two);
    assert!(matches!(plan.kind, UpdateKind::StructuralRebuild { .. }));

    let multi = GaugeProps::default().with_pointers(vec![PointerSpec::new(50.0)]);
    let plan = decide_update(Some(&GaugeProps::default()), &multi);
    assert_eq!(plan.mode_switch, None);
    assert!(!plan.rebuild_set().pointers);

    let cleared = GaugeProps::default().with_pointers(vec![]);
    let plan = decide_update(Some(&multi), &cleared);
    assert!(plan.mode_switch.is_some());
    assert!(plan.rebuild_set().pointers);
}

#[test]
fn switching_pointer_modes_leaves_exactly_the_new_pointers() {
    let multi = GaugeProps::default().with_pointers(vec![
        PointerSpec::new(10.0),
        PointerSpec::new(40.0),
        PointerSpec::new(90.0).with_config(PointerConfig::default().with_color("red")),
    ]);
    let mut gauge = mounted(multi.clone(), 400.0, 300.0);
    assert_eq!(gauge.scene().count(Category::Pointers), 3);

    gauge.set_props(GaugeProps::default().with_pointers(vec![]));
    assert_eq!(gauge.scene().count(Category::Pointers), 1);
    gauge.take_ops();

    gauge.set_props(multi);
    assert_eq!(gauge.scene().count(Category::Pointers), 3);
    let ops = gauge.take_ops();
    let first_create = ops
        .iter()
        .position(|op| matches!(op, SceneOp::Create { .. }))
        .unwrap();
    assert!(
        ops[first_create..]
            .iter()
            .all(|op| !matches!(op, SceneOp::Remove { .. })),
        "every removal precedes the first creation: {ops:?}"
    );
}

#[test]
fn identical_props_perform_no_element_operations() {
    let props = GaugeProps::new(GaugeType::Grafana).with_value(72.5);
    let mut gauge = mounted(props.clone(), 400.0, 300.0);
    for _ in 0..3 {
        assert!(gauge.set_props(props.clone()).is_noop());
    }
    assert!(gauge.take_ops().is_empty());
}

#[test]
fn value_label_follows_the_value() {
    let label = ValueLabel {
        match_color_with_arc: true,
        ..ValueLabel::default()
    };
    let props = GaugeProps::default()
        .with_value(10.0)
        .with_value_label(label.clone());
    let mut gauge = mounted(props, 400.0, 300.0);
    let svg = gauge.render_svg().unwrap();
    assert!(svg.contains(r##"fill="#5BE12C" text-anchor="middle">10</text>"##), "{svg}");

    gauge.set_props(GaugeProps::default().with_value(90.0).with_value_label(label));
    let svg = gauge.render_svg().unwrap();
    assert!(svg.contains(r##"fill="#EA4228" text-anchor="middle">90</text>"##), "{svg}");
}

#[test]
fn hidden_value_label_is_not_drawn() {
    let label = ValueLabel {
        hide: true,
        ..ValueLabel::default()
    };
    let gauge = mounted(GaugeProps::default().with_value_label(label), 400.0, 300.0);
    assert_eq!(gauge.scene().count(Category::ValueLabel), 0);
}

#[test]
fn tick_labels_are_rendered() {
    let props = GaugeProps::default().with_ticks(vec![Tick::new(50.0)]);
    let mut gauge = mounted(props, 400.0, 300.0);
    let svg = gauge.render_svg().unwrap();
    let labels: Vec<&str> = Regex::new(r"<text [^>]*>([^<]*)</text>")
        .unwrap()
        .captures_iter(&svg)
        .map(|c| c.get(1).map_or("", |m| m.as_str()))
        .collect();
    assert_eq!(labels, ["0", "50", "100", "33"]);
}
