// File: crates/bars-core/tests/stacked_bar_chart.rs
// Purpose: Stacked/grouped chart: offsets, maxima, layout toggle, legend, tooltip.
// Behavior:
// - Default config: 1060x500 outer, margins 30/150/100/50, so an 860x370 plot.
// - Two categories with padding 0.25: step 382, first band at 96, bandwidth 287.

use bars_core::{ChartConfig, ChartError, Page, Series, StackedBarChart};

fn farms() -> Vec<Series> {
    vec![
        Series::new("S1", [("A", 10.0), ("B", 20.0)]),
        Series::new("S2", [("A", 5.0), ("B", 15.0)]),
    ]
}

fn mount(config: ChartConfig) -> (Page, StackedBarChart) {
    let page = Page::new(1600.0);
    page.add_container("#stackedChart");
    page.add_toggle("#stacked", "stacked");
    page.add_toggle("#grouped", "grouped");
    let chart = StackedBarChart::new(&page, "#stackedChart", config).expect("chart");
    (page, chart)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Final `(x, y, width, height)` of every bar, layer by layer.
fn geometry(chart: &StackedBarChart, t: f64) -> Vec<(String, f64, f64, f64, f64)> {
    let svg = chart.container().snapshot().expect("scene");
    svg.rects("rect.bar")
        .iter()
        .map(|r| {
            let b = r.bounds_at(t);
            (r.key.clone(), b.left, b.top, b.width(), b.height())
        })
        .collect()
}

#[test]
fn stack_offsets_and_maxima() {
    let (_page, chart) = mount(ChartConfig::default());
    chart.redraw_chart(farms()).expect("redraw");
    let layout = chart.layout().expect("layout");
    assert_eq!(layout.stack_max, 35.0);
    assert_eq!(layout.group_max, 20.0);

    let offsets: Vec<Vec<(f64, f64)>> =
        layout.layers.iter().map(|l| l.points.iter().map(|p| (p.y0, p.y)).collect()).collect();
    assert_eq!(offsets, vec![vec![(0.0, 10.0), (0.0, 20.0)], vec![(10.0, 5.0), (20.0, 15.0)]]);
    assert_eq!(chart.value_domain(), Some((0.0, 35.0)));
    assert_eq!(chart.domain(), vec!["A", "B"]);
}

#[test]
fn layers_grow_from_the_baseline() {
    let (page, chart) = mount(ChartConfig::default());
    chart.redraw_chart(farms()).expect("redraw");
    let start = geometry(&chart, 0.0);
    assert!(start.iter().all(|(_, _, y, _, h)| *y == 370.0 && *h == 0.0));

    page.advance(300);
    let settled = geometry(&chart, page.now() as f64);
    // S2 sits on top of S1 in each category.
    let (s1_a, s2_a) = (&settled[0], &settled[2]);
    assert!(close(s2_a.2 + s2_a.4, s1_a.2));
    assert!(close(s1_a.4, 10.0 / 35.0 * 370.0));
    assert!(close(settled[3].2, 0.0), "B stack reaches the top of the plot");
    assert_eq!((s1_a.1, s1_a.3), (96.0, 287.0));
}

#[test]
fn grouped_layout_uses_group_max_and_distinct_slots() {
    let config = ChartConfig::default().with_toggle_buttons("#stacked", "#grouped");
    let (page, chart) = mount(config);
    chart.redraw_chart(farms()).expect("redraw");
    page.advance(300);

    page.toggle("#grouped").expect("grouped control").activate(true);
    assert!(chart.is_grouped());
    assert_eq!(chart.value_domain(), Some((0.0, 20.0)));

    page.advance(1_100);
    let g = geometry(&chart, page.now() as f64);
    let (s1_a, s1_b, s2_a, s2_b) = (&g[0], &g[1], &g[2], &g[3]);
    assert_eq!((s1_a.1, s1_a.3), (96.0, 143.5));
    assert_eq!((s2_a.1, s2_a.3), (239.5, 143.5));
    assert_eq!(s1_b.1, 478.0);
    assert!(close(s2_b.2, 92.5) && close(s2_b.4, 277.5));
    assert!(close(s1_b.2, 0.0) && close(s1_b.4, 370.0));

    page.toggle("#stacked").expect("stacked control").activate(true);
    assert!(!chart.is_grouped());
    assert_eq!(chart.value_domain(), Some((0.0, 35.0)));
    page.advance(1_100);
    let s = geometry(&chart, page.now() as f64);
    assert_eq!((s[2].1, s[2].3), (96.0, 287.0));
    assert!(close(s[2].2 + s[2].4, s[0].2));
}

#[test]
fn grouped_transition_runs_in_two_stages() {
    let (page, chart) = mount(ChartConfig::default());
    chart.redraw_chart(farms()).expect("redraw");
    page.advance(300);
    let before = geometry(&chart, page.now() as f64);

    chart.set_grouped(true);
    let t0 = page.now() as f64;
    // After the first stage the width has changed, the height has not.
    let mid = geometry(&chart, t0 + 500.0);
    assert_eq!(mid[0].3, 143.5);
    assert!(close(mid[0].4, before[0].4));
    let end = geometry(&chart, t0 + 1_000.0);
    assert!(close(end[0].4, 10.0 / 20.0 * 370.0));
}

#[test]
fn y_axis_is_rebuilt_on_toggle() {
    let (_page, chart) = mount(ChartConfig::default().with_axis_labels(None, Some("Fruit")));
    chart.redraw_chart(farms()).expect("redraw");
    let ticks = |chart: &StackedBarChart| {
        let svg = chart.container().snapshot().expect("scene");
        let axis = svg.root.find_group("g.y.axis").expect("y axis").clone();
        let labels: Vec<String> =
            axis.select_all("text").iter().filter_map(|n| n.as_text()).map(|t| t.content.clone()).collect();
        (axis.select_all("g.tick").len(), labels)
    };
    let (stacked, labels) = ticks(&chart);
    assert_eq!(stacked, 8);
    assert!(labels.contains(&"Fruit".to_string()));

    chart.set_grouped(true);
    let (grouped, labels) = ticks(&chart);
    assert_eq!(grouped, 11);
    assert!(labels.contains(&"Fruit".to_string()));
}

#[test]
fn legend_lists_series_in_reverse() {
    let (_page, chart) = mount(ChartConfig::default());
    chart.redraw_chart(farms()).expect("redraw");
    let svg = chart.container().snapshot().expect("scene");
    let legend = svg.root.find_group("g.legend").expect("legend");
    let names: Vec<String> = legend.select_all("text").iter().filter_map(|n| n.as_text()).map(|t| t.content.clone()).collect();
    assert_eq!(names, vec!["S2", "S1"]);

    let swatches: Vec<_> = legend.select_all("rect.swatch").iter().filter_map(|n| n.as_rect()).cloned().collect();
    assert_eq!(swatches[0].fill.map(|c| c.to_hex()), Some("#6b486b".to_string()));
    assert_eq!(swatches[1].final_bounds().top, 20.0);
    assert_eq!(swatches[0].final_bounds().left, 875.0);
}

#[test]
fn layer_colors_follow_series_count() {
    let (_page, chart) = mount(ChartConfig::default());
    let many: Vec<Series> = (0..8).map(|i| Series::new(format!("S{i}"), [("A", 1.0)])).collect();
    chart.redraw_chart(many).expect("redraw");
    let svg = chart.container().snapshot().expect("scene");
    let fills: Vec<String> = svg
        .select_all("g.layer")
        .iter()
        .filter_map(|n| n.as_group())
        .filter_map(|g| g.fill.map(|c| c.to_hex()))
        .collect();
    assert_eq!(fills.first().map(String::as_str), Some("#98abc5"));
    assert_eq!(fills.last().map(String::as_str), Some("#ff8c00"));

    let five: Vec<Series> = (0..5).map(|i| Series::new(format!("S{i}"), [("A", 1.0)])).collect();
    chart.redraw_chart(five).expect("redraw");
    let svg = chart.container().snapshot().expect("scene");
    let first = svg.select_all("g.layer")[0].as_group().and_then(|g| g.fill).map(|c| c.to_hex());
    assert_eq!(first.as_deref(), Some("#5687d1"));
}

#[test]
fn hover_shows_the_bar_value() {
    let (page, chart) = mount(ChartConfig::default());
    chart.redraw_chart(farms()).expect("redraw");
    // Bars have no height while they are still at the baseline.
    assert!(chart.hover(50.0 + 200.0, 30.0 + 369.0).is_none());

    page.advance(300);
    let tip = chart.hover(50.0 + 200.0, 30.0 + 360.0).expect("hit S1/A");
    assert_eq!(tip.text, "10");
    assert_eq!(tip.x, 50.0 + 96.0 + 143.5);
    let svg = chart.container().snapshot().expect("scene");
    assert_eq!(svg.tooltip.as_ref(), Some(&tip));

    let top = chart.hover(50.0 + 200.0, 30.0 + 370.0 - 110.0).expect("hit S2/A");
    assert_eq!(top.text, "5");

    chart.unhover();
    assert!(chart.container().snapshot().expect("scene").tooltip.is_none());
    assert!(chart.hover(5.0, 5.0).is_none());
}

#[test]
fn mismatched_series_are_rejected_and_keep_the_old_chart() {
    let (_page, chart) = mount(ChartConfig::default());
    chart.redraw_chart(farms()).expect("redraw");
    let bad = vec![Series::new("S1", [("A", 1.0), ("B", 2.0)]), Series::new("S2", [("A", 1.0)])];
    assert!(matches!(chart.redraw_chart(bad), Err(ChartError::MismatchedCategories { series, .. }) if series == "S2"));
    assert_eq!(chart.container().len(), 1);
    assert_eq!(chart.layout().map(|l| l.stack_max), Some(35.0));
}

#[test]
fn infinite_values_are_rejected_and_keep_the_old_chart() {
    let (_page, chart) = mount(ChartConfig::default());
    chart.redraw_chart(farms()).expect("redraw");
    let bad = vec![Series::new("S1", [("A", 1.0), ("B", f64::INFINITY)]), Series::new("S2", [("A", 1.0), ("B", 2.0)])];
    assert!(matches!(chart.redraw_chart(bad), Err(ChartError::NonFiniteValue { .. })));
    assert_eq!(chart.container().len(), 1);
    assert_eq!(chart.container().snapshot().expect("scene").rects("rect.bar").len(), 4);
    assert_eq!(chart.value_domain(), Some((0.0, 35.0)));
}

#[test]
fn redraw_replaces_previous_chart() {
    let (_page, chart) = mount(ChartConfig::default().with_title("Farms"));
    chart.redraw_chart(farms()).expect("first");
    chart.redraw_chart(farms()).expect("second");
    let container = chart.container();
    assert_eq!(container.len(), 1);
    let svg = container.snapshot().expect("scene");
    assert_eq!(svg.rects("rect.bar").len(), 4);
    assert_eq!(svg.texts("text.chartTitle").len(), 1);
    assert_eq!((svg.width, svg.height), (1060.0, 500.0));
}
