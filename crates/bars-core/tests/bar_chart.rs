// File: crates/bars-core/tests/bar_chart.rs
// Purpose: Vertical bar chart behaviour through the public API.
// Behavior:
// - Default config: 720x530 outer, margins 55/20/150/50, so a 650x325 plot.
// - Three categories on 650px give step 166, first band at 84, bandwidth 149.

use bars_core::palette::BAR_PALETTE;
use bars_core::types::DEFAULT_AUTO_SORT_DELAY_MS;
use bars_core::{BarChart, BarDatum, ChartConfig, ChartError, Page};

fn fruit() -> Vec<BarDatum> {
    vec![BarDatum::new("Pears", 10.0), BarDatum::new("Apples", 20.0), BarDatum::new("Kiwis", 5.0)]
}

fn mount(config: ChartConfig) -> (Page, BarChart) {
    let page = Page::new(1280.0);
    page.add_container("#barChart");
    page.add_toggle("#sort", "on");
    let chart = BarChart::new(&page, "#barChart", config).expect("chart");
    (page, chart)
}

fn bar_keys(chart: &BarChart) -> Vec<String> {
    let svg = chart.container().snapshot().expect("scene");
    svg.rects("rect.bar").iter().map(|r| r.key.clone()).collect()
}

#[test]
fn redraw_leaves_exactly_one_chart() {
    let (_page, chart) = mount(ChartConfig::default());
    chart.redraw_chart(fruit()).expect("first redraw");
    chart.redraw_chart(fruit()).expect("second redraw");
    let container = chart.container();
    assert_eq!(container.len(), 1);
    assert_eq!(container.snapshot().expect("scene").rects("rect.bar").len(), 3);
}

#[test]
fn one_bar_and_one_label_per_datum() {
    let (_page, chart) = mount(ChartConfig::default());
    chart.redraw_chart(fruit()).expect("redraw");
    let svg = chart.container().snapshot().expect("scene");
    let bars = svg.rects("rect.bar");
    let labels = svg.texts("text.valueLabel");
    assert_eq!((bars.len(), labels.len()), (3, 3));

    let pears = bars[0].final_bounds();
    assert_eq!((pears.left, pears.width()), (84.0, 149.0));
    assert_eq!((pears.top, pears.height()), (162.5, 162.5));
    let apples = bars[1].final_bounds();
    assert_eq!((apples.left, apples.top, apples.bottom), (250.0, 0.0, 325.0));

    assert_eq!(labels[0].content, "10");
    // Centred on the band, 10px above the bar top.
    assert_eq!((labels[0].x.target(), labels[0].y.target()), (158.5, 152.5));
    assert_eq!(svg.width, 720.0);
    assert_eq!(svg.height, 530.0);
}

#[test]
fn domain_follows_input_order() {
    let (_page, chart) = mount(ChartConfig::default());
    chart.redraw_chart(fruit()).expect("redraw");
    assert_eq!(chart.domain(), vec!["Pears", "Apples", "Kiwis"]);
    assert_eq!(chart.value_domain(), Some((0.0, 20.0)));
}

#[test]
fn sort_control_orders_by_value_then_by_category() {
    let (page, chart) = mount(ChartConfig::default().with_sort_checkbox("#sort"));
    chart.redraw_chart(fruit()).expect("redraw");
    let control = page.toggle("#sort").expect("control");

    control.activate(true);
    assert_eq!(chart.domain(), vec!["Apples", "Pears", "Kiwis"]);
    assert_eq!(bar_keys(&chart), vec!["Apples", "Pears", "Kiwis"]);

    // Still moving halfway through, settled once the last stagger has run.
    let svg = chart.container().snapshot().expect("scene");
    assert!(svg.rects("rect.bar")[0].x.is_animating(page.now() as f64));
    page.advance(750 + 2 * 50);
    let svg = chart.container().snapshot().expect("scene");
    let now = page.now() as f64;
    let lefts: Vec<f64> = svg.rects("rect.bar").iter().map(|r| r.bounds_at(now).left).collect();
    assert_eq!(lefts, vec![84.0, 250.0, 416.0]);
    let label = &svg.texts("text.valueLabel")[0];
    assert_eq!((label.content.as_str(), label.x.at(now)), ("20", 158.5));

    control.activate(false);
    assert_eq!(chart.domain(), vec!["Apples", "Kiwis", "Pears"]);
    assert_eq!(bar_keys(&chart), vec!["Apples", "Kiwis", "Pears"]);
}

#[test]
fn sort_moves_category_ticks() {
    let (page, chart) = mount(ChartConfig::default().with_sort_checkbox("#sort"));
    chart.redraw_chart(fruit()).expect("redraw");
    page.toggle("#sort").expect("control").activate(true);
    let svg = chart.container().snapshot().expect("scene");
    let axis = svg.root.find_group("g.x.axis").expect("x axis");
    let ticks = axis.select_all("g.tick");
    let apples = ticks[0].as_group().expect("tick group");
    assert_eq!(apples.key.as_deref(), Some("Apples"));
    assert_eq!(apples.translate.x.target(), 158.5);
}

#[test]
fn auto_sort_is_opt_in() {
    let (page, chart) = mount(ChartConfig::default().with_sort_checkbox("#sort"));
    chart.redraw_chart(fruit()).expect("redraw");
    assert_eq!(page.pending_timers(), 0);
    page.advance(5_000);
    assert_eq!(chart.domain(), vec!["Pears", "Apples", "Kiwis"]);
}

#[test]
fn auto_sort_checks_the_control_when_it_fires() {
    let config = ChartConfig::default().with_sort_checkbox("#sort").with_auto_sort(DEFAULT_AUTO_SORT_DELAY_MS);
    let (page, chart) = mount(config);
    chart.redraw_chart(fruit()).expect("redraw");
    let control = page.toggle("#sort").expect("control");

    page.advance(1_999);
    assert_eq!(chart.domain(), vec!["Pears", "Apples", "Kiwis"]);
    page.advance(1);
    assert!(control.checked());
    assert_eq!(chart.domain(), vec!["Apples", "Pears", "Kiwis"]);
    assert_eq!(page.pending_timers(), 0);
}

#[test]
fn auto_sort_without_control_sorts_directly() {
    let (page, chart) = mount(ChartConfig::default().with_auto_sort(100));
    chart.redraw_chart(fruit()).expect("redraw");
    page.advance(100);
    assert_eq!(chart.domain(), vec!["Apples", "Pears", "Kiwis"]);
}

#[test]
fn user_interaction_cancels_pending_auto_sort() {
    let config = ChartConfig::default().with_sort_checkbox("#sort").with_auto_sort(2_000);
    let (page, chart) = mount(config);
    chart.redraw_chart(fruit()).expect("redraw");
    page.advance(500);
    page.toggle("#sort").expect("control").activate(false);
    assert_eq!(page.pending_timers(), 0);
    page.advance(5_000);
    assert_eq!(chart.domain(), vec!["Apples", "Kiwis", "Pears"]);
}

#[test]
fn redraw_reschedules_a_single_auto_sort() {
    let (page, chart) = mount(ChartConfig::default().with_auto_sort(2_000));
    chart.redraw_chart(fruit()).expect("first");
    chart.redraw_chart(fruit()).expect("second");
    assert_eq!(page.pending_timers(), 1);
}

#[test]
fn dropped_chart_ignores_control_and_timer() {
    let config = ChartConfig::default().with_sort_checkbox("#sort").with_auto_sort(100);
    let (page, chart) = mount(config);
    chart.redraw_chart(fruit()).expect("redraw");
    let container = chart.container();
    drop(chart);
    page.toggle("#sort").expect("control").activate(true);
    page.advance(1_000);
    let svg = container.snapshot().expect("scene stays mounted");
    let keys: Vec<_> = svg.rects("rect.bar").iter().map(|r| r.key.clone()).collect();
    assert_eq!(keys, vec!["Pears", "Apples", "Kiwis"]);
}

#[test]
fn single_color_by_default() {
    let (_page, chart) = mount(ChartConfig::default());
    chart.redraw_chart(fruit()).expect("redraw");
    let svg = chart.container().snapshot().expect("scene");
    assert!(svg.rects("rect.bar").iter().all(|r| r.fill == Some(BAR_PALETTE[0])));
}

#[test]
fn palette_overflow_uses_generated_colors() {
    let (_page, chart) = mount(ChartConfig::default().with_multiple_colors(true));
    let data: Vec<BarDatum> = (0..16).map(|i| BarDatum::new(format!("c{i}"), i as f64 + 1.0)).collect();
    chart.redraw_chart(data).expect("redraw");
    let svg = chart.container().snapshot().expect("scene");
    let fills: Vec<_> = svg.rects("rect.bar").iter().filter_map(|r| r.fill).collect();
    assert_eq!(&fills[..13], &BAR_PALETTE[..]);
    assert_eq!(fills[13], chart.generate_color(14));
    assert_eq!(fills[14], chart.generate_color(15));
    assert_ne!(fills[13], fills[14]);
    assert_eq!(fills[13].to_hex(), "#039581");
}

#[test]
fn empty_data_renders_an_empty_chart() {
    let (_page, chart) = mount(ChartConfig::default().with_title("Nothing"));
    chart.redraw_chart(Vec::<BarDatum>::new()).expect("empty redraw");
    let svg = chart.container().snapshot().expect("scene");
    assert!(svg.rects("rect.bar").is_empty());
    assert_eq!(svg.texts("text.chartTitle").len(), 1);
    assert_eq!(chart.value_domain(), Some((0.0, 0.0)));
    let y_axis = svg.root.find_group("g.y.axis").expect("y axis");
    assert_eq!(y_axis.select_all("g.tick").len(), 1);
}

#[test]
fn title_and_axis_label() {
    let config = ChartConfig::default().with_title("Fruit").with_axis_labels(None, Some("Count"));
    let (_page, chart) = mount(config);
    chart.redraw_chart(fruit()).expect("redraw");
    let svg = chart.container().snapshot().expect("scene");
    let title = &svg.texts("text.chartTitle")[0];
    assert_eq!((title.x.target(), title.y.target()), (325.0, -27.5));
    assert!(title.underline);
    let label = &svg.texts("text.axisLabel")[0];
    assert_eq!((label.content.as_str(), label.rotate), ("Count", -90.0));
}

#[test]
fn long_categories_rotate_their_labels() {
    let (_page, chart) = mount(ChartConfig::default());
    let data: Vec<BarDatum> =
        (0..12).map(|i| BarDatum::new(format!("a rather long category {i}"), 1.0)).collect();
    chart.redraw_chart(data).expect("redraw");
    let svg = chart.container().snapshot().expect("scene");
    let axis = svg.root.find_group("g.x.axis").expect("x axis");
    let label = axis.select_all("text")[0].as_text().expect("label").clone();
    assert_eq!((label.rotate, label.dx_em, label.dy_em), (-65.0, -4.0, 2.0));

    chart.redraw_chart(fruit()).expect("short labels");
    let svg = chart.container().snapshot().expect("scene");
    let axis = svg.root.find_group("g.x.axis").expect("x axis");
    assert_eq!(axis.select_all("text")[0].as_text().map(|t| t.rotate), Some(0.0));
}

#[test]
fn shrink_to_fit_and_reset_dimensions() {
    let page = Page::new(500.0);
    page.add_container("#barChart");
    let chart = BarChart::new(&page, "#barChart", ChartConfig::default().with_shrink_to_fit(true)).expect("chart");
    assert_eq!(chart.plot_size().width, 380.0);

    chart.reset_dimensions(400.0, 300.0).expect("resize");
    assert_eq!((chart.plot_size().width, chart.plot_size().height), (330.0, 95.0));
    assert!(chart.container().is_empty(), "resizing does not render");
    assert!(matches!(chart.reset_dimensions(60.0, 100.0), Err(ChartError::InvalidDimensions { .. })));
}

#[test]
fn construction_and_data_errors() {
    let page = Page::new(1024.0);
    page.add_container("#barChart");
    assert!(matches!(
        BarChart::new(&page, "#missing", ChartConfig::default()),
        Err(ChartError::MountNotFound(sel)) if sel == "#missing"
    ));
    assert!(matches!(
        BarChart::new(&page, "#barChart", ChartConfig::default().with_size(60.0, 600.0)),
        Err(ChartError::InvalidDimensions { .. })
    ));

    let chart = BarChart::new(&page, "#barChart", ChartConfig::default()).expect("chart");
    let bad = vec![BarDatum::new("ok", 1.0), BarDatum::new("nan", f64::NAN)];
    assert!(matches!(chart.redraw_chart(bad), Err(ChartError::NonFiniteValue { category }) if category == "nan"));
}

#[test]
fn unknown_sort_control_is_not_fatal() {
    let (_page, chart) = mount(ChartConfig::default().with_sort_checkbox("#nowhere"));
    chart.redraw_chart(fruit()).expect("redraw still succeeds");
    assert_eq!(chart.container().len(), 1);
}

#[test]
fn json_config_and_data() {
    let config = ChartConfig::from_json(r##"{"title":"Fruit","multipleColors":true,"sortCheckbox":"#sort"}"##)
        .expect("config");
    let data: Vec<BarDatum> =
        serde_json::from_str(r#"[{"x":"Apples","y":"5"},{"x":"Pears","y":3}]"#).expect("data");
    let (page, chart) = mount(config);
    chart.redraw_chart(data).expect("redraw");
    page.toggle("#sort").expect("control").activate(false);
    assert_eq!(chart.domain(), vec!["Apples", "Pears"]);
}
