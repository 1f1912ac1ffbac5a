use anyhow::Result;
use bars_core::{BarChart, BarDatum, ChartConfig, Page, Series, StackedBarChart};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bar_data(n: usize) -> Vec<BarDatum> {
    (0..n).map(|i| BarDatum::new(format!("cat{i}"), ((i as f64) * 0.37).sin().abs() * 100.0)).collect()
}

fn series_data(layers: usize, n: usize) -> Vec<Series> {
    (0..layers)
        .map(|l| Series::new(format!("s{l}"), (0..n).map(|i| (format!("cat{i}"), (i + l) as f64 % 17.0))))
        .collect()
}

fn bench_redraw(c: &mut Criterion) {
    let mut group = c.benchmark_group("redraw_chart");
    for &n in &[50usize, 500usize] {
        group.bench_function(format!("bar_{n}"), |b| {
            let page = Page::new(1280.0);
            page.add_container("#bars");
            let chart = BarChart::new(&page, "#bars", ChartConfig::default().with_multiple_colors(true))
                .expect("chart");
            let data = bar_data(n);
            b.iter(|| -> Result<()> {
                chart.redraw_chart(data.clone())?;
                black_box(chart.container().len());
                Ok(())
            });
        });
        group.bench_function(format!("stacked_8x{n}"), |b| {
            let page = Page::new(1280.0);
            page.add_container("#stacked");
            let chart = StackedBarChart::new(&page, "#stacked", ChartConfig::default()).expect("chart");
            let data = series_data(8, n);
            b.iter(|| -> Result<()> {
                chart.redraw_chart(data.clone())?;
                black_box(chart.container().len());
                Ok(())
            });
        });
    }
    group.finish();
}

fn bench_sort(c: &mut Criterion) {
    c.bench_function("sort_500", |b| {
        let page = Page::new(1280.0);
        page.add_container("#bars");
        let chart = BarChart::new(&page, "#bars", ChartConfig::default()).expect("chart");
        chart.redraw_chart(bar_data(500)).expect("redraw");
        let mut by_value = true;
        b.iter(|| {
            chart.sort(black_box(by_value));
            by_value = !by_value;
        });
    });
}

criterion_group!(benches, bench_redraw, bench_sort);
criterion_main!(benches);
