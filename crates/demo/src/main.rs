// File: crates/demo/src/main.rs
// Summary: Demo loads category/value CSVs, draws the three bar charts on one page and
//          renders before/after frames of their interactions to PNG and SVG.
// Usage:   bars-demo <bars.csv> [stacked.csv] [--config cfg.json] [--theme light|dark]

use anyhow::{Context, Result};
use bars_core::{
    BarChart, BarDatum, ChartConfig, HorizontalBarChart, HorizontalBarDatum, Page, Series, StackedBarChart, Svg,
};
use bars_render_skia::{theme, RenderOptions, SkiaRenderer};
use std::path::{Path, PathBuf};

/// Long enough for every staggered transition in the demo data to settle.
const SETTLE_MS: u64 = 5_000;

struct Args {
    bars: PathBuf,
    stacked: Option<PathBuf>,
    config: Option<PathBuf>,
    theme: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = parse_args(std::env::args().skip(1))?;

    let config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            ChartConfig::from_json(&raw).with_context(|| format!("parsing {}", path.display()))?
        }
        None => ChartConfig::default().with_multiple_colors(true),
    };

    let (bars_path, used_alt) = resolve_path(&args.bars)?;
    println!("Using input file: {}", bars_path.display());
    if used_alt {
        println!("  (extension swapped between .csv/.cvs)");
    }
    let rows = load_category_csv(&bars_path)
        .with_context(|| format!("failed to load CSV '{}'", bars_path.display()))?;
    println!("Loaded {} rows", rows.len());

    let page = Page::new(1280.0);
    for sel in ["#barChart", "#hBarChart", "#stackedChart"] {
        page.add_container(sel);
    }
    let sort = page.add_toggle("#sort", "sort");
    let grouped = page.add_toggle("#grouped", "grouped");
    page.add_toggle("#stacked", "stacked");

    let renderer = SkiaRenderer::new();
    let opts = RenderOptions { theme: theme::find(&args.theme), ..RenderOptions::default() };
    let out_dir = PathBuf::from("target/out");
    let write = |svg: &Svg, name: &str| -> Result<()> {
        let png = out_dir.join(format!("{name}.png"));
        let now = page.now() as f64;
        renderer.render_to_png(svg, now, &opts, &png)?;
        std::fs::write(png.with_extension("svg"), svg.to_svg_string(now))?;
        println!("Wrote {}", png.display());
        Ok(())
    };

    // 1) Vertical bars, then sorted by value
    let bar_config = with_default_sort(config.clone().with_title("Bar chart"));
    let bar = BarChart::new(&page, "#barChart", bar_config)?;
    bar.redraw_chart(rows.iter().map(|(c, v)| BarDatum::new(c.clone(), *v)))?;
    page.advance(SETTLE_MS);
    write(&snapshot(&bar.container())?, "bar")?;
    sort.activate(true);
    page.advance(SETTLE_MS);
    write(&snapshot(&bar.container())?, "bar_sorted")?;

    // 2) Horizontal bars; the sort control now drives this chart
    let h_config = with_default_sort(config.clone().with_title("Horizontal bar chart"));
    let hbar = HorizontalBarChart::new(&page, "#hBarChart", h_config)?;
    hbar.redraw_chart(rows.iter().map(|(c, v)| HorizontalBarDatum::new(c.clone(), *v)))?;
    page.advance(SETTLE_MS);
    write(&snapshot(&hbar.container())?, "hbar")?;
    sort.activate(false);
    page.advance(SETTLE_MS);
    write(&snapshot(&hbar.container())?, "hbar_by_category")?;

    // 3) Stacked / grouped
    if let Some(raw) = &args.stacked {
        let (path, _) = resolve_path(raw)?;
        let series = load_series_csv(&path).with_context(|| format!("failed to load CSV '{}'", path.display()))?;
        println!("Loaded {} series from {}", series.len(), path.display());

        let mut s_config = config.with_title("Stacked bar chart");
        if s_config.stacked_btn.is_none() && s_config.grouped_btn.is_none() {
            s_config = s_config.with_toggle_buttons("#stacked", "#grouped");
        }
        let stacked = StackedBarChart::new(&page, "#stackedChart", s_config)?;
        stacked.redraw_chart(series)?;
        page.advance(SETTLE_MS);
        write(&snapshot(&stacked.container())?, "stacked")?;

        grouped.activate(true);
        page.advance(SETTLE_MS);
        let margin = stacked.margin();
        let size = stacked.plot_size();
        // Hover somewhere in the lower left of the plot to show a tooltip.
        if stacked.hover(margin.left + size.width * 0.15, margin.top + size.height - 2.0).is_none() {
            log::info!("no bar under the demo hover point");
        }
        write(&snapshot(&stacked.container())?, "grouped")?;
    }

    Ok(())
}

fn parse_args(mut it: impl Iterator<Item = String>) -> Result<Args> {
    let mut positional = Vec::new();
    let mut config = None;
    let mut theme = "light".to_string();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => config = Some(PathBuf::from(it.next().context("--config needs a path")?)),
            "--theme" => theme = it.next().context("--theme needs a name")?,
            _ => positional.push(PathBuf::from(arg)),
        }
    }
    let mut positional = positional.into_iter();
    let bars = positional.next().unwrap_or_else(|| PathBuf::from("crates/demo/data/fruit.csv"));
    Ok(Args { bars, stacked: positional.next(), config, theme })
}

fn with_default_sort(config: ChartConfig) -> ChartConfig {
    if config.sort_checkbox.is_some() {
        config
    } else {
        config.with_sort_checkbox("#sort")
    }
}

fn snapshot(container: &bars_core::Container) -> Result<Svg> {
    container.snapshot().with_context(|| format!("nothing rendered under {}", container.selector()))
}

/// Resolve path, trying .csv/.cvs swap if needed.
/// Returns (actual_path, used_alt)
fn resolve_path(p: &Path) -> Result<(PathBuf, bool)> {
    if p.exists() {
        return Ok((p.to_path_buf(), false));
    }
    if let Some(alt) = swap_ext(p) {
        if alt.exists() {
            return Ok((alt, true));
        }
    }
    anyhow::bail!("file not found: {}", p.display());
}

fn swap_ext(p: &Path) -> Option<PathBuf> {
    let mut alt = p.to_path_buf();
    let ext = p.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "cvs" => {
            alt.set_extension("csv");
            Some(alt)
        }
        "csv" => {
            alt.set_extension("cvs");
            Some(alt)
        }
        _ => None,
    }
}

fn open_csv(path: &Path) -> Result<(csv::Reader<std::fs::File>, Vec<String>)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let headers = rdr.headers()?.iter().map(|h| h.to_lowercase()).collect::<Vec<_>>();
    log::debug!("headers of {}: {:?}", path.display(), headers);
    Ok((rdr, headers))
}

fn column(headers: &[String], names: &[&str]) -> Option<usize> {
    headers.iter().position(|h| names.contains(&h.as_str()))
}

/// Load `category,value` rows (also accepts `x,y` / `name,count` headers).
fn load_category_csv(path: &Path) -> Result<Vec<(String, f64)>> {
    let (mut rdr, headers) = open_csv(path)?;
    let i_cat = column(&headers, &["category", "x", "name", "label"]).unwrap_or(0);
    let i_val = column(&headers, &["value", "y", "count", "amount"]).unwrap_or(1);

    let mut out = Vec::new();
    for (line, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let (Some(cat), Some(raw)) = (rec.get(i_cat), rec.get(i_val)) else {
            log::warn!("row {} is missing columns, skipped", line + 2);
            continue;
        };
        match raw.parse::<f64>() {
            Ok(v) => out.push((cat.to_string(), v)),
            Err(_) => log::warn!("row {}: non-numeric value {raw:?}, skipped", line + 2),
        }
    }
    Ok(out)
}

/// Load `series,category,value` rows into series in first-seen order.
fn load_series_csv(path: &Path) -> Result<Vec<Series>> {
    let (mut rdr, headers) = open_csv(path)?;
    let i_series = column(&headers, &["series", "name", "layer"]).unwrap_or(0);
    let i_cat = column(&headers, &["category", "x"]).unwrap_or(1);
    let i_val = column(&headers, &["value", "y"]).unwrap_or(2);

    let mut out: Vec<Series> = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(i_series).context("missing series column")?;
        let cat = rec.get(i_cat).context("missing category column")?;
        let value = rec
            .get(i_val)
            .context("missing value column")?
            .parse::<f64>()
            .with_context(|| format!("non-numeric value for {name}/{cat}"))?;
        match out.iter_mut().find(|s| s.name == name) {
            Some(s) => s.values.push(BarDatum::new(cat, value)),
            None => out.push(Series::new(name, [(cat, value)])),
        }
    }
    Ok(out)
}
