use anyhow::{Context, Result};
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::CompanyRatios;
use crate::error::AnalyzerError;
use crate::ratios::{chart_file_stem, Ratio};
use crate::statements::{FiscalPeriod, Ticker};

const CHART_SIZE: (u32, u32) = (800, 500);

/// Result of a chart request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlotOutcome {
    /// Chart written to this path
    Saved(PathBuf),
    /// No company had a value for the ratio; nothing was written
    NoData,
}

/// Plot one ratio over time for every company that has it.
///
/// Absent values are dropped; companies left without points are skipped. The
/// chart lands in `out_dir` (created if missing) as `<ratio_name>.png`, lower
/// case with underscores. Unknown ratio names and ratios nobody has yield
/// [`PlotOutcome::NoData`] without touching the filesystem.
pub fn plot_ratio(companies: &[CompanyRatios], ratio_name: &str, out_dir: &Path) -> Result<PlotOutcome> {
    let ratio = match ratio_name.parse::<Ratio>() {
        Ok(r) => r,
        Err(_) => {
            warn!("No ratio named '{}', nothing to plot", ratio_name);
            return Ok(PlotOutcome::NoData);
        }
    };

    let series: Vec<(&Ticker, Vec<(FiscalPeriod, f64)>)> = companies
        .iter()
        .filter(|c| c.ratios.has(ratio))
        .map(|c| (&c.ticker, c.ratios.series(ratio)))
        .filter(|(_, points)| !points.is_empty())
        .collect();

    if series.is_empty() {
        debug!("No plottable values for {}", ratio);
        return Ok(PlotOutcome::NoData);
    }

    if !out_dir.exists() {
        fs::create_dir_all(out_dir)
            .map_err(AnalyzerError::from)
            .with_context(|| format!("Failed to create chart directory {}", out_dir.display()))?;
    }

    let path = out_dir.join(format!("{}.png", chart_file_stem(ratio.name())));
    draw_chart(&path, ratio, &series)
        .with_context(|| format!("Failed to render chart {}", path.display()))?;

    info!("Saved {} chart to {}", ratio, path.display());
    Ok(PlotOutcome::Saved(path))
}

fn chart_err<E: std::fmt::Display>(e: E) -> AnalyzerError {
    AnalyzerError::Chart(e.to_string())
}

/// Axis bounds with some breathing room; a flat series still gets a visible span
fn padded_range<I: Iterator<Item = f64>>(values: I, min_pad: f64) -> std::ops::Range<f64> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let pad = ((hi - lo) * 0.1).max(min_pad);
    (lo - pad)..(hi + pad)
}

fn draw_chart(path: &Path, ratio: Ratio, series: &[(&Ticker, Vec<(FiscalPeriod, f64)>)]) -> Result<()> {
    let points = || series.iter().flat_map(|(_, pts)| pts.iter());
    let x_range = padded_range(points().map(|(p, _)| p.fractional_year()), 0.5);
    let y_range = padded_range(points().map(|(_, v)| *v), 0.01);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let caption = format!("{} Over Time", ratio.name());
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc(ratio.name())
        .x_labels(12)
        .x_label_formatter(&|x: &f64| {
            if (x - x.round()).abs() < 1e-6 {
                format!("{}", x.round() as i32)
            } else {
                String::new()
            }
        })
        .y_label_formatter(&|y: &f64| format!("{:.2}", y))
        .draw()
        .map_err(chart_err)?;

    for (idx, (ticker, pts)) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        let data: Vec<(f64, f64)> = pts.iter().map(|(p, v)| (p.fractional_year(), *v)).collect();

        chart
            .draw_series(LineSeries::new(data.iter().copied(), color.stroke_width(2)))
            .map_err(chart_err)?
            .label(ticker.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

        chart
            .draw_series(data.iter().map(|&(x, y)| Circle::new((x, y), 4, color.filled())))
            .map_err(chart_err)?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratios::calculate_ratios;
    use crate::statements::FinancialTable;
    use tempfile::TempDir;

    fn company(ticker: &str, debt: &[Option<f64>], equity: Option<Vec<Option<f64>>>) -> CompanyRatios {
        let periods: Vec<FiscalPeriod> = (0..debt.len() as i32)
            .map(|i| FiscalPeriod::year_end(2020 + i))
            .collect();
        let mut balance = FinancialTable::new(periods.clone())
            .with_column("Total Liabilities Net Minority Interest", debt.to_vec())
            .unwrap();
        if let Some(eq) = equity {
            balance.insert_column("Stockholders Equity", eq).unwrap();
        }
        let income = FinancialTable::new(periods);
        CompanyRatios {
            ticker: Ticker::parse(ticker).unwrap(),
            ratios: calculate_ratios(&income, &balance),
        }
    }

    #[test]
    fn test_unknown_ratio_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("charts");
        let companies = vec![company("AAA", &[Some(1.0)], Some(vec![Some(2.0)]))];

        let outcome = plot_ratio(&companies, "Quick Ratio", &out).unwrap();
        assert_eq!(outcome, PlotOutcome::NoData);
        assert!(!out.exists());
    }

    #[test]
    fn test_ratio_without_values_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("charts");
        let companies = vec![
            company("AAA", &[Some(1.0), None], Some(vec![None, Some(2.0)])),
            company("BBB", &[Some(1.0)], None),
        ];

        let outcome = plot_ratio(&companies, "Debt to Equity", &out).unwrap();
        assert_eq!(outcome, PlotOutcome::NoData);
        assert!(!out.exists());
    }

    #[test]
    fn test_chart_is_saved_with_derived_name() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("charts");
        let companies = vec![
            company("AAA", &[Some(100.0), Some(120.0)], Some(vec![Some(50.0), Some(40.0)])),
            company("BBB", &[Some(10.0)], Some(vec![Some(20.0)])),
            company("CCC", &[Some(1.0)], None),
        ];

        let outcome = plot_ratio(&companies, "Debt to Equity", &out).unwrap();
        let expected = out.join("debt_to_equity.png");
        assert_eq!(outcome, PlotOutcome::Saved(expected.clone()));
        assert!(expected.metadata().unwrap().len() > 0);

        // Directory already exists on the second run
        let again = plot_ratio(&companies, "Debt to Equity", &out).unwrap();
        assert_eq!(again, PlotOutcome::Saved(expected));
    }

    #[test]
    fn test_padded_range_handles_single_value() {
        let range = padded_range([2.0].into_iter(), 0.01);
        assert!(range.start < 2.0 && range.end > 2.0);
    }
}
