//! Histogram artifact for simulated PnL totals
//!
//! Written as an SVG chart (`.svg`) with the mean drawn as a vertical line,
//! or as a CSV bin table (`.csv`).

use plotters::prelude::{
    ChartBuilder, Color, IntoDrawingArea, PathElement, Rectangle, SVGBackend, BLUE, RED, WHITE,
};
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;
use tracing::info;

use super::stats::mean;
use crate::error::{Result, SimError};

pub const DEFAULT_BINS: usize = 50;

const CHART_SIZE: (u32, u32) = (900, 560);

/// Output format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistogramFormat {
    Svg,
    Csv,
}

impl HistogramFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("svg") => Ok(Self::Svg),
            Some("csv") => Ok(Self::Csv),
            _ => Err(SimError::Config(format!(
                "Histogram path must end in .svg or .csv: {}",
                path.display()
            ))),
        }
    }
}

/// Equal-width histogram with the sample mean marked
#[derive(Debug, Clone)]
pub struct Histogram {
    /// Bin edges, `bins + 1` values
    pub edges: Vec<f64>,
    pub counts: Vec<u64>,
    pub mean: f64,
}

impl Histogram {
    pub fn new(values: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        let mean = mean(values);

        if values.is_empty() {
            return Self {
                edges: vec![0.0; bins + 1],
                counts: vec![0; bins],
                mean,
            };
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        // All-equal samples get a unit-wide range centred on the value
        let (lo, hi) = if max > min {
            (min, max)
        } else {
            (min - 0.5, max + 0.5)
        };
        let width = (hi - lo) / bins as f64;

        let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
        let mut counts = vec![0u64; bins];
        for &v in values {
            // Right edge is inclusive for the last bin
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Self {
            edges,
            counts,
            mean,
        }
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Index of the bin containing the mean
    pub fn mean_bin(&self) -> usize {
        let bins = self.counts.len();
        self.edges
            .windows(2)
            .position(|w| self.mean >= w[0] && self.mean < w[1])
            .unwrap_or(bins - 1)
    }

    /// Write in the format implied by the path's extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        match HistogramFormat::from_path(path)? {
            HistogramFormat::Svg => self.write_svg(path),
            HistogramFormat::Csv => self.write_csv(path),
        }
    }

    /// Render bars with a vertical line at the mean
    pub fn write_svg<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        create_parent(path)?;

        let bins = self.counts.len();
        let lo = self.edges[0];
        let hi = self.edges[bins];
        let y_max = self.counts.iter().copied().max().unwrap_or(0).max(1) + 1;

        let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(plot_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Distribution of Total PnL", ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(lo..hi, 0u64..y_max)
            .map_err(plot_error)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Total PnL ($)")
            .y_desc("Frequency")
            .draw()
            .map_err(plot_error)?;

        chart
            .draw_series(self.counts.iter().enumerate().map(|(i, &count)| {
                Rectangle::new(
                    [(self.edges[i], 0), (self.edges[i + 1], count)],
                    BLUE.mix(0.6).filled(),
                )
            }))
            .map_err(plot_error)?;

        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(self.mean, 0), (self.mean, y_max)],
                RED.stroke_width(2),
            )))
            .map_err(plot_error)?;

        root.present().map_err(plot_error)?;

        info!(path = %path.display(), bins, "Wrote PnL histogram chart");
        Ok(())
    }

    /// Write one row per bin: edges, count, and whether it holds the mean
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        create_parent(path)?;

        let mean_bin = self.mean_bin();
        let bins = self.counts.len();
        let mut df = DataFrame::new(vec![
            Series::new("bin_start", &self.edges[..bins]),
            Series::new("bin_end", &self.edges[1..]),
            Series::new("count", &self.counts),
            Series::new(
                "contains_mean",
                (0..bins).map(|i| i == mean_bin).collect::<Vec<bool>>(),
            ),
            Series::new("mean", vec![self.mean; bins]),
        ])?;

        let mut file = File::create(path)?;
        CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;

        info!(path = %path.display(), bins, "Wrote PnL histogram");
        Ok(())
    }
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn plot_error<E: std::fmt::Display>(e: E) -> SimError {
    SimError::Plot(e.to_string())
}
