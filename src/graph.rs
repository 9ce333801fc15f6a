use crate::filter::{AGE_MAX, AGE_MIN};
use crate::ir::{BarChart, ScatterChart, ScatterPoint};
use crate::palette;
use crate::{OutputFormat, RenderOptions};
use anyhow::{anyhow, Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fmt::Display;
use std::ops::Range;

/// A chart that can draw itself onto any plotters backend
pub trait Paint {
    fn paint<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>;
}

/// Largest accepted canvas side, in pixels
pub const MAX_DIMENSION: u32 = 16_384;

/// Rasterise a chart as PNG or SVG bytes
pub fn render<C: Paint>(chart: &C, options: &RenderOptions) -> Result<Vec<u8>> {
    let (width, height) = (options.width, options.height);
    if width == 0 || height == 0 {
        anyhow::bail!("Cannot render a {}x{} canvas", width, height);
    }
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        anyhow::bail!(
            "Cannot render a {}x{} canvas (at most {} pixels per side)",
            width,
            height,
            MAX_DIMENSION
        );
    }

    match options.format {
        OutputFormat::Png => {
            let len = (width as usize)
                .checked_mul(height as usize)
                .and_then(|n| n.checked_mul(3))
                .ok_or_else(|| anyhow!("Canvas {}x{} is too large", width, height))?;
            let mut buffer = vec![0u8; len];
            {
                let root = BitMapBackend::with_buffer(&mut buffer, (width, height))
                    .into_drawing_area();
                chart.paint(&root)?;
            }

            let mut png_bytes = Vec::new();
            let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
            encoder
                .write_image(&buffer, width, height, image::ColorType::Rgb8)
                .context("Failed to encode PNG")?;
            Ok(png_bytes)
        }
        OutputFormat::Svg => {
            let mut svg = String::new();
            {
                let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
                chart.paint(&root)?;
            }
            Ok(svg.into_bytes())
        }
    }
}

pub fn render_scatter(chart: &ScatterChart, options: &RenderOptions) -> Result<Vec<u8>> {
    render(chart, options)
}

pub fn render_bar(chart: &BarChart, options: &RenderOptions) -> Result<Vec<u8>> {
    render(chart, options)
}

impl Paint for ScatterChart {
    fn paint<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        root.fill(&WHITE).map_err(draw_err("Failed to fill background"))?;

        let x_range = padded_range(
            self.points.iter().map(|p| p.x),
            f64::from(AGE_MIN)..f64::from(AGE_MAX),
        );
        let y_range = padded_range(self.points.iter().map(|p| p.y), 0.0..1.0);

        let mut chart = ChartBuilder::on(root)
            .margin(10)
            .caption(&self.title, ("sans-serif", 20))
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)
            .map_err(draw_err("Failed to build chart"))?;

        chart
            .configure_mesh()
            .x_desc(self.x_label.as_str())
            .y_desc(self.y_label.as_str())
            .draw()
            .map_err(draw_err("Failed to draw mesh"))?;

        // One series per scale entry so each gets a legend row
        let mut has_legend = false;
        for mapping in &self.color_scale {
            let members: Vec<&ScatterPoint> = self
                .points
                .iter()
                .filter(|p| p.series == mapping.label)
                .collect();
            if members.is_empty() {
                continue;
            }

            let color = to_rgb(&mapping.color);
            chart
                .draw_series(members.iter().map(|p| {
                    Circle::new((p.x, p.y), point_radius(p.size), color.mix(0.8).filled())
                }))
                .map_err(draw_err("Failed to draw point series"))?
                .label(mapping.label.as_str())
                .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
            has_legend = true;
        }

        // Labels outside the scale domain: drawn, not listed
        let unmapped = self
            .points
            .iter()
            .filter(|p| !self.color_scale.iter().any(|m| m.label == p.series));
        chart
            .draw_series(unmapped.map(|p| {
                Circle::new(
                    (p.x, p.y),
                    point_radius(p.size),
                    to_rgb(&p.color).mix(0.8).filled(),
                )
            }))
            .map_err(draw_err("Failed to draw point series"))?;

        if has_legend {
            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(draw_err("Failed to draw legend"))?;
        }

        root.present().map_err(draw_err("Failed to present drawing"))?;
        Ok(())
    }
}

impl Paint for BarChart {
    fn paint<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        root.fill(&WHITE).map_err(draw_err("Failed to fill background"))?;

        // Bars sit on integer positions so tick labels land on their centers
        let num_bars = self.bars.len();
        let x_range = -0.5..(num_bars.max(1) as f64 - 0.5);
        let y_max = self.bars.iter().map(|b| b.value).fold(0.0, f64::max);
        let y_min = self.bars.iter().map(|b| b.value).fold(0.0, f64::min);
        let y_range = if y_max == y_min {
            0.0..1.0
        } else {
            let padding = (y_max - y_min) * 0.05;
            (y_min - if y_min < 0.0 { padding } else { 0.0 })..(y_max + padding)
        };

        let mut chart = ChartBuilder::on(root)
            .margin(10)
            .caption(&self.title, ("sans-serif", 20))
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range, y_range)
            .map_err(draw_err("Failed to build chart"))?;

        let categories: Vec<String> = self.bars.iter().map(|b| b.category.clone()).collect();
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(num_bars.max(1))
            .x_label_formatter(&|x| category_label(&categories, *x))
            .x_desc(self.x_label.as_str())
            .y_desc(self.y_label.as_str())
            .draw()
            .map_err(draw_err("Failed to draw mesh"))?;

        let bar_width = 0.8;
        for (idx, bar) in self.bars.iter().enumerate() {
            let x_center = idx as f64;
            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [
                        (x_center - bar_width / 2.0, 0.0),
                        (x_center + bar_width / 2.0, bar.value),
                    ],
                    to_rgb(&bar.color).filled(),
                )))
                .map_err(draw_err("Failed to draw bar"))?;
        }

        root.present().map_err(draw_err("Failed to present drawing"))?;
        Ok(())
    }
}

fn draw_err<E: Display>(what: &'static str) -> impl FnOnce(E) -> anyhow::Error {
    move |e| anyhow!("{}: {}", what, e)
}

/// Data range with 5% padding; `fallback` when there is no data
fn padded_range(values: impl Iterator<Item = f64>, fallback: Range<f64>) -> Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if min > max {
        fallback
    } else if min == max {
        (min - 1.0)..(max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding)..(max + padding)
    }
}

/// Point radius in pixels for a quantity
fn point_radius(quantity: f64) -> i32 {
    (3.0 * quantity.max(0.0).sqrt()).clamp(2.0, 20.0).round() as i32
}

fn category_label(categories: &[String], x: f64) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    categories
        .get(rounded as usize)
        .cloned()
        .unwrap_or_default()
}

fn to_rgb(color: &str) -> RGBColor {
    match palette::parse_hex(color) {
        Some((r, g, b)) => RGBColor(r, g, b),
        None => BLUE,
    }
}
