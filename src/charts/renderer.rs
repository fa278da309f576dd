//! Static Chart Renderer
//! Draws the top-products bar chart with plotters and encodes it as PNG.
//!
//! Layout:
//! 1. Title: "Top N Products in {country}" centered
//! 2. One bar per product, highest sales first
//! 3. Y axis labelled in dollars, X axis labelled with (shortened) product names

use crate::report::format_currency;
use crate::stats::ProductSales;
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;
use tracing::info;

const BAR_COLOR: RGBColor = RGBColor(31, 119, 180);
const GRID_COLOR: RGBColor = RGBColor(220, 220, 220);

/// Product names longer than this are shortened on the X axis.
const MAX_LABEL_CHARS: usize = 22;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No products to render")]
    NoData,
    #[error("Invalid image size {0}x{1}")]
    InvalidSize(u32, u32),
    #[error("Chart drawing failed: {0}")]
    Drawing(String),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Failed to write chart: {0}")]
    Io(#[from] std::io::Error),
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the ranking to PNG bytes.
    pub fn render_top_products_png(
        title: &str,
        products: &[ProductSales],
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        if products.is_empty() {
            return Err(RenderError::NoData);
        }
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSize(width, height));
        }

        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        Self::draw_bar_chart(&mut buffer, title, products, width, height)?;

        let img = RgbImage::from_raw(width, height, buffer)
            .ok_or(RenderError::InvalidSize(width, height))?;
        let mut bytes: Vec<u8> = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Render the ranking and write it to `path`.
    pub fn save_top_products_png(
        path: &Path,
        title: &str,
        products: &[ProductSales],
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let bytes = Self::render_top_products_png(title, products, width, height)?;
        std::fs::write(path, bytes)?;
        info!(path = %path.display(), products = products.len(), "chart exported");
        Ok(())
    }

    fn draw_bar_chart(
        buffer: &mut [u8],
        title: &str,
        products: &[ProductSales],
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::with_buffer(buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error)?;

        let (y_min, y_max) = Self::get_y_range(products);
        let labels: Vec<String> = products
            .iter()
            .map(|p| shorten_label(&p.description))
            .collect();

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 26))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(90)
            .build_cartesian_2d((0..products.len()).into_segmented(), y_min..y_max)
            .map_err(drawing_error)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .light_line_style(GRID_COLOR)
            .x_labels(products.len())
            .x_label_formatter(&|v: &SegmentValue<usize>| match v {
                SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .y_label_formatter(&|v: &f64| format_currency(*v))
            .y_desc("Sales")
            .draw()
            .map_err(drawing_error)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(BAR_COLOR.filled())
                    .margin(15)
                    .data(products.iter().enumerate().map(|(i, p)| (i, p.sales))),
            )
            .map_err(drawing_error)?;

        root.present().map_err(drawing_error)?;
        Ok(())
    }

    /// Value range including zero, padded above the tallest bar.
    fn get_y_range(products: &[ProductSales]) -> (f64, f64) {
        let max = products.iter().map(|p| p.sales).fold(0.0_f64, f64::max);
        let min = products.iter().map(|p| p.sales).fold(0.0_f64, f64::min);
        let pad = ((max - min) * 0.1).max(1.0);
        (if min < 0.0 { min - pad } else { 0.0 }, max + pad)
    }
}

fn shorten_label(description: &str) -> String {
    if description.chars().count() <= MAX_LABEL_CHARS {
        description.to_string()
    } else {
        let head: String = description.chars().take(MAX_LABEL_CHARS - 1).collect();
        format!("{}…", head.trim_end())
    }
}

fn drawing_error<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Drawing(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ranking_is_rejected() {
        let result = StaticChartRenderer::render_top_products_png("Top 5 Products in France", &[], 800, 600);
        assert!(matches!(result, Err(RenderError::NoData)));
    }

    #[test]
    fn zero_size_is_rejected() {
        let products = vec![ProductSales {
            description: "WHITE METAL LANTERN".to_string(),
            sales: 20.34,
        }];
        let result = StaticChartRenderer::render_top_products_png("Top", &products, 0, 600);
        assert!(matches!(result, Err(RenderError::InvalidSize(0, 600))));
    }

    #[test]
    fn y_range_covers_returns() {
        let products = vec![
            ProductSales {
                description: "A".to_string(),
                sales: 50.0,
            },
            ProductSales {
                description: "B".to_string(),
                sales: -10.0,
            },
        ];
        let (min, max) = StaticChartRenderer::get_y_range(&products);
        assert!(min < -10.0);
        assert!(max > 50.0);
    }

    #[test]
    fn long_labels_are_shortened() {
        assert_eq!(shorten_label("MUG"), "MUG");
        let label = shorten_label("WHITE HANGING HEART T-LIGHT HOLDER");
        assert!(label.chars().count() <= MAX_LABEL_CHARS);
        assert!(label.ends_with('…'));
    }
}
