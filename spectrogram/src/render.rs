use std::path::Path;

use anyhow::Context;
use plotters::prelude::{
    BitMapBackend, ChartBuilder, IntoDrawingArea, Rectangle, RGBColor, WHITE,
};
use plotters::style::Color;

use crate::mel::{mel_power_db, TOP_DB};

const WIDTH: u32 = 900;
const HEIGHT: u32 = 600;
const BAR_WIDTH: u32 = 80;
const BAR_STEPS: usize = 64;

/// Renders the mel spectrogram of `samples` as a labeled PNG with a
/// color-mapped intensity scale on the right.
pub fn render(samples: &[f32], sample_rate: u32, path: &Path) -> anyhow::Result<()> {
    anyhow::ensure!(!samples.is_empty(), "no audio to draw");

    let mel = mel_power_db(samples, sample_rate);
    let n_frames = mel.len();
    let n_mels = mel.first().map_or(0, Vec::len);
    anyhow::ensure!(n_frames > 0 && n_mels > 0, "no frames to draw");

    let duration = samples.len() as f32 / sample_rate as f32;

    let gradient = colorgrad::CustomGradient::new()
        .colors(&colorgrad::magma().colors(BAR_STEPS))
        .domain(&[-f64::from(TOP_DB), 0.0])
        .build()
        .context("building color gradient")?;

    let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let (chart_area, bar_area) = root.split_horizontally(WIDTH - BAR_WIDTH);

    let mut chart = ChartBuilder::on(&chart_area)
        .caption("Mel Spectrogram", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f32..duration, 0usize..n_mels)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Time (s)")
        .y_desc("Mel band")
        .draw()?;

    let frame_dt = duration / n_frames as f32;
    let grad = &gradient;
    chart.draw_series(mel.iter().enumerate().flat_map(|(frame, bands)| {
        bands.iter().enumerate().map(move |(band, &db)| {
            let (r, g, b, _) = grad.at(f64::from(db)).to_linear_rgba_u8();
            let x0 = frame as f32 * frame_dt;
            Rectangle::new(
                [(x0, band), (x0 + frame_dt, band + 1)],
                RGBColor(r, g, b).filled(),
            )
        })
    }))?;

    // Intensity scale, 0 dB at the top.
    let bar = bar_area.margin(44, 50, 10, 30);
    for (step, cell) in bar.split_evenly((BAR_STEPS, 1)).into_iter().enumerate() {
        let db = -f64::from(TOP_DB) * step as f64 / (BAR_STEPS - 1) as f64;
        let (r, g, b, _) = gradient.at(db).to_linear_rgba_u8();
        cell.fill(&RGBColor(r, g, b))?;
    }

    root.present()?;
    Ok(())
}
