use std::f32::consts::{FRAC_PI_2, TAU};
use std::ops::RangeInclusive;

use eframe::egui::{self, Align2, Color32, FontId, Sense, Shape, Stroke, Ui, Vec2};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, PlotPoints, Points};

use super::wrap_label;
use crate::color::{self, ColorMap};
use crate::data::query::{HistogramBin, Share};
use crate::state::ComparisonEntry;

pub const CARD_HEIGHT: f32 = 260.0;
pub const WIDE_HEIGHT: f32 = 380.0;

/// Axis formatter that prints `labels[i]` at integer position `i`.
fn category_formatter(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let v = mark.value;
        if v < -0.01 || (v - v.round()).abs() > 0.01 {
            return String::new();
        }
        labels.get(v.round() as usize).cloned().unwrap_or_default()
    }
}

fn static_plot(id: &str, height: f32) -> Plot<'static> {
    Plot::new(id.to_string())
        .height(height)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_grid(true)
}

// ---------------------------------------------------------------------------
// Horizontal ranking bars
// ---------------------------------------------------------------------------

/// Horizontal bars, first entry on top. `wrap` is the label width in columns.
pub fn ranked_bars(
    ui: &mut Ui,
    id: &str,
    entries: &[(String, f64)],
    wrap: usize,
    hue: f32,
    value_label: &str,
    height: f32,
) {
    let n = entries.len();
    let palette = color::ranked_palette(n, hue);

    // Position 0 is the bottom of the axis, so the ranking is laid out reversed.
    let labels: Vec<String> = entries
        .iter()
        .rev()
        .map(|(name, _)| wrap_label(name, wrap))
        .collect();
    let bars: Vec<Bar> = entries
        .iter()
        .enumerate()
        .map(|(rank, (name, value))| {
            Bar::new((n - 1 - rank) as f64, *value)
                .name(name)
                .fill(palette[rank])
                .width(0.7)
        })
        .collect();

    static_plot(id, height)
        .x_axis_label(value_label)
        .y_axis_formatter(category_formatter(labels))
        .include_x(0.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}

// ---------------------------------------------------------------------------
// Pie
// ---------------------------------------------------------------------------

/// Pie chart with `label` + percentage next to each slice.
pub fn pie_chart(ui: &mut Ui, shares: &[Share], colors: &ColorMap, height: f32) {
    let (response, painter) =
        ui.allocate_painter(Vec2::new(ui.available_width(), height), Sense::hover());
    let rect = response.rect;
    let center = rect.center();
    let radius = rect.width().min(rect.height()) * 0.36;

    let mut angle = -FRAC_PI_2;
    for share in shares {
        let sweep = TAU * share.percent as f32 / 100.0;
        let fill = colors.color_for(&share.label);

        // Fan of thin triangles so every piece stays convex.
        let steps = ((sweep / TAU * 96.0).ceil() as usize).max(1);
        for s in 0..steps {
            let a0 = angle + sweep * s as f32 / steps as f32;
            let a1 = angle + sweep * (s + 1) as f32 / steps as f32;
            painter.add(Shape::convex_polygon(
                vec![
                    center,
                    center + radius * Vec2::angled(a0),
                    center + radius * Vec2::angled(a1),
                ],
                fill,
                Stroke::NONE,
            ));
        }

        let mid = angle + sweep / 2.0;
        painter.text(
            center + radius * 1.22 * Vec2::angled(mid),
            Align2::CENTER_CENTER,
            format!("{}\n{:.1}%", share.label, share.percent),
            FontId::proportional(12.0),
            Color32::WHITE,
        );
        angle += sweep;
    }
}

// ---------------------------------------------------------------------------
// Official vs user comparison
// ---------------------------------------------------------------------------

/// Paired vertical bars per anime: official rating next to mean user rating.
pub fn comparison_bars(ui: &mut Ui, entries: &[ComparisonEntry]) {
    let labels: Vec<String> = entries.iter().map(|e| wrap_label(&e.name, 15)).collect();
    let official: Vec<Bar> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| Bar::new(i as f64 - 0.2, e.official).name(&e.name).width(0.4))
        .collect();
    let user: Vec<Bar> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| Bar::new(i as f64 + 0.2, e.user).name(&e.name).width(0.4))
        .collect();

    static_plot("top_anime_comparison", WIDE_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Anime Name")
        .y_axis_label("Rating")
        .x_axis_formatter(category_formatter(labels))
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(official).name("Official").color(color::OFFICIAL));
            plot_ui.bar_chart(BarChart::new(user).name("User").color(color::USER));
        });
}

// ---------------------------------------------------------------------------
// Rating distribution
// ---------------------------------------------------------------------------

pub fn rating_histogram(ui: &mut Ui, bins: &[HistogramBin]) {
    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            Bar::new((b.start + b.end) / 2.0, b.count as f64)
                .width(b.end - b.start)
                .name(format!("{:.1} – {:.1}", b.start, b.end))
        })
        .collect();

    static_plot("rating_distribution", WIDE_HEIGHT)
        .x_axis_label("User Rating (1-10)")
        .y_axis_label("Frequency")
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(color::HISTOGRAM));
        });
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

pub fn rating_scatter(ui: &mut Ui, pairs: &[[f64; 2]]) {
    Plot::new("rating_comparison")
        .height(WIDE_HEIGHT)
        .x_axis_label("Official Rating")
        .y_axis_label("Average User Rating")
        .data_aspect(1.0)
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(PlotPoints::new(pairs.to_vec()))
                    .radius(2.5)
                    .color(color::ACCENT.gamma_multiply(0.6)),
            );
        });
}

/// Framed card with a heading, as used for every chart on the dashboard.
pub fn card(ui: &mut Ui, title: &str, add_contents: impl FnOnce(&mut Ui)) {
    egui::Frame::group(ui.style())
        .fill(color::PANEL)
        .stroke(Stroke::new(1.0, color::ACCENT))
        .show(ui, |ui: &mut Ui| {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.strong(title);
            });
            add_contents(ui);
        });
}
