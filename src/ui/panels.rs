use std::iter;

use eframe::egui::{self, RichText, Ui};

use super::charts::{self, CARD_HEIGHT, WIDE_HEIGHT};
use crate::color::{self, ColorMap};
use crate::data::query::ALL_GENRES;
use crate::state::{AppState, DashboardTab, GenreView, RankedEntry};

fn bar_entries(entries: &[RankedEntry]) -> Vec<(String, f64)> {
    entries.iter().map(|e| (e.name.clone(), e.value)).collect()
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

pub fn title_bar(ui: &mut Ui, state: &AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(8.0);
        ui.label(
            RichText::new("Anime Rating Dashboard")
                .size(26.0)
                .strong()
                .color(color::ACCENT),
        );
        let stats = &state.dataset.stats;
        ui.label(format!(
            "{} anime joined with {} user ratings",
            stats.joined_records, stats.rating_events_kept
        ));
        ui.add_space(4.0);
    });
}

// ---------------------------------------------------------------------------
// Overview rows
// ---------------------------------------------------------------------------

/// Row 1: genres, types, episodes.
pub fn overview_row(ui: &mut Ui, state: &AppState, type_colors: &ColorMap) {
    let n = state.config.top_n;
    ui.columns(3, |cols| {
        charts::card(&mut cols[0], &format!("Top {n} Genres by Anime Count"), |ui| {
            let entries: Vec<(String, f64)> = state
                .views
                .top_genres
                .iter()
                .map(|(g, c)| (g.clone(), *c as f64))
                .collect();
            charts::ranked_bars(ui, "top_genres", &entries, 10, 35.0, "Number of Anime", CARD_HEIGHT);
        });
        charts::card(&mut cols[1], "Anime Type Distribution", |ui| {
            charts::pie_chart(ui, &state.views.type_shares, type_colors, CARD_HEIGHT);
        });
        charts::card(&mut cols[2], &format!("Top {n} Anime by Episode Count"), |ui| {
            let entries = bar_entries(&state.views.top_episodes);
            charts::ranked_bars(ui, "top_episodes", &entries, 15, 120.0, "Episode Count", CARD_HEIGHT);
        });
    });
}

/// Row 2: official and user rating leaders.
pub fn ratings_row(ui: &mut Ui, state: &AppState) {
    let n = state.config.top_n;
    ui.columns(2, |cols| {
        charts::card(&mut cols[0], &format!("Top {n} by Official Rating"), |ui| {
            let entries = bar_entries(&state.views.top_official);
            charts::ranked_bars(ui, "top_official", &entries, 15, 210.0, "Rating", CARD_HEIGHT);
        });
        charts::card(&mut cols[1], &format!("Top {n} by User Rating"), |ui| {
            let entries = bar_entries(&state.views.top_user);
            charts::ranked_bars(ui, "top_user", &entries, 15, 0.0, "Rating", CARD_HEIGHT);
        });
    });
}

// ---------------------------------------------------------------------------
// Genre filter
// ---------------------------------------------------------------------------

/// Genre dropdown plus the chart it drives.
pub fn genre_panel(ui: &mut Ui, state: &mut AppState) {
    let mut chosen: Option<String> = None;

    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new("Filter by Genre:").size(14.0));
        egui::ComboBox::from_id_salt("genre_filter")
            .selected_text(state.selected_genre.as_str())
            .width(220.0)
            .show_ui(ui, |ui: &mut Ui| {
                let options = iter::once(ALL_GENRES).chain(state.views.genres.iter().map(String::as_str));
                for genre in options {
                    if ui
                        .selectable_label(state.selected_genre == genre, genre)
                        .clicked()
                    {
                        chosen = Some(genre.to_string());
                    }
                }
            });
    });

    if let Some(genre) = chosen {
        state.set_genre(&genre);
    }

    let genre = state.selected_genre.clone();
    match &state.genre_view {
        GenreView::Top(entries) => {
            let title = format!("Top {} {genre} Anime (User Ratings)", state.config.top_n);
            charts::card(ui, &title, |ui| {
                charts::ranked_bars(
                    ui,
                    "genre_top",
                    &bar_entries(entries),
                    20,
                    180.0,
                    "User Rating",
                    WIDE_HEIGHT,
                );
            });
        }
        GenreView::NoMatches => {
            ui.label(
                RichText::new(format!("No anime found for genre: {genre}"))
                    .size(14.0)
                    .color(color::ERROR),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

pub fn detail_tabs(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for tab in DashboardTab::ALL {
            ui.selectable_value(&mut state.active_tab, tab, tab.label());
        }
    });
    ui.separator();

    match state.active_tab {
        DashboardTab::TopAnime => {
            let title = format!(
                "Top {} Anime: Official vs User Ratings",
                state.config.comparison_size
            );
            charts::card(ui, &title, |ui| charts::comparison_bars(ui, &state.views.comparison));
        }
        DashboardTab::RatingDistribution => {
            charts::card(ui, "Distribution of User Ratings", |ui| {
                charts::rating_histogram(ui, &state.views.histogram)
            });
        }
        DashboardTab::RatingComparison => {
            charts::card(ui, "Official vs User Ratings", |ui| {
                charts::rating_scatter(ui, &state.views.rating_pairs)
            });
        }
    }
}
