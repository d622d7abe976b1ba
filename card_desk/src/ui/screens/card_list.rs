use eframe::egui;
use log::{error, info};

use card_common::{validate_draft, Card};

use crate::api::CardApi;
use crate::ui::components::NoteOverlay;
use crate::ui::state::{display_date, ListState};

/// Sortable columns: (header label, wire sort field).
const SORTABLE_COLUMNS: &[(&str, &str)] = &[
    ("Year", "year"),
    ("Player", "player"),
    ("Added", "addedDate"),
    ("Manufacturer", "manufacturer"),
    ("Set", "cardSet"),
    ("Subset", "subset"),
    ("Type", "type"),
    ("Code", "onCardCode"),
    ("Sport", "sport"),
];

pub struct CardListScreen;

impl CardListScreen {
    pub fn show(ctx: &egui::Context, api: &CardApi, state: &mut ListState) {
        if !state.loaded {
            Self::fetch(api, state);
        }

        NoteOverlay::show(ctx, &mut state.expanded_note);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Card List");
            ui.add_space(5.0);

            if let Some(err) = &state.error {
                ui.colored_label(egui::Color32::RED, err);
                ui.add_space(5.0);
            }

            Self::show_search_panel(ui, api, state);
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                ui.label(format!("Number of Cards Returned: {}", state.total));
                ui.add_space(20.0);
                if ui.button("⟳ Refresh").clicked() {
                    Self::fetch(api, state);
                }
                let delete_btn = ui.add_enabled(
                    !state.selected.is_empty(),
                    egui::Button::new(format!("Delete Selected ({})", state.selected.len())),
                );
                if delete_btn.clicked() {
                    Self::bulk_delete(api, state);
                }
            });
            ui.add_space(5.0);

            Self::show_pagination(ui, api, state);
            ui.add_space(5.0);

            egui::ScrollArea::both()
                .max_height(ui.available_height() - 10.0)
                .show(ui, |ui| {
                    Self::show_table(ui, api, state);
                });
        });
    }

    fn show_search_panel(ui: &mut egui::Ui, api: &CardApi, state: &mut ListState) {
        egui::CollapsingHeader::new("Search Filters")
            .default_open(state.show_search)
            .show(ui, |ui| {
                egui::Grid::new("search_fields")
                    .num_columns(4)
                    .spacing([10.0, 4.0])
                    .show(ui, |ui| {
                        let fields = &mut state.search;

                        ui.label("Year:");
                        ui.text_edit_singleline(&mut fields.year);
                        ui.label("Player:");
                        ui.text_edit_singleline(&mut fields.player);
                        ui.end_row();

                        ui.label("Added Date:");
                        ui.add(
                            egui::TextEdit::singleline(&mut fields.added_date)
                                .hint_text("YYYY-MM-DD"),
                        );
                        ui.label("Manufacturer:");
                        ui.text_edit_singleline(&mut fields.manufacturer);
                        ui.end_row();

                        ui.label("Set:");
                        ui.text_edit_singleline(&mut fields.card_set);
                        ui.label("Subset:");
                        ui.text_edit_singleline(&mut fields.subset);
                        ui.end_row();

                        ui.label("Type:");
                        ui.text_edit_singleline(&mut fields.card_type);
                        ui.label("On Card Code:");
                        ui.text_edit_singleline(&mut fields.on_card_code);
                        ui.end_row();

                        ui.label("Sport:");
                        ui.text_edit_singleline(&mut fields.sport);
                        ui.label("Tags:");
                        ui.add(
                            egui::TextEdit::singleline(&mut fields.tags)
                                .hint_text("Tag1, Tag2, Tag3"),
                        );
                        ui.end_row();

                        ui.label("Grade:");
                        ui.text_edit_singleline(&mut fields.grade);
                        ui.label("Price Paid:");
                        ui.text_edit_singleline(&mut fields.price_paid);
                        ui.end_row();

                        ui.label("Market Price:");
                        ui.text_edit_singleline(&mut fields.market_price);
                        ui.label("Quantity:");
                        ui.text_edit_singleline(&mut fields.quantity);
                        ui.end_row();
                    });

                ui.add_space(5.0);
                ui.horizontal(|ui| {
                    if ui.button("Search").clicked() {
                        state.page = 1;
                        Self::fetch(api, state);
                    }
                    if ui.button("Clear Search").clicked() {
                        state.search.clear();
                        state.page = 1;
                        Self::fetch(api, state);
                    }
                });
            });
    }

    fn show_pagination(ui: &mut egui::Ui, api: &CardApi, state: &mut ListState) {
        let total_pages = state.total_pages();

        ui.horizontal(|ui| {
            ui.label("Cards per page:");
            let mut limit = state.limit;
            egui::ComboBox::from_id_salt("cards_per_page")
                .selected_text(format!("{}", limit))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut limit, 10, "10");
                    ui.selectable_value(&mut limit, 25, "25");
                    ui.selectable_value(&mut limit, 50, "50");
                    ui.selectable_value(&mut limit, 100, "100");
                    ui.selectable_value(&mut limit, 200, "200");
                });
            if limit != state.limit {
                state.limit = limit;
                state.page = 1;
                Self::fetch(api, state);
            }

            ui.add_space(20.0);

            if ui.button("⏪ Previous").clicked() && state.page > 1 {
                state.page -= 1;
                Self::fetch(api, state);
            }

            ui.label(format!("Page {} of {}", state.page, total_pages));

            if ui.button("Next ⏩").clicked() && state.page < total_pages {
                state.page += 1;
                Self::fetch(api, state);
            }
        });
    }

    fn show_table(ui: &mut egui::Ui, api: &CardApi, state: &mut ListState) {
        egui::Grid::new("card_table")
            .num_columns(16)
            .spacing([10.0, 4.0])
            .striped(true)
            .show(ui, |ui| {
                // Header row; most columns sort on click
                ui.strong("");
                for (label, field) in SORTABLE_COLUMNS {
                    if ui
                        .button(format!("{}{}", label, state.sort.indicator(field)))
                        .clicked()
                    {
                        state.sort.cycle(field);
                        Self::fetch(api, state);
                    }
                }
                ui.strong("Tags");
                for (label, field) in [("Grade", "grade"), ("Price", "pricePaid"), ("Market", "marketPrice")] {
                    if ui
                        .button(format!("{}{}", label, state.sort.indicator(field)))
                        .clicked()
                    {
                        state.sort.cycle(field);
                        Self::fetch(api, state);
                    }
                }
                ui.strong("Notes");
                ui.strong("Actions");
                ui.end_row();

                let cards = state.cards.clone();
                if cards.is_empty() {
                    ui.label("No cards available");
                    ui.end_row();
                }
                for card in &cards {
                    if state.editing == Some(card.id) {
                        Self::show_edit_row(ui, api, state, card);
                    } else {
                        Self::show_card_row(ui, api, state, card);
                    }
                    ui.end_row();
                }
            });
    }

    fn show_card_row(ui: &mut egui::Ui, api: &CardApi, state: &mut ListState, card: &Card) {
        let mut checked = state.selected.contains(&card.id);
        if ui.checkbox(&mut checked, "").changed() {
            if checked {
                state.selected.insert(card.id);
            } else {
                state.selected.remove(&card.id);
            }
        }

        ui.label(card.year.to_string());
        ui.label(&card.player);
        ui.label(display_date(&card.added_date));
        ui.label(&card.manufacturer);
        ui.label(card.card_set.as_deref().unwrap_or(""));
        ui.label(card.subset.as_deref().unwrap_or(""));
        ui.label(&card.card_type);
        ui.label(&card.on_card_code);
        ui.label(&card.sport);
        ui.label(card.tags.as_ref().map(|t| t.join(", ")).unwrap_or_default());
        ui.label(card.grade.as_deref().unwrap_or(""));
        ui.label(card.price_paid.map(|p| format!("{p:.2}")).unwrap_or_default());
        ui.label(card.market_price.map(|p| format!("{p:.2}")).unwrap_or_default());

        match card.notes.as_deref() {
            Some(notes) if !notes.is_empty() => {
                let snippet = if notes.chars().count() > 30 {
                    format!("{}...", notes.chars().take(30).collect::<String>())
                } else {
                    notes.to_string()
                };
                if ui.link(snippet).clicked() {
                    state.expanded_note = Some(notes.to_string());
                }
            }
            _ => {
                ui.label("No notes");
            }
        }

        ui.horizontal(|ui| {
            if ui.button("Edit").clicked() {
                state.start_editing(card);
            }
            if ui.button("Delete").clicked() {
                Self::delete_one(api, state, card.id);
            }
        });
    }

    fn show_edit_row(ui: &mut egui::Ui, api: &CardApi, state: &mut ListState, card: &Card) {
        ui.label("");

        edit_cell(ui, &mut state.edit_draft.year, state.edit_errors.fields.get("year"));
        edit_cell(ui, &mut state.edit_draft.player, state.edit_errors.fields.get("player"));
        ui.label(display_date(&card.added_date));
        edit_cell(
            ui,
            &mut state.edit_draft.manufacturer,
            state.edit_errors.fields.get("manufacturer"),
        );
        edit_cell(ui, &mut state.edit_draft.card_set, state.edit_errors.fields.get("cardSet"));
        edit_cell(ui, &mut state.edit_draft.subset, None);
        edit_cell(ui, &mut state.edit_draft.card_type, state.edit_errors.fields.get("type"));
        edit_cell(
            ui,
            &mut state.edit_draft.on_card_code,
            state.edit_errors.fields.get("onCardCode"),
        );
        edit_cell(ui, &mut state.edit_draft.sport, state.edit_errors.fields.get("sport"));
        edit_cell(ui, &mut state.edit_draft.tags, None);
        edit_cell(ui, &mut state.edit_draft.grade, None);
        edit_cell(
            ui,
            &mut state.edit_draft.price_paid,
            state.edit_errors.fields.get("pricePaid"),
        );
        edit_cell(
            ui,
            &mut state.edit_draft.market_price,
            state.edit_errors.fields.get("marketPrice"),
        );
        edit_cell(ui, &mut state.edit_draft.notes, None);

        ui.vertical(|ui| {
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    Self::save_edit(api, state);
                }
                if ui.button("Cancel").clicked() {
                    state.stop_editing();
                }
            });
            if let Some(server_error) = state.edit_errors.fields.get("server") {
                ui.colored_label(egui::Color32::RED, server_error.clone());
            }
        });
    }

    fn fetch(api: &CardApi, state: &mut ListState) {
        state.loaded = true;
        let sort = state.sort.to_param();
        let result = if state.search.is_empty() {
            api.list_cards(state.page, state.limit, sort)
        } else {
            let pairs = state.search.to_query_pairs();
            api.search_cards(&pairs, state.page, state.limit, sort)
        };

        match result {
            Ok(page) => {
                state.cards = page.data;
                state.total = page.total;
                state.page = page.page;
                state.limit = page.limit;
                state.error = None;
            }
            Err(e) => {
                error!("Failed to fetch cards: {e}");
                state.error = Some(format!("Error fetching cards: {e}"));
            }
        }
    }

    fn save_edit(api: &CardApi, state: &mut ListState) {
        let Some(id) = state.editing else {
            return;
        };

        let errors = validate_draft(&state.edit_draft);
        if !errors.is_empty() {
            state.edit_errors = errors;
            return;
        }

        // Partial update: quantity is not edited here, leave it alone
        let mut input = state.edit_draft.to_input();
        input.quantity = None;

        match api.update_card(id, &input) {
            Ok(_) => {
                info!("Updated card {id}");
                state.stop_editing();
                Self::fetch(api, state);
            }
            Err(e) => {
                error!("Failed to update card {id}: {e}");
                state.edit_errors.push("server", e.to_string());
            }
        }
    }

    fn delete_one(api: &CardApi, state: &mut ListState, id: i64) {
        match api.delete_card(id) {
            Ok(()) => {
                info!("Deleted card {id}");
                state.selected.remove(&id);
                Self::fetch(api, state);
            }
            Err(e) => {
                error!("Failed to delete card {id}: {e}");
                state.error = Some(format!("Error deleting card: {e}"));
            }
        }
    }

    /// One DELETE per selected id, issued concurrently; the selection
    /// is cleared afterwards and any failures are reported together.
    fn bulk_delete(api: &CardApi, state: &mut ListState) {
        let ids: Vec<i64> = state.selected.iter().copied().collect();
        info!("Bulk deleting {} card(s)", ids.len());

        let failures: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = ids
                .iter()
                .map(|id| {
                    scope.spawn(move || {
                        api.delete_card(*id).map_err(|e| format!("card {id}: {e}"))
                    })
                })
                .collect();
            handles
                .into_iter()
                .filter_map(|handle| handle.join().ok())
                .filter_map(Result::err)
                .collect()
        });

        state.selected.clear();
        if failures.is_empty() {
            state.error = None;
        } else {
            error!("Bulk delete had {} failure(s)", failures.len());
            state.error = Some(format!("Some deletes failed: {}", failures.join("; ")));
        }
        Self::fetch(api, state);
    }
}

fn edit_cell(ui: &mut egui::Ui, value: &mut String, error: Option<&String>) {
    ui.vertical(|ui| {
        ui.add(egui::TextEdit::singleline(value).desired_width(90.0));
        if let Some(error) = error {
            ui.colored_label(egui::Color32::RED, error);
        }
    });
}
