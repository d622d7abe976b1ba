use eframe::egui;
use log::{error, info};

use card_common::{validate_draft, CardDraft};

use crate::api::CardApi;
use crate::import::run_import;
use crate::io::read_import_csv;
use crate::ui::components::FilePicker;
use crate::ui::state::AddCardState;

pub struct AddCardScreen;

impl AddCardScreen {
    pub fn show(ctx: &egui::Context, api: &CardApi, state: &mut AddCardState) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Add Card");
                ui.add_space(5.0);

                if let Some(message) = &state.success {
                    ui.colored_label(egui::Color32::DARK_GREEN, message);
                    ui.add_space(5.0);
                }

                Self::show_form(ui, api, state);

                ui.add_space(20.0);
                ui.separator();
                ui.add_space(10.0);

                Self::show_import_section(ui, api, state);
            });
        });
    }

    fn show_form(ui: &mut egui::Ui, api: &CardApi, state: &mut AddCardState) {
        egui::Grid::new("add_card_form")
            .num_columns(2)
            .spacing([10.0, 6.0])
            .show(ui, |ui| {
                form_row(ui, "Year", &mut state.form.year, state.errors.fields.get("year"));
                form_row(ui, "Player", &mut state.form.player, state.errors.fields.get("player"));
                form_row(
                    ui,
                    "Manufacturer",
                    &mut state.form.manufacturer,
                    state.errors.fields.get("manufacturer"),
                );
                form_row(ui, "Set", &mut state.form.card_set, state.errors.fields.get("cardSet"));
                form_row(ui, "Subset", &mut state.form.subset, None);
                form_row(ui, "Type", &mut state.form.card_type, state.errors.fields.get("type"));
                form_row(
                    ui,
                    "On Card Code",
                    &mut state.form.on_card_code,
                    state.errors.fields.get("onCardCode"),
                );
                form_row(ui, "Sport", &mut state.form.sport, state.errors.fields.get("sport"));
                form_row(ui, "Tags (comma separated)", &mut state.form.tags, None);
                form_row(ui, "Grade", &mut state.form.grade, None);
                form_row(ui, "Notes", &mut state.form.notes, None);
                form_row(
                    ui,
                    "Price Paid",
                    &mut state.form.price_paid,
                    state.errors.fields.get("pricePaid"),
                );
                form_row(
                    ui,
                    "Market Price",
                    &mut state.form.market_price,
                    state.errors.fields.get("marketPrice"),
                );
                form_row(
                    ui,
                    "Total Copies",
                    &mut state.form.copies,
                    state.errors.fields.get("copies"),
                );
            });

        ui.add_space(10.0);
        if ui.button("Add Card").clicked() {
            Self::submit_form(api, state);
        }
        if let Some(server_error) = state.errors.fields.get("server") {
            ui.colored_label(egui::Color32::RED, server_error.clone());
        }
    }

    fn submit_form(api: &CardApi, state: &mut AddCardState) {
        state.success = None;
        let errors = validate_draft(&state.form);
        if !errors.is_empty() {
            state.errors = errors;
            return;
        }

        let input = state.form.to_input();
        let copies = state.form.copies_count();
        for created in 0..copies {
            if let Err(e) = api.create_card(&input) {
                error!("Failed to create card: {e}");
                state.errors = Default::default();
                state.errors.push("server", e.to_string());
                if created > 0 {
                    state.success = Some(format!("Added {created} card(s) before the error."));
                }
                return;
            }
        }

        info!("Added {copies} card(s) for {}", state.form.player);
        state.form = CardDraft::default();
        state.errors = Default::default();
        state.success = Some("Success! Card(s) added.".to_string());
    }

    fn show_import_section(ui: &mut egui::Ui, api: &CardApi, state: &mut AddCardState) {
        ui.heading("Bulk Import from File (CSV)");
        ui.add_space(5.0);

        FilePicker::new("CSV File:", &mut state.csv_path, "CSV", &["csv"]).show(ui);
        ui.add_space(5.0);

        let import_btn = ui.add_enabled(
            !state.csv_path.trim().is_empty(),
            egui::Button::new("Import File"),
        );
        if import_btn.clicked() {
            Self::run_file_import(api, state);
        }

        if let Some(report) = &state.report {
            ui.add_space(10.0);
            ui.label(format!(
                "Imported {} card(s) from {} row(s).",
                report.imported, report.rows
            ));

            if !report.failures.is_empty() {
                ui.add_space(5.0);
                ui.colored_label(
                    egui::Color32::RED,
                    "Records that could not be imported:",
                );
                for failure in &report.failures {
                    ui.group(|ui| {
                        ui.label(format!(
                            "Line {}: {} {} ({})",
                            failure.line,
                            failure.record.year,
                            failure.record.player,
                            failure.record.manufacturer,
                        ));
                        for (field, message) in &failure.errors.fields {
                            ui.label(format!("  {field}: {message}"));
                        }
                    });
                }
            }
        }
    }

    fn run_file_import(api: &CardApi, state: &mut AddCardState) {
        state.report = None;
        match read_import_csv(state.csv_path.trim()) {
            Ok(records) => {
                info!("Read {} row(s) from {}", records.len(), state.csv_path);
                state.report = Some(run_import(api, &records));
            }
            Err(e) => {
                error!("Failed to read import CSV: {e}");
                let mut report = crate::import::ImportReport::default();
                report.failures.push(crate::import::RowFailure {
                    line: 0,
                    record: Default::default(),
                    errors: {
                        let mut errors = card_common::ValidationErrors::new();
                        errors.push("file", format!("Could not read CSV: {e}"));
                        errors
                    },
                });
                state.report = Some(report);
            }
        }
    }
}

fn form_row(ui: &mut egui::Ui, label: &str, value: &mut String, error: Option<&String>) {
    ui.label(label);
    ui.vertical(|ui| {
        ui.add(egui::TextEdit::singleline(value).desired_width(300.0));
        if let Some(error) = error {
            ui.colored_label(egui::Color32::RED, error);
        }
    });
    ui.end_row();
}
