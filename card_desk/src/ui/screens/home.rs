use eframe::egui;
use log::error;

use crate::api::CardApi;
use crate::ui::state::HomeState;

pub struct HomeScreen;

impl HomeScreen {
    pub fn show(ctx: &egui::Context, api: &CardApi, state: &mut HomeState) {
        if !state.loaded {
            Self::load_players(api, state);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(60.0);
                ui.heading("Card Ledger");
                ui.add_space(10.0);
                ui.label(format!("Connected to {}", api.base_url()));
            });

            ui.add_space(30.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                ui.heading("Recently Added Players");
                if ui.button("⟳ Refresh").clicked() {
                    Self::load_players(api, state);
                }
            });
            ui.add_space(5.0);

            if let Some(err) = &state.error {
                ui.colored_label(egui::Color32::RED, err);
            } else if state.players.is_empty() {
                ui.label("No cards yet - add some from the Add Card tab.");
            } else {
                for player in &state.players {
                    ui.label(format!("• {player}"));
                }
            }
        });
    }

    fn load_players(api: &CardApi, state: &mut HomeState) {
        state.loaded = true;
        match api.recent_players() {
            Ok(players) => {
                state.players = players;
                state.error = None;
            }
            Err(e) => {
                error!("Failed to fetch recent players: {e}");
                state.error = Some(format!("Could not load recent players: {e}"));
            }
        }
    }
}
