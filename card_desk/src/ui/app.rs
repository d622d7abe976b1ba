use eframe::{self, egui};
use egui::ViewportBuilder;

use crate::api::CardApi;

use super::{
    screens::{AddCardScreen, CardListScreen, HomeScreen},
    state::{AddCardState, HomeState, ListState, Screen},
};

pub struct CardDeskApp {
    api: CardApi,
    screen: Screen,
    home_state: HomeState,
    list_state: ListState,
    add_state: AddCardState,
}

impl CardDeskApp {
    pub fn new(api: CardApi) -> Self {
        Self {
            api,
            screen: Screen::Home,
            home_state: HomeState::default(),
            list_state: ListState::default(),
            add_state: AddCardState::default(),
        }
    }

    fn show_nav(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("nav").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.screen, Screen::Home, "Home");
                ui.selectable_value(&mut self.screen, Screen::CardList, "Cards");
                ui.selectable_value(&mut self.screen, Screen::AddCard, "Add Card");
            });
        });
    }
}

impl eframe::App for CardDeskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show_nav(ctx);

        match self.screen {
            Screen::Home => {
                HomeScreen::show(ctx, &self.api, &mut self.home_state);
            }
            Screen::CardList => {
                CardListScreen::show(ctx, &self.api, &mut self.list_state);
            }
            Screen::AddCard => {
                AddCardScreen::show(ctx, &self.api, &mut self.add_state);
            }
        }
    }
}

pub fn launch_gui(api: CardApi) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default().with_inner_size([1280.0, 720.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Card Ledger",
        options,
        Box::new(|_cc| Ok(Box::new(CardDeskApp::new(api)))),
    )
}
