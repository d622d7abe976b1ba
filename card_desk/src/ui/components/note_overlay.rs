use eframe::egui;

/// Overlay window showing the full text of a card's note.
pub struct NoteOverlay;

impl NoteOverlay {
    /// Draws the overlay while `note` is set; clears it on close.
    pub fn show(ctx: &egui::Context, note: &mut Option<String>) {
        let Some(text) = note.clone() else {
            return;
        };

        let mut open = true;
        egui::Window::new("Note")
            .collapsible(false)
            .default_size([400.0, 300.0])
            .open(&mut open)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .max_height(ui.available_height() - 40.0)
                    .show(ui, |ui| {
                        ui.label(text);
                    });

                ui.add_space(5.0);
                if ui.button("Close").clicked() {
                    *note = None;
                }
            });

        if !open {
            *note = None;
        }
    }
}
