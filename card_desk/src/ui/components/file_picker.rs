use eframe::egui;

/// Label + path field + Browse button for choosing an input file.
pub struct FilePicker<'a> {
    label: &'a str,
    path: &'a mut String,
    filter_name: &'a str,
    extensions: &'a [&'a str],
}

impl<'a> FilePicker<'a> {
    pub fn new(
        label: &'a str,
        path: &'a mut String,
        filter_name: &'a str,
        extensions: &'a [&'a str],
    ) -> Self {
        Self {
            label,
            path,
            filter_name,
            extensions,
        }
    }

    /// Shows the picker. Returns `true` if a file was just selected.
    pub fn show(&mut self, ui: &mut egui::Ui) -> bool {
        let mut picked = false;
        ui.horizontal(|ui| {
            ui.label(self.label);
            if ui.button("Browse").clicked() {
                let dialog = rfd::FileDialog::new().add_filter(self.filter_name, self.extensions);
                if let Some(path) = dialog.pick_file() {
                    *self.path = path.display().to_string();
                    picked = true;
                }
            }
            ui.text_edit_singleline(self.path);
        });
        picked
    }
}
