use crate::app::HeicConverterApp;
use crate::constants::{APP_NAME, APP_VERSION, MAX_QUALITY, MIN_QUALITY};
use eframe::egui;
use rfd::{MessageButtons, MessageDialog, MessageLevel};

impl eframe::App for HeicConverterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(wait) = self.update_status() {
            ctx.request_repaint_after(wait);
        }

        if self.completion_prompt_pending {
            self.completion_prompt_pending = false;
            self.ask_open_output_dir();
        }

        self.handle_close_request(ctx);

        let mut style = (*ctx.style()).clone();
        style.spacing.button_padding = egui::vec2(12.0, 6.0);
        style.spacing.item_spacing = egui::vec2(10.0, 8.0);
        ctx.set_style(style);

        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::none().fill(egui::Color32::from_gray(15)).inner_margin(12.0))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading(egui::RichText::new(APP_NAME).size(24.0).color(egui::Color32::WHITE).strong());
                    ui.label(egui::RichText::new(format!("v{}", APP_VERSION)).size(12.0).color(egui::Color32::from_rgb(150, 150, 150)));
                });
            });

        egui::TopBottomPanel::bottom("controls")
            .frame(egui::Frame::none().fill(egui::Color32::from_gray(15)).inner_margin(12.0))
            .show(ctx, |ui| {
                self.show_main_controls(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_folder_card(ui);
            ui.add_space(10.0);
            self.show_quality_card(ui);
            ui.add_space(10.0);
            self.show_error_card(ui);
            self.show_progress_card(ui);
            ui.add_space(10.0);
            self.show_log_card(ui);
        });
    }
}

fn card(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::none()
        .fill(egui::Color32::from_gray(30))
        .stroke(egui::Stroke::new(1.0, egui::Color32::from_gray(45)))
        .rounding(10.0)
        .inner_margin(14.0)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                ui.heading(egui::RichText::new(title).color(egui::Color32::WHITE).size(16.0));
                ui.add_space(8.0);
                add_contents(ui);
            });
        });
}

impl HeicConverterApp {
    fn show_folder_card(&mut self, ui: &mut egui::Ui) {
        let editable = !self.is_converting();
        card(ui, "📁 Folders", |ui| {
            egui::Grid::new("folder_selection")
                .num_columns(3)
                .spacing([10.0, 10.0])
                .show(ui, |ui| {
                    ui.label(egui::RichText::new("Input (HEIC):").strong());
                    ui.add_enabled(
                        editable,
                        egui::TextEdit::singleline(&mut self.input_dir)
                            .desired_width(380.0)
                            .hint_text("Folder with .heic / .heif files..."),
                    );
                    if ui.add_enabled(editable, egui::Button::new("📁 Browse")).clicked() {
                        self.select_input();
                    }
                    ui.end_row();

                    ui.label(egui::RichText::new("Output (JPG):").strong());
                    ui.add_enabled(
                        editable,
                        egui::TextEdit::singleline(&mut self.output_dir)
                            .desired_width(380.0)
                            .hint_text("Folder for the .jpg files..."),
                    );
                    if ui.add_enabled(editable, egui::Button::new("📁 Browse")).clicked() {
                        self.select_output();
                    }
                    ui.end_row();
                });
        });
    }

    fn show_quality_card(&mut self, ui: &mut egui::Ui) {
        let editable = !self.is_converting();
        card(ui, "⚙️ JPG Quality", |ui| {
            ui.horizontal(|ui| {
                ui.add_enabled(
                    editable,
                    egui::Slider::new(&mut self.quality, MIN_QUALITY..=MAX_QUALITY),
                );

                let (quality_desc, color) = match self.quality {
                    90..=100 => ("✨ Best quality", egui::Color32::GREEN),
                    75..=89 => ("🎯 High quality", egui::Color32::LIGHT_GREEN),
                    50..=74 => ("👌 Balanced", egui::Color32::YELLOW),
                    _ => ("📱 Small files", egui::Color32::from_rgb(255, 165, 0)),
                };
                ui.label(egui::RichText::new(quality_desc).color(color));
            });
        });
    }

    fn show_error_card(&mut self, ui: &mut egui::Ui) {
        let Some(error) = &self.error else {
            return;
        };

        egui::Frame::none()
            .fill(egui::Color32::from_rgba_premultiplied(200, 50, 50, 50))
            .rounding(8.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(egui::RichText::new(format!("❌ {}", error)).color(egui::Color32::LIGHT_RED));
            });
        ui.add_space(10.0);
    }

    fn show_progress_card(&mut self, ui: &mut egui::Ui) {
        let progress = self.relay.progress();
        let status = self.status_text();
        card(ui, "📊 Progress", |ui| {
            ui.add(
                egui::ProgressBar::new(progress / 100.0)
                    .text(format!("{:.1}%", progress))
                    .desired_width(ui.available_width()),
            );
            ui.add_space(4.0);
            ui.label(egui::RichText::new(status).color(egui::Color32::LIGHT_GRAY));
        });
    }

    fn show_log_card(&mut self, ui: &mut egui::Ui) {
        let relay = &self.relay;
        card(ui, "📝 Log", |ui| {
            egui::ScrollArea::vertical()
                .stick_to_bottom(true)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if relay.log().is_empty() {
                        ui.label(egui::RichText::new("No activity yet").italics().color(egui::Color32::GRAY));
                    }
                    for line in relay.log().lines() {
                        ui.label(egui::RichText::new(line.render()).monospace().size(12.0));
                    }
                });
        });
    }

    fn show_main_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let start_button = egui::Button::new(egui::RichText::new("🚀 Start Conversion").size(15.0))
                .min_size(egui::vec2(170.0, 38.0));
            if ui.add_enabled(self.can_start(), start_button).clicked() {
                // Failures are shown through the error card
                let _ = self.start_conversion();
            }

            let stop_button = egui::Button::new(egui::RichText::new("⏹ Stop").size(15.0))
                .min_size(egui::vec2(110.0, 38.0));
            let can_stop = self.is_converting() && !self.state.cancel_requested();
            if ui.add_enabled(can_stop, stop_button).clicked() {
                self.stop_conversion();
            }

            let open_button = egui::Button::new(egui::RichText::new("📂 Open Output Folder").size(15.0))
                .min_size(egui::vec2(170.0, 38.0));
            if ui.add_enabled(!self.is_converting(), open_button).clicked() {
                self.open_output_dir();
            }

            let clear_button = egui::Button::new(egui::RichText::new("🗑 Clear Log").size(15.0))
                .min_size(egui::vec2(110.0, 38.0));
            if ui.add_enabled(!self.is_converting(), clear_button).clicked() {
                self.clear();
            }
        });
    }

    fn ask_open_output_dir(&mut self) {
        let open = MessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title("Conversion finished")
            .set_description(&format!("{}\n\nOpen the output folder?", self.status_text()))
            .set_buttons(MessageButtons::YesNo)
            .show();

        if open {
            self.open_output_dir();
        }
    }

    fn handle_close_request(&mut self, ctx: &egui::Context) {
        if !ctx.input(|i| i.viewport().close_requested()) || !self.is_converting() {
            return;
        }

        let quit = MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title("Quit")
            .set_description("A conversion is still running. Quit anyway?")
            .set_buttons(MessageButtons::YesNo)
            .show();

        if quit {
            self.stop_conversion();
        } else {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
        }
    }
}
