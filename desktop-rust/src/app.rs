use bbox_viewer_common::{Config, ObjectStore, S3ObjectStore, S3Settings};
use eframe::egui::{self, Color32, RichText};

use crate::io::{load_table, pick_csv, to_color_image};
use crate::model::{RenderState, ViewerState};

const WARNING_COLOR: Color32 = Color32::from_rgb(246, 196, 69);
const ERROR_COLOR: Color32 = Color32::from_rgb(235, 87, 87);

pub struct DesktopApp {
    config: Config,
    state: ViewerState,
    view: RenderState,
    texture: Option<egui::TextureHandle>,
    settings_edited: bool,
    status: String,
}

impl DesktopApp {
    pub fn new(config: Config) -> Self {
        Self {
            state: ViewerState::new(&config),
            config,
            view: RenderState::default(),
            texture: None,
            settings_edited: false,
            status: String::new(),
        }
    }

    fn open_csv(&mut self) {
        let Some(path) = pick_csv() else {
            return;
        };
        match load_table(&path) {
            Ok(table) => {
                self.status = format!("Loaded {} ({} rows)", path.display(), table.len());
                self.state.load_table(table, path);
            }
            Err(err) => self.status = format!("Load failed: {err:#}"),
        }
    }

    fn render_if_needed(&mut self, ctx: &egui::Context) {
        if !self.state.needs_render {
            return;
        }

        let config = &self.config;
        self.view = self.state.render(|region| {
            let settings = S3Settings::from_config(config, region)?;
            Ok(Box::new(S3ObjectStore::new(&settings)?) as Box<dyn ObjectStore>)
        });

        self.texture = match &self.view {
            RenderState::Ready { row, image } => Some(ctx.load_texture(
                row.record.s3_path.clone(),
                to_color_image(image),
                egui::TextureOptions::default(),
            )),
            _ => None,
        };
    }

    fn render_sidebar(&mut self, ui: &mut egui::Ui) {
        ui.heading("AWS Settings");
        ui.separator();

        ui.label("🪣 S3 Bucket");
        let bucket = ui.text_edit_singleline(&mut self.state.bucket);
        ui.label("🌍 AWS Region");
        let region = ui.text_edit_singleline(&mut self.state.region);

        if bucket.changed() || region.changed() {
            self.settings_edited = true;
        }
        if self.settings_edited && (bucket.lost_focus() || region.lost_focus()) {
            self.settings_edited = false;
            self.state.request_render();
        }

        ui.add_space(8.0);
        let creds = if self.config.has_credentials() { "configured" } else { "missing" };
        ui.label(RichText::new(format!("Credentials: {creds}")).color(Color32::from_gray(170)));
    }

    fn render_navigation(&mut self, ui: &mut egui::Ui) {
        let can_prev = self.state.can_go_previous();
        let can_next = self.state.can_go_next();
        let mut go_prev = false;
        let mut go_next = false;

        ui.columns(2, |cols| {
            go_prev = cols[0]
                .add_enabled(can_prev, egui::Button::new("⬅ Previous"))
                .clicked();
            go_next = cols[1]
                .add_enabled(can_next, egui::Button::new("Next ➡"))
                .clicked();
        });

        if go_prev {
            self.state.previous();
        }
        if go_next {
            self.state.next();
        }
    }

    fn render_central(&mut self, ui: &mut egui::Ui) {
        if matches!(self.view, RenderState::Waiting) {
            ui.label("Choose a CSV file to begin.");
            return;
        }

        if let Some(warning) = self.view.row().and_then(|row| row.warning.as_ref()) {
            ui.colored_label(WARNING_COLOR, format!("⚠ {warning}"));
        }

        match &self.view {
            RenderState::Waiting => {}
            RenderState::RowFailed { message } | RenderState::FetchFailed { message, .. } => {
                ui.colored_label(ERROR_COLOR, format!("❌ {message}"));
            }
            RenderState::Ready { row, .. } => {
                ui.heading("🔍 S3 Image Viewer with Bounding Boxes");
                ui.label(RichText::new(format!("🖼 {}", row.heading())).strong().size(18.0));
                if let Some(texture) = &self.texture {
                    ui.add(egui::Image::new(texture).shrink_to_fit());
                }
                ui.label(RichText::new(row.caption()).color(Color32::from_gray(170)));
            }
        }

        ui.separator();
        ui.label(format!(
            "{} | Row {} / {}",
            self.state.source_name().unwrap_or_default(),
            self.state.session.index() + 1,
            self.state.row_count()
        ));
        self.render_navigation(ui);
    }
}

impl eframe::App for DesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("📄 Upload CSV with Image Paths and Coordinates");
                if ui.button("Choose a CSV file").clicked() {
                    self.open_csv();
                }
                if !self.status.is_empty() {
                    ui.label(RichText::new(&self.status).color(Color32::from_gray(170)));
                }
            });
        });

        egui::SidePanel::left("settings").resizable(true).show(ctx, |ui| {
            self.render_sidebar(ui);
        });

        // settings edits and uploads render in this frame
        self.render_if_needed(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_central(ui);
            });
        });

        // button clicks render on the next frame
        if self.state.needs_render {
            ctx.request_repaint();
        }
    }
}
