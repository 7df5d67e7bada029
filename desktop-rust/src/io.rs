use anyhow::{Context, Result};
use bbox_viewer_common::RecordTable;
use eframe::egui;
use image::RgbImage;
use std::path::{Path, PathBuf};

pub fn pick_csv() -> Option<PathBuf> {
    rfd::FileDialog::new().add_filter("CSV", &["csv"]).pick_file()
}

pub fn load_table(path: &Path) -> Result<RecordTable> {
    let table = RecordTable::load(path).with_context(|| format!("read {}", path.display()))?;
    Ok(table)
}

pub fn to_color_image(image: &RgbImage) -> egui::ColorImage {
    let size = [image.width() as usize, image.height() as usize];
    egui::ColorImage::from_rgb(size, image.as_raw())
}
