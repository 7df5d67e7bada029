//! 端末出力の整形

use bbox_viewer_common::{ParsedBoxes, Record, RowView};
use image::RgbImage;

/// `list` の1行
pub fn present_record_line(index: usize, record: &Record, parsed: &ParsedBoxes) -> String {
    format!(
        "{}\t{}\t{}\t{}\tboxes={}",
        index,
        record.filename,
        record.confidence_text,
        record.s3_path,
        parsed.boxes.len()
    )
}

/// 行の見出し部分（画像取得前に出す）
pub fn present_row_header(row: &RowView) -> Vec<String> {
    let mut lines = vec![
        format!("[{}] {}", row.position(), row.heading()),
        format!("  key: {}", row.record.s3_path),
    ];
    if let Some(warning) = &row.warning {
        lines.push(format!("  ⚠ {}", warning));
    }
    lines
}

/// 画像取得後の行
pub fn present_image(row: &RowView, image: &RgbImage) -> Vec<String> {
    let mut lines = vec![format!(
        "  🖼 {}x{} RGB | {}",
        image.width(),
        image.height(),
        row.caption()
    )];
    for (i, bbox) in row.boxes.iter().enumerate() {
        lines.push(format!("  box {}: {}", i + 1, bbox));
    }
    lines
}

pub fn present_fetch_error(err: &bbox_viewer_common::Error) -> String {
    format!("❌ Could not load image from S3: {}", err)
}
