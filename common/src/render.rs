//! 現在行の取り出しと画像の取得・デコード
//!
//! 描画のたびに取得し直す（キャッシュしない）。

use crate::error::Result;
use crate::parser::{parse_boxes_lenient, ParsedBoxes};
use crate::session::Session;
use crate::store::ObjectStore;
use crate::table::RecordTable;
use crate::types::{BoundingBox, Record};
use image::RgbImage;

/// カーソル位置の行（画像取得前）
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub index: usize,
    pub total: usize,
    pub record: Record,
    /// パース済みの矩形（描画はしない）
    pub boxes: Vec<BoundingBox>,
    /// 座標パース失敗時の警告
    pub warning: Option<String>,
}

impl RowView {
    pub fn heading(&self) -> String {
        format!("Filename: `{}`", self.record.filename)
    }

    pub fn caption(&self) -> String {
        format!("Confidence Score: {}", self.record.confidence_text)
    }

    /// 1始まりの位置表示
    pub fn position(&self) -> String {
        format!("{} / {}", self.index + 1, self.total)
    }
}

/// セッションのカーソル位置の行を取り出す
///
/// カラム欠落は `Error::Load`、範囲外カーソルは `Error::RowOutOfRange`。
/// 座標のパース失敗はエラーにせず `warning` に入れる。
pub fn current_row(table: &RecordTable, session: &Session) -> Result<RowView> {
    let index = session.index();
    let record = table.record(index)?;
    let ParsedBoxes { boxes, warning } = parse_boxes_lenient(&record.coordinates);

    Ok(RowView {
        index,
        total: table.len(),
        record,
        boxes,
        warning,
    })
}

/// オブジェクトを取得してRGBにデコード
pub fn fetch_image(store: &dyn ObjectStore, bucket: &str, key: &str) -> Result<RgbImage> {
    let bytes = store.get_object(bucket, key)?;
    let image = decode_rgb(&bytes)?;
    tracing::debug!(
        key,
        width = image.width(),
        height = image.height(),
        "decoded image"
    );
    Ok(image)
}

/// 任意形式の画像をRGB8へ変換
pub fn decode_rgb(bytes: &[u8]) -> Result<RgbImage> {
    Ok(image::load_from_memory(bytes)?.to_rgb8())
}
