//! CSV読み込み → カーソル移動 → 取得・デコードの統合テスト

use bbox_viewer::browse::{apply_action, render_once, BrowseAction};
use bbox_viewer_common::{
    current_row, fetch_image, Error, MemoryObjectStore, RecordTable, Session,
};
use image::{ImageBuffer, ImageFormat, Rgb};
use std::io::Cursor;
use tempfile::tempdir;

const BUCKET: &str = "datasets";

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, |x, _y| Rgb([x as u8, 0_u8, 255_u8]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).expect("png encode");
    out.into_inner()
}

fn write_csv(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("detections.csv");
    std::fs::write(
        &path,
        "filename,confidence_score,s3_path,coordinates\n\
         cat.png,0.98,images/cat.png,\"[10, 20, 110, 220]\"\n\
         dog.png,0.61,images/dog.png,\"[[0,0,5,5],[6,6,9,9]]\"\n\
         bird.png,0.33,images/bird.png,not a list\n",
    )
    .unwrap();
    path
}

fn store() -> MemoryObjectStore {
    let mut store = MemoryObjectStore::new();
    store.insert(BUCKET, "images/cat.png", png(16, 8));
    store.insert(BUCKET, "images/dog.png", png(4, 4));
    store.insert(BUCKET, "images/bird.png", b"<html>403</html>".to_vec());
    store
}

#[test]
fn test_three_rows_cursor_walk() {
    let dir = tempdir().expect("Failed to create temp dir");
    let table = RecordTable::load(&write_csv(dir.path())).unwrap();
    assert_eq!(table.len(), 3);

    let mut session = Session::new();
    assert_eq!(session.index(), 0);
    assert!(apply_action(&mut session, BrowseAction::Next, table.len()));
    assert!(apply_action(&mut session, BrowseAction::Next, table.len()));
    assert_eq!(session.index(), 2);
    assert!(!apply_action(&mut session, BrowseAction::Next, table.len()));
    assert_eq!(session.index(), 2);
}

#[test]
fn test_each_row_renders_or_fails_typed() {
    let dir = tempdir().expect("Failed to create temp dir");
    let table = RecordTable::load(&write_csv(dir.path())).unwrap();
    let store = store();
    let mut session = Session::new();

    // 1行目: 単一の矩形
    let row = current_row(&table, &session).unwrap();
    assert_eq!(row.boxes.len(), 1);
    assert_eq!(row.boxes[0].as_rect(), Some([10.0, 20.0, 110.0, 220.0]));
    let image = fetch_image(&store, BUCKET, &row.record.s3_path).unwrap();
    assert_eq!(image.dimensions(), (16, 8));

    // 2行目: 矩形のリスト
    session.next(table.len());
    let row = current_row(&table, &session).unwrap();
    assert_eq!(row.boxes.len(), 2);
    assert_eq!(row.caption(), "Confidence Score: 0.61");

    // 3行目: 座標は警告、画像はデコードエラー
    session.next(table.len());
    let row = current_row(&table, &session).unwrap();
    assert!(row.boxes.is_empty());
    assert!(row.warning.is_some());
    assert!(matches!(
        fetch_image(&store, BUCKET, &row.record.s3_path),
        Err(Error::Decode(_))
    ));

    // 別バケットは取得エラー
    assert!(matches!(
        fetch_image(&store, "other", "images/cat.png"),
        Err(Error::Fetch(_))
    ));
}

#[test]
fn test_render_once_on_every_row() {
    let dir = tempdir().expect("Failed to create temp dir");
    let table = RecordTable::load(&write_csv(dir.path())).unwrap();
    let store = store();
    let mut session = Session::new();

    loop {
        render_once(&table, &session, &store, BUCKET).expect("取得失敗は致命的ではない");
        if !session.next(table.len()) {
            break;
        }
    }
    assert_eq!(session.index(), 2);
}
