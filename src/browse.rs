//! 対話式ブラウズモジュール
//!
//! 前へ/次へで行を移動し、移動のたびに画像を取得し直して表示する。

use crate::error::Result;
use crate::report::{present_fetch_error, present_image, present_row_header};
use bbox_viewer_common::{current_row, fetch_image, ObjectStore, RecordTable, Session};
use dialoguer::Input;

/// 対話アクション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseAction {
    Previous,
    Next,
    /// 同じ行を再取得
    Reload,
    Quit,
}

/// 入力文字列をアクションに変換（空入力は「次へ」）
pub fn parse_action(input: &str) -> Option<BrowseAction> {
    match input.trim() {
        "" | "n" | "next" => Some(BrowseAction::Next),
        "p" | "prev" | "previous" => Some(BrowseAction::Previous),
        "r" | "reload" => Some(BrowseAction::Reload),
        "q" | "Q" | "quit" => Some(BrowseAction::Quit),
        _ => None,
    }
}

/// アクションを適用し、再描画が必要なら `true`
pub fn apply_action(session: &mut Session, action: BrowseAction, row_count: usize) -> bool {
    match action {
        BrowseAction::Previous => session.previous(),
        BrowseAction::Next => session.next(row_count),
        BrowseAction::Reload => true,
        BrowseAction::Quit => false,
    }
}

/// 現在行を表示する
///
/// カラム欠落などの読み込みエラーは呼び出し元へ返す。
/// 取得・デコードの失敗はメッセージを出してこの行の描画だけ中断する。
pub fn render_once(
    table: &RecordTable,
    session: &Session,
    store: &dyn ObjectStore,
    bucket: &str,
) -> Result<()> {
    let row = current_row(table, session)?;
    for line in present_row_header(&row) {
        println!("{}", line);
    }

    match fetch_image(store, bucket, &row.record.s3_path) {
        Ok(image) => {
            for line in present_image(&row, &image) {
                println!("{}", line);
            }
        }
        Err(err) => {
            tracing::error!(key = %row.record.s3_path, "render failed: {}", err);
            println!("{}", present_fetch_error(&err));
        }
    }
    Ok(())
}

pub fn run_browse(table: &RecordTable, store: &dyn ObjectStore, bucket: &str) -> Result<()> {
    let mut session = Session::new();
    println!("操作: [Enter/n]次へ [p]前へ [r]再取得 [q]終了");
    println!("---\n");

    render_once(table, &session, store, bucket)?;

    loop {
        let input: String = Input::new()
            .with_prompt("操作")
            .allow_empty(true)
            .interact_text()?;

        let Some(action) = parse_action(&input) else {
            println!("  → 不明な操作: {}", input.trim());
            continue;
        };

        if action == BrowseAction::Quit {
            println!("終了します");
            return Ok(());
        }

        if apply_action(&mut session, action, table.len()) {
            println!();
            render_once(table, &session, store, bucket)?;
        } else {
            println!("  → これ以上移動できません");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bbox_viewer_common::MemoryObjectStore;

    #[test]
    fn test_parse_action() {
        assert_eq!(parse_action(""), Some(BrowseAction::Next));
        assert_eq!(parse_action(" n "), Some(BrowseAction::Next));
        assert_eq!(parse_action("p"), Some(BrowseAction::Previous));
        assert_eq!(parse_action("r"), Some(BrowseAction::Reload));
        assert_eq!(parse_action("q"), Some(BrowseAction::Quit));
        assert_eq!(parse_action("x"), None);
    }

    #[test]
    fn test_apply_action_respects_bounds() {
        let mut session = Session::new();
        assert!(!apply_action(&mut session, BrowseAction::Previous, 3));
        assert!(apply_action(&mut session, BrowseAction::Next, 3));
        assert!(apply_action(&mut session, BrowseAction::Next, 3));
        assert!(!apply_action(&mut session, BrowseAction::Next, 3));
        assert_eq!(session.index(), 2);
        assert!(apply_action(&mut session, BrowseAction::Reload, 3));
        assert_eq!(session.index(), 2);
    }

    #[test]
    fn test_render_once_survives_fetch_error() {
        let csv = "filename,confidence_score,s3_path,coordinates\na.jpg,0.5,missing.jpg,\"[1,2,3,4]\"\n";
        let table = RecordTable::from_reader(csv.as_bytes()).unwrap();
        let store = MemoryObjectStore::new();
        assert!(render_once(&table, &Session::new(), &store, "bucket").is_ok());
    }

    #[test]
    fn test_render_once_fails_on_missing_column() {
        let csv = "filename,confidence_score,coordinates\na.jpg,0.5,\"[1,2,3,4]\"\n";
        let table = RecordTable::from_reader(csv.as_bytes()).unwrap();
        let store = MemoryObjectStore::new();
        assert!(render_once(&table, &Session::new(), &store, "bucket").is_err());
    }
}
