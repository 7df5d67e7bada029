//! 表示セッション（行カーソル）
//!
//! 表示中の行番号はこのオブジェクトだけが保持する。
//! 新しいCSVを読み込んでもカーソルは戻さない。

/// 行カーソルを持つセッション
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    index: usize,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// 前の行へ（先頭では何もしない）
    ///
    /// 移動した場合 `true`（再描画が必要）。
    pub fn previous(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// 次の行へ（末尾では何もしない）
    ///
    /// 移動した場合 `true`（再描画が必要）。
    pub fn next(&mut self, row_count: usize) -> bool {
        if self.index + 1 < row_count {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// カーソルがテーブル内を指しているか
    pub fn is_valid_for(&self, row_count: usize) -> bool {
        self.index < row_count
    }
}
