//! レコードの型定義
//!
//! CLIとデスクトップで共有される型:
//! - Record: CSVの1行を型付けしたもの
//! - Literal: 座標文字列を評価したリテラル値
//! - BoundingBox: 座標文字列から得られる矩形（通常4要素）

use serde::{Deserialize, Serialize};
use std::fmt;

/// CSVの必須カラム名
pub const COLUMN_FILENAME: &str = "filename";
pub const COLUMN_CONFIDENCE_SCORE: &str = "confidence_score";
pub const COLUMN_S3_PATH: &str = "s3_path";
pub const COLUMN_COORDINATES: &str = "coordinates";

/// 検出結果レコード
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub filename: String,

    /// 検出の信頼度（空欄・数値でない場合はNaN）
    pub confidence_score: f64,

    /// キャプション用の表示文字列（カラム全体の型に合わせて整形済み）
    #[serde(default)]
    pub confidence_text: String,

    /// オブジェクトストアのキー
    pub s3_path: String,

    /// 座標リテラル（`[x1,y1,x2,y2]` または `[[...], ...]`）
    #[serde(default)]
    pub coordinates: String,
}

/// 座標文字列のリテラル値
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Str(String),
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
}

impl Literal {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Literal::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// リスト・タプルの要素
    pub fn items(&self) -> Option<&[Literal]> {
        match self {
            Literal::List(items) | Literal::Tuple(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => write!(f, "{}", n),
            Literal::Str(s) => write_quoted(f, s),
            Literal::List(items) => {
                write!(f, "[")?;
                write_items(f, items)?;
                write!(f, "]")
            }
            Literal::Tuple(items) => {
                write!(f, "(")?;
                write_items(f, items)?;
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Literal]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    write!(f, "{}", quote)?;
    for c in s.chars() {
        match c {
            '\\' => write!(f, "\\\\")?,
            '\n' => write!(f, "\\n")?,
            '\t' => write!(f, "\\t")?,
            '\r' => write!(f, "\\r")?,
            c if c == quote => write!(f, "\\{}", c)?,
            c => write!(f, "{}", c)?,
        }
    }
    write!(f, "{}", quote)
}

/// バウンディングボックス
///
/// パースしたリテラルをそのまま保持し、形は検証しない。
/// 4つの数値からなるシーケンスのときだけ `as_rect` が値を返す。
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox(pub Literal);

impl BoundingBox {
    pub fn literal(&self) -> &Literal {
        &self.0
    }

    /// 全要素が数値のシーケンスなら、その数値列
    pub fn values(&self) -> Option<Vec<f64>> {
        self.0.items()?.iter().map(Literal::as_number).collect()
    }

    /// `[x1, y1, x2, y2]` として取り出す
    pub fn as_rect(&self) -> Option<[f64; 4]> {
        <[f64; 4]>::try_from(self.values()?.as_slice()).ok()
    }
}

impl From<Vec<f64>> for BoundingBox {
    fn from(value: Vec<f64>) -> Self {
        Self(Literal::List(value.into_iter().map(Literal::Number).collect()))
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
