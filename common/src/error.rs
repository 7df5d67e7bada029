//! エラー型定義

use thiserror::Error;

/// 共通エラー型
///
/// 入力読み込み・座標パース・取得・デコードの4系統と、
/// 設定ファイルまわりのエラーを区別する。
#[derive(Error, Debug)]
pub enum Error {
    #[error("Load error: {0}")]
    Load(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Row {index} is out of range (table has {len} rows)")]
    RowOutOfRange { index: usize, len: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Self::Load(value.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(value: image::ImageError) -> Self {
        Self::Decode(value.to_string())
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::Io(io_error);
        let display = format!("{}", error);
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_error_display_row_out_of_range() {
        let error = Error::RowOutOfRange { index: 5, len: 3 };
        assert_eq!(
            error.to_string(),
            "Row 5 is out of range (table has 3 rows)"
        );
    }

    #[test]
    fn test_error_display_kinds() {
        assert_eq!(Error::Load("x".into()).to_string(), "Load error: x");
        assert_eq!(Error::Parse("x".into()).to_string(), "Parse error: x");
        assert_eq!(Error::Fetch("x".into()).to_string(), "Fetch error: x");
        assert_eq!(Error::Decode("x".into()).to_string(), "Decode error: x");
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_error_from_image() {
        let image_error = image::load_from_memory(b"not an image").unwrap_err();
        let error: Error = image_error.into();
        assert!(matches!(error, Error::Decode(_)));
    }
}
