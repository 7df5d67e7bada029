use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error(transparent)]
    Common(#[from] bbox_viewer_common::Error),

    #[error("CSVにレコードがありません: {0}")]
    EmptyTable(String),

    #[error("画像保存エラー: {0}")]
    ImageSave(String),

    #[error("対話入力エラー: {0}")]
    Prompt(String),

    #[error("JSON出力エラー: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<dialoguer::Error> for ViewerError {
    fn from(value: dialoguer::Error) -> Self {
        Self::Prompt(value.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;
