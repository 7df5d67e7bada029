//! 設定ファイルと認証情報
//!
//! `~/.config/bbox-viewer/config.json` に保存する。
//! 認証情報は環境変数を優先する。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_BUCKET: &str = "datasets-quasara-io";
pub const DEFAULT_REGION: &str = "eu-central-1";

pub const ENV_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const ENV_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub bucket: String,
    pub region: String,
    /// S3互換ストレージ用のエンドポイント（未設定ならAWS）
    pub endpoint_url: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.into(),
            region: DEFAULT_REGION.into(),
            endpoint_url: None,
            access_key_id: None,
            secret_access_key: None,
        }
    }
}

/// 静的な認証情報
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .finish()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// ファイルがなければデフォルト設定
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("bbox-viewer").join("config.json"))
    }

    /// 認証情報を取得（環境変数 → 設定ファイルの順）
    pub fn credentials(&self) -> Result<Credentials> {
        self.credentials_with(|name| std::env::var(name).ok())
    }

    fn credentials_with(&self, env: impl Fn(&str) -> Option<String>) -> Result<Credentials> {
        let pick = |name: &str, stored: &Option<String>| {
            env(name)
                .filter(|v| !v.is_empty())
                .or_else(|| stored.clone().filter(|v| !v.is_empty()))
                .ok_or_else(|| Error::Fetch(format!("missing credential {}", name)))
        };

        Ok(Credentials {
            access_key_id: pick(ENV_ACCESS_KEY_ID, &self.access_key_id)?,
            secret_access_key: pick(ENV_SECRET_ACCESS_KEY, &self.secret_access_key)?,
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials().is_ok()
    }
}
