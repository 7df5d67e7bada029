//! S3ストア
//!
//! UIは同期なので、専用のcurrent-threadランタイムでリクエストをブロックする。

use super::ObjectStore;
use crate::config::{Config, Credentials};
use crate::error::{Error, Result};
use aws_sdk_s3::config::{BehaviorVersion, Credentials as StaticCredentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;

/// クライアント生成に必要な設定
#[derive(Debug, Clone)]
pub struct S3Settings {
    pub region: String,
    pub credentials: Credentials,
    pub endpoint_url: Option<String>,
}

impl S3Settings {
    /// 設定ファイル＋環境変数から組み立てる（regionは呼び出し側で上書き可）
    pub fn from_config(config: &Config, region: &str) -> Result<Self> {
        Ok(Self {
            region: region.to_string(),
            credentials: config.credentials()?,
            endpoint_url: config.endpoint_url.clone(),
        })
    }
}

#[derive(Debug)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    runtime: tokio::runtime::Runtime,
}

impl S3ObjectStore {
    pub fn new(settings: &S3Settings) -> Result<Self> {
        if settings.region.trim().is_empty() {
            return Err(Error::Fetch("region is empty".into()));
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Fetch(format!("failed to start runtime: {}", e)))?;

        let credentials = StaticCredentials::new(
            &settings.credentials.access_key_id,
            &settings.credentials.secret_access_key,
            None,
            None,
            "bbox-viewer-static",
        );

        let mut builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(settings.region.trim().to_string()))
            .credentials_provider(credentials);
        if let Some(endpoint) = &settings.endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        let client = {
            let _guard = runtime.enter();
            aws_sdk_s3::Client::from_conf(builder.build())
        };

        tracing::debug!(region = %settings.region, endpoint = ?settings.endpoint_url, "created S3 client");
        Ok(Self { client, runtime })
    }
}

impl ObjectStore for S3ObjectStore {
    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        tracing::debug!(bucket, key, "GetObject");

        self.runtime.block_on(async {
            let response = self
                .client
                .get_object()
                .bucket(bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| {
                    Error::Fetch(format!("s3://{}/{}: {}", bucket, key, DisplayErrorContext(&e)))
                })?;

            let body = response
                .body
                .collect()
                .await
                .map_err(|e| Error::Fetch(format!("s3://{}/{}: body read failed: {}", bucket, key, e)))?;

            let data = body.into_bytes().to_vec();
            tracing::debug!(bucket, key, bytes = data.len(), "object fetched");
            Ok::<_, Error>(data)
        })
    }
}
