//! オブジェクトストア
//!
//! 1回の描画につき1オブジェクトを取得する。リトライもキャッシュもしない。

#[cfg(feature = "s3")]
mod s3;

#[cfg(feature = "s3")]
pub use s3::{S3ObjectStore, S3Settings};

use crate::error::{Error, Result};
use std::collections::HashMap;

/// バケットとキーからバイト列を取得する
pub trait ObjectStore {
    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;
}

/// メモリ上のストア（テスト・オフライン確認用）
#[derive(Debug, Clone, Default)]
pub struct MemoryObjectStore {
    objects: HashMap<(String, String), Vec<u8>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, bucket: &str, key: &str, data: Vec<u8>) {
        self.objects.insert((bucket.to_string(), key.to_string()), data);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl ObjectStore for MemoryObjectStore {
    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| Error::Fetch(format!("s3://{}/{}: NoSuchKey", bucket, key)))
    }
}
