//! bbox-viewer Common Library
//!
//! CLIとデスクトップビューアで共有される型とユーティリティ

pub mod config;
pub mod error;
pub mod parser;
pub mod render;
pub mod session;
pub mod store;
pub mod table;
pub mod types;

pub use config::{Config, Credentials};
pub use error::{Error, Result};
pub use parser::{parse_boxes, parse_boxes_lenient, ParsedBoxes};
pub use render::{current_row, decode_rgb, fetch_image, RowView};
pub use session::Session;
pub use store::{MemoryObjectStore, ObjectStore};
#[cfg(feature = "s3")]
pub use store::{S3ObjectStore, S3Settings};
pub use table::RecordTable;
pub use types::{BoundingBox, Literal, Record};
