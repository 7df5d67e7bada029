use std::path::PathBuf;

use bbox_viewer_common::{
    current_row, fetch_image, Config, ObjectStore, RecordTable, RowView, Session,
};
use image::RgbImage;

/// What the central panel shows after the last render.
#[derive(Debug, Clone, Default)]
pub enum RenderState {
    /// No CSV loaded yet.
    #[default]
    Waiting,
    /// The row itself could not be read (missing column, stale cursor).
    RowFailed { message: String },
    /// The row was read but the image could not be fetched or decoded.
    FetchFailed { row: RowView, message: String },
    Ready { row: RowView, image: RgbImage },
}

impl RenderState {
    pub fn row(&self) -> Option<&RowView> {
        match self {
            RenderState::FetchFailed { row, .. } | RenderState::Ready { row, .. } => Some(row),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewerState {
    pub table: Option<RecordTable>,
    pub source_path: Option<PathBuf>,
    pub session: Session,
    pub bucket: String,
    pub region: String,
    pub needs_render: bool,
}

impl ViewerState {
    pub fn new(config: &Config) -> Self {
        Self {
            bucket: config.bucket.clone(),
            region: config.region.clone(),
            ..Self::default()
        }
    }

    /// Replaces the table. The cursor is left where it was.
    pub fn load_table(&mut self, table: RecordTable, path: PathBuf) {
        self.table = Some(table);
        self.source_path = Some(path);
        self.needs_render = true;
    }

    /// File name of the loaded CSV.
    pub fn source_name(&self) -> Option<String> {
        let name = self.source_path.as_deref()?.file_name()?;
        Some(name.to_string_lossy().into_owned())
    }

    pub fn row_count(&self) -> usize {
        self.table.as_ref().map(RecordTable::len).unwrap_or(0)
    }

    pub fn previous(&mut self) {
        if self.session.previous() {
            self.needs_render = true;
        }
    }

    pub fn next(&mut self) {
        let rows = self.row_count();
        if self.session.next(rows) {
            self.needs_render = true;
        }
    }

    pub fn can_go_previous(&self) -> bool {
        self.session.index() > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.session.index() + 1 < self.row_count()
    }

    pub fn request_render(&mut self) {
        if self.table.is_some() {
            self.needs_render = true;
        }
    }

    /// Reads the row under the cursor and fetches its image.
    ///
    /// `open_store` is called once per render with the current region.
    pub fn render<F>(&mut self, open_store: F) -> RenderState
    where
        F: FnOnce(&str) -> bbox_viewer_common::Result<Box<dyn ObjectStore>>,
    {
        self.needs_render = false;
        let Some(table) = &self.table else {
            return RenderState::Waiting;
        };

        if !self.session.is_valid_for(table.len()) {
            tracing::warn!(
                index = self.session.index(),
                rows = table.len(),
                "cursor is past the end of the table"
            );
        }

        let row = match current_row(table, &self.session) {
            Ok(row) => row,
            Err(err) => {
                tracing::error!("row {} failed: {}", self.session.index(), err);
                return RenderState::RowFailed {
                    message: err.to_string(),
                };
            }
        };

        let fetched = open_store(&self.region)
            .and_then(|store| fetch_image(store.as_ref(), &self.bucket, &row.record.s3_path));

        match fetched {
            Ok(image) => RenderState::Ready { row, image },
            Err(err) => {
                tracing::error!(key = %row.record.s3_path, "render failed: {}", err);
                RenderState::FetchFailed {
                    row,
                    message: format!("Could not load image from S3: {err}"),
                }
            }
        }
    }
}
