//! Ingestion pipeline for uploaded files.
//!
//! Files from the picker or a drop are filtered to images, then each one is
//! read and encoded in its own task. Tasks complete independently, so records
//! reach the gallery in completion order rather than selection order.

#[cfg(not(target_arch = "wasm32"))]
use std::cell::RefCell;
#[cfg(not(target_arch = "wasm32"))]
use std::collections::VecDeque;
use std::fmt::Write as _;
use std::future::Future;
use std::pin::Pin;

use web_time::Instant;

use crate::codec::{encode_data_uri, is_image_mime};
use crate::error::GalleryError;
use crate::model::ImageRecord;
use crate::size_format::format_size;

/// A single-threaded task ready to be spawned.
pub type LocalTask = Pin<Box<dyn Future<Output = ()>>>;

/// Runs ingestion tasks.
pub trait Spawner {
    /// Start a task. It may complete before or after this call returns.
    fn spawn(&self, task: LocalTask);
}

/// A file offered for ingestion.
pub trait FileHandle {
    /// File name.
    fn name(&self) -> String;

    /// Declared MIME type; empty when the platform doesn't know it.
    fn mime_type(&self) -> String;

    /// Size in bytes.
    fn size(&self) -> u64;

    /// Read the full contents.
    fn read_bytes(self) -> impl Future<Output = Result<Vec<u8>, GalleryError>>;
}

/// A file whose contents are already in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryFile {
    /// File name
    pub name: String,
    /// Declared MIME type
    pub mime_type: String,
    /// File contents
    pub bytes: Vec<u8>,
}

impl MemoryFile {
    /// Create an in-memory file.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

impl FileHandle for MemoryFile {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn mime_type(&self) -> String {
        self.mime_type.clone()
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn read_bytes(self) -> impl Future<Output = Result<Vec<u8>, GalleryError>> {
        std::future::ready(Ok(self.bytes))
    }
}

/// Turns uploaded files into image records.
#[derive(Debug, Clone)]
pub struct IngestionPipeline {
    /// chrono format string for the record date label
    date_format: String,
    /// Batches larger than this log a warning
    large_batch_warning: usize,
}

impl IngestionPipeline {
    /// Default date label format (day/month/year).
    pub const DEFAULT_DATE_FORMAT: &'static str = "%d/%m/%Y";

    /// Default batch size above which a memory warning is logged.
    pub const DEFAULT_LARGE_BATCH_WARNING: usize = 50;

    /// Create a pipeline with default settings.
    pub fn new() -> Self {
        Self {
            date_format: Self::DEFAULT_DATE_FORMAT.to_string(),
            large_batch_warning: Self::DEFAULT_LARGE_BATCH_WARNING,
        }
    }

    /// Set the date label format.
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Set the batch size above which a warning is logged.
    pub fn with_large_batch_warning(mut self, threshold: usize) -> Self {
        self.large_batch_warning = threshold;
        self
    }

    /// Check if a file may be ingested.
    pub fn accepts<F: FileHandle>(file: &F) -> bool {
        is_image_mime(&file.mime_type())
    }

    /// Drop files that aren't images.
    pub fn filter<F: FileHandle>(&self, files: impl IntoIterator<Item = F>) -> Vec<F> {
        files
            .into_iter()
            .filter(|file| {
                let accepted = Self::accepts(file);
                if !accepted {
                    log::debug!(
                        "📂 Ignoring non-image file '{}' ({})",
                        file.name(),
                        file.mime_type()
                    );
                }
                accepted
            })
            .collect()
    }

    /// Today's date label in the configured format.
    pub fn date_label(&self) -> String {
        self.date_label_at(&chrono::Local::now())
    }

    /// Date label for a given moment.
    ///
    /// An invalid format string falls back to the default format.
    pub fn date_label_at<Tz>(&self, moment: &chrono::DateTime<Tz>) -> String
    where
        Tz: chrono::TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let mut label = String::new();
        if write!(label, "{}", moment.format(&self.date_format)).is_err() {
            log::warn!("Invalid date format '{}', using default", self.date_format);
            label = moment.format(Self::DEFAULT_DATE_FORMAT).to_string();
        }
        label
    }

    /// Read one file and build its record.
    pub async fn build_record<F: FileHandle>(&self, file: F) -> Result<ImageRecord, GalleryError> {
        let name = file.name();
        let mime_type = file.mime_type();
        let size = file.size();
        let started = Instant::now();

        let bytes = file.read_bytes().await?;

        let data = encode_data_uri(&mime_type, &bytes);
        log::debug!(
            "📂 Read '{}' ({} bytes) in {:?}",
            name,
            bytes.len(),
            started.elapsed()
        );

        Ok(ImageRecord::new(
            data,
            name,
            format_size(size),
            self.date_label(),
        ))
    }

    /// Start ingesting a batch of files.
    ///
    /// Each accepted file is read in its own task; `on_record` runs once per
    /// completed record, in completion order. Returns the number of files
    /// accepted.
    pub fn ingest<F, Sp, C>(
        &self,
        files: impl IntoIterator<Item = F>,
        spawner: &Sp,
        on_record: C,
    ) -> usize
    where
        F: FileHandle + 'static,
        Sp: Spawner + ?Sized,
        C: Fn(ImageRecord) + Clone + 'static,
    {
        let accepted = self.filter(files);
        let count = accepted.len();

        if count > self.large_batch_warning {
            log::warn!(
                "📂 Ingesting {} images at once; every image is kept in memory and in storage",
                count
            );
        } else if count > 0 {
            log::info!("📂 Ingesting {} images", count);
        }

        for file in accepted {
            let pipeline = self.clone();
            let on_record = on_record.clone();
            spawner.spawn(Box::pin(async move {
                let name = file.name();
                match pipeline.build_record(file).await {
                    Ok(record) => on_record(record),
                    Err(e) => log::warn!("📂 Skipping '{}': {}", name, e),
                }
            }));
        }

        count
    }
}

impl Default for IngestionPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs each task to completion as soon as it is spawned.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockingSpawner;

#[cfg(not(target_arch = "wasm32"))]
impl Spawner for BlockingSpawner {
    fn spawn(&self, task: LocalTask) {
        pollster::block_on(task);
    }
}

/// Holds spawned tasks until the caller runs them, in any order.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Default)]
pub struct QueueSpawner {
    tasks: RefCell<VecDeque<LocalTask>>,
}

#[cfg(not(target_arch = "wasm32"))]
impl QueueSpawner {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks waiting to run.
    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Check if no tasks are waiting.
    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }

    /// Run the oldest waiting task. Returns false if none was waiting.
    pub fn run_next(&self) -> bool {
        let task = self.tasks.borrow_mut().pop_front();
        Self::run(task)
    }

    /// Run the newest waiting task. Returns false if none was waiting.
    pub fn run_last(&self) -> bool {
        let task = self.tasks.borrow_mut().pop_back();
        Self::run(task)
    }

    /// Run every waiting task, oldest first.
    pub fn run_all(&self) {
        while self.run_next() {}
    }

    fn run(task: Option<LocalTask>) -> bool {
        match task {
            Some(task) => {
                pollster::block_on(task);
                true
            }
            None => false,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Spawner for QueueSpawner {
    fn spawn(&self, task: LocalTask) {
        self.tasks.borrow_mut().push_back(task);
    }
}

/// Spawns tasks on the browser's microtask queue (WASM only).
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSpawner;

#[cfg(target_arch = "wasm32")]
impl Spawner for BrowserSpawner {
    fn spawn(&self, task: LocalTask) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

#[cfg(target_arch = "wasm32")]
impl FileHandle for web_sys::File {
    fn name(&self) -> String {
        web_sys::File::name(self)
    }

    fn mime_type(&self) -> String {
        self.type_()
    }

    fn size(&self) -> u64 {
        web_sys::Blob::size(self) as u64
    }

    fn read_bytes(self) -> impl Future<Output = Result<Vec<u8>, GalleryError>> {
        async move {
            let buffer = wasm_bindgen_futures::JsFuture::from(web_sys::Blob::array_buffer(&self))
                .await
                .map_err(|e| GalleryError::file_read(web_sys::File::name(&self), format!("{:?}", e)))?;
            Ok(js_sys::Uint8Array::new(&buffer).to_vec())
        }
    }
}
