//! Document intake: quality checks and storage.

pub mod quality;
pub mod storage;

pub use quality::{Inspection, QualityGate, TEXT_QUALITY_LOW, TEXT_QUALITY_OK};
pub use storage::{standard_file_name, DocumentStore, FsDocumentStore};
