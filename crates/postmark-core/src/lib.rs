//! Postmark Core - image transform engine for the content portal
//!
//! This crate provides the image work the portal does before anything is
//! stored or shared: proportional downscaling, lossy re-encoding to
//! self-contained `data:` URIs, and timestamp watermarking. It also holds the
//! small pure collaborators around it (session context, permission table,
//! balanced random selection) and the record/share boundary types.

pub mod batch;
pub mod config;
pub mod decode;
pub mod encode;
pub mod engine;
pub mod error;
pub mod permissions;
pub mod record;
pub mod selection;
pub mod session;
pub mod share;
pub mod watermark;

pub use batch::{run_batch, BatchItem, BatchReport, CancelToken};
pub use config::{EncodeProfile, EngineConfig};
pub use decode::{fit_dimensions, DecodeError, FilterType, ImageSource, RasterImage};
pub use encode::{EncodeError, EncodedImage};
pub use engine::{ImageEngine, PreparedUpload};
pub use error::EngineError;
pub use permissions::{can_access_route, has_permission, Permission};
pub use record::{
    backfill_thumbnails, upload_images, ContentRecord, CreatedBy, ImageRecord, NewImageRecord,
    RecordStore, UploadBatch, UploadFile,
};
pub use selection::{pick_balanced, pick_content, random_selection};
pub use session::{Role, Session};
pub use share::{clipboard_png, record_share, share_files, PostHistoryEntry, ShareFile, SharePlatform};
pub use watermark::{apply_watermark, stamp_text, stamp_text_now, WatermarkSpec, WatermarkStyle};
