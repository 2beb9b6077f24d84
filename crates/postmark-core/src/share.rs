//! Share-time adapters: clipboard PNG, native share files, post history.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decode::ImageSource;
use crate::encode::{encode_raster_png, EncodedImage};
use crate::engine::ImageEngine;
use crate::error::EngineError;
use crate::permissions::Permission;
use crate::record::{require, to_payload, ContentRecord, RecordStore, POSTS_HISTORY};
use crate::session::Session;

/// Re-encode an image as PNG, the only format clipboards accept reliably.
pub fn clipboard_png(engine: &ImageEngine, image: &EncodedImage) -> Result<EncodedImage, EngineError> {
    let raster = engine.decode(&ImageSource::Encoded(image.clone()))?;
    Ok(encode_raster_png(&raster)?)
}

/// A file handed to the native share sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Wrap images as `image-1.jpg`, `image-2.jpg`, ... with their bytes
/// unchanged.
pub fn share_files(images: &[EncodedImage]) -> Vec<ShareFile> {
    images
        .iter()
        .enumerate()
        .map(|(i, image)| ShareFile {
            name: format!("image-{}.{}", i + 1, image.file_extension()),
            mime: image.mime().to_string(),
            bytes: image.as_bytes().to_vec(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SharePlatform {
    #[default]
    Facebook,
    Zalo,
    Instagram,
    Other,
}

impl SharePlatform {
    pub fn as_str(self) -> &'static str {
        match self {
            SharePlatform::Facebook => "facebook",
            SharePlatform::Zalo => "zalo",
            SharePlatform::Instagram => "instagram",
            SharePlatform::Other => "other",
        }
    }
}

impl fmt::Display for SharePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SharePlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "facebook" => Ok(SharePlatform::Facebook),
            "zalo" => Ok(SharePlatform::Zalo),
            "instagram" => Ok(SharePlatform::Instagram),
            "other" => Ok(SharePlatform::Other),
            _ => Err(format!("unknown platform: {}", s)),
        }
    }
}

/// One completed share, as written to the post history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostHistoryEntry {
    pub content_id: String,
    pub content_title: String,
    pub content_icon: String,
    pub image_ids: Vec<String>,
    pub image_count: usize,
    pub platform: SharePlatform,
    pub posted_at: DateTime<Utc>,
    pub posted_by: String,
    pub tenant_code: String,
}

impl PostHistoryEntry {
    pub fn new(
        session: &Session,
        tenant_code: &str,
        content: &ContentRecord,
        image_ids: Vec<String>,
        platform: SharePlatform,
        posted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            content_id: content.id.clone(),
            content_title: content.title.clone(),
            content_icon: content.icon.clone(),
            image_count: image_ids.len(),
            image_ids,
            platform,
            posted_at,
            posted_by: session.username.clone(),
            tenant_code: tenant_code.to_string(),
        }
    }
}

/// Write a history entry after a successful share. Returns the entry id.
pub fn record_share<S: RecordStore + ?Sized>(
    store: &mut S,
    session: &Session,
    entry: &PostHistoryEntry,
) -> Result<String, EngineError> {
    require(session, Permission::PostShare)?;
    let id = store.create(POSTS_HISTORY, to_payload(entry)?)?;
    log::info!(
        "recorded share of {} images to {} as {}",
        entry.image_count,
        entry.platform,
        id
    );
    Ok(id)
}
