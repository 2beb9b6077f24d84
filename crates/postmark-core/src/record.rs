//! Record-store boundary: image and content records, uploads and thumbnail
//! backfill.
//!
//! The store itself is external. The engine only needs a generic
//! create/update operation taking a JSON payload, described by
//! [`RecordStore`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::batch::{run_batch, BatchReport, CancelToken};
use crate::decode::ImageSource;
use crate::encode::EncodedImage;
use crate::engine::ImageEngine;
use crate::error::EngineError;
use crate::permissions::Permission;
use crate::session::Session;

pub const IMAGES: &str = "images";
pub const CONTENTS: &str = "contents";
pub const POSTS_HISTORY: &str = "posts_history";

/// Whether an image was generated or photographed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatedBy {
    Ai,
    #[default]
    Human,
}

/// Stored image as read back from the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub id: String,
    pub name: String,
    pub url: EncodedImage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<EncodedImage>,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default)]
    pub created_by: CreatedBy,
    #[serde(default)]
    pub tenant_code: String,
}

/// Payload for a new image record. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewImageRecord {
    pub name: String,
    pub url: EncodedImage,
    pub thumbnail: Option<EncodedImage>,
    pub uploaded_at: DateTime<Utc>,
    pub created_by: CreatedBy,
    pub tenant_code: String,
}

/// A text snippet that a post is built around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub id: String,
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub tenant_code: String,
}

/// Generic document store: create returns a generated id.
pub trait RecordStore {
    fn create(&mut self, collection: &str, payload: Value) -> Result<String, EngineError>;

    /// Merge `fields` into an existing record.
    fn update(&mut self, collection: &str, id: &str, fields: Value) -> Result<(), EngineError>;
}

/// A file picked for upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub source: ImageSource,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, source: impl Into<ImageSource>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Files uploaded together under one author kind.
#[derive(Debug, Clone, Default)]
pub struct UploadBatch {
    pub files: Vec<UploadFile>,
    pub created_by: CreatedBy,
    /// Tenant picked in the tenant switcher; only honoured for master admins.
    pub selected_tenant: Option<String>,
}

pub(crate) fn to_payload<T: Serialize>(value: &T) -> Result<Value, EngineError> {
    serde_json::to_value(value).map_err(|e| EngineError::Store(e.to_string()))
}

/// Compress each file, build its thumbnail and write one image record per
/// successful file. Returns the new record ids in the report.
///
/// Fails up front with `PermissionDenied` if the session may not upload.
pub fn upload_images<S: RecordStore + ?Sized>(
    engine: &ImageEngine,
    store: &mut S,
    session: &Session,
    batch: UploadBatch,
    cancel: Option<&CancelToken>,
) -> Result<BatchReport<String>, EngineError> {
    require(session, Permission::ImagesUpload)?;

    let tenant_code = session
        .effective_tenant(batch.selected_tenant.as_deref())
        .to_string();
    let created_by = batch.created_by;
    let inputs = batch.files.into_iter().map(|file| (file.name.clone(), file));

    Ok(run_batch(inputs, cancel, |file| {
        let prepared = engine.prepare_upload(&file.source)?;
        let record = NewImageRecord {
            name: file.name,
            url: prepared.url,
            thumbnail: Some(prepared.thumbnail),
            uploaded_at: Utc::now(),
            created_by,
            tenant_code: tenant_code.clone(),
        };
        store.create(IMAGES, to_payload(&record)?)
    }))
}

/// Generate thumbnails for records that have none and write them back.
///
/// Records that already carry a thumbnail are skipped and do not appear in
/// the report.
pub fn backfill_thumbnails<S: RecordStore + ?Sized>(
    engine: &ImageEngine,
    store: &mut S,
    records: &[ImageRecord],
    cancel: Option<&CancelToken>,
) -> BatchReport<String> {
    let inputs = records
        .iter()
        .filter(|record| record.thumbnail.is_none())
        .map(|record| (record.name.clone(), record));

    run_batch(inputs, cancel, |record| {
        let thumbnail = engine.create_thumbnail(&ImageSource::Encoded(record.url.clone()))?;
        store.update(IMAGES, &record.id, json!({ "thumbnail": thumbnail }))?;
        Ok(record.id.clone())
    })
}

pub(crate) fn require(session: &Session, permission: Permission) -> Result<(), EngineError> {
    if session.can(permission) {
        Ok(())
    } else {
        Err(EngineError::PermissionDenied {
            role: session.role,
            permission,
        })
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use std::collections::BTreeMap;

    use super::*;

    /// In-memory store keyed by collection then id.
    #[derive(Default)]
    pub(crate) struct MemoryStore {
        pub(crate) collections: BTreeMap<String, BTreeMap<String, Value>>,
        next_id: usize,
    }

    impl MemoryStore {
        pub(crate) fn records(&self, collection: &str) -> Vec<&Value> {
            self.collections
                .get(collection)
                .map(|c| c.values().collect())
                .unwrap_or_default()
        }
    }

    impl RecordStore for MemoryStore {
        fn create(&mut self, collection: &str, payload: Value) -> Result<String, EngineError> {
            self.next_id += 1;
            let id = format!("rec-{}", self.next_id);
            self.collections
                .entry(collection.to_string())
                .or_default()
                .insert(id.clone(), payload);
            Ok(id)
        }

        fn update(&mut self, collection: &str, id: &str, fields: Value) -> Result<(), EngineError> {
            let record = self
                .collections
                .get_mut(collection)
                .and_then(|c| c.get_mut(id))
                .ok_or_else(|| EngineError::Store(format!("no record {}/{}", collection, id)))?;
            if let (Some(target), Some(fields)) = (record.as_object_mut(), fields.as_object()) {
                for (key, value) in fields {
                    target.insert(key.clone(), value.clone());
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryStore;
    use super::*;
    use crate::decode::fixtures::gradient_bytes;
    use crate::session::Role;
    use image::ImageFormat;

    fn jpeg(width: u32, height: u32) -> Vec<u8> {
        gradient_bytes(width, height, ImageFormat::Jpeg)
    }

    fn editor() -> Session {
        Session::new("editor", Role::Editor, "T1")
    }

    #[test]
    fn test_upload_writes_record_fields() {
        let engine = ImageEngine::default();
        let mut store = MemoryStore::default();
        let batch = UploadBatch {
            files: vec![UploadFile::new("beach.jpg", jpeg(800, 400))],
            created_by: CreatedBy::Ai,
            selected_tenant: None,
        };

        let report = upload_images(&engine, &mut store, &editor(), batch, None).unwrap();
        assert_eq!(report.success_count(), 1);

        let records = store.records(IMAGES);
        let record = records[0];
        assert_eq!(record["name"], "beach.jpg");
        assert_eq!(record["createdBy"], "ai");
        assert_eq!(record["tenantCode"], "T1");
        assert!(record["url"].as_str().unwrap().starts_with("data:image/jpeg;base64,"));
        assert!(record["thumbnail"].as_str().unwrap().starts_with("data:image/jpeg;base64,"));
        assert!(record["uploadedAt"].is_string());
    }

    #[test]
    fn test_upload_denied_for_viewer() {
        let engine = ImageEngine::default();
        let mut store = MemoryStore::default();
        let viewer = Session::new("v", Role::Viewer, "T1");
        let batch = UploadBatch {
            files: vec![UploadFile::new("a.jpg", jpeg(10, 10))],
            ..UploadBatch::default()
        };

        let err = upload_images(&engine, &mut store, &viewer, batch, None).unwrap_err();
        assert!(matches!(err, EngineError::PermissionDenied { .. }));
        assert!(store.records(IMAGES).is_empty());
    }

    #[test]
    fn test_upload_master_admin_uses_selected_tenant() {
        let engine = ImageEngine::default();
        let mut store = MemoryStore::default();
        let admin = Session::new("root", Role::MasterAdmin, "");
        let batch = UploadBatch {
            files: vec![UploadFile::new("a.jpg", jpeg(10, 10))],
            created_by: CreatedBy::Human,
            selected_tenant: Some("ACME".into()),
        };

        upload_images(&engine, &mut store, &admin, batch, None).unwrap();
        assert_eq!(store.records(IMAGES)[0]["tenantCode"], "ACME");
    }

    #[test]
    fn test_image_record_round_trip_from_store_json() {
        let url = EncodedImage::jpeg(jpeg(20, 20));
        let value = json!({
            "id": "abc",
            "name": "x.jpg",
            "url": url.to_data_uri(),
            "uploadedAt": "2024-03-05T14:07:00Z",
        });

        let record: ImageRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.url, url);
        assert_eq!(record.thumbnail, None);
        assert_eq!(record.created_by, CreatedBy::Human);
        assert_eq!(record.tenant_code, "");
    }

    #[test]
    fn test_backfill_only_missing_thumbnails() {
        let engine = ImageEngine::default();
        let mut store = MemoryStore::default();
        let url = EncodedImage::jpeg(jpeg(400, 300));

        let mut records = Vec::new();
        for name in ["a.jpg", "b.jpg"] {
            let payload = json!({ "name": name, "url": url, "uploadedAt": "2024-01-01T00:00:00Z" });
            let id = store.create(IMAGES, payload).unwrap();
            records.push(ImageRecord {
                id,
                name: name.to_string(),
                url: url.clone(),
                thumbnail: None,
                uploaded_at: Utc::now(),
                created_by: CreatedBy::Human,
                tenant_code: String::new(),
            });
        }
        records[1].thumbnail = Some(url.clone());

        let report = backfill_thumbnails(&engine, &mut store, &records, None);
        assert_eq!(report.items.len(), 1);
        assert_eq!(report.items[0].label, "a.jpg");

        let stored = &store.collections[IMAGES][&records[0].id];
        let thumb: EncodedImage = serde_json::from_value(stored["thumbnail"].clone()).unwrap();
        let decoded = crate::decode::decode_image(thumb.as_bytes(), u64::MAX).unwrap();
        assert_eq!(decoded.dimensions(), (150, 113));
        assert!(store.collections[IMAGES][&records[1].id].get("thumbnail").is_none());
    }

    #[test]
    fn test_backfill_reports_undecodable_record() {
        let engine = ImageEngine::default();
        let mut store = MemoryStore::default();
        let record = ImageRecord {
            id: "missing".into(),
            name: "broken.jpg".into(),
            url: EncodedImage::jpeg(b"garbage".to_vec()),
            thumbnail: None,
            uploaded_at: Utc::now(),
            created_by: CreatedBy::Ai,
            tenant_code: "T1".into(),
        };

        let report = backfill_thumbnails(&engine, &mut store, &[record], None);
        assert_eq!(report.failure_count(), 1);
        assert!(report.items[0].result.as_ref().unwrap_err().is_decode());
    }
}
