//! Multipart form handling and image storage.
//!
//! Images are written to disk under a generated name before the row that
//! references them is inserted. A failed insert leaves the file behind.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use axum::{body::Bytes, extract::Multipart};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

pub const BURGER_DIR: &str = "burgers";
pub const SPECIALS_DIR: &str = "specials";

const MAX_STEM_LEN: usize = 40;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Text fields of a multipart body plus the single accepted file field.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, Vec<String>>,
    file: Option<UploadedFile>,
}

impl MultipartForm {
    /// Reads every part. Parts carrying a file name are only accepted under
    /// `file_field`; an empty file part counts as no file.
    pub async fn read(mut multipart: Multipart, file_field: &str) -> ApiResult<Self> {
        let mut form = MultipartForm::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            if field.file_name().is_some() {
                if name != file_field {
                    return Err(ApiError::bad_request(format!(
                        "Unexpected file field `{name}`"
                    )));
                }
                if form.file.is_some() {
                    return Err(ApiError::bad_request("Only one file may be uploaded"));
                }
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                if !bytes.is_empty() {
                    form.file = Some(UploadedFile {
                        field: name,
                        file_name,
                        content_type,
                        bytes,
                    });
                }
            } else {
                let value = field.text().await?;
                form.fields.entry(name).or_default().push(value);
            }
        }
        Ok(form)
    }

    pub fn insert_text(&mut self, name: &str, value: &str) {
        self.fields
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
    }

    /// First value of a text field, trimmed; blank values count as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    pub fn required(&self, name: &str) -> ApiResult<&str> {
        self.text(name)
            .ok_or_else(|| ApiError::bad_request(format!("Missing field `{name}`")))
    }

    /// Every value of a repeated field.
    pub fn all(&self, name: &str) -> impl Iterator<Item = &str> {
        self.fields
            .get(name)
            .into_iter()
            .flatten()
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    pub fn take_file(&mut self) -> Option<UploadedFile> {
        self.file.take()
    }
}

fn extension_for(content_type: Option<&str>) -> ApiResult<&'static str> {
    let content_type = content_type.unwrap_or_default();
    if !content_type.starts_with("image/") {
        return Err(ApiError::bad_request("Only image uploads are accepted"));
    }
    match content_type {
        "image/png" => Ok("png"),
        "image/jpeg" | "image/jpg" => Ok("jpg"),
        "image/webp" => Ok("webp"),
        "image/gif" => Ok("gif"),
        other => Err(ApiError::bad_request(format!(
            "Unsupported image type `{other}`"
        ))),
    }
}

fn sanitized_stem(file_name: Option<&str>) -> String {
    let stem: String = file_name
        .and_then(|name| Path::new(name).file_stem())
        .and_then(|stem| stem.to_str())
        .unwrap_or_default()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .take(MAX_STEM_LEN)
        .collect();
    if stem.is_empty() {
        "upload".to_string()
    } else {
        stem
    }
}

/// `<stem>-<field>-<millis>-<uuid8>.<ext>`
pub fn unique_file_name(file: &UploadedFile) -> ApiResult<String> {
    let extension = extension_for(file.content_type.as_deref())?;
    let suffix = Uuid::new_v4().simple().to_string();
    Ok(format!(
        "{}-{}-{}-{}.{}",
        sanitized_stem(file.file_name.as_deref()),
        file.field,
        Utc::now().timestamp_millis(),
        &suffix[..8],
        extension
    ))
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validates and writes the file, returning the stored file name.
    pub async fn save(&self, subdir: Option<&str>, file: &UploadedFile) -> ApiResult<String> {
        let file_name = unique_file_name(file)?;
        let dir = match subdir {
            Some(subdir) => self.root.join(subdir),
            None => self.root.clone(),
        };
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| ApiError::internal(format!("Cannot create upload directory: {e}")))?;
        tokio::fs::write(dir.join(&file_name), &file.bytes)
            .await
            .map_err(|e| ApiError::internal(format!("Cannot store upload: {e}")))?;
        info!(file_name, size = file.bytes.len(), "stored upload");
        Ok(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: Option<&str>, content_type: Option<&str>) -> UploadedFile {
        UploadedFile {
            field: "file".to_string(),
            file_name: name.map(str::to_string),
            content_type: content_type.map(str::to_string),
            bytes: Bytes::from_static(b"\x89PNG"),
        }
    }

    #[test]
    fn test_unique_file_name_shape() {
        let name = unique_file_name(&upload(Some("My Avatar.PNG"), Some("image/png"))).unwrap();
        assert!(name.starts_with("myavatar-file-"), "{name}");
        assert!(name.ends_with(".png"));
        assert_eq!(name.split('-').count(), 4);

        let other = unique_file_name(&upload(Some("My Avatar.PNG"), Some("image/png"))).unwrap();
        assert_ne!(name, other);
    }

    #[test]
    fn test_missing_stem_falls_back() {
        let name = unique_file_name(&upload(None, Some("image/jpeg"))).unwrap();
        assert!(name.starts_with("upload-file-"));
        assert!(name.ends_with(".jpg"));
    }

    #[test]
    fn test_non_images_are_rejected() {
        assert!(matches!(
            unique_file_name(&upload(Some("notes.txt"), Some("text/plain"))),
            Err(ApiError::BadRequest(_))
        ));
        assert!(unique_file_name(&upload(Some("x.png"), None)).is_err());
        assert!(unique_file_name(&upload(Some("x.tiff"), Some("image/tiff"))).is_err());
    }

    #[test]
    fn test_form_text_access() {
        let mut form = MultipartForm::default();
        form.insert_text("add-burger-name", "  Classic ");
        form.insert_text("allergens", "1");
        form.insert_text("allergens", " ");
        form.insert_text("allergens", "2");
        assert_eq!(form.text("add-burger-name"), Some("Classic"));
        assert_eq!(form.all("allergens").collect::<Vec<_>>(), vec!["1", "2"]);
        assert!(form.required("add-burger-price").is_err());
        assert!(form.take_file().is_none());
    }

    #[tokio::test]
    async fn test_save_writes_into_subdir() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());
        let name = store
            .save(Some(BURGER_DIR), &upload(Some("classic.png"), Some("image/png")))
            .await
            .unwrap();
        let stored = dir.path().join(BURGER_DIR).join(&name);
        assert_eq!(std::fs::read(stored).unwrap(), b"\x89PNG");
    }
}
