//! Multipart form reading for the upload pages.

use std::collections::HashMap;

use actix_multipart::Multipart;
use futures::StreamExt;

use inkwell_core::ports::ImageUpload;

use crate::middleware::error::AppError;

/// Largest accepted upload.
const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Text fields and file parts of a `multipart/form-data` body.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, ImageUpload>,
}

impl FormData {
    pub async fn read(mut payload: Multipart) -> Result<Self, AppError> {
        let mut form = FormData::default();
        let mut total_bytes = 0usize;

        while let Some(field) = payload.next().await {
            let mut field =
                field.map_err(|e| AppError::BadRequest(format!("Multipart error: {}", e)))?;

            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let filename = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .map(str::to_string);

            let mut data = Vec::new();
            while let Some(chunk) = field.next().await {
                let chunk =
                    chunk.map_err(|e| AppError::BadRequest(format!("Upload read error: {}", e)))?;
                total_bytes += chunk.len();
                if total_bytes > MAX_UPLOAD_BYTES {
                    return Err(AppError::BadRequest("Upload exceeds 5 MB".to_string()));
                }
                data.extend_from_slice(&chunk);
            }

            match filename {
                // Browsers send an empty part for an untouched file input.
                Some(filename) if filename.is_empty() || data.is_empty() => {}
                Some(filename) => {
                    form.files.insert(
                        name,
                        ImageUpload {
                            filename,
                            bytes: data,
                        },
                    );
                }
                None => {
                    let text = String::from_utf8(data).map_err(|_| {
                        AppError::BadRequest(format!("Field '{}' is not valid UTF-8", name))
                    })?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// Trimmed text of a field; `None` when absent or blank.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Like [`FormData::text`], failing when the field is missing.
    pub fn required(&self, name: &str) -> Result<&str, AppError> {
        self.text(name)
            .ok_or_else(|| AppError::BadRequest(format!("Field '{}' is required", name)))
    }

    pub fn take_file(&mut self, name: &str) -> Option<ImageUpload> {
        self.files.remove(name)
    }
}
