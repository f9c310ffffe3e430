use std::path::Path;

use axum::extract::multipart::{Multipart, MultipartError};
use rand_core::{OsRng, RngCore};
use serde_json::{Map, Value};
use tokio::{fs, io::AsyncWriteExt};

const STORED_NAME_BYTES: usize = 8;

/// A multipart form flattened into its text fields plus the first uploaded
/// file. File bytes stay in memory until validation has passed, so a
/// rejected request leaves nothing on disk.
#[derive(Debug, Default)]
pub struct ParsedForm {
    pub fields: Map<String, Value>,
    pub file: Option<BufferedFile>,
}

#[derive(Debug, Clone)]
pub struct BufferedFile {
    pub field_name: String,
    pub original_name: String,
    pub extension: String,
    pub bytes: Vec<u8>,
}

pub async fn read_form(mut multipart: Multipart) -> Result<ParsedForm, MultipartError> {
    let mut form = ParsedForm::default();

    while let Some(mut field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or("").to_string();

        match field.file_name().map(ToString::to_string) {
            None => {
                let value = field.text().await?;
                form.fields.insert(field_name, Value::String(value));
            }
            Some(original_name) => {
                let mut bytes = Vec::new();
                while let Some(chunk) = field.chunk().await? {
                    bytes.extend_from_slice(&chunk);
                }
                // Only the first file is kept; the rest are drained and
                // dropped, matching the single-attachment contract.
                if form.file.is_none() {
                    form.file = Some(BufferedFile {
                        extension: extension_of(&original_name),
                        field_name,
                        original_name,
                        bytes,
                    });
                }
            }
        }
    }

    Ok(form)
}

pub fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Randomized stored name so uploads never collide and client-supplied
/// names never reach the filesystem.
pub fn random_stored_name(extension: &str) -> String {
    let mut bytes = [0u8; STORED_NAME_BYTES];
    OsRng.fill_bytes(&mut bytes);
    if extension.is_empty() {
        hex::encode(bytes)
    } else {
        format!("{}.{}", hex::encode(bytes), extension)
    }
}

/// Writes the buffered file under a random name, creating the directory if
/// needed. Returns the stored file name.
pub async fn persist(file: &BufferedFile, dir: &Path) -> std::io::Result<String> {
    fs::create_dir_all(dir).await?;

    let stored_name = random_stored_name(&file.extension);
    let target = dir.join(&stored_name);

    let mut out = fs::File::create(&target).await?;
    out.write_all(&file.bytes).await?;
    out.flush().await?;

    Ok(stored_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_of_lowercases_and_tolerates_none() {
        assert_eq!(extension_of("resume.PDF"), "pdf");
        assert_eq!(extension_of("archive.tar.gz"), "gz");
        assert_eq!(extension_of("no-extension"), "");
        assert_eq!(extension_of(".hidden"), "");
    }

    #[test]
    fn stored_names_are_hex_with_extension() {
        let name = random_stored_name("pdf");
        assert_eq!(name.len(), STORED_NAME_BYTES * 2 + 4);
        assert!(name.ends_with(".pdf"));
        assert_ne!(random_stored_name("pdf"), name);

        let bare = random_stored_name("");
        assert_eq!(bare.len(), STORED_NAME_BYTES * 2);
    }

    #[tokio::test]
    async fn persist_writes_the_buffered_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let file = BufferedFile {
            field_name: "cv".to_string(),
            original_name: "resume.pdf".to_string(),
            extension: "pdf".to_string(),
            bytes: b"%PDF-1.4 test".to_vec(),
        };

        let stored_name = persist(&file, dir.path()).await.unwrap();
        let written = tokio::fs::read(dir.path().join(&stored_name)).await.unwrap();
        assert_eq!(written, file.bytes);
        assert!(stored_name.ends_with(".pdf"));
    }
}
