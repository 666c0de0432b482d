use std::fs;
use std::path::{Path, PathBuf};

use crate::{CodecError, ALLOWED_EXTENSIONS};

/// Owns the scratch directory uploads are staged in.
#[derive(Debug, Clone)]
pub struct Ingest {
    scratch_dir: PathBuf,
}

impl Ingest {
    pub fn new<P: AsRef<Path>>(scratch_dir: P) -> Result<Self, CodecError> {
        let scratch_dir = scratch_dir.as_ref().to_path_buf();
        fs::create_dir_all(&scratch_dir)?;
        Ok(Self { scratch_dir })
    }

    /// Stores raw upload bytes under an opaque identifier.
    ///
    /// Every file the clip accumulates (the upload itself and anything
    /// registered through [`StoredClip::derive`]) is removed when the
    /// returned handle drops, on every exit path.
    pub fn store(&self, original_name: &str, bytes: &[u8]) -> Result<StoredClip, CodecError> {
        let ext = extension_of(original_name)
            .ok_or_else(|| CodecError::UnsupportedContainer(original_name.to_string()))?;
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(CodecError::UnsupportedContainer(ext));
        }

        let id = uuid::Uuid::new_v4().simple().to_string();
        let path = self.scratch_dir.join(format!("{id}.{ext}"));
        fs::write(&path, bytes)?;

        Ok(StoredClip {
            id,
            filename: sanitize_filename(original_name),
            path: path.clone(),
            scratch: vec![path],
        })
    }
}

/// An uploaded clip staged on disk for the duration of one request.
#[derive(Debug)]
pub struct StoredClip {
    id: String,
    filename: String,
    path: PathBuf,
    scratch: Vec<PathBuf>,
}

impl StoredClip {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Sanitized original filename, safe to echo back to the client.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reserves a sibling scratch path `<id>_<suffix>`, cleaned up with the clip.
    pub fn derive(&mut self, suffix: &str) -> PathBuf {
        let path = self
            .path
            .with_file_name(format!("{}_{suffix}", self.id));
        self.scratch.push(path.clone());
        path
    }
}

impl Drop for StoredClip {
    fn drop(&mut self) {
        for path in &self.scratch {
            if let Err(err) = fs::remove_file(path) {
                if err.kind() != std::io::ErrorKind::NotFound {
                    log::debug!("failed to remove scratch file {}: {err}", path.display());
                }
            }
        }
    }
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}

/// Reduces a client-supplied filename to a safe basename.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let safe = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>();

    let safe = safe.trim_matches(|c| c == '.' || c == '_').to_string();
    if safe.is_empty() {
        "upload".to_string()
    } else {
        safe
    }
}
