//! Uploaded photo storage.
//!
//! Photos are written under the upload directory with a random 16-hex-char
//! name that keeps the original (lowercased) extension. With the `resize`
//! feature, photos larger than 800x800 are downsized in place; a photo that
//! cannot be decoded is kept as uploaded.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Extensions accepted for uploads (compared case-insensitively).
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Maximum upload size: 2 MiB.
pub const MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

/// Bounding box for stored photos.
#[cfg(feature = "resize")]
const MAX_DIMENSION: u32 = 800;

/// Errors from saving or deleting photos.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("file name has no extension")]
    MissingExtension,

    #[error("file type .{0} is not allowed (use jpg, jpeg or png)")]
    DisallowedExtension(String),

    #[error("file is larger than {max} bytes")]
    TooLarge { max: usize },

    #[error("uploaded file is empty")]
    Empty,

    #[error("invalid stored file name")]
    InvalidName,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A file received from a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied file name; only its extension is used.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Photo storage rooted at the upload directory.
#[derive(Debug, Clone)]
pub struct MediaStore {
    upload_dir: PathBuf,
    max_bytes: usize,
}

impl MediaStore {
    #[must_use]
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }

    #[must_use]
    pub const fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    #[must_use]
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Create the upload directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    pub async fn ensure_dir(&self) -> Result<(), MediaError> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;
        Ok(())
    }

    /// Check extension and size; returns the lowercased extension.
    ///
    /// # Errors
    ///
    /// Returns `MediaError` if the file name has no allowed extension, or the
    /// content is empty or over the size limit.
    pub fn validate(&self, file: &UploadedFile) -> Result<String, MediaError> {
        let extension = allowed_extension(&file.file_name)?;
        if file.bytes.is_empty() {
            return Err(MediaError::Empty);
        }
        if file.bytes.len() > self.max_bytes {
            return Err(MediaError::TooLarge {
                max: self.max_bytes,
            });
        }
        Ok(extension)
    }

    /// Validate and store a photo, returning the stored file name.
    ///
    /// # Errors
    ///
    /// Returns `MediaError` if validation or the write fails. Resize failures
    /// are logged and do not fail the save.
    pub async fn save_image(&self, file: &UploadedFile) -> Result<String, MediaError> {
        let extension = self.validate(file)?;
        let stored_name = format!("{}.{extension}", random_stem());
        let path = self.upload_dir.join(&stored_name);

        self.ensure_dir().await?;
        tokio::fs::write(&path, &file.bytes).await?;

        #[cfg(feature = "resize")]
        downsize(&path).await;

        tracing::info!(file = %stored_name, bytes = file.bytes.len(), "Saved uploaded photo");
        Ok(stored_name)
    }

    /// Remove a stored photo. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::InvalidName` for names that could escape the
    /// upload directory, or the I/O error if removal fails.
    pub async fn delete_image(&self, stored_name: &str) -> Result<(), MediaError> {
        let path = self.path_of(stored_name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(file = stored_name, "Deleted photo");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Resolve a stored name to its path inside the upload directory.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::InvalidName` if the name is empty or contains a
    /// path separator or `..`.
    pub fn path_of(&self, stored_name: &str) -> Result<PathBuf, MediaError> {
        if stored_name.is_empty()
            || stored_name.contains(['/', '\\'])
            || stored_name.contains("..")
        {
            return Err(MediaError::InvalidName);
        }
        Ok(self.upload_dir.join(stored_name))
    }
}

/// Extract and check the extension of a client file name.
fn allowed_extension(file_name: &str) -> Result<String, MediaError> {
    let (_, extension) = file_name
        .rsplit_once('.')
        .ok_or(MediaError::MissingExtension)?;
    if extension.is_empty() {
        return Err(MediaError::MissingExtension);
    }

    let extension = extension.to_ascii_lowercase();
    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(MediaError::DisallowedExtension(extension))
    }
}

fn random_stem() -> String {
    use std::fmt::Write;

    let bytes: [u8; 8] = rand::random();
    bytes.iter().fold(String::with_capacity(16), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}

#[cfg(feature = "resize")]
async fn downsize(path: &Path) {
    let owned = path.to_path_buf();
    let result = tokio::task::spawn_blocking(move || fit_within(&owned, MAX_DIMENSION)).await;
    match result {
        Ok(Ok(true)) => tracing::debug!(path = %path.display(), "Downsized photo"),
        Ok(Ok(false)) => {}
        Ok(Err(e)) => {
            tracing::warn!(path = %path.display(), error = %e, "Could not resize photo, keeping original");
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Resize task failed, keeping original");
        }
    }
}

/// Shrink the image at `path` to fit `max` x `max`, never upscaling.
///
/// Returns whether the file was rewritten.
#[cfg(feature = "resize")]
fn fit_within(path: &Path, max: u32) -> Result<bool, image::ImageError> {
    let img = image::open(path)?;
    if img.width() <= max && img.height() <= max {
        return Ok(false);
    }
    img.thumbnail(max, max).save(path)?;
    Ok(true)
}
