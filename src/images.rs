use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::Error;

pub const MAX_IMAGE_BYTES: usize = 500_000;

/// Route the image directory is served under. Stored image references are
/// this route without the leading slash, followed by the file name.
pub const IMAGE_ROUTE: &str = "/uploads/images";

/// Image file received with a create request, not yet written to disk.
#[derive(Clone, Debug)]
pub struct Upload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Stores uploaded place images as files under one directory.
#[derive(Clone, Debug)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Rejects uploads that are not PNG/JPEG or that exceed the size limit.
    pub fn check(&self, upload: &Upload) -> Result<&'static str, Error> {
        let extension = match upload.content_type.as_str() {
            "image/png" => "png",
            "image/jpg" => "jpg",
            "image/jpeg" => "jpeg",
            _ => return Err(Error::unprocessable("Invalid mime type!")),
        };

        if upload.bytes.len() > MAX_IMAGE_BYTES {
            return Err(Error::unprocessable("Image is too large!"));
        }

        Ok(extension)
    }

    /// Writes the upload to a fresh file and returns its public reference.
    #[tracing::instrument(skip(self, upload), fields(size = upload.bytes.len()))]
    pub async fn save(&self, upload: &Upload) -> Result<String, Error> {
        let extension = self.check(upload)?;

        tokio::fs::create_dir_all(&self.root).await?;

        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        let path = self.root.join(&file_name);
        tokio::fs::write(&path, &upload.bytes).await?;

        tracing::info!(path = %path.display(), "image stored");

        Ok(format!("{}/{}", route_prefix(), file_name))
    }

    /// Maps a stored reference back to its file under `root`. References
    /// outside the image route, or naming anything but a plain file, give `None`.
    pub fn path_of(&self, image: &str) -> Option<PathBuf> {
        let name = image.strip_prefix(route_prefix())?.strip_prefix('/')?;

        if name.is_empty() || name == "." || name == ".." || name.contains(&['/', '\\'][..]) {
            return None;
        }

        Some(self.root.join(name))
    }

    /// Best-effort removal. Failures are logged and otherwise ignored.
    pub async fn remove(&self, image: &str) {
        let path = match self.path_of(image) {
            Some(path) => path,
            None => {
                tracing::warn!(image, "not a stored image reference");
                return;
            }
        };

        if let Err(err) = tokio::fs::remove_file(&path).await {
            tracing::warn!(?err, path = %path.display(), "could not remove image");
        }
    }
}

fn route_prefix() -> &'static str {
    IMAGE_ROUTE.trim_start_matches('/')
}
