use std::path::{Path, PathBuf};

/// Errors from decoding a texture file.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to read texture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode texture {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("texture {0} has no pixels")]
    Empty(PathBuf),
}

/// Decoded RGBA8 pixels ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    /// Decode an image file (PNG or JPEG) into RGBA8.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| TextureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let decoded = image::load_from_memory(&bytes).map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::Empty(path.to_path_buf()));
        }
        tracing::debug!(?path, width, height, "decoded texture");
        Ok(Self {
            width,
            height,
            rgba: rgba.into_raw(),
        })
    }

    /// Load a texture, degrading to `None` with a warning on failure.
    pub fn load_or_warn(path: impl AsRef<Path>) -> Option<Self> {
        match Self::load(path) {
            Ok(image) => Some(image),
            Err(e) => {
                tracing::warn!("{e}; rendering untextured");
                None
            }
        }
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }
}
