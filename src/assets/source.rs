use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use super::model::ModelData;
use super::texture::TextureData;
use crate::error::LoadError;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Where asset bytes come from. Called on loader worker threads.
pub trait AssetSource: Send + Sync {
    fn load_model(&self, uri: &str) -> Result<ModelData, LoadError>;

    fn load_texture(&self, uri: &str) -> Result<TextureData, LoadError>;
}

pub fn is_remote(uri: &str) -> bool {
    uri.starts_with("http://") || uri.starts_with("https://")
}

/// Local files under an asset root (leading `/` is relative to the root),
/// plus `http(s)://` URIs fetched over the network
pub struct FileSystemSource {
    root: PathBuf,
    http: reqwest::blocking::Client,
}

impl FileSystemSource {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            root: root.into(),
            http,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, uri: &str) -> PathBuf {
        self.root.join(uri.trim_start_matches('/'))
    }

    fn fetch(&self, uri: &str) -> Result<Vec<u8>, LoadError> {
        let http_error = |source| LoadError::Http {
            uri: uri.to_string(),
            source,
        };

        log::debug!("Fetching {}", uri);
        let response = self
            .http
            .get(uri)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(http_error)?;
        let bytes = response.bytes().map_err(http_error)?;
        Ok(bytes.to_vec())
    }

    fn read(&self, uri: &str) -> Result<Vec<u8>, LoadError> {
        if is_remote(uri) {
            return self.fetch(uri);
        }
        std::fs::read(self.resolve(uri)).map_err(|source| LoadError::Io {
            uri: uri.to_string(),
            source,
        })
    }
}

impl AssetSource for FileSystemSource {
    fn load_model(&self, uri: &str) -> Result<ModelData, LoadError> {
        let gltf_error = |source| LoadError::Gltf {
            uri: uri.to_string(),
            source,
        };

        // Local bundles may reference sibling .bin/.png files, so import by path
        let (document, buffers, images) = if is_remote(uri) {
            gltf::import_slice(self.fetch(uri)?).map_err(gltf_error)?
        } else {
            gltf::import(self.resolve(uri)).map_err(gltf_error)?
        };

        ModelData::from_gltf(uri, &document, &buffers, &images)
    }

    fn load_texture(&self, uri: &str) -> Result<TextureData, LoadError> {
        let bytes = self.read(uri)?;
        TextureData::decode(uri, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_detection() {
        assert!(is_remote("https://example.com/earthmap1k.jpg"));
        assert!(is_remote("http://example.com/a.png"));
        assert!(!is_remote("/assets/galaxy/scene.gltf"));
        assert!(!is_remote("luis.png"));
    }

    #[test]
    fn test_resolve_strips_web_root() {
        let source = FileSystemSource::new("/srv/site").unwrap();
        assert_eq!(
            source.resolve("/assets/galaxy/scene.gltf"),
            PathBuf::from("/srv/site/assets/galaxy/scene.gltf")
        );
        assert_eq!(source.resolve("luis.png"), PathBuf::from("/srv/site/luis.png"));
    }

    #[test]
    fn test_missing_texture_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSystemSource::new(dir.path()).unwrap();
        let err = source.load_texture("missing.png").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_local_texture_decodes() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 255, 0, 255]))
            .save(dir.path().join("avatar.png"))
            .unwrap();

        let source = FileSystemSource::new(dir.path()).unwrap();
        let tex = source.load_texture("/avatar.png").unwrap();
        assert_eq!((tex.width, tex.height), (2, 2));
    }
}
