use thiserror::Error;

/// Failure of a single asset load; caught at the load boundary and logged
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {uri}: {source}")]
    Io {
        uri: String,
        source: std::io::Error,
    },

    #[error("failed to import glTF {uri}: {source}")]
    Gltf { uri: String, source: gltf::Error },

    #[error("failed to decode image {uri}: {source}")]
    Image {
        uri: String,
        source: image::ImageError,
    },

    #[error("failed to fetch {uri}: {source}")]
    Http {
        uri: String,
        source: reqwest::Error,
    },

    #[error("model {uri} contains no triangle geometry")]
    EmptyModel { uri: String },

    #[error("load of {uri} ended without a result")]
    Abandoned { uri: String },
}

impl LoadError {
    pub fn uri(&self) -> &str {
        match self {
            LoadError::Io { uri, .. }
            | LoadError::Gltf { uri, .. }
            | LoadError::Image { uri, .. }
            | LoadError::Http { uri, .. }
            | LoadError::EmptyModel { uri }
            | LoadError::Abandoned { uri } => uri,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_uri() {
        let err = LoadError::EmptyModel {
            uri: "/assets/galaxy/scene.gltf".to_string(),
        };
        assert_eq!(err.uri(), "/assets/galaxy/scene.gltf");
        assert!(err.to_string().contains("/assets/galaxy/scene.gltf"));
    }

    #[test]
    fn test_io_error_source_preserved() {
        use std::error::Error;

        let err = LoadError::Io {
            uri: "luis.png".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.source().is_some());
    }
}
