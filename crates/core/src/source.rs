use crate::collab::ContentSource;
use crate::error::FetchError;
use crate::location::path_of;
use async_trait::async_trait;

/// Reads scripts from the local filesystem. Accepts plain paths and
/// `file://` URIs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

#[async_trait]
impl ContentSource for FileSource {
    async fn fetch(&self, location: &str) -> Result<String, FetchError> {
        if location.trim().is_empty() {
            return Err(FetchError::InvalidLocation {
                location: location.to_string(),
                reason: "location is empty".to_string(),
            });
        }

        let path = path_of(location).ok_or_else(|| FetchError::InvalidLocation {
            location: location.to_string(),
            reason: "only local files and file:// URIs are supported".to_string(),
        })?;

        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| FetchError::Io {
                location: location.to_string(),
                source,
            })
    }
}
