use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::repository::PhotoStore;

/// Stores photos under `{root}/users/{user_id}/{unix_millis}.{ext}`.
#[derive(Clone)]
pub struct LocalPhotoStore {
    pub root: PathBuf,
}

impl LocalPhotoStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

/// Lowercased text after the last `.`, or empty when there is none.
pub fn file_extension(filename: Option<&str>) -> String {
    filename
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

fn file_name(ext: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    if ext.is_empty() {
        millis.to_string()
    } else {
        format!("{millis}.{ext}")
    }
}

impl PhotoStore for LocalPhotoStore {
    async fn save_user_photo(
        &self,
        user_id: Uuid,
        original_filename: Option<&str>,
        bytes: &[u8],
    ) -> Option<String> {
        let sub_path = Path::new("users").join(user_id.to_string());
        let dir = self.root.join(&sub_path);
        if let Err(e) = tokio::fs::create_dir_all(&dir).await {
            warn!(error = %e, dir = %dir.display(), "could not create upload folder");
            return None;
        }

        let relative = sub_path.join(file_name(&file_extension(original_filename)));
        let target = self.root.join(&relative);
        match tokio::fs::write(&target, bytes).await {
            Ok(()) => {
                info!(path = %target.display(), "file saved");
                Some(relative.to_string_lossy().into_owned())
            }
            Err(e) => {
                error!(error = %e, path = %target.display(), "file was not saved");
                None
            }
        }
    }
}
