use axum::{
    Json,
    extract::{Multipart, State},
};
use serde::Serialize;

use booknet_auth_types::identity::BearerIdentity;

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::photo::{UploadPhotoInput, UploadPhotoUseCase};

const FILE_FIELD: &str = "file";

#[derive(Serialize)]
pub struct PhotoResponse {
    /// Path relative to the photo root; `null` when the file could not be stored.
    pub path: Option<String>,
}

// ── POST /users/me/photo (multipart, field "file") ────────────────────────────

pub async fn upload_photo(
    State(state): State<AppState>,
    identity: BearerIdentity,
    mut multipart: Multipart,
) -> Result<Json<PhotoResponse>, AuthServiceError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AuthServiceError::InvalidUpload)?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().map(str::to_owned);
        let bytes = field
            .bytes()
            .await
            .map_err(|_| AuthServiceError::InvalidUpload)?;
        upload = Some((filename, bytes));
        break;
    }
    let (filename, bytes) = upload.ok_or(AuthServiceError::InvalidUpload)?;

    let usecase = UploadPhotoUseCase {
        users: state.user_repo(),
        photos: state.photo_store(),
    };
    let path = usecase
        .execute(UploadPhotoInput {
            email: &identity.email,
            original_filename: filename.as_deref(),
            bytes: &bytes,
        })
        .await?;
    Ok(Json(PhotoResponse { path }))
}
