use tracing::warn;

use crate::domain::repository::{PhotoStore, UserRepository};
use crate::error::AuthServiceError;

pub struct UploadPhotoInput<'a> {
    /// Email from the caller's bearer token.
    pub email: &'a str,
    pub original_filename: Option<&'a str>,
    pub bytes: &'a [u8],
}

pub struct UploadPhotoUseCase<U, P>
where
    U: UserRepository,
    P: PhotoStore,
{
    pub users: U,
    pub photos: P,
}

impl<U, P> UploadPhotoUseCase<U, P>
where
    U: UserRepository,
    P: PhotoStore,
{
    /// Returns the stored relative path, or `None` when storage failed softly.
    pub async fn execute(
        &self,
        input: UploadPhotoInput<'_>,
    ) -> Result<Option<String>, AuthServiceError> {
        let user = self
            .users
            .find_by_email(input.email)
            .await?
            .ok_or(AuthServiceError::UserNotFound)?;

        let path = self
            .photos
            .save_user_photo(user.id, input.original_filename, input.bytes)
            .await;
        if path.is_none() {
            warn!(user_id = %user.id, "photo was not stored");
        }
        Ok(path)
    }
}
