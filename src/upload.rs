use actix_multipart::{Multipart, MultipartError};
use actix_web::http::StatusCode;
use actix_web::ResponseError;
use futures_util::TryStreamExt;
use milp_api_sdk::FilePart;
use thiserror::Error;

use crate::models::{PostedForm, FILE};

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("malformed form data: {0}")]
    Multipart(#[from] MultipartError),

    #[error("upload exceeds the limit of {0} bytes")]
    TooLarge(usize),

    #[error("field '{0}' is not valid UTF-8")]
    NotUtf8(String),
}

impl ResponseError for UploadError {
    fn status_code(&self) -> StatusCode {
        match self {
            UploadError::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::Multipart(_) | UploadError::NotUtf8(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// Read a multipart problem-form post, keeping at most `limit` bytes in total
pub async fn read_posted_form(mut payload: Multipart, limit: usize) -> Result<PostedForm, UploadError> {
    let mut posted = PostedForm::default();
    let mut total = 0usize;

    while let Some(mut field) = payload.try_next().await? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field.content_type().map(|mime| mime.to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            total += chunk.len();
            if total > limit {
                return Err(UploadError::TooLarge(limit));
            }
            bytes.extend_from_slice(&chunk);
        }

        if name == FILE {
            let mut file = FilePart::new(file_name.unwrap_or_default(), bytes);
            file.content_type = content_type;
            posted.push_file(file);
        } else {
            let text = String::from_utf8(bytes).map_err(|_| UploadError::NotUtf8(name.clone()))?;
            posted.push_text(&name, text);
        }
    }

    Ok(posted)
}
