use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("\"{0}\" is already on the list")]
    Conflict(String),
    #[error("no movie with id {0}")]
    NotFound(i32),
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("movie directory request failed: {0}")]
    Request(#[from] wreq::Error),
    #[error("movie directory answered with status {0}")]
    Status(u16),
    #[error("malformed movie directory response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("movie directory response is missing `{0}`")]
    MissingField(&'static str),
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Store(StoreError::Database(err))
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Store(StoreError::Conflict(_)) => StatusCode::CONFLICT,
            AppError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Directory(_) => StatusCode::BAD_GATEWAY,
            AppError::Store(StoreError::Database(_)) | AppError::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::Store(StoreError::Database(_)) | AppError::Other(_) => {
                "Something went wrong.".to_string()
            },
            AppError::Directory(_) => {
                "The movie directory is unavailable right now, try again later.".to_string()
            },
            AppError::Store(err) => err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, status = status.as_u16(), "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }
        let body = crate::templates::error_page(status, &self.public_message());
        (status, Html(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_error_kind() {
        assert_eq!(
            AppError::from(StoreError::Conflict("Heat".into())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::from(StoreError::NotFound(4)).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::from(DirectoryError::Status(503)).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            AppError::from(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_details_stay_out_of_the_page() {
        let err = AppError::from(sea_orm::DbErr::Custom("disk I/O error".into()));
        assert_eq!(err.public_message(), "Something went wrong.");

        let err = AppError::from(StoreError::Conflict("Heat".into()));
        assert_eq!(err.public_message(), "\"Heat\" is already on the list");
    }
}
