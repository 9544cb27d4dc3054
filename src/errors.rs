use std::collections::BTreeMap;

use actix_web::body::BoxBody;
use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use chrono::NaiveDateTime;
use diesel::result::DatabaseErrorKind;
use serde::{Deserialize, Serialize};
use validator::{ValidationError, ValidationErrors};

pub type Result<T> = std::result::Result<T, ApiError>;

/// Field name to the messages raised against it.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("An unspecified internal error ocurred: {0}")]
    InternalError(#[from] anyhow::Error),
    #[error("An unspecified internal error ocurred")]
    DatabaseError(#[from] BlockingError),
    #[error("Invalid input")]
    Validation(FieldErrors),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("{0} already exists")]
    AlreadyExists(String),
    #[error("Unknown reference: {0}")]
    InvalidReference(String),
    #[error("Invalid Credentials")]
    InvalidCredentials,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Expired token.")]
    ExpiredToken,
    #[error("{0} not found")]
    NotFound(&'static str),
}

impl ApiError {
    fn get_error_code(&self) -> String {
        match self {
            ApiError::InternalError(_) => "IE-00500".to_string(),
            ApiError::DatabaseError(_) => "DE-00500".to_string(),
            ApiError::Validation(_) => "VE-00400".to_string(),
            ApiError::BadRequest(_) => "BR-00400".to_string(),
            ApiError::AlreadyExists(_) => "AE-00400".to_string(),
            ApiError::InvalidReference(_) => "IR-00400".to_string(),
            ApiError::InvalidCredentials => "IC-00401".to_string(),
            ApiError::InvalidToken => "IT-00401".to_string(),
            ApiError::ExpiredToken => "ET-00403".to_string(),
            ApiError::NotFound(_) => "NF-00404".to_string(),
        }
    }

    /// Single-field validation failure.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), vec![message.into()]);
        ApiError::Validation(fields)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            fields
                .entry(field.to_string())
                .or_default()
                .extend(errs.iter().map(describe));
        }
        ApiError::Validation(fields)
    }
}

fn describe(error: &ValidationError) -> String {
    error
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| format!("failed {} check", error.code))
}

impl From<diesel::result::Error> for ApiError {
    fn from(value: diesel::result::Error) -> Self {
        use diesel::result::Error as DieselError;
        match value {
            DieselError::NotFound => ApiError::NotFound("Record"),
            DieselError::DatabaseError(kind, info) => {
                let constraint = info
                    .constraint_name()
                    .unwrap_or_else(|| info.table_name().unwrap_or("record"))
                    .to_string();
                match kind {
                    DatabaseErrorKind::UniqueViolation => ApiError::AlreadyExists(constraint),
                    DatabaseErrorKind::ForeignKeyViolation => {
                        ApiError::InvalidReference(constraint)
                    }
                    DatabaseErrorKind::CheckViolation | DatabaseErrorKind::NotNullViolation => {
                        ApiError::field(
                            info.column_name().unwrap_or(constraint.as_str()),
                            info.message().to_string(),
                        )
                    }
                    _ => ApiError::InternalError(anyhow::anyhow!("{}", info.message())),
                }
            }
            other => ApiError::InternalError(anyhow::anyhow!("{}", other)),
        }
    }
}

impl From<r2d2::Error> for ApiError {
    fn from(value: r2d2::Error) -> Self {
        ApiError::InternalError(anyhow::anyhow!(
            "Couldn't get db connection from pool: {}",
            value
        ))
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    pub message: String,
    pub status: u16,
    pub timestamp: NaiveDateTime,
    pub internal_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

impl From<&ApiError> for ApiErrorResponse {
    fn from(value: &ApiError) -> Self {
        let fields = match value {
            ApiError::Validation(fields) => Some(fields.clone()),
            _ => None,
        };
        Self {
            message: value.to_string(),
            status: value.status_code().as_u16(),
            timestamp: chrono::Utc::now().naive_utc(),
            internal_code: value.get_error_code(),
            fields,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self {
            ApiError::Validation(_)
            | ApiError::BadRequest(_)
            | ApiError::AlreadyExists(_)
            | ApiError::InvalidReference(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiError::ExpiredToken => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        if self.status_code().is_server_error() {
            log::error!("{:?}", self);
        }
        HttpResponse::build(self.status_code()).json(ApiErrorResponse::from(self))
    }
}
