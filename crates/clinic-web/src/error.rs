//! 错误到HTTP响应的转换

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use clinic_core::ClinicError;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// 失败的请求所对应的操作，决定返回给客户端的消息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    List,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Add => write!(f, "add_patient"),
            Operation::List => write!(f, "view_patients"),
            Operation::Delete => write!(f, "delete_patient"),
        }
    }
}

/// 所有JSON响应的消息体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 返回给客户端的错误，只携带状态码和可读消息
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 请求体为空或不含任何字段
    pub fn no_data() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Failed to add patient! No data received")
    }

    /// 请求体无法解析
    pub fn invalid_body() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Failed to add patient! Invalid request body")
    }

    pub fn patient_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Patient not found")
    }

    /// 按操作把领域错误映射为客户端可见的消息，内部细节只写日志
    pub fn from_clinic(operation: Operation, err: ClinicError) -> Self {
        let api_error = match &err {
            ClinicError::ConnectionUnavailable => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database connection failed",
            ),
            ClinicError::MissingFields(_) => Self::new(
                StatusCode::BAD_REQUEST,
                "Failed to add patient! Missing required fields",
            ),
            ClinicError::InvalidField { field, .. } => Self::new(
                StatusCode::BAD_REQUEST,
                format!("Failed to add patient! Invalid value for {}", field),
            ),
            ClinicError::NotFound(_) => Self::patient_not_found(),
            ClinicError::Database(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                match operation {
                    Operation::Add => "Failed to add patient! Database error occurred",
                    Operation::List => "Failed to retrieve patients! Database error occurred",
                    Operation::Delete => "Failed to delete patient! Database error occurred",
                },
            ),
            _ => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                match operation {
                    Operation::Add => "Failed to add patient! An error occurred",
                    Operation::List => "Failed to retrieve patients! An error occurred",
                    Operation::Delete => "Failed to delete patient! An error occurred",
                },
            ),
        };

        if api_error.status.is_server_error() {
            error!("{} failed: {}", operation, err);
        } else {
            warn!("{} rejected: {}", operation, err);
        }

        api_error
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(MessageBody::new(self.message))).into_response()
    }
}
