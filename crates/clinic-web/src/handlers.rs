//! HTTP处理器

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Json},
};
use tracing::{debug, info};

use crate::error::{ApiError, MessageBody, Operation};
use crate::input::PatientPayload;
use crate::server::AppState;

/// 首页
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    Html(state.pages.index())
}

/// 登记患者
pub async fn add_patient(
    State(state): State<AppState>,
    PatientPayload(form): PatientPayload,
) -> Result<Json<MessageBody>, ApiError> {
    debug!("Received patient intake payload");

    let patient = form
        .validate()
        .map_err(|e| ApiError::from_clinic(Operation::Add, e))?;

    state
        .repository
        .insert(&patient)
        .await
        .map_err(|e| ApiError::from_clinic(Operation::Add, e))?;

    Ok(Json(MessageBody::new("Patient added successfully!")))
}

/// 患者列表页
pub async fn view_patients(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let patients = state
        .repository
        .list()
        .await
        .map_err(|e| ApiError::from_clinic(Operation::List, e))?;

    info!("Rendering {} patients", patients.len());
    Ok(Html(state.pages.patients(&patients)))
}

/// 删除患者
///
/// 路径参数不是正整数时视为记录不存在。
pub async fn delete_patient(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    let id = match raw_id.parse::<i64>() {
        Ok(id) if id > 0 => id,
        _ => {
            debug!("Ignoring delete for non-numeric id {:?}", raw_id);
            return Err(ApiError::patient_not_found());
        }
    };

    state
        .repository
        .delete(id)
        .await
        .map_err(|e| ApiError::from_clinic(Operation::Delete, e))?;

    Ok(Json(MessageBody::new("Patient deleted successfully!")))
}
