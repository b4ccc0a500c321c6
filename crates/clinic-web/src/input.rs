//! 患者登记请求体
//!
//! 同时接受 JSON 与 `application/x-www-form-urlencoded` 两种编码。
//! 字段在反序列化层面都是可选的，存在性与类型在 [`PatientForm::validate`] 中检查。

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::header,
    Form,
};
use chrono::NaiveDate;
use clinic_core::{ClinicError, NewPatient, Result};
use serde::Deserialize;
use serde_json::{Number, Value};
use tracing::{debug, warn};

use crate::error::ApiError;

/// 入院日期格式
const ADMISSION_DATE_FORMAT: &str = "%Y-%m-%d";

/// 单个字段的原始值
///
/// 表单中总是字符串；JSON 中可能是数字，其它类型留到校验阶段按字段报错。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(Number),
    Other(Value),
}

impl FieldValue {
    fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(text) if text.trim().is_empty())
    }
}

/// 登记表单，字段名与前端保持一致
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PatientForm {
    pub name: Option<FieldValue>,
    pub age: Option<FieldValue>,
    pub gender: Option<FieldValue>,
    pub contact_number: Option<FieldValue>,
    pub address: Option<FieldValue>,
    #[serde(rename = "medicalHistory")]
    pub medical_history: Option<FieldValue>,
    #[serde(rename = "admissionDate")]
    pub admission_date: Option<FieldValue>,
}

impl PatientForm {
    /// 没有任何字段
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.gender.is_none()
            && self.contact_number.is_none()
            && self.address.is_none()
            && self.medical_history.is_none()
            && self.admission_date.is_none()
    }

    /// 检查必填字段并转换为待插入记录
    pub fn validate(self) -> Result<NewPatient> {
        let mut missing = Vec::new();

        let name = present(self.name, "name", &mut missing);
        let age = present(self.age, "age", &mut missing);
        let gender = present(self.gender, "gender", &mut missing);
        let contact_number = present(self.contact_number, "contact_number", &mut missing);
        let address = present(self.address, "address", &mut missing);
        let medical_history = present(self.medical_history, "medicalHistory", &mut missing);
        let admission_date = present(self.admission_date, "admissionDate", &mut missing);

        if !missing.is_empty() {
            return Err(ClinicError::MissingFields(missing));
        }

        // 上面已确认全部字段存在
        let (
            Some(name),
            Some(age),
            Some(gender),
            Some(contact_number),
            Some(address),
            Some(medical_history),
            Some(admission_date),
        ) = (name, age, gender, contact_number, address, medical_history, admission_date)
        else {
            return Err(ClinicError::Internal("required field vanished after check".to_string()));
        };

        Ok(NewPatient {
            name: into_text(name, "name")?,
            age: parse_age(age)?,
            gender: into_text(gender, "gender")?,
            contact_number: into_text(contact_number, "contact_number")?,
            address: into_text(address, "address")?,
            medical_history: into_text(medical_history, "medicalHistory")?,
            admission_date: parse_admission_date(&into_text(admission_date, "admissionDate")?)?,
        })
    }
}

fn present(
    value: Option<FieldValue>,
    field: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<FieldValue> {
    match value {
        Some(value) if !value.is_blank() => Some(value),
        _ => {
            missing.push(field);
            None
        }
    }
}

/// 文本字段接受字符串和数字，数字按原样转成字符串
fn into_text(value: FieldValue, field: &'static str) -> Result<String> {
    match value {
        FieldValue::Text(text) => Ok(text),
        FieldValue::Number(number) => Ok(number.to_string()),
        FieldValue::Other(other) => Err(ClinicError::InvalidField {
            field,
            reason: format!("unsupported value {}", other),
        }),
    }
}

fn parse_age(age: FieldValue) -> Result<i32> {
    let invalid = |reason: &str| ClinicError::InvalidField {
        field: "age",
        reason: reason.to_string(),
    };

    let years = match age {
        FieldValue::Number(number) => match (number.as_i64(), number.as_f64()) {
            (Some(n), _) => i32::try_from(n).map_err(|_| invalid("out of range"))?,
            // 34.0 这类整值浮点数按整数处理
            (None, Some(f))
                if f.fract() == 0.0 && f >= f64::from(i32::MIN) && f <= f64::from(i32::MAX) =>
            {
                f as i32
            }
            _ => return Err(invalid("not an integer")),
        },
        FieldValue::Text(text) => text
            .trim()
            .parse::<i32>()
            .map_err(|_| invalid("not an integer"))?,
        FieldValue::Other(_) => return Err(invalid("not a number")),
    };

    if years < 0 {
        return Err(invalid("negative"));
    }
    Ok(years)
}

fn parse_admission_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ADMISSION_DATE_FORMAT).map_err(|e| {
        ClinicError::InvalidField {
            field: "admissionDate",
            reason: e.to_string(),
        }
    })
}

/// 按 Content-Type 选择 JSON 或表单解码的提取器
pub struct PatientPayload(pub PatientForm);

#[async_trait]
impl<S> FromRequest<S> for PatientPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_ascii_lowercase())
            .unwrap_or_default();

        let form = if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(form) = Form::<PatientForm>::from_request(req, state)
                .await
                .map_err(|e| {
                    warn!("Rejected form payload: {}", e);
                    ApiError::invalid_body()
                })?;
            form
        } else if content_type.starts_with("application/json") || content_type.contains("+json") {
            let bytes = Bytes::from_request(req, state).await.map_err(|e| {
                warn!("Failed to read request body: {}", e);
                ApiError::invalid_body()
            })?;
            if bytes.iter().all(u8::is_ascii_whitespace) {
                return Err(ApiError::no_data());
            }
            serde_json::from_slice::<Option<PatientForm>>(&bytes)
                .map_err(|e| {
                    warn!("Rejected JSON payload: {}", e);
                    ApiError::invalid_body()
                })?
                .unwrap_or_default()
        } else {
            debug!("Unsupported content type for patient intake: {:?}", content_type);
            PatientForm::default()
        };

        if form.is_empty() {
            return Err(ApiError::no_data());
        }
        Ok(Self(form))
    }
}
