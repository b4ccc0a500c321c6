//! 数据库模型

use chrono::NaiveDate;
use clinic_core::Patient;
use sqlx::FromRow;

/// 数据库患者表
#[derive(Debug, FromRow)]
pub struct DbPatient {
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub contact_number: String,
    pub address: String,
    pub medical_history: String,
    pub admission_date: NaiveDate,
}

impl From<DbPatient> for Patient {
    fn from(db_patient: DbPatient) -> Self {
        Patient {
            id: db_patient.id,
            name: db_patient.name,
            age: db_patient.age,
            gender: db_patient.gender,
            contact_number: db_patient.contact_number,
            address: db_patient.address,
            medical_history: db_patient.medical_history,
            admission_date: db_patient.admission_date,
        }
    }
}
