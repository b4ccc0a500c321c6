//! 患者记录查询操作

use async_trait::async_trait;
use clinic_core::{ClinicError, NewPatient, Patient, Result};
use sqlx::mysql::MySqlConnection;
use sqlx::{Connection, MySql, Transaction};
use tracing::{info, warn};

use crate::connection::{ConnectionProvider, MySqlConnectionProvider};
use crate::models::DbPatient;

const CREATE_PATIENTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS patients (
        id BIGINT AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        age INT NOT NULL,
        gender VARCHAR(32) NOT NULL,
        contact_number VARCHAR(64) NOT NULL,
        address TEXT NOT NULL,
        medical_history TEXT NOT NULL,
        admission_date DATE NOT NULL
    )
"#;

const INSERT_PATIENT: &str = r#"
    INSERT INTO patients (name, age, gender, contact_number, address, medical_history, admission_date)
    VALUES (?, ?, ?, ?, ?, ?, ?)
"#;

const SELECT_PATIENTS: &str = r#"
    SELECT id, name, age, gender, contact_number, address, medical_history, admission_date
    FROM patients
"#;

const DELETE_PATIENT: &str = "DELETE FROM patients WHERE id = ?";

/// 患者记录仓储接口
#[async_trait]
pub trait PatientRepository: Send + Sync {
    /// 插入一条记录，返回存储层生成的ID
    async fn insert(&self, patient: &NewPatient) -> Result<i64>;

    /// 列出全部记录，行顺序由存储层决定
    async fn list(&self) -> Result<Vec<Patient>>;

    /// 按ID删除；没有匹配行时返回 `ClinicError::NotFound`
    async fn delete(&self, id: i64) -> Result<()>;
}

/// MySQL 仓储实现，每个操作使用独立连接
pub struct MySqlPatientRepository<P = MySqlConnectionProvider> {
    provider: P,
}

impl<P: ConnectionProvider> MySqlPatientRepository<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// 创建患者表
    pub async fn create_table(&self) -> Result<()> {
        let mut conn = self.connect().await?;
        let result = sqlx::query(CREATE_PATIENTS_TABLE)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(ClinicError::from);
        self.provider.release(conn).await;

        if result.is_ok() {
            info!("Patients table is ready");
        }
        result
    }

    async fn connect(&self) -> Result<MySqlConnection> {
        self.provider
            .acquire()
            .await
            .ok_or(ClinicError::ConnectionUnavailable)
    }
}

#[async_trait]
impl<P: ConnectionProvider> PatientRepository for MySqlPatientRepository<P> {
    async fn insert(&self, patient: &NewPatient) -> Result<i64> {
        let mut conn = self.connect().await?;
        let result = insert_patient(&mut conn, patient).await;
        self.provider.release(conn).await;

        if let Ok(id) = &result {
            info!("Patient {} added", id);
        }
        result
    }

    async fn list(&self) -> Result<Vec<Patient>> {
        let mut conn = self.connect().await?;
        let result = sqlx::query_as::<_, DbPatient>(SELECT_PATIENTS)
            .fetch_all(&mut conn)
            .await
            .map(|rows| rows.into_iter().map(Patient::from).collect())
            .map_err(ClinicError::from);
        self.provider.release(conn).await;
        result
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut conn = self.connect().await?;
        let result = delete_patient(&mut conn, id).await;
        self.provider.release(conn).await;

        if result.is_ok() {
            info!("Patient {} deleted", id);
        }
        result
    }
}

async fn insert_patient(conn: &mut MySqlConnection, patient: &NewPatient) -> Result<i64> {
    let mut tx = conn.begin().await?;

    let outcome = sqlx::query(INSERT_PATIENT)
        .bind(&patient.name)
        .bind(patient.age)
        .bind(&patient.gender)
        .bind(&patient.contact_number)
        .bind(&patient.address)
        .bind(&patient.medical_history)
        .bind(patient.admission_date)
        .execute(&mut *tx)
        .await;

    match outcome {
        Ok(done) => {
            tx.commit().await?;
            i64::try_from(done.last_insert_id())
                .map_err(|_| ClinicError::Internal("generated id out of range".to_string()))
        }
        Err(e) => {
            rollback(tx).await;
            Err(e.into())
        }
    }
}

async fn delete_patient(conn: &mut MySqlConnection, id: i64) -> Result<()> {
    let mut tx = conn.begin().await?;

    let outcome = sqlx::query(DELETE_PATIENT)
        .bind(id)
        .execute(&mut *tx)
        .await;

    match outcome {
        Ok(done) => {
            tx.commit().await?;
            if done.rows_affected() == 0 {
                return Err(ClinicError::NotFound(format!("patient {}", id)));
            }
            Ok(())
        }
        Err(e) => {
            rollback(tx).await;
            Err(e.into())
        }
    }
}

async fn rollback(tx: Transaction<'_, MySql>) {
    if let Err(e) = tx.rollback().await {
        warn!("Transaction rollback failed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// 永远连不上的提供者，记录获取次数
    #[derive(Default)]
    struct OfflineProvider {
        attempts: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ConnectionProvider for OfflineProvider {
        async fn acquire(&self) -> Option<MySqlConnection> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            None
        }

        async fn release(&self, _conn: MySqlConnection) {}
    }

    fn sample_patient() -> NewPatient {
        NewPatient {
            name: "Jane Doe".to_string(),
            age: 34,
            gender: "F".to_string(),
            contact_number: "555-0100".to_string(),
            address: "12 Elm St".to_string(),
            medical_history: "asthma".to_string(),
            admission_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_every_operation_reports_connection_unavailable() {
        let provider = OfflineProvider::default();
        let attempts = provider.attempts.clone();
        let repo = MySqlPatientRepository::new(provider);

        assert!(matches!(
            repo.insert(&sample_patient()).await,
            Err(ClinicError::ConnectionUnavailable)
        ));
        assert!(matches!(repo.list().await, Err(ClinicError::ConnectionUnavailable)));
        assert!(matches!(repo.delete(1).await, Err(ClinicError::ConnectionUnavailable)));
        assert!(matches!(
            repo.create_table().await,
            Err(ClinicError::ConnectionUnavailable)
        ));

        // 每个操作各尝试一次，不重试
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
    }
}
