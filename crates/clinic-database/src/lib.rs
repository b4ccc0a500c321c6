//! # Clinic数据库模块
//!
//! 负责患者记录的持久化：按次建立的MySQL连接，以及插入、列表、删除三类操作。

pub mod connection;
pub mod models;
pub mod queries;

// 重新导出主要类型
pub use connection::{ConnectionProvider, MySqlConnectionProvider};
pub use models::DbPatient;
pub use queries::{MySqlPatientRepository, PatientRepository};
