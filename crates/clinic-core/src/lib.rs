//! # Clinic Core
//!
//! 患者记录服务的核心模块，提供数据模型、错误定义和配置加载。

pub mod config;
pub mod error;
pub mod models;

pub use crate::config::DatabaseSettings;
pub use error::{ClinicError, Result};
pub use models::*;
