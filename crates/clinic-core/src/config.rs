//! 数据库配置加载
//!
//! 配置来源按优先级从低到高：内置默认值（仅主机与端口）、可选的配置文件（格式按扩展名识别）、
//! `DB_` 前缀的环境变量。用户名、密码和数据库名没有默认值，缺失时启动失败。

use std::fmt;
use std::path::Path;

use ::config::{Config, Environment, File};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ClinicError, Result};

/// 默认数据库主机
pub const DEFAULT_HOST: &str = "localhost";
/// 默认 MySQL 端口
pub const DEFAULT_PORT: u16 = 3306;

/// 数据库连接配置
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct DatabaseSettings {
    /// 数据库主机 (DB_HOST)
    pub host: String,
    /// 数据库端口 (DB_PORT)
    pub port: u16,
    /// 用户名 (DB_USER)
    pub user: String,
    /// 密码 (DB_PASSWORD)
    pub password: String,
    /// 数据库名 (DB_NAME)
    pub name: String,
}

impl DatabaseSettings {
    /// 从可选配置文件和环境变量加载配置
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::defaults()?;

        if let Some(path) = config_file {
            info!("Loading database settings from {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(Environment::with_prefix("DB"))
            .build()?;

        Self::from_config(config)
    }

    /// 从已构建的配置中解析并校验
    pub fn from_config(config: Config) -> Result<Self> {
        let settings: DatabaseSettings = config.try_deserialize()?;
        settings.validate()?;
        debug!("Database settings resolved: {:?}", settings);
        Ok(settings)
    }

    fn defaults() -> Result<::config::ConfigBuilder<::config::builder::DefaultState>> {
        Ok(Config::builder()
            .set_default("host", DEFAULT_HOST)?
            .set_default("port", i64::from(DEFAULT_PORT))?)
    }

    fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ClinicError::Config("database host cannot be empty".to_string()));
        }
        if self.user.trim().is_empty() {
            return Err(ClinicError::Config("database user cannot be empty".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(ClinicError::Config("database name cannot be empty".to_string()));
        }
        Ok(())
    }
}

// 密码不进入日志
impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"******")
            .field("name", &self.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(overrides: &[(&str, &str)]) -> Result<DatabaseSettings> {
        let mut builder = DatabaseSettings::defaults()?;
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }
        DatabaseSettings::from_config(builder.build()?)
    }

    #[test]
    fn test_defaults_fill_host_and_port() {
        let settings = build(&[("user", "clinic"), ("password", "secret"), ("name", "healthcare_system")])
            .unwrap();

        assert_eq!(settings.host, DEFAULT_HOST);
        assert_eq!(settings.port, DEFAULT_PORT);
        assert_eq!(settings.name, "healthcare_system");
    }

    #[test]
    fn test_missing_credentials_is_config_error() {
        let result = build(&[("name", "healthcare_system")]);
        assert!(matches!(result, Err(ClinicError::Config(_))));
    }

    #[test]
    fn test_empty_database_name_rejected() {
        let result = build(&[("user", "clinic"), ("password", "secret"), ("name", "  ")]);
        assert!(matches!(result, Err(ClinicError::Config(_))));
    }

    #[test]
    fn test_port_parsed_from_string() {
        let settings = build(&[
            ("user", "clinic"),
            ("password", "secret"),
            ("name", "healthcare_system"),
            ("port", "3307"),
        ])
        .unwrap();

        assert_eq!(settings.port, 3307);
    }

    #[test]
    fn test_debug_redacts_password() {
        let settings = build(&[("user", "clinic"), ("password", "secret"), ("name", "db")]).unwrap();
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn test_load_json_file_by_extension() {
        let path = std::env::temp_dir().join(format!("clinic-settings-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"user": "clinic", "password": "secret", "name": "from_json", "port": 3310}"#,
        )
        .unwrap();

        let result = DatabaseSettings::load(Some(path.as_path()));
        std::fs::remove_file(&path).unwrap();

        let settings = result.unwrap();
        assert_eq!(settings.name, "from_json");
        assert_eq!(settings.port, 3310);
        assert_eq!(settings.host, DEFAULT_HOST);
    }
}
