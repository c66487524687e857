// ==========================================
// 主数据导入 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use chrono::FixedOffset;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    pub const ENVIRONMENT: &str = "import.environment";
    pub const ORG_UTC_OFFSET_SECONDS: &str = "import.org_utc_offset_seconds";
    pub const REQUEST_TIMEOUT_MS: &str = "import.request_timeout_ms";

    /// 功能开关键: feature_flag/<env>/<flag>
    pub fn feature_flag(env: &str, flag: &str) -> String {
        format!("feature_flag/{}/{}", env, flag)
    }
}

const DEFAULT_ENVIRONMENT: &str = "local";
const DEFAULT_ORG_UTC_OFFSET_SECONDS: i32 = 9 * 3600;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Clone)]
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// 在阻塞线程池上读取配置值，异步接口不在 runtime 线程上等待连接锁
    async fn read_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let manager = self.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || manager.get_config_value(&key))
            .await
            .map_err(|e| format!("配置读取任务失败: {}", e))?
    }

    /// 解析数值配置，缺失时使用默认值
    async fn get_parsed_or_default<T>(&self, key: &str, default: T) -> ConfigResult<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.read_value(key).await? {
            Some(raw) => raw.trim().parse::<T>().map_err(|e| {
                format!("配置值格式错误 (key: {}, value: {}): {}", key, raw, e).into()
            }),
            None => Ok(default),
        }
    }
}

/// 开关值解析：true / 1 / on / yes 视为开启
fn parse_flag_value(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "on" | "yes"
    )
}

#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_environment(&self) -> ConfigResult<String> {
        Ok(self
            .read_value(config_keys::ENVIRONMENT)
            .await?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()))
    }

    async fn get_org_utc_offset(&self) -> ConfigResult<FixedOffset> {
        let seconds = self
            .get_parsed_or_default(
                config_keys::ORG_UTC_OFFSET_SECONDS,
                DEFAULT_ORG_UTC_OFFSET_SECONDS,
            )
            .await?;
        FixedOffset::east_opt(seconds)
            .ok_or_else(|| format!("无效的 UTC 偏移: {} 秒", seconds).into())
    }

    async fn get_request_timeout(&self) -> ConfigResult<Duration> {
        let ms = self
            .get_parsed_or_default(config_keys::REQUEST_TIMEOUT_MS, DEFAULT_REQUEST_TIMEOUT_MS)
            .await?;
        Ok(Duration::from_millis(ms))
    }

    async fn is_feature_enabled(&self, flag: &str, env: &str) -> ConfigResult<bool> {
        let key = config_keys::feature_flag(env, flag);
        Ok(self
            .read_value(&key)
            .await?
            .map(|v| parse_flag_value(&v))
            .unwrap_or(false))
    }
}
