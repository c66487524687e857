// ==========================================
// 主数据导入 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 提供幂等的建表入口（CLI 与测试共用）
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等）
///
/// invoice_schedule 上的部分唯一索引保证同一开票日最多一条 SCHEDULED 计划，
/// 因此同一文件内“先归档旧计划、再新建同日计划”的行顺序是有意义的。
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS invoice_schedule (
            invoice_schedule_id TEXT PRIMARY KEY,
            invoice_date TEXT NOT NULL,
            scheduled_date TEXT NOT NULL,
            status TEXT NOT NULL CHECK (status IN ('SCHEDULED', 'CANCELLED')),
            is_archived INTEGER NOT NULL DEFAULT 0,
            remarks TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS uq_invoice_schedule_active_date
            ON invoice_schedule (invoice_date)
            WHERE status = 'SCHEDULED';

        CREATE TABLE IF NOT EXISTS partner_bank (
            partner_bank_id TEXT PRIMARY KEY,
            consignor_code TEXT NOT NULL,
            consignor_name TEXT NOT NULL,
            bank_number TEXT NOT NULL,
            bank_name TEXT NOT NULL,
            bank_branch_number TEXT NOT NULL,
            bank_branch_name TEXT NOT NULL,
            deposit_items TEXT NOT NULL CHECK (deposit_items IN ('ORDINARY', 'CHECKING')),
            account_number TEXT NOT NULL,
            is_archived INTEGER NOT NULL DEFAULT 0,
            is_default INTEGER NOT NULL DEFAULT 0,
            record_limit INTEGER NOT NULL DEFAULT 0 CHECK (record_limit >= 0),
            remarks TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS action_log (
            action_id TEXT PRIMARY KEY,
            batch_id TEXT NOT NULL,
            action_type TEXT NOT NULL,
            entity TEXT NOT NULL,
            entity_id TEXT NOT NULL,
            row_number INTEGER NOT NULL,
            actor TEXT NOT NULL,
            action_ts TEXT NOT NULL,
            payload_json TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_action_log_batch ON action_log (batch_id);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}
