use crate::domain::action_log::ActionLog;
use crate::repository::error::RepositoryResult;
use rusqlite::{params, Connection};

// ==========================================
// ActionLogRepository - 操作日志仓储
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据映射
pub struct ActionLogRepository<'c> {
    pub(super) conn: &'c Connection,
}

impl<'c> ActionLogRepository<'c> {
    /// 绑定到连接或事务
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 插入操作日志
    ///
    /// # 返回
    /// - `Ok(action_id)`: 成功插入,返回action_id
    /// - `Err(...)`: 数据库错误
    pub fn insert(&self, log: &ActionLog) -> RepositoryResult<String> {
        self.conn.execute(
            r#"
            INSERT INTO action_log (
                action_id, batch_id, action_type, entity, entity_id,
                row_number, actor, action_ts, payload_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                log.action_id,
                log.batch_id,
                log.action_type.as_str(),
                log.entity,
                log.entity_id,
                log.row_number as i64,
                log.actor,
                log.action_ts,
                log.payload_json.as_ref().map(|v| v.to_string()),
            ],
        )?;

        Ok(log.action_id.clone())
    }

    /// 批量插入操作日志
    ///
    /// 不自行开启事务：调用方在导入事务内调用，随导入一起提交/回滚
    pub fn batch_insert(&self, logs: &[ActionLog]) -> RepositoryResult<usize> {
        let mut count = 0;
        for log in logs {
            self.insert(log)?;
            count += 1;
        }
        Ok(count)
    }
}
