use super::core::ActionLogRepository;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::repository::error::RepositoryResult;
use rusqlite::types::Type;
use rusqlite::{params, Result as SqliteResult, Row};

impl ActionLogRepository<'_> {
    // ==========================================
    // 查询操作
    // ==========================================

    /// 查询指定导入批次的所有操作日志（按行号升序）
    pub fn find_by_batch_id(&self, batch_id: &str) -> RepositoryResult<Vec<ActionLog>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT action_id, batch_id, action_type, entity, entity_id,
                   row_number, actor, action_ts, payload_json
            FROM action_log
            WHERE batch_id = ?1
            ORDER BY row_number ASC
            "#,
        )?;

        let logs = stmt
            .query_map(params![batch_id], |row| self.map_row(row))?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(logs)
    }

    /// 统计操作日志总数
    pub fn count(&self) -> RepositoryResult<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM action_log", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    fn map_row(&self, row: &Row<'_>) -> SqliteResult<ActionLog> {
        let action_type = match row.get::<_, String>(2)?.as_str() {
            "CREATE" => ActionType::Create,
            "UPDATE" => ActionType::Update,
            "ARCHIVE" => ActionType::Archive,
            other => {
                return Err(rusqlite::Error::FromSqlConversionFailure(
                    2,
                    Type::Text,
                    format!("unknown action type: {}", other).into(),
                ))
            }
        };

        let payload_json = row
            .get::<_, Option<String>>(8)?
            .and_then(|s| serde_json::from_str(&s).ok());

        Ok(ActionLog {
            action_id: row.get(0)?,
            batch_id: row.get(1)?,
            action_type,
            entity: row.get(3)?,
            entity_id: row.get(4)?,
            row_number: row.get::<_, i64>(5)? as usize,
            actor: row.get(6)?,
            action_ts: row.get(7)?,
            payload_json,
        })
    }
}
