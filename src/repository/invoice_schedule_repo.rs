// ==========================================
// 主数据导入 - 开票计划数据仓储
// ==========================================
// 对齐: invoice_schedule 表
// 红线: Repository 不含业务逻辑，只做数据映射
// 约束: 所有操作在调用方持有的事务连接上执行
// ==========================================

use crate::domain::invoice_schedule::InvoiceSchedule;
use crate::domain::types::ScheduleStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

const ENTITY: &str = "invoice_schedule";

// ==========================================
// InvoiceScheduleStore Trait
// ==========================================
// 用途: 导入管道消费的存储接口（lookupByID / create / update）
// 实现者: InvoiceScheduleRepository
pub trait InvoiceScheduleStore {
    /// 按 ID 查询；不存在时返回 RepositoryError::NotFound
    fn find_by_id(&self, id: &str) -> RepositoryResult<InvoiceSchedule>;

    fn create(&self, schedule: &InvoiceSchedule) -> RepositoryResult<()>;

    /// 更新可变字段；目标不存在时返回 RepositoryError::NotFound
    fn update(&self, schedule: &InvoiceSchedule) -> RepositoryResult<()>;
}

// ==========================================
// InvoiceScheduleRepository
// ==========================================
pub struct InvoiceScheduleRepository<'c> {
    conn: &'c Connection,
}

impl<'c> InvoiceScheduleRepository<'c> {
    /// 绑定到连接或事务（Transaction 可 deref 为 Connection）
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<InvoiceSchedule> {
        let status_raw: String = row.get(3)?;
        let status = status_raw.parse::<ScheduleStatus>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, Type::Text, e.into())
        })?;

        Ok(InvoiceSchedule {
            invoice_schedule_id: row.get(0)?,
            invoice_date: row.get(1)?,
            scheduled_date: row.get(2)?,
            status,
            is_archived: row.get::<_, i32>(4)? != 0,
            remarks: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    /// 统计记录数（测试/工具用）
    pub fn count(&self) -> RepositoryResult<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM invoice_schedule", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    /// 查询全部记录，按开票日升序
    pub fn list_all(&self) -> RepositoryResult<Vec<InvoiceSchedule>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT invoice_schedule_id, invoice_date, scheduled_date, status,
                   is_archived, remarks, created_at, updated_at
            FROM invoice_schedule
            ORDER BY invoice_date ASC, created_at ASC
            "#,
        )?;

        let schedules = stmt
            .query_map([], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(schedules)
    }
}

impl InvoiceScheduleStore for InvoiceScheduleRepository<'_> {
    fn find_by_id(&self, id: &str) -> RepositoryResult<InvoiceSchedule> {
        self.conn
            .query_row(
                r#"
                SELECT invoice_schedule_id, invoice_date, scheduled_date, status,
                       is_archived, remarks, created_at, updated_at
                FROM invoice_schedule
                WHERE invoice_schedule_id = ?1
                "#,
                params![id],
                Self::map_row,
            )
            .optional()?
            .ok_or_else(|| RepositoryError::not_found(ENTITY, id))
    }

    fn create(&self, schedule: &InvoiceSchedule) -> RepositoryResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO invoice_schedule (
                invoice_schedule_id, invoice_date, scheduled_date, status,
                is_archived, remarks, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                schedule.invoice_schedule_id,
                schedule.invoice_date,
                schedule.scheduled_date,
                schedule.status.as_str(),
                schedule.is_archived as i32,
                schedule.remarks,
                schedule.created_at,
                schedule.updated_at,
            ],
        )?;
        Ok(())
    }

    fn update(&self, schedule: &InvoiceSchedule) -> RepositoryResult<()> {
        let rows = self.conn.execute(
            r#"
            UPDATE invoice_schedule
            SET status = ?2, is_archived = ?3, remarks = ?4, updated_at = ?5
            WHERE invoice_schedule_id = ?1
            "#,
            params![
                schedule.invoice_schedule_id,
                schedule.status.as_str(),
                schedule.is_archived as i32,
                schedule.remarks,
                schedule.updated_at,
            ],
        )?;

        if rows == 0 {
            return Err(RepositoryError::not_found(ENTITY, &schedule.invoice_schedule_id));
        }
        Ok(())
    }
}
