// ==========================================
// 主数据导入 - 导入接口定义
// ==========================================
// 职责: 定义导入上下文、行处理结果、行导入器与导入器接口
// ==========================================

use crate::domain::action_log::ActionLog;
use crate::domain::import::{ImportResult, RowError};
use crate::domain::types::ImportKind;
use crate::importer::error::{ImportError, ImporterResult};
use crate::importer::header_validator::CsvLine;
use crate::repository::error::RepositoryError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use rusqlite::Connection;
use std::time::Instant;

// ==========================================
// ImportContext - 单次导入的只读上下文
// ==========================================
// 功能开关、时钟等外部输入在导入开始时读取一次，此后按值传递
#[derive(Debug, Clone)]
pub struct ImportContext {
    pub batch_id: String,
    pub actor: String,
    /// 组织本地时区下的“现在”
    pub now: DateTime<FixedOffset>,
    /// 严格模式：允许当天的开票计划
    pub allow_present_date: bool,
    /// 请求截止时间；None 表示不限
    pub deadline: Option<Instant>,
}

impl ImportContext {
    /// 组织本地“今天”的 00:00
    pub fn today_midnight(&self) -> DateTime<FixedOffset> {
        local_midnight(self.now.date_naive(), *self.now.offset())
    }

    pub fn now_utc(&self) -> DateTime<Utc> {
        self.now.with_timezone(&Utc)
    }

    pub fn deadline_exceeded(&self) -> bool {
        self.deadline
            .map(|deadline| Instant::now() >= deadline)
            .unwrap_or(false)
    }
}

/// 指定日期在组织时区下的 00:00
pub fn local_midnight(date: NaiveDate, offset: FixedOffset) -> DateTime<FixedOffset> {
    let local = date.and_time(NaiveTime::MIN);
    let utc = local - Duration::seconds(offset.local_minus_utc() as i64);
    DateTime::from_naive_utc_and_offset(utc, offset)
}

// ==========================================
// RowFailure - 行处理失败
// ==========================================
// Invalid: 收集为行错误，继续处理下一行
// Fatal:   中止导入并回滚
#[derive(Debug)]
pub enum RowFailure {
    Invalid(String),
    Fatal(ImportError),
}

impl From<String> for RowFailure {
    fn from(message: String) -> Self {
        RowFailure::Invalid(message)
    }
}

impl RowFailure {
    /// 仓储错误分类：基础设施错误升级为 Fatal，其余带前缀转为行错误
    pub fn from_repository(err: RepositoryError, context: impl FnOnce(&RepositoryError) -> String) -> Self {
        if err.is_fatal() {
            RowFailure::Fatal(ImportError::from(err))
        } else {
            RowFailure::Invalid(context(&err))
        }
    }
}

// ==========================================
// RowOutcome - 单行处理结果
// ==========================================
#[derive(Debug)]
pub enum RowOutcome {
    /// 已在事务内写入，附带待落库的操作日志
    Applied(ActionLog),
    /// 校验或落库失败
    Rejected(RowError),
}

impl RowOutcome {
    /// 将 RowFailure 折叠为 RowOutcome（Fatal 向上传播）
    pub fn from_failure(row_number: usize, failure: RowFailure) -> ImporterResult<Self> {
        match failure {
            RowFailure::Invalid(message) => Ok(RowOutcome::Rejected(RowError::new(row_number, message))),
            RowFailure::Fatal(err) => Err(err),
        }
    }
}

// ==========================================
// RowImporter Trait
// ==========================================
// 用途: 每种导入类型一个实现（校验 → 决策 → 落库）
// 实现者: InvoiceScheduleRowImporter, PartnerBankRowImporter
pub trait RowImporter: Send + Sync {
    fn kind(&self) -> ImportKind;

    /// 处理单行
    ///
    /// # 参数
    /// - conn: 导入事务（所有读写都在同一事务内）
    /// - line: 已解码的数据行
    /// - ctx: 导入上下文
    ///
    /// # 返回
    /// - Ok(RowOutcome): 行已写入或被拒绝
    /// - Err: 基础设施错误，须中止导入
    fn import_row(
        &self,
        conn: &Connection,
        line: &CsvLine,
        ctx: &ImportContext,
    ) -> ImporterResult<RowOutcome>;
}

// ==========================================
// MasterDataImporter Trait
// ==========================================
// 用途: 主数据导入主接口
// 实现者: MasterDataImporterImpl
#[async_trait]
pub trait MasterDataImporter: Send + Sync {
    /// 导入一份 CSV 载荷
    ///
    /// # 返回
    /// - Ok(ImportResult): errors 为空表示已提交，否则已整体回滚
    /// - Err: 结构错误或基础设施错误
    async fn import(&self, payload: &[u8], kind: ImportKind) -> ImporterResult<ImportResult>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_today_midnight_uses_org_offset() {
        let jst = FixedOffset::east_opt(9 * 3600).unwrap();
        // UTC 2026-10-19 20:00 = JST 2026-10-20 05:00
        let now = Utc
            .with_ymd_and_hms(2026, 10, 19, 20, 0, 0)
            .unwrap()
            .with_timezone(&jst);
        let ctx = ImportContext {
            batch_id: "b".into(),
            actor: "t".into(),
            now,
            allow_present_date: false,
            deadline: None,
        };

        assert_eq!(
            ctx.today_midnight(),
            jst.with_ymd_and_hms(2026, 10, 20, 0, 0, 0).unwrap()
        );
        assert!(!ctx.deadline_exceeded());
    }

    #[test]
    fn test_fatal_repository_error_is_not_collected() {
        let failure = RowFailure::from_repository(
            RepositoryError::DatabaseUnavailable("disk".into()),
            |e| format!("unable to create: {}", e),
        );
        assert!(RowOutcome::from_failure(2, failure).is_err());

        let failure = RowFailure::from_repository(
            RepositoryError::UniqueConstraintViolation("dup".into()),
            |e| format!("unable to create: {}", e),
        );
        match RowOutcome::from_failure(5, failure).unwrap() {
            RowOutcome::Rejected(err) => {
                assert_eq!(err.row_number, 5);
                assert_eq!(err.message, "unable to create: unique constraint violation: dup");
            }
            RowOutcome::Applied(_) => panic!("expected rejection"),
        }
    }
}
