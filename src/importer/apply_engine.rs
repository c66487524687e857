// ==========================================
// 主数据导入 - 事务执行引擎
// ==========================================
// 状态: Open → RowLoop → (Commit | Rollback)
// 红线: 任一行出错则整体回滚，不允许部分落库
// 说明: 行按文件顺序串行处理；后续行可见前序行在同一事务内的写入
// ==========================================

use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::import::{ImportResult, ImportSummary, RowError};
use crate::importer::error::{ImportError, ImporterResult};
use crate::importer::header_validator::CsvLine;
use crate::importer::importer_trait::{ImportContext, RowImporter, RowOutcome};
use crate::repository::action_log_repo::ActionLogRepository;
use rusqlite::{Connection, Transaction};
use tracing::{debug, error, info, warn};

// ==========================================
// ApplyEngine
// ==========================================
pub struct ApplyEngine<'a> {
    importer: &'a dyn RowImporter,
}

impl<'a> ApplyEngine<'a> {
    pub fn new(importer: &'a dyn RowImporter) -> Self {
        Self { importer }
    }

    /// 在单个事务内处理全部数据行
    ///
    /// # 返回
    /// - Ok(ImportResult): errors 为空 ⇒ 已提交；非空 ⇒ 已回滚
    /// - Err: 事务开启/提交失败、存储不可用、超时（均已回滚）
    pub fn run(
        &self,
        conn: &mut Connection,
        lines: &[CsvLine],
        ctx: &ImportContext,
    ) -> ImporterResult<ImportResult> {
        // ===== Open =====
        let tx = conn
            .transaction()
            .map_err(|e| ImportError::DatabaseTransactionError(format!("begin: {}", e)))?;
        debug!(batch_id = %ctx.batch_id, kind = %self.importer.kind(), "事务已开启");

        // ===== RowLoop =====
        let mut errors: Vec<RowError> = Vec::new();
        let mut logs: Vec<ActionLog> = Vec::new();

        for (processed, line) in lines.iter().enumerate() {
            if ctx.deadline_exceeded() {
                warn!(batch_id = %ctx.batch_id, processed_rows = processed, "导入超时，回滚");
                Self::rollback(tx)?;
                return Err(ImportError::DeadlineExceeded {
                    processed_rows: processed,
                });
            }

            match self.importer.import_row(&tx, line, ctx) {
                Ok(RowOutcome::Applied(log)) => logs.push(log),
                Ok(RowOutcome::Rejected(row_error)) => {
                    warn!(
                        row_number = row_error.row_number,
                        error = %row_error.message,
                        "行校验失败"
                    );
                    errors.push(row_error);
                }
                Err(e) => {
                    error!(row_number = line.row_number, error = %e, "致命错误，中止导入");
                    Self::rollback(tx)?;
                    return Err(e);
                }
            }
        }

        // ===== Rollback =====
        if !errors.is_empty() {
            Self::rollback(tx)?;
            info!(
                batch_id = %ctx.batch_id,
                total_rows = lines.len(),
                error_count = errors.len(),
                "存在行错误，事务已回滚"
            );
            return Ok(ImportResult {
                batch_id: ctx.batch_id.clone(),
                errors,
                summary: ImportSummary {
                    total_rows: lines.len(),
                    ..ImportSummary::default()
                },
            });
        }

        // ===== Commit =====
        let summary = Self::summarize(lines.len(), &logs);
        if let Err(e) = ActionLogRepository::new(&tx).batch_insert(&logs) {
            error!(error = %e, "操作日志写入失败");
            Self::rollback(tx)?;
            return Err(ImportError::from(e));
        }
        tx.commit()
            .map_err(|e| ImportError::DatabaseTransactionError(format!("commit: {}", e)))?;

        info!(
            batch_id = %ctx.batch_id,
            total_rows = summary.total_rows,
            created = summary.created,
            updated = summary.updated,
            archived = summary.archived,
            "事务已提交"
        );

        Ok(ImportResult {
            batch_id: ctx.batch_id.clone(),
            errors,
            summary,
        })
    }

    fn rollback(tx: Transaction<'_>) -> ImporterResult<()> {
        tx.rollback()
            .map_err(|e| ImportError::DatabaseTransactionError(format!("rollback: {}", e)))
    }

    fn summarize(total_rows: usize, logs: &[ActionLog]) -> ImportSummary {
        let count = |t: ActionType| logs.iter().filter(|l| l.action_type == t).count();
        ImportSummary {
            total_rows,
            created: count(ActionType::Create),
            updated: count(ActionType::Update),
            archived: count(ActionType::Archive),
        }
    }
}
