// ==========================================
// 主数据导入 - 行导入器
// ==========================================
// 每种 ImportKind 一个实现: 校验 → 决策 → 落库 → 生成操作日志
// ==========================================

use crate::domain::action_log::ActionLog;
use crate::domain::types::ImportKind;
use crate::importer::decision::{
    apply_partner_bank, apply_schedule, resolve_partner_bank, resolve_schedule, Decision,
};
use crate::importer::error::{ImportError, ImporterResult};
use crate::importer::header_validator::CsvLine;
use crate::importer::importer_trait::{ImportContext, RowFailure, RowImporter, RowOutcome};
use crate::importer::partner_bank_validator::PartnerBankRowValidator;
use crate::importer::schedule_validator::ScheduleRowValidator;
use crate::repository::invoice_schedule_repo::InvoiceScheduleRepository;
use crate::repository::partner_bank_repo::PartnerBankRepository;
use rusqlite::Connection;
use serde::Serialize;
use uuid::Uuid;

/// 按导入类型选择行导入器
pub fn row_importer_for(kind: ImportKind) -> Box<dyn RowImporter> {
    match kind {
        ImportKind::InvoiceSchedule => Box::new(InvoiceScheduleRowImporter),
        ImportKind::PartnerBank => Box::new(PartnerBankRowImporter),
    }
}

/// 由已落库的决策构造操作日志（payload 为写入后镜像）
///
/// 镜像无法序列化时中止导入，避免写入缺少 payload 的审计记录
fn action_log_for<T: Serialize>(
    kind: ImportKind,
    entity_id: &str,
    decision: &Decision<T>,
    line: &CsvLine,
    ctx: &ImportContext,
) -> Result<ActionLog, RowFailure> {
    let payload = serde_json::to_value(decision.target()).map_err(|e| {
        RowFailure::Fatal(ImportError::InternalError(format!(
            "row {}: action log payload serialization failed: {}",
            line.row_number, e
        )))
    })?;

    Ok(ActionLog {
        action_id: Uuid::new_v4().to_string(),
        batch_id: ctx.batch_id.clone(),
        action_type: decision.action_type(),
        entity: kind.as_str().to_string(),
        entity_id: entity_id.to_string(),
        row_number: line.row_number,
        actor: ctx.actor.clone(),
        action_ts: ctx.now_utc(),
        payload_json: Some(payload),
    })
}

// ==========================================
// InvoiceScheduleRowImporter
// ==========================================
pub struct InvoiceScheduleRowImporter;

impl InvoiceScheduleRowImporter {
    fn process(
        &self,
        conn: &Connection,
        line: &CsvLine,
        ctx: &ImportContext,
    ) -> Result<ActionLog, RowFailure> {
        let repo = InvoiceScheduleRepository::new(conn);
        let validated = ScheduleRowValidator.validate(line, ctx, &repo)?;
        let decision = resolve_schedule(validated, ctx);
        apply_schedule(&decision, &repo)?;

        action_log_for(
            self.kind(),
            &decision.target().invoice_schedule_id,
            &decision,
            line,
            ctx,
        )
    }
}

impl RowImporter for InvoiceScheduleRowImporter {
    fn kind(&self) -> ImportKind {
        ImportKind::InvoiceSchedule
    }

    fn import_row(
        &self,
        conn: &Connection,
        line: &CsvLine,
        ctx: &ImportContext,
    ) -> ImporterResult<RowOutcome> {
        match self.process(conn, line, ctx) {
            Ok(log) => Ok(RowOutcome::Applied(log)),
            Err(failure) => RowOutcome::from_failure(line.row_number, failure),
        }
    }
}

// ==========================================
// PartnerBankRowImporter
// ==========================================
pub struct PartnerBankRowImporter;

impl PartnerBankRowImporter {
    fn process(
        &self,
        conn: &Connection,
        line: &CsvLine,
        ctx: &ImportContext,
    ) -> Result<ActionLog, RowFailure> {
        let repo = PartnerBankRepository::new(conn);
        let record = PartnerBankRowValidator.validate(line)?;
        let decision = resolve_partner_bank(record, ctx, &repo)?;
        apply_partner_bank(&decision, &repo)?;

        action_log_for(
            self.kind(),
            &decision.target().partner_bank_id,
            &decision,
            line,
            ctx,
        )
    }
}

impl RowImporter for PartnerBankRowImporter {
    fn kind(&self) -> ImportKind {
        ImportKind::PartnerBank
    }

    fn import_row(
        &self,
        conn: &Connection,
        line: &CsvLine,
        ctx: &ImportContext,
    ) -> ImporterResult<RowOutcome> {
        match self.process(conn, line, ctx) {
            Ok(log) => Ok(RowOutcome::Applied(log)),
            Err(failure) => RowOutcome::from_failure(line.row_number, failure),
        }
    }
}
