// ==========================================
// 主数据导入 - 开票计划行校验器
// ==========================================
// 列: schedule_id, date, is_archived, remarks
// 规则按顺序执行，首个失败即返回
// ==========================================

use crate::domain::invoice_schedule::{InvoiceSchedule, ScheduleRecord};
use crate::importer::field_rules::parse_bool_flag;
use crate::importer::header_validator::CsvLine;
use crate::importer::importer_trait::{local_midnight, ImportContext, RowFailure};
use crate::repository::invoice_schedule_repo::InvoiceScheduleStore;
use chrono::NaiveDate;

const COL_SCHEDULE_ID: usize = 0;
const COL_DATE: usize = 1;
const COL_IS_ARCHIVED: usize = 2;
const COL_REMARKS: usize = 3;

const DATE_FORMAT: &str = "%Y/%m/%d";

// ==========================================
// ValidatedSchedule - 校验通过的行
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSchedule {
    pub record: ScheduleRecord,
    /// 行中带 schedule_id 时解析到的既有记录
    pub existing: Option<InvoiceSchedule>,
}

// ==========================================
// ScheduleRowValidator
// ==========================================
pub struct ScheduleRowValidator;

impl ScheduleRowValidator {
    /// 校验单行
    ///
    /// # 参数
    /// - line: 数据行
    /// - ctx: 导入上下文（“今天”与严格模式开关）
    /// - store: 既有开票计划查询（同一事务内）
    pub fn validate(
        &self,
        line: &CsvLine,
        ctx: &ImportContext,
        store: &dyn InvoiceScheduleStore,
    ) -> Result<ValidatedSchedule, RowFailure> {
        let schedule_id = line.cell(COL_SCHEDULE_ID).trim();
        let date_raw = line.cell(COL_DATE).trim();
        let is_archived_raw = line.cell(COL_IS_ARCHIVED).trim();
        let remarks = line.cell(COL_REMARKS).trim().to_string();

        // 1. schedule_id 与 is_archived 同时存在或同时缺失
        if schedule_id.is_empty() != is_archived_raw.is_empty() {
            return Err(RowFailure::Invalid(
                "schedule_id and is_archived can only be both present or absent".to_string(),
            ));
        }

        // 2. 新建行必须带日期
        if schedule_id.is_empty() && date_raw.is_empty() {
            return Err(RowFailure::Invalid("invoice date is required".to_string()));
        }

        // 3. 日期格式与时间窗
        let date = if date_raw.is_empty() {
            None
        } else {
            Some(self.validate_date(date_raw, ctx)?)
        };

        // 4. is_archived
        let archived = parse_bool_flag(is_archived_raw, "IsArchived")?;

        // 5. schedule_id 必须可解析
        let existing = if schedule_id.is_empty() {
            None
        } else {
            let found = store.find_by_id(schedule_id).map_err(|e| {
                RowFailure::from_repository(e, |e| {
                    format!("cannot find invoice_schedule_id with error '{}'", e)
                })
            })?;
            Some(found)
        };

        let date = match (date, &existing) {
            (Some(date), _) => date,
            (None, Some(existing)) => existing.invoice_date,
            // 规则 2 已排除
            (None, None) => {
                return Err(RowFailure::Invalid("invoice date is required".to_string()))
            }
        };

        let record = ScheduleRecord::new(
            existing.as_ref().map(|s| s.invoice_schedule_id.clone()),
            date,
            archived,
            remarks,
        )
        .ok_or_else(|| RowFailure::Invalid("invalid date format".to_string()))?;

        Ok(ValidatedSchedule { record, existing })
    }

    /// 解析 YYYY/MM/DD 并按组织时区 00:00 与“今天”比较
    ///
    /// - 严格模式: 拒绝早于今天
    /// - 非严格模式: 拒绝今天及以前
    fn validate_date(
        &self,
        raw: &str,
        ctx: &ImportContext,
    ) -> Result<chrono::DateTime<chrono::FixedOffset>, RowFailure> {
        if !is_date_shape(raw) {
            return Err(RowFailure::Invalid("invalid date format".to_string()));
        }
        let naive = NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map_err(|_| RowFailure::Invalid("invalid date format".to_string()))?;

        let date = local_midnight(naive, *ctx.now.offset());
        let today = ctx.today_midnight();

        if ctx.allow_present_date {
            if date < today {
                return Err(RowFailure::Invalid(
                    "invoice schedule should be a present date or future date".to_string(),
                ));
            }
        } else if date <= today {
            return Err(RowFailure::Invalid(
                "invoice schedule should be a future date".to_string(),
            ));
        }

        Ok(date)
    }
}

/// 严格的 YYYY/MM/DD: 10 个字符，第 5、8 位为 '/'，其余为 ASCII 数字
fn is_date_shape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'/',
            _ => b.is_ascii_digit(),
        })
}
