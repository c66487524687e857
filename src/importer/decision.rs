// ==========================================
// 主数据导入 - 决策器
// ==========================================
// 职责: 校验通过的行 → Create / Update / Archive，并执行对应的持久化操作
// 规则: 无 id → Create；有 id → 合并既有记录的可变字段（标识字段不变）
// ==========================================

use crate::domain::action_log::ActionType;
use crate::domain::invoice_schedule::InvoiceSchedule;
use crate::domain::partner_bank::{PartnerBank, PartnerBankRecord};
use crate::importer::importer_trait::{ImportContext, RowFailure};
use crate::importer::schedule_validator::ValidatedSchedule;
use crate::repository::invoice_schedule_repo::InvoiceScheduleStore;
use crate::repository::partner_bank_repo::PartnerBankStore;
use uuid::Uuid;

// ==========================================
// Decision - 单行决策
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum Decision<T> {
    Create(T),
    Update(T),
    Archive(T),
}

impl<T> Decision<T> {
    pub fn action_type(&self) -> ActionType {
        match self {
            Decision::Create(_) => ActionType::Create,
            Decision::Update(_) => ActionType::Update,
            Decision::Archive(_) => ActionType::Archive,
        }
    }

    pub fn target(&self) -> &T {
        match self {
            Decision::Create(t) | Decision::Update(t) | Decision::Archive(t) => t,
        }
    }

    pub fn into_target(self) -> T {
        match self {
            Decision::Create(t) | Decision::Update(t) | Decision::Archive(t) => t,
        }
    }

    fn for_existing(archived: bool, target: T) -> Self {
        if archived {
            Decision::Archive(target)
        } else {
            Decision::Update(target)
        }
    }
}

// ==========================================
// 开票计划
// ==========================================

/// 既有记录已在校验阶段解析，此处只做合并
pub fn resolve_schedule(validated: ValidatedSchedule, ctx: &ImportContext) -> Decision<InvoiceSchedule> {
    let now = ctx.now_utc();
    match validated.existing {
        Some(existing) => Decision::for_existing(
            validated.record.archived,
            existing.merge_mutable(&validated.record, now),
        ),
        None => Decision::Create(InvoiceSchedule::new_from_record(
            Uuid::new_v4().to_string(),
            &validated.record,
            now,
        )),
    }
}

pub fn apply_schedule(
    decision: &Decision<InvoiceSchedule>,
    store: &dyn InvoiceScheduleStore,
) -> Result<(), RowFailure> {
    match decision {
        Decision::Create(schedule) => store.create(schedule).map_err(|e| {
            RowFailure::from_repository(e, |e| format!("unable to create invoice schedule: {}", e))
        }),
        Decision::Update(schedule) | Decision::Archive(schedule) => {
            store.update(schedule).map_err(|e| {
                RowFailure::from_repository(e, |e| {
                    format!("unable to update invoice schedule: {}", e)
                })
            })
        }
    }
}

// ==========================================
// 合作银行
// ==========================================

/// 有 id 时查询既有记录；未找到为行错误
pub fn resolve_partner_bank(
    record: PartnerBankRecord,
    ctx: &ImportContext,
    store: &dyn PartnerBankStore,
) -> Result<Decision<PartnerBank>, RowFailure> {
    let now = ctx.now_utc();
    match record.id.as_deref() {
        None => Ok(Decision::Create(PartnerBank::new_from_record(
            Uuid::new_v4().to_string(),
            &record,
            now,
        ))),
        Some(id) => {
            let existing = store.find_by_id(id).map_err(|e| {
                RowFailure::from_repository(e, |e| {
                    format!("cannot find partner_bank_id with error '{}'", e)
                })
            })?;
            Ok(Decision::for_existing(
                record.archived,
                existing.merge_mutable(&record, now),
            ))
        }
    }
}

pub fn apply_partner_bank(
    decision: &Decision<PartnerBank>,
    store: &dyn PartnerBankStore,
) -> Result<(), RowFailure> {
    match decision {
        Decision::Create(bank) => store.create(bank).map_err(|e| {
            RowFailure::from_repository(e, |e| format!("unable to create partner bank: {}", e))
        }),
        Decision::Update(bank) | Decision::Archive(bank) => store.update(bank).map_err(|e| {
            RowFailure::from_repository(e, |e| format!("unable to update partner bank: {}", e))
        }),
    }
}
