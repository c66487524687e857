// ==========================================
// 主数据导入 - 开票计划领域模型
// ==========================================
// 职责: 已落库的开票计划实体 + 单行导入后的校验结果
// 不变量: Archived=true ⇒ Status=CANCELLED, 否则 SCHEDULED
// ==========================================

use crate::domain::types::ScheduleStatus;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// InvoiceSchedule - 开票计划（持久化实体）
// ==========================================
// 对齐: invoice_schedule 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceSchedule {
    // ===== 标识字段（导入不可修改）=====
    pub invoice_schedule_id: String,
    pub invoice_date: DateTime<FixedOffset>,   // 组织本地日 00:00
    pub scheduled_date: DateTime<FixedOffset>, // invoice_date + 1 天

    // ===== 可变字段 =====
    pub status: ScheduleStatus,
    pub is_archived: bool,
    pub remarks: String,

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InvoiceSchedule {
    /// 由新建行构造实体
    pub fn new_from_record(id: String, record: &ScheduleRecord, now: DateTime<Utc>) -> Self {
        Self {
            invoice_schedule_id: id,
            invoice_date: record.date,
            scheduled_date: record.scheduled_date,
            status: record.status,
            is_archived: record.archived,
            remarks: record.remarks.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 合并可变字段（is_archived / status / remarks），标识字段保持不变
    pub fn merge_mutable(&self, record: &ScheduleRecord, now: DateTime<Utc>) -> Self {
        Self {
            status: record.status,
            is_archived: record.archived,
            remarks: record.remarks.clone(),
            updated_at: now,
            ..self.clone()
        }
    }
}

// ==========================================
// ScheduleRecord - 单行校验结果
// ==========================================
// 不变量: id 存在 ⇔ 行中提供了 is_archived
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRecord {
    pub id: Option<String>,
    pub date: DateTime<FixedOffset>,
    pub scheduled_date: DateTime<FixedOffset>,
    pub archived: bool,
    pub remarks: String,
    pub status: ScheduleStatus,
}

impl ScheduleRecord {
    /// 由开票日推出计划日（+1 天）；超出可表示范围时返回 None
    pub fn new(
        id: Option<String>,
        date: DateTime<FixedOffset>,
        archived: bool,
        remarks: String,
    ) -> Option<Self> {
        let scheduled_date = date.checked_add_signed(Duration::days(1))?;
        Some(Self {
            id,
            date,
            scheduled_date,
            archived,
            remarks,
            status: ScheduleStatus::from_archived(archived),
        })
    }
}
