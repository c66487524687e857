// ==========================================
// 主数据导入 - 领域类型定义
// ==========================================
// 职责: 导入类型、开票计划状态、存款科目等枚举
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 导入类型 (Import Kind)
// ==========================================
// 每种类型在导入开始时一次性解析为 {表头规格, 行导入器}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportKind {
    InvoiceSchedule,
    PartnerBank,
}

impl ImportKind {
    /// RPC 枚举名，同时作为操作日志的实体名
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportKind::InvoiceSchedule => "invoice_schedule",
            ImportKind::PartnerBank => "partner_bank",
        }
    }
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ImportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "invoice_schedule" => Ok(ImportKind::InvoiceSchedule),
            "partner_bank" => Ok(ImportKind::PartnerBank),
            other => Err(format!("unknown import type: {}", other)),
        }
    }
}

// ==========================================
// 开票计划状态 (Invoice Schedule Status)
// ==========================================
// Archived=true ⇒ CANCELLED, 否则 SCHEDULED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleStatus {
    Scheduled,
    Cancelled,
}

impl ScheduleStatus {
    pub fn from_archived(is_archived: bool) -> Self {
        if is_archived {
            ScheduleStatus::Cancelled
        } else {
            ScheduleStatus::Scheduled
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleStatus::Scheduled => "SCHEDULED",
            ScheduleStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScheduleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SCHEDULED" => Ok(ScheduleStatus::Scheduled),
            "CANCELLED" => Ok(ScheduleStatus::Cancelled),
            other => Err(format!("unknown invoice schedule status: {}", other)),
        }
    }
}

// ==========================================
// 存款科目 (Deposit Item)
// ==========================================
// 全银协格式: 1=普通, 2=当座
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepositItem {
    Ordinary,
    Checking,
}

impl DepositItem {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(DepositItem::Ordinary),
            2 => Some(DepositItem::Checking),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DepositItem::Ordinary => "ORDINARY",
            DepositItem::Checking => "CHECKING",
        }
    }
}

impl FromStr for DepositItem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ORDINARY" => Ok(DepositItem::Ordinary),
            "CHECKING" => Ok(DepositItem::Checking),
            other => Err(format!("unknown deposit item: {}", other)),
        }
    }
}
