// ==========================================
// 主数据导入 - 合作银行领域模型
// ==========================================
// 职责: 已落库的合作银行实体 + 单行导入后的校验结果
// 不变量: id 存在 ⇔ Archived=true
// ==========================================

use crate::domain::types::DepositItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// PartnerBank - 合作银行（持久化实体）
// ==========================================
// 对齐: partner_bank 表
// 代码类字段保留字符串形式（银行编号等存在前导 0）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerBank {
    pub partner_bank_id: String,
    pub consignor_code: String,
    pub consignor_name: String,
    pub bank_number: String,
    pub bank_name: String,
    pub bank_branch_number: String,
    pub bank_branch_name: String,
    pub deposit_items: DepositItem,
    pub account_number: String,
    pub is_archived: bool,
    pub is_default: bool,
    pub record_limit: i64,
    pub remarks: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PartnerBank {
    pub fn new_from_record(id: String, record: &PartnerBankRecord, now: DateTime<Utc>) -> Self {
        Self {
            partner_bank_id: id,
            consignor_code: record.consignor_code.clone(),
            consignor_name: record.consignor_name.clone(),
            bank_number: record.bank_number.clone(),
            bank_name: record.bank_name.clone(),
            bank_branch_number: record.bank_branch_number.clone(),
            bank_branch_name: record.bank_branch_name.clone(),
            deposit_items: record.deposit_items,
            account_number: record.account_number.clone(),
            is_archived: record.archived,
            is_default: record.is_default,
            record_limit: record.record_limit,
            remarks: record.remarks.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 合并可变字段；partner_bank_id 与 created_at 保持不变
    pub fn merge_mutable(&self, record: &PartnerBankRecord, now: DateTime<Utc>) -> Self {
        Self {
            partner_bank_id: self.partner_bank_id.clone(),
            created_at: self.created_at,
            ..Self::new_from_record(String::new(), record, now)
        }
    }
}

// ==========================================
// PartnerBankRecord - 单行校验结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct PartnerBankRecord {
    pub id: Option<String>,
    pub consignor_code: String,
    pub consignor_name: String,
    pub bank_number: String,
    pub bank_name: String,
    pub bank_branch_number: String,
    pub bank_branch_name: String,
    pub deposit_items: DepositItem,
    pub account_number: String,
    pub archived: bool,
    pub is_default: bool,
    pub record_limit: i64,
    pub remarks: String,
}
