// ==========================================
// 主数据导入 - 合作银行行校验器
// ==========================================
// 列: 见 PARTNER_BANK_HEADER（13 列）
// 规则按顺序执行，首个失败即返回
// ==========================================

use crate::domain::partner_bank::PartnerBankRecord;
use crate::domain::types::DepositItem;
use crate::importer::field_rules::{
    check_half_width_number, check_half_width_text, is_half_width_digits, parse_bool_flag,
    parse_non_negative_int,
};
use crate::importer::header_validator::{CsvLine, PARTNER_BANK_HEADER};

const COL_PARTNER_BANK_ID: usize = 0;
const COL_CONSIGNOR_CODE: usize = 1;
const COL_CONSIGNOR_NAME: usize = 2;
const COL_BANK_NUMBER: usize = 3;
const COL_BANK_NAME: usize = 4;
const COL_BANK_BRANCH_NUMBER: usize = 5;
const COL_BANK_BRANCH_NAME: usize = 6;
const COL_DEPOSIT_ITEMS: usize = 7;
const COL_ACCOUNT_NUMBER: usize = 8;
const COL_IS_ARCHIVED: usize = 9;
const COL_REMARKS: usize = 10;
const COL_IS_DEFAULT: usize = 11;
const COL_RECORD_LIMIT: usize = 12;

/// 可为空的列
const OPTIONAL_COLUMNS: &[usize] = &[
    COL_PARTNER_BANK_ID,
    COL_IS_ARCHIVED,
    COL_REMARKS,
    COL_IS_DEFAULT,
    COL_RECORD_LIMIT,
];

const ACCOUNT_NUMBER_LEN: usize = 7;

// ==========================================
// PartnerBankRowValidator
// ==========================================
// 纯校验，不访问存储；partner_bank_id 的存在性由决策阶段查询
pub struct PartnerBankRowValidator;

impl PartnerBankRowValidator {
    pub fn validate(&self, line: &CsvLine) -> Result<PartnerBankRecord, String> {
        // 1. 列数
        if line.cells.len() != PARTNER_BANK_HEADER.len() {
            return Err(format!(
                "number of columns should be {}",
                PARTNER_BANK_HEADER.len()
            ));
        }

        // 2. 必填
        for (idx, name) in PARTNER_BANK_HEADER.iter().enumerate() {
            if OPTIONAL_COLUMNS.contains(&idx) {
                continue;
            }
            if line.cell(idx).trim().is_empty() {
                return Err(format!("field {} is required", name));
            }
        }

        // 3. is_archived
        let archived = parse_bool_flag(line.cell(COL_IS_ARCHIVED), "IsArchived")?;

        // 4. partner_bank_id ⇔ is_archived=true
        let partner_bank_id = line.cell(COL_PARTNER_BANK_ID).trim();
        if partner_bank_id.is_empty() == archived {
            return Err(
                "partner_bank_id and is_archived can only be both present or absent".to_string(),
            );
        }

        // 5-10. 编号/名称类字段
        let consignor_code =
            check_half_width_number(line.cell(COL_CONSIGNOR_CODE), "consignor code", 10)?;
        let consignor_name =
            check_half_width_text(line.cell(COL_CONSIGNOR_NAME), "consignor name", 40)?;
        let bank_number = check_half_width_number(line.cell(COL_BANK_NUMBER), "bank number", 4)?;
        let bank_name = check_half_width_text(line.cell(COL_BANK_NAME), "bank name", 15)?;
        let bank_branch_number =
            check_half_width_number(line.cell(COL_BANK_BRANCH_NUMBER), "bank branch number", 3)?;
        let bank_branch_name =
            check_half_width_text(line.cell(COL_BANK_BRANCH_NAME), "bank branch name", 15)?;

        // 11. 存款科目
        let deposit_items = Self::check_deposit_items(line.cell(COL_DEPOSIT_ITEMS))?;

        // 12. 账号
        let account_number = Self::check_account_number(line.cell(COL_ACCOUNT_NUMBER))?;

        // 13-14
        let is_default = parse_bool_flag(line.cell(COL_IS_DEFAULT), "IsDefault")?;
        let record_limit = parse_non_negative_int(line.cell(COL_RECORD_LIMIT), "RecordLimit")?;

        Ok(PartnerBankRecord {
            id: if archived {
                Some(partner_bank_id.to_string())
            } else {
                None
            },
            consignor_code,
            consignor_name,
            bank_number,
            bank_name,
            bank_branch_number,
            bank_branch_name,
            deposit_items,
            account_number,
            archived,
            is_default,
            record_limit,
            remarks: line.cell(COL_REMARKS).trim().to_string(),
        })
    }

    fn check_deposit_items(value: &str) -> Result<DepositItem, String> {
        let digits = check_half_width_number(value, "deposit items", 1)?;
        digits
            .parse::<i64>()
            .ok()
            .and_then(DepositItem::from_code)
            .ok_or_else(|| "invalid deposit items account".to_string())
    }

    fn check_account_number(value: &str) -> Result<String, String> {
        let value = value.trim();
        if !is_half_width_digits(value) {
            return Err("account number field has invalid half width number".to_string());
        }
        if value.chars().count() != ACCOUNT_NUMBER_LEN {
            return Err("the account number can only accept 7 digit numbers".to_string());
        }
        Ok(value.to_string())
    }
}
