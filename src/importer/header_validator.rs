// ==========================================
// 主数据导入 - CSV 解码与表头校验
// ==========================================
// 阶段 0: 载荷解码 → 非空检查 → 列数检查 → 列名逐列检查
// 说明: 此阶段的失败均为请求级错误，不开启事务、不处理任何行
// ==========================================

use crate::domain::import::FIRST_DATA_ROW;
use crate::domain::types::ImportKind;
use crate::importer::error::{ImportError, ImporterResult};
use csv::ReaderBuilder;
use tracing::debug;

/// 开票计划表头
pub const INVOICE_SCHEDULE_HEADER: &[&str] = &["schedule_id", "date", "is_archived", "remarks"];

/// 合作银行表头
pub const PARTNER_BANK_HEADER: &[&str] = &[
    "partner_bank_id",
    "consignor_code",
    "consignor_name",
    "bank_number",
    "bank_name",
    "bank_branch_number",
    "bank_branch_name",
    "deposit_items",
    "account_number",
    "is_archived",
    "remarks",
    "is_default",
    "record_limit",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const ORDINALS: &[&str] = &[
    "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth",
    "tenth", "eleventh", "twelfth", "thirteenth", "fourteenth", "fifteenth",
];

/// 每种导入类型对应的表头规格
pub fn header_spec(kind: ImportKind) -> &'static [&'static str] {
    match kind {
        ImportKind::InvoiceSchedule => INVOICE_SCHEDULE_HEADER,
        ImportKind::PartnerBank => PARTNER_BANK_HEADER,
    }
}

/// 列序号的英文序数词（0 起）
pub fn ordinal(index: usize) -> String {
    ORDINALS
        .get(index)
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("{}th", index + 1))
}

// ==========================================
// CsvLine - 已解码的数据行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvLine {
    /// 源文件行号（表头为 1）
    pub row_number: usize,
    pub cells: Vec<String>,
}

impl CsvLine {
    /// 按列序号取单元格；越界时返回空串
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }
}

// ==========================================
// HeaderValidator
// ==========================================
pub struct HeaderValidator;

impl HeaderValidator {
    /// 解码 CSV 载荷为行列表（含表头）
    ///
    /// 不允许行长度不一致（由 csv 解码器报告）
    pub fn decode(payload: &[u8]) -> ImporterResult<Vec<Vec<String>>> {
        let payload = payload.strip_prefix(UTF8_BOM).unwrap_or(payload);

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(false)
            .from_reader(payload);

        let mut lines = Vec::new();
        for result in reader.records() {
            let record = result?;
            lines.push(record.iter().map(|cell| cell.to_string()).collect());
        }
        Ok(lines)
    }

    /// 校验载荷并返回数据行（不含表头）
    ///
    /// # 错误
    /// - EmptyData: 无内容或仅有表头
    /// - InvalidFormat: 解码失败 / 列数不符 / 列名不符
    pub fn validate(payload: &[u8], kind: ImportKind) -> ImporterResult<Vec<CsvLine>> {
        if payload.is_empty() {
            return Err(ImportError::EmptyData);
        }

        let mut lines = Self::decode(payload)?;
        if lines.len() < 2 {
            return Err(ImportError::EmptyData);
        }

        let expected = header_spec(kind);
        let header = lines.remove(0);
        Self::check_header(&header, expected)?;

        debug!(kind = %kind, data_rows = lines.len(), "表头校验通过");

        Ok(lines
            .into_iter()
            .enumerate()
            .map(|(idx, cells)| CsvLine {
                row_number: idx + FIRST_DATA_ROW,
                cells,
            })
            .collect())
    }

    /// 列数与列名（大小写不敏感）逐列比较，报告第一个不符的列
    pub fn check_header(header: &[String], expected: &[&str]) -> ImporterResult<()> {
        if header.len() != expected.len() {
            return Err(ImportError::InvalidFormat(format!(
                "number of columns should be {}",
                expected.len()
            )));
        }

        for (idx, (actual, name)) in header.iter().zip(expected.iter()).enumerate() {
            if !actual.trim().eq_ignore_ascii_case(name) {
                return Err(ImportError::InvalidFormat(format!(
                    "{} column (toLowerCase) should be '{}'",
                    ordinal(idx),
                    name
                )));
            }
        }
        Ok(())
    }
}
