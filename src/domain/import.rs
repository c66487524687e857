// ==========================================
// 主数据导入 - 导入结果领域模型
// ==========================================
// 职责: 行错误 / 导入结果
// 约定: errors 为空 ⇔ 已提交；非空 ⇔ 已回滚且零写入
// ==========================================

use serde::{Deserialize, Serialize};

/// 第一条数据行的行号（表头为第 1 行）
pub const FIRST_DATA_ROW: usize = 2;

// ==========================================
// RowError - 行错误
// ==========================================
// 校验失败与落库失败同构，调用方只能通过 message 区分
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    pub row_number: usize,
    pub message: String,
}

impl RowError {
    pub fn new(row_number: usize, message: impl Into<String>) -> Self {
        Self {
            row_number,
            message: message.into(),
        }
    }
}

// ==========================================
// ImportSummary - 导入汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total_rows: usize,
    pub created: usize,
    pub updated: usize,
    pub archived: usize,
}

// ==========================================
// ImportResult - 导入结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    pub batch_id: String,
    /// 按行号严格递增
    pub errors: Vec<RowError>,
    /// 回滚时各计数为 0
    pub summary: ImportSummary,
}

impl ImportResult {
    pub fn is_committed(&self) -> bool {
        self.errors.is_empty()
    }
}
