// ==========================================
// 主数据导入 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含校验逻辑
// ==========================================

pub mod action_log;
pub mod import;
pub mod invoice_schedule;
pub mod partner_bank;
pub mod types;

// 重导出核心类型
pub use action_log::{ActionLog, ActionType};
pub use import::{ImportResult, ImportSummary, RowError, FIRST_DATA_ROW};
pub use invoice_schedule::{InvoiceSchedule, ScheduleRecord};
pub use partner_bank::{PartnerBank, PartnerBankRecord};
pub use types::{DepositItem, ImportKind, ScheduleStatus};
