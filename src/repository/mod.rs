// ==========================================
// 主数据导入 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod action_log_repo;
pub mod error;
pub mod invoice_schedule_repo;
pub mod master_data_store;
pub mod partner_bank_repo;

// 重导出核心仓储
pub use action_log_repo::ActionLogRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use invoice_schedule_repo::{InvoiceScheduleRepository, InvoiceScheduleStore};
pub use master_data_store::MasterDataStore;
pub use partner_bank_repo::{PartnerBankRepository, PartnerBankStore};
