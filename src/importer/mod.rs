// ==========================================
// 主数据导入 - 导入层
// ==========================================
// 职责: CSV 载荷 → 表头校验 → 行校验 → 决策 → 事务落库
// 支持: 开票计划 (invoice_schedule), 合作银行 (partner_bank)
// ==========================================

// 模块声明
pub mod apply_engine;
pub mod decision;
pub mod error;
pub mod field_rules;
pub mod header_validator;
pub mod importer_trait;
pub mod master_data_importer;
pub mod partner_bank_validator;
pub mod row_importers;
pub mod schedule_validator;

// 重导出核心类型
pub use apply_engine::ApplyEngine;
pub use decision::Decision;
pub use error::{ImportError, ImporterResult};
pub use header_validator::{header_spec, CsvLine, HeaderValidator};
pub use master_data_importer::MasterDataImporterImpl;
pub use partner_bank_validator::PartnerBankRowValidator;
pub use row_importers::{row_importer_for, InvoiceScheduleRowImporter, PartnerBankRowImporter};
pub use schedule_validator::{ScheduleRowValidator, ValidatedSchedule};

// 重导出 Trait 接口
pub use importer_trait::{ImportContext, MasterDataImporter, RowFailure, RowImporter, RowOutcome};
