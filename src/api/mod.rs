// ==========================================
// 主数据导入 - API 层
// ==========================================
// 职责: 请求级入口（载荷 + 导入类型 → 行错误列表）
// ==========================================

pub mod error;
pub mod import_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use import_api::{ImportApi, ImportCsvError, ImportCsvResponse};
