// ==========================================
// 主数据导入 - 配置层
// ==========================================
// 职责: 运行环境、组织时区、请求超时、功能开关
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use import_config_trait::{ImportConfigReader, INVOICE_SCHEDULE_ALLOW_PRESENT_DATE};
