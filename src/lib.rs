// ==========================================
// 主数据导入 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 开票计划 / 合作银行 CSV 导入（整批提交或整批回滚）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 校验、决策、事务执行
pub mod importer;

// 配置层 - 环境、时区、功能开关
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 请求入口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DepositItem, ImportKind, ScheduleStatus};

// 领域实体
pub use domain::{
    ActionLog, ActionType, ImportResult, ImportSummary, InvoiceSchedule, PartnerBank, RowError,
};

// 导入器
pub use importer::{ImportError, MasterDataImporter, MasterDataImporterImpl};

// API
pub use api::{ApiError, ImportApi, ImportCsvResponse};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
