// ==========================================
// 主数据导入 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 仅包含请求级错误（结构错误 / 基础设施错误）
//       行级错误不走此类型，统一收集为 RowError
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 结构错误（不开启事务）=====
    #[error("No data in CSV file")]
    EmptyData,

    #[error("Invalid CSV format: {0}")]
    InvalidFormat(String),

    #[error("unknown import type: {0}")]
    UnknownImportType(String),

    // ===== 基础设施错误（事务回滚）=====
    #[error("database unavailable: {0}")]
    DatabaseUnavailable(String),

    #[error("database transaction failed: {0}")]
    DatabaseTransactionError(String),

    #[error("import deadline exceeded after {processed_rows} rows")]
    DeadlineExceeded { processed_rows: usize },

    #[error("config read failed: {0}")]
    ConfigReadError(String),

    // ===== 通用错误 =====
    #[error("internal error: {0}")]
    InternalError(String),
}

impl ImportError {
    /// 结构错误：请求本身不合法，未做任何处理
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ImportError::EmptyData
                | ImportError::InvalidFormat(_)
                | ImportError::UnknownImportType(_)
        )
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::InvalidFormat(err.to_string())
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for ImportError {
    fn from(err: rusqlite::Error) -> Self {
        ImportError::from(RepositoryError::from(err))
    }
}

// 实现 From<RepositoryError>
impl From<RepositoryError> for ImportError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DatabaseUnavailable(msg) => ImportError::DatabaseUnavailable(msg),
            RepositoryError::LockError(msg) => {
                ImportError::DatabaseUnavailable(format!("lock: {}", msg))
            }
            RepositoryError::DatabaseTransactionError(msg) => {
                ImportError::DatabaseTransactionError(msg)
            }
            other => ImportError::DatabaseTransactionError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ImporterResult<T> = Result<T, ImportError>;
