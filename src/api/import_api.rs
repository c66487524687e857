// ==========================================
// 主数据导入 API
// ==========================================
// 契约: Import(payload, importType) → {errors: [{row_number, error}]}
// - 结构错误 → Err(ApiError::InvalidArgument)
// - 其余结果 → Ok（errors 可能为空）
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::import::{ImportResult, ImportSummary};
use crate::domain::types::ImportKind;
use crate::importer::error::ImportError;
use crate::importer::{MasterDataImporter, MasterDataImporterImpl};
use crate::repository::master_data_store::MasterDataStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// 单行错误（响应体）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportCsvError {
    pub row_number: i32,
    pub error: String,
}

/// 导入响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportCsvResponse {
    /// 为空表示全部提交
    pub errors: Vec<ImportCsvError>,
    pub batch_id: String,
    pub summary: ImportSummary,
}

impl From<ImportResult> for ImportCsvResponse {
    fn from(result: ImportResult) -> Self {
        Self {
            errors: result
                .errors
                .into_iter()
                .map(|e| ImportCsvError {
                    row_number: i32::try_from(e.row_number).unwrap_or(i32::MAX),
                    error: e.message,
                })
                .collect(),
            batch_id: result.batch_id,
            summary: result.summary,
        }
    }
}

/// 导入 API
pub struct ImportApi {
    importer: Arc<dyn MasterDataImporter>,
}

impl ImportApi {
    /// 以数据库文件创建
    ///
    /// 配置读取使用独立连接，导入事务持有存储连接期间不影响其他请求读取配置
    pub fn new(db_path: &str) -> ApiResult<Self> {
        let store = MasterDataStore::open(db_path)?;
        let config = ConfigManager::new(db_path)
            .map_err(|e| ApiError::InternalError(format!("配置初始化失败: {}", e)))?;
        Ok(Self::with_importer(Arc::new(MasterDataImporterImpl::new(
            store, config,
        ))))
    }

    pub fn with_importer(importer: Arc<dyn MasterDataImporter>) -> Self {
        Self { importer }
    }

    /// 导入 CSV 载荷
    ///
    /// # 参数
    /// - payload: CSV 原文
    /// - import_type: invoice_schedule / partner_bank
    #[instrument(skip(self, payload), fields(payload_bytes = payload.len()))]
    pub async fn import_csv(
        &self,
        payload: Vec<u8>,
        import_type: &str,
    ) -> ApiResult<ImportCsvResponse> {
        let kind: ImportKind = import_type
            .parse()
            .map_err(|_| ImportError::UnknownImportType(import_type.to_string()))?;

        let result = self.importer.import(&payload, kind).await?;
        info!(
            batch_id = %result.batch_id,
            committed = result.is_committed(),
            error_count = result.errors.len(),
            "导入请求完成"
        );
        Ok(ImportCsvResponse::from(result))
    }
}
