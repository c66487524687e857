// ==========================================
// 主数据导入 - 导入编排器
// ==========================================
// 流程: 表头校验 → 读取配置（一次）→ 构造上下文 → 事务执行
// 说明: 表头失败时不开启事务；行处理在阻塞线程池中同步执行
// ==========================================

use crate::config::{ImportConfigReader, INVOICE_SCHEDULE_ALLOW_PRESENT_DATE};
use crate::domain::import::ImportResult;
use crate::domain::types::ImportKind;
use crate::importer::apply_engine::ApplyEngine;
use crate::importer::error::{ImportError, ImporterResult};
use crate::importer::header_validator::{CsvLine, HeaderValidator};
use crate::importer::importer_trait::{ImportContext, MasterDataImporter};
use crate::importer::row_importers::row_importer_for;
use crate::repository::master_data_store::MasterDataStore;
use async_trait::async_trait;
use chrono::Utc;
use std::time::Instant;
use tracing::{error, info, instrument};
use uuid::Uuid;

/// 未指定操作人时写入操作日志的默认值
pub const DEFAULT_ACTOR: &str = "system";

// ==========================================
// MasterDataImporterImpl
// ==========================================
pub struct MasterDataImporterImpl<C>
where
    C: ImportConfigReader,
{
    store: MasterDataStore,
    config: C,
    actor: String,
}

impl<C> MasterDataImporterImpl<C>
where
    C: ImportConfigReader,
{
    /// # 参数
    /// - store: 存储句柄（每次导入开启独立事务）
    /// - config: 配置读取器
    pub fn new(store: MasterDataStore, config: C) -> Self {
        Self {
            store,
            config,
            actor: DEFAULT_ACTOR.to_string(),
        }
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }

    /// 读取本次导入所需的全部外部输入，之后以普通值传递
    pub async fn build_context(&self) -> ImporterResult<ImportContext> {
        let env = self
            .config
            .get_environment()
            .await
            .map_err(|e| ImportError::ConfigReadError(e.to_string()))?;
        let allow_present_date = self
            .config
            .is_feature_enabled(INVOICE_SCHEDULE_ALLOW_PRESENT_DATE, &env)
            .await
            .map_err(|e| ImportError::ConfigReadError(e.to_string()))?;
        let offset = self
            .config
            .get_org_utc_offset()
            .await
            .map_err(|e| ImportError::ConfigReadError(e.to_string()))?;
        let timeout = self
            .config
            .get_request_timeout()
            .await
            .map_err(|e| ImportError::ConfigReadError(e.to_string()))?;

        Ok(ImportContext {
            batch_id: Uuid::new_v4().to_string(),
            actor: self.actor.clone(),
            now: Utc::now().with_timezone(&offset),
            allow_present_date,
            deadline: Instant::now().checked_add(timeout),
        })
    }

    /// 使用给定上下文同步执行导入（测试可固定“现在”）
    pub fn import_with_context(
        &self,
        payload: &[u8],
        kind: ImportKind,
        ctx: &ImportContext,
    ) -> ImporterResult<ImportResult> {
        let lines = HeaderValidator::validate(payload, kind)?;
        run_lines(&self.store, kind, &lines, ctx)
    }
}

/// 取得连接并在单个事务内执行全部数据行
fn run_lines(
    store: &MasterDataStore,
    kind: ImportKind,
    lines: &[CsvLine],
    ctx: &ImportContext,
) -> ImporterResult<ImportResult> {
    let importer = row_importer_for(kind);
    let mut conn = store.get_conn()?;
    ApplyEngine::new(importer.as_ref()).run(&mut conn, lines, ctx)
}

#[async_trait]
impl<C> MasterDataImporter for MasterDataImporterImpl<C>
where
    C: ImportConfigReader,
{
    #[instrument(skip(self, payload), fields(kind = %kind, payload_bytes = payload.len()))]
    async fn import(&self, payload: &[u8], kind: ImportKind) -> ImporterResult<ImportResult> {
        let lines = HeaderValidator::validate(payload, kind).map_err(|e| {
            error!(error = %e, "表头校验失败");
            e
        })?;

        let ctx = self.build_context().await?;
        info!(
            batch_id = %ctx.batch_id,
            data_rows = lines.len(),
            allow_present_date = ctx.allow_present_date,
            "开始导入主数据"
        );

        let store = self.store.clone();
        tokio::task::spawn_blocking(move || run_lines(&store, kind, &lines, &ctx))
            .await
            .map_err(|e| ImportError::InternalError(format!("import task failed: {}", e)))?
    }
}
