// ==========================================
// 主数据导入 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use chrono::FixedOffset;
use std::error::Error;
use std::time::Duration;

/// 开票计划日期校验的严格模式开关
///
/// - 开启: 允许当天（拒绝早于今天）
/// - 关闭: 仅允许未来日期（拒绝今天及以前）
pub const INVOICE_SCHEDULE_ALLOW_PRESENT_DATE: &str = "INVOICE_SCHEDULE_ALLOW_PRESENT_DATE";

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
// 说明: 每次导入只读取一次，之后以普通值向下传递
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取当前运行环境名
    ///
    /// # 默认值
    /// - "local"
    async fn get_environment(&self) -> Result<String, Box<dyn Error + Send + Sync>>;

    /// 获取组织本地时区（固定 UTC 偏移）
    ///
    /// # 默认值
    /// - +09:00
    async fn get_org_utc_offset(&self) -> Result<FixedOffset, Box<dyn Error + Send + Sync>>;

    /// 获取单次导入请求的超时时间
    ///
    /// # 默认值
    /// - 30 秒
    async fn get_request_timeout(&self) -> Result<Duration, Box<dyn Error + Send + Sync>>;

    /// 功能开关查询
    ///
    /// # 参数
    /// - flag: 开关名
    /// - env: 环境名
    ///
    /// # 返回
    /// - 未配置时返回 false
    async fn is_feature_enabled(
        &self,
        flag: &str,
        env: &str,
    ) -> Result<bool, Box<dyn Error + Send + Sync>>;
}
