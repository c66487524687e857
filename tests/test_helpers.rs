// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库、CSV 载荷构造、固定时钟的导入上下文
// ==========================================

#![allow(dead_code)]

use chrono::{FixedOffset, TimeZone};
use master_data_import::config::{ImportConfigReader, INVOICE_SCHEDULE_ALLOW_PRESENT_DATE};
use master_data_import::db::{ensure_schema, open_sqlite_connection};
use master_data_import::importer::ImportContext;
use master_data_import::repository::MasterDataStore;
use std::error::Error;
use std::time::Duration;
use tempfile::NamedTempFile;

pub const SCHEDULE_HEADER: &str = "schedule_id,date,is_archived,remarks";

pub const PARTNER_BANK_HEADER: &str = "partner_bank_id,consignor_code,consignor_name,bank_number,bank_name,bank_branch_number,bank_branch_name,deposit_items,account_number,is_archived,remarks,is_default,record_limit";

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("temp path is not utf-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    ensure_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开存储句柄
pub fn open_store(db_path: &str) -> MasterDataStore {
    MasterDataStore::open(db_path).expect("Failed to open store")
}

/// 拼接 CSV 载荷（表头 + 数据行）
pub fn csv_payload<S: AsRef<str>>(header: &str, rows: &[S]) -> Vec<u8> {
    let mut text = String::from(header);
    text.push('\n');
    for row in rows {
        text.push_str(row.as_ref());
        text.push('\n');
    }
    text.into_bytes()
}

pub fn jst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).expect("valid offset")
}

/// 固定“现在”为 JST 2026-10-19 10:00 的导入上下文
pub fn fixed_context(allow_present_date: bool) -> ImportContext {
    ImportContext {
        batch_id: uuid::Uuid::new_v4().to_string(),
        actor: "test_user".to_string(),
        now: jst()
            .with_ymd_and_hms(2026, 10, 19, 10, 0, 0)
            .single()
            .expect("valid time"),
        allow_present_date,
        deadline: None,
    }
}

/// 合作银行的有效数据行（可覆盖 id / is_archived / account_number）
pub fn partner_bank_row(partner_bank_id: &str, is_archived: &str, account_number: &str) -> String {
    format!(
        "{},1234567890,ｶ)ﾃｽﾄ ｼｮｳｼﾞ,0001,ﾐｽﾞﾎ,001,ﾎﾝﾃﾝ,1,{},{},memo,false,10",
        partner_bank_id, account_number, is_archived
    )
}

// ==========================================
// MockConfigReader - 测试用配置读取器
// ==========================================
pub struct MockConfigReader {
    pub allow_present_date: bool,
    pub request_timeout: Duration,
}

impl Default for MockConfigReader {
    fn default() -> Self {
        Self {
            allow_present_date: false,
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[async_trait::async_trait]
impl ImportConfigReader for MockConfigReader {
    async fn get_environment(&self) -> Result<String, Box<dyn Error + Send + Sync>> {
        Ok("test".to_string())
    }

    async fn get_org_utc_offset(&self) -> Result<FixedOffset, Box<dyn Error + Send + Sync>> {
        Ok(jst())
    }

    async fn get_request_timeout(&self) -> Result<Duration, Box<dyn Error + Send + Sync>> {
        Ok(self.request_timeout)
    }

    async fn is_feature_enabled(
        &self,
        flag: &str,
        env: &str,
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        Ok(flag == INVOICE_SCHEDULE_ALLOW_PRESENT_DATE && env == "test" && self.allow_present_date)
    }
}
