// ==========================================
// 主数据导入 - 命令行入口
// ==========================================
// 用法: master-data-import <db_path> <import_type> <csv_path>
// 输出: 响应体 JSON（stdout）；结构错误时退出码非 0
// ==========================================

use anyhow::{bail, Context, Result};
use master_data_import::{db, logging, ImportApi};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 4 {
        bail!("usage: {} <db_path> <import_type> <csv_path>", args[0]);
    }
    let (db_path, import_type, csv_path) = (&args[1], &args[2], &args[3]);

    tracing::info!("==================================================");
    tracing::info!("主数据导入 v{}", master_data_import::VERSION);
    tracing::info!(db_path = %db_path, import_type = %import_type, csv_path = %csv_path);
    tracing::info!("==================================================");

    {
        let conn = db::open_sqlite_connection(db_path)
            .with_context(|| format!("无法打开数据库: {}", db_path))?;
        db::ensure_schema(&conn).context("建表失败")?;
    }

    let payload = tokio::fs::read(csv_path)
        .await
        .with_context(|| format!("无法读取文件: {}", csv_path))?;

    let api = ImportApi::new(db_path)?;
    let response = api.import_csv(payload, import_type).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);

    if !response.errors.is_empty() {
        tracing::warn!(error_count = response.errors.len(), "存在行错误，未写入任何数据");
    }
    Ok(())
}
