// ==========================================
// 主数据导入 - 存储句柄
// ==========================================
// 职责: 持有数据库连接，为每次导入开启一个事务
// 约束: 同一事务句柄不可并发使用；不同导入各自持有事务
// ==========================================

use crate::db::open_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard, };
use tracing::warn;

// ==========================================
// MasterDataStore
// ==========================================
#[derive(Clone)]
pub struct MasterDataStore {
    conn: Arc<Mutex<Connection>>,
}

impl MasterDataStore {
    /// 打开数据库文件并应用统一 PRAGMA
    pub fn open(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseUnavailable(e.to_string()))?;
        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接（独占）
    ///
    /// 调用方在持有的连接上开启事务；guard 释放前不得跨越 await
    ///
    /// 上一个持有者 panic 导致锁中毒时，回滚残留事务后继续使用该连接
    pub fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        match self.conn.lock() {
            Ok(guard) => Ok(guard),
            Err(poisoned) => {
                warn!("连接锁已中毒，回滚残留事务后恢复");
                self.conn.clear_poison();
                let guard = poisoned.into_inner();
                if !guard.is_autocommit() {
                    guard
                        .execute_batch("ROLLBACK")
                        .map_err(|e| RepositoryError::LockError(e.to_string()))?;
                }
                Ok(guard)
            }
        }
    }

    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        self.conn.clone()
    }
}
