// ==========================================
// 主数据导入 - 合作银行数据仓储
// ==========================================
// 对齐: partner_bank 表
// 红线: Repository 不含业务逻辑，只做数据映射
// ==========================================

use crate::domain::partner_bank::PartnerBank;
use crate::domain::types::DepositItem;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

const ENTITY: &str = "partner_bank";

const SELECT_COLUMNS: &str = r#"
    SELECT partner_bank_id, consignor_code, consignor_name, bank_number, bank_name,
           bank_branch_number, bank_branch_name, deposit_items, account_number,
           is_archived, is_default, record_limit, remarks, created_at, updated_at
    FROM partner_bank
"#;

// ==========================================
// PartnerBankStore Trait
// ==========================================
// 实现者: PartnerBankRepository
pub trait PartnerBankStore {
    fn find_by_id(&self, id: &str) -> RepositoryResult<PartnerBank>;

    fn create(&self, bank: &PartnerBank) -> RepositoryResult<()>;

    fn update(&self, bank: &PartnerBank) -> RepositoryResult<()>;
}

// ==========================================
// PartnerBankRepository
// ==========================================
pub struct PartnerBankRepository<'c> {
    conn: &'c Connection,
}

impl<'c> PartnerBankRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<PartnerBank> {
        let deposit_raw: String = row.get(7)?;
        let deposit_items = deposit_raw.parse::<DepositItem>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(7, Type::Text, e.into())
        })?;

        Ok(PartnerBank {
            partner_bank_id: row.get(0)?,
            consignor_code: row.get(1)?,
            consignor_name: row.get(2)?,
            bank_number: row.get(3)?,
            bank_name: row.get(4)?,
            bank_branch_number: row.get(5)?,
            bank_branch_name: row.get(6)?,
            deposit_items,
            account_number: row.get(8)?,
            is_archived: row.get::<_, i32>(9)? != 0,
            is_default: row.get::<_, i32>(10)? != 0,
            record_limit: row.get(11)?,
            remarks: row.get(12)?,
            created_at: row.get(13)?,
            updated_at: row.get(14)?,
        })
    }

    pub fn count(&self) -> RepositoryResult<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM partner_bank", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<PartnerBank>> {
        let sql = format!("{} ORDER BY created_at ASC, partner_bank_id ASC", SELECT_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let banks = stmt
            .query_map([], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(banks)
    }
}

impl PartnerBankStore for PartnerBankRepository<'_> {
    fn find_by_id(&self, id: &str) -> RepositoryResult<PartnerBank> {
        let sql = format!("{} WHERE partner_bank_id = ?1", SELECT_COLUMNS);
        self.conn
            .query_row(&sql, params![id], Self::map_row)
            .optional()?
            .ok_or_else(|| RepositoryError::not_found(ENTITY, id))
    }

    fn create(&self, bank: &PartnerBank) -> RepositoryResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO partner_bank (
                partner_bank_id, consignor_code, consignor_name, bank_number, bank_name,
                bank_branch_number, bank_branch_name, deposit_items, account_number,
                is_archived, is_default, record_limit, remarks, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
            params![
                bank.partner_bank_id,
                bank.consignor_code,
                bank.consignor_name,
                bank.bank_number,
                bank.bank_name,
                bank.bank_branch_number,
                bank.bank_branch_name,
                bank.deposit_items.as_str(),
                bank.account_number,
                bank.is_archived as i32,
                bank.is_default as i32,
                bank.record_limit,
                bank.remarks,
                bank.created_at,
                bank.updated_at,
            ],
        )?;
        Ok(())
    }

    fn update(&self, bank: &PartnerBank) -> RepositoryResult<()> {
        let rows = self.conn.execute(
            r#"
            UPDATE partner_bank
            SET consignor_code = ?2, consignor_name = ?3, bank_number = ?4, bank_name = ?5,
                bank_branch_number = ?6, bank_branch_name = ?7, deposit_items = ?8,
                account_number = ?9, is_archived = ?10, is_default = ?11,
                record_limit = ?12, remarks = ?13, updated_at = ?14
            WHERE partner_bank_id = ?1
            "#,
            params![
                bank.partner_bank_id,
                bank.consignor_code,
                bank.consignor_name,
                bank.bank_number,
                bank.bank_name,
                bank.bank_branch_number,
                bank.bank_branch_name,
                bank.deposit_items.as_str(),
                bank.account_number,
                bank.is_archived as i32,
                bank.is_default as i32,
                bank.record_limit,
                bank.remarks,
                bank.updated_at,
            ],
        )?;

        if rows == 0 {
            return Err(RepositoryError::not_found(ENTITY, &bank.partner_bank_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ensure_schema;
    use chrono::Utc;

    fn bank(id: &str) -> PartnerBank {
        let now = Utc::now();
        PartnerBank {
            partner_bank_id: id.to_string(),
            consignor_code: "0000012345".to_string(),
            consignor_name: "ｶ)ﾃｽﾄ".to_string(),
            bank_number: "0005".to_string(),
            bank_name: "ﾐﾂﾋﾞｼ".to_string(),
            bank_branch_number: "001".to_string(),
            bank_branch_name: "ﾎﾝﾃﾝ".to_string(),
            deposit_items: DepositItem::Checking,
            account_number: "7654321".to_string(),
            is_archived: false,
            is_default: true,
            record_limit: 100,
            remarks: "memo".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_create_find_update() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        let repo = PartnerBankRepository::new(&conn);

        repo.create(&bank("PB1")).unwrap();
        let mut found = repo.find_by_id("PB1").unwrap();
        assert_eq!(found.bank_number, "0005");
        assert_eq!(found.deposit_items, DepositItem::Checking);
        assert!(found.is_default);

        found.is_archived = true;
        repo.update(&found).unwrap();
        assert!(repo.find_by_id("PB1").unwrap().is_archived);
        assert_eq!(repo.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_find_missing_is_not_found() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        let repo = PartnerBankRepository::new(&conn);

        let err = repo.find_by_id("nope").unwrap_err();
        assert_eq!(err.to_string(), "record not found: partner_bank with id=nope");
    }
}
