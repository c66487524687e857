// ==========================================
// 合作银行导入集成测试
// ==========================================
// 测试目标: 字段规则、id/is_archived 一致性、归档既有记录
// ==========================================

mod test_helpers;

use master_data_import::domain::{ActionType, DepositItem, ImportKind};
use master_data_import::importer::{MasterDataImporter, MasterDataImporterImpl};
use master_data_import::repository::{
    ActionLogRepository, PartnerBankRepository, PartnerBankStore,
};
use test_helpers::{
    create_test_db, csv_payload, fixed_context, open_store, partner_bank_row, MockConfigReader,
    PARTNER_BANK_HEADER,
};

fn create_importer(db_path: &str) -> MasterDataImporterImpl<MockConfigReader> {
    MasterDataImporterImpl::new(open_store(db_path), MockConfigReader::default())
}

#[tokio::test]
async fn test_create_partner_bank() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_importer(&db_path);

    let payload = csv_payload(PARTNER_BANK_HEADER, &[&partner_bank_row("", "", "1234567")]);
    let result = importer
        .import(&payload, ImportKind::PartnerBank)
        .await
        .expect("import failed");

    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert_eq!(result.summary.created, 1);

    let conn = rusqlite::Connection::open(&db_path).unwrap();
    let banks = PartnerBankRepository::new(&conn).list_all().unwrap();
    assert_eq!(banks.len(), 1);
    let bank = &banks[0];
    assert_eq!(bank.consignor_code, "1234567890");
    assert_eq!(bank.consignor_name, "ｶ)ﾃｽﾄ ｼｮｳｼﾞ");
    assert_eq!(bank.bank_number, "0001");
    assert_eq!(bank.deposit_items, DepositItem::Ordinary);
    assert_eq!(bank.record_limit, 10);
    assert!(!bank.is_archived);
    assert!(!bank.is_default);
}

#[tokio::test]
async fn test_six_digit_account_number_is_rejected() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_importer(&db_path);

    let payload = csv_payload(PARTNER_BANK_HEADER, &[&partner_bank_row("", "", "123456")]);
    let result = importer.import(&payload, ImportKind::PartnerBank).await.unwrap();

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].row_number, 2);
    assert_eq!(
        result.errors[0].message,
        "the account number can only accept 7 digit numbers"
    );

    let conn = rusqlite::Connection::open(&db_path).unwrap();
    assert_eq!(PartnerBankRepository::new(&conn).count().unwrap(), 0);
}

#[tokio::test]
async fn test_id_without_archive_flag_is_rejected() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_importer(&db_path);

    let payload = csv_payload(
        PARTNER_BANK_HEADER,
        &[&partner_bank_row("PB-1", "", "1234567")],
    );
    let result = importer.import(&payload, ImportKind::PartnerBank).await.unwrap();

    assert_eq!(result.errors.len(), 1);
    assert_eq!(
        result.errors[0].message,
        "partner_bank_id and is_archived can only be both present or absent"
    );
}

#[tokio::test]
async fn test_archive_existing_partner_bank() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_importer(&db_path);

    importer
        .import(
            &csv_payload(PARTNER_BANK_HEADER, &[&partner_bank_row("", "", "1234567")]),
            ImportKind::PartnerBank,
        )
        .await
        .unwrap();
    let original = {
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        PartnerBankRepository::new(&conn).list_all().unwrap().remove(0)
    };

    let payload = csv_payload(
        PARTNER_BANK_HEADER,
        &[&partner_bank_row(&original.partner_bank_id, "true", "7654321")],
    );
    let ctx = fixed_context(false);
    let result = importer
        .import_with_context(&payload, ImportKind::PartnerBank, &ctx)
        .unwrap();
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert_eq!(result.summary.archived, 1);

    let conn = rusqlite::Connection::open(&db_path).unwrap();
    let archived = PartnerBankRepository::new(&conn)
        .find_by_id(&original.partner_bank_id)
        .unwrap();
    assert!(archived.is_archived);
    assert_eq!(archived.account_number, "7654321");
    assert_eq!(archived.created_at, original.created_at);

    let logs = ActionLogRepository::new(&conn)
        .find_by_batch_id(&ctx.batch_id)
        .unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action_type, ActionType::Archive);
    assert_eq!(logs[0].entity, "partner_bank");
    assert_eq!(logs[0].entity_id, original.partner_bank_id);
}

#[tokio::test]
async fn test_unknown_partner_bank_id_is_row_error() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_importer(&db_path);

    let payload = csv_payload(
        PARTNER_BANK_HEADER,
        &[
            &partner_bank_row("", "", "1234567"),
            &partner_bank_row("PB-404", "true", "1234567"),
        ],
    );
    let result = importer.import(&payload, ImportKind::PartnerBank).await.unwrap();

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].row_number, 3);
    assert_eq!(
        result.errors[0].message,
        "cannot find partner_bank_id with error 'record not found: partner_bank with id=PB-404'"
    );

    // 第 2 行虽然有效，也随整批回滚
    let conn = rusqlite::Connection::open(&db_path).unwrap();
    assert_eq!(PartnerBankRepository::new(&conn).count().unwrap(), 0);
}

#[tokio::test]
async fn test_each_invalid_row_reports_its_first_failure() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_importer(&db_path);

    let payload = csv_payload(
        PARTNER_BANK_HEADER,
        &[
            ",1234567890,ｶ)ﾃｽﾄ,0001,ﾐｽﾞﾎ,001,ﾎﾝﾃﾝ,3,1234567,,,,",
            ",1234567890,ｶ)ﾃｽﾄ,00001,ﾐｽﾞﾎ,001,ﾎﾝﾃﾝ,1,1234567,,,,",
            ",1234567890,ﾃｽﾄ,0001,Mizuho,001,ﾎﾝﾃﾝ,1,1234567,,,,",
            ",,ｶ)ﾃｽﾄ,0001,ﾐｽﾞﾎ,001,ﾎﾝﾃﾝ,1,1234567,,,,",
            ",1234567890,ｶ)ﾃｽﾄ,0001,ﾐｽﾞﾎ,001,ﾎﾝﾃﾝ,1,1234567,,,maybe,",
            ",1234567890,ｶ)ﾃｽﾄ,0001,ﾐｽﾞﾎ,001,ﾎﾝﾃﾝ,1,1234567,,,,-1",
        ],
    );
    let result = importer.import(&payload, ImportKind::PartnerBank).await.unwrap();

    let reported: Vec<(usize, &str)> = result
        .errors
        .iter()
        .map(|e| (e.row_number, e.message.as_str()))
        .collect();
    assert_eq!(
        reported,
        vec![
            (2, "invalid deposit items account"),
            (3, "invalid bank number digit limit"),
            (4, "bank name field has invalid half width character"),
            (5, "field consignor_code is required"),
            (6, "invalid IsDefault value"),
            (7, "invalid RecordLimit value"),
        ]
    );
}
