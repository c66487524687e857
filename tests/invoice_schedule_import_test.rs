// ==========================================
// 开票计划导入集成测试
// ==========================================
// 测试目标: 日期窗口、整批回滚、错误行号顺序、同批内行顺序
// ==========================================

mod test_helpers;

use chrono::TimeZone;
use master_data_import::domain::{ActionType, ScheduleStatus};
use master_data_import::importer::{MasterDataImporter, MasterDataImporterImpl};
use master_data_import::logging;
use master_data_import::repository::{
    ActionLogRepository, InvoiceScheduleRepository, InvoiceScheduleStore,
};
use test_helpers::{
    create_test_db, csv_payload, fixed_context, jst, open_store, MockConfigReader,
    SCHEDULE_HEADER,
};

fn create_importer(db_path: &str) -> MasterDataImporterImpl<MockConfigReader> {
    MasterDataImporterImpl::new(open_store(db_path), MockConfigReader::default())
        .with_actor("test_user")
}

#[tokio::test]
async fn test_three_valid_rows_are_committed_in_file_order() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_importer(&db_path);
    let ctx = fixed_context(false);

    let payload = csv_payload(
        SCHEDULE_HEADER,
        &[",2026/11/01,,first", ",2026/11/02,,second", ",2026/11/03,,third"],
    );
    let result = importer
        .import_with_context(&payload, master_data_import::ImportKind::InvoiceSchedule, &ctx)
        .expect("import failed");

    assert!(result.errors.is_empty());
    assert_eq!(result.summary.total_rows, 3);
    assert_eq!(result.summary.created, 3);

    let conn = rusqlite::Connection::open(&db_path).unwrap();
    let schedules = InvoiceScheduleRepository::new(&conn).list_all().unwrap();
    assert_eq!(schedules.len(), 3);
    for schedule in &schedules {
        assert_eq!(schedule.status, ScheduleStatus::Scheduled);
        assert_eq!(
            schedule.scheduled_date - schedule.invoice_date,
            chrono::Duration::days(1)
        );
    }

    let logs = ActionLogRepository::new(&conn)
        .find_by_batch_id(&ctx.batch_id)
        .unwrap();
    let rows: Vec<usize> = logs.iter().map(|l| l.row_number).collect();
    assert_eq!(rows, vec![2, 3, 4]);
    assert!(logs.iter().all(|l| l.action_type == ActionType::Create));
    assert!(logs.iter().all(|l| l.actor == "test_user"));
}

#[tokio::test]
async fn test_same_day_depends_on_strictness() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_importer(&db_path);
    let payload = csv_payload(SCHEDULE_HEADER, &[",2026/10/19,,today"]);

    // 非严格模式: 当天被拒绝
    let result = importer
        .import_with_context(
            &payload,
            master_data_import::ImportKind::InvoiceSchedule,
            &fixed_context(false),
        )
        .unwrap();
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].row_number, 2);
    assert_eq!(
        result.errors[0].message,
        "invoice schedule should be a future date"
    );

    // 严格模式: 当天允许
    let result = importer
        .import_with_context(
            &payload,
            master_data_import::ImportKind::InvoiceSchedule,
            &fixed_context(true),
        )
        .unwrap();
    assert!(result.errors.is_empty(), "{:?}", result.errors);

    let conn = rusqlite::Connection::open(&db_path).unwrap();
    let stored = InvoiceScheduleRepository::new(&conn).list_all().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(
        stored[0].invoice_date,
        jst().with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn test_any_row_error_rolls_back_whole_batch() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_importer(&db_path);

    let payload = csv_payload(
        SCHEDULE_HEADER,
        &[
            ",2026/11/01,,ok",
            ",2026/13/01,,bad month",
            ",2026/11/02,,ok",
            "S1,2026/11/03,,id without flag",
            ",2026/10/01,,past",
            ",,,",
        ],
    );
    let result = importer
        .import_with_context(
            &payload,
            master_data_import::ImportKind::InvoiceSchedule,
            &fixed_context(false),
        )
        .unwrap();

    let reported: Vec<(usize, &str)> = result
        .errors
        .iter()
        .map(|e| (e.row_number, e.message.as_str()))
        .collect();
    assert_eq!(
        reported,
        vec![
            (3, "invalid date format"),
            (5, "schedule_id and is_archived can only be both present or absent"),
            (6, "invoice schedule should be a future date"),
            (7, "invoice date is required"),
        ]
    );
    assert_eq!(result.summary.created, 0);

    let conn = rusqlite::Connection::open(&db_path).unwrap();
    assert_eq!(InvoiceScheduleRepository::new(&conn).count().unwrap(), 0);
    assert_eq!(ActionLogRepository::new(&conn).count().unwrap(), 0);
}

#[tokio::test]
async fn test_archive_then_create_same_date_in_one_batch() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_importer(&db_path);
    let kind = master_data_import::ImportKind::InvoiceSchedule;

    let first = importer
        .import_with_context(
            &csv_payload(SCHEDULE_HEADER, &[",2026/12/01,,original"]),
            kind,
            &fixed_context(false),
        )
        .unwrap();
    assert!(first.errors.is_empty());

    let existing_id = {
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        InvoiceScheduleRepository::new(&conn).list_all().unwrap()[0]
            .invoice_schedule_id
            .clone()
    };

    // 先建后归档: 新建行与现有计划冲突，整批回滚
    let create_first = csv_payload(
        SCHEDULE_HEADER,
        &[
            ",2026/12/01,,replacement",
            format!("{},,true,cancel", existing_id).as_str(),
        ],
    );
    let result = importer
        .import_with_context(&create_first, kind, &fixed_context(false))
        .unwrap();
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].row_number, 2);
    assert!(result.errors[0]
        .message
        .starts_with("unable to create invoice schedule: "));

    // 先归档后新建: 成功
    let archive_first = csv_payload(
        SCHEDULE_HEADER,
        &[
            format!("{},,true,cancel", existing_id).as_str(),
            ",2026/12/01,,replacement",
        ],
    );
    let ctx = fixed_context(false);
    let result = importer
        .import_with_context(&archive_first, kind, &ctx)
        .unwrap();
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert_eq!(result.summary.archived, 1);
    assert_eq!(result.summary.created, 1);

    let conn = rusqlite::Connection::open(&db_path).unwrap();
    let repo = InvoiceScheduleRepository::new(&conn);
    let archived = repo.find_by_id(&existing_id).unwrap();
    assert!(archived.is_archived);
    assert_eq!(archived.status, ScheduleStatus::Cancelled);
    assert_eq!(archived.remarks, "cancel");
    assert_eq!(repo.count().unwrap(), 2);
}

#[tokio::test]
async fn test_update_with_id_keeps_identity_fields() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_importer(&db_path);
    let kind = master_data_import::ImportKind::InvoiceSchedule;

    importer
        .import_with_context(
            &csv_payload(SCHEDULE_HEADER, &[",2026/12/05,,v1"]),
            kind,
            &fixed_context(false),
        )
        .unwrap();
    let original = {
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        InvoiceScheduleRepository::new(&conn).list_all().unwrap().remove(0)
    };

    // 行内日期仅做校验，不覆盖既有记录的开票日
    let payload = csv_payload(
        SCHEDULE_HEADER,
        &[&format!("{},2026/12/20,false,v2", original.invoice_schedule_id)],
    );
    let result = importer
        .import_with_context(&payload, kind, &fixed_context(false))
        .unwrap();
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert_eq!(result.summary.updated, 1);

    let conn = rusqlite::Connection::open(&db_path).unwrap();
    let updated = InvoiceScheduleRepository::new(&conn)
        .find_by_id(&original.invoice_schedule_id)
        .unwrap();
    assert_eq!(updated.invoice_date, original.invoice_date);
    assert_eq!(updated.scheduled_date, original.scheduled_date);
    assert_eq!(updated.created_at, original.created_at);
    assert_eq!(updated.remarks, "v2");
    assert_eq!(updated.status, ScheduleStatus::Scheduled);
}

#[tokio::test]
async fn test_unknown_schedule_id_is_row_error() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_importer(&db_path);

    let result = importer
        .import_with_context(
            &csv_payload(SCHEDULE_HEADER, &["missing-id,,true,"]),
            master_data_import::ImportKind::InvoiceSchedule,
            &fixed_context(false),
        )
        .unwrap();

    assert_eq!(result.errors.len(), 1);
    assert_eq!(
        result.errors[0].message,
        "cannot find invoice_schedule_id with error 'record not found: invoice_schedule with id=missing-id'"
    );
}

#[tokio::test]
async fn test_reported_errors_are_complete() {
    // 修正所有报告的行后重新提交，不会出现新的错误
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_importer(&db_path);
    let kind = master_data_import::ImportKind::InvoiceSchedule;

    let rows = vec![
        ",2026/11/01,,".to_string(),
        ",2026-11-02,,".to_string(),
        ",2026/11/03,maybe,".to_string(),
        ",2026/11/04,,".to_string(),
    ];
    let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    let result = importer
        .import_with_context(&csv_payload(SCHEDULE_HEADER, &refs), kind, &fixed_context(false))
        .unwrap();
    let failed: Vec<usize> = result.errors.iter().map(|e| e.row_number).collect();
    assert_eq!(failed, vec![3, 4]);

    let kept: Vec<&str> = refs
        .iter()
        .enumerate()
        .filter(|(idx, _)| !failed.contains(&(idx + 2)))
        .map(|(_, row)| *row)
        .collect();
    let result = importer
        .import_with_context(&csv_payload(SCHEDULE_HEADER, &kept), kind, &fixed_context(false))
        .unwrap();
    assert!(result.errors.is_empty(), "{:?}", result.errors);
}

#[tokio::test]
async fn test_out_of_range_date_is_row_error_and_store_stays_usable() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_importer(&db_path);
    let kind = master_data_import::ImportKind::InvoiceSchedule;

    let result = importer
        .import(
            &csv_payload(SCHEDULE_HEADER, &[",+262142/12/31,,", ",2026/1/5,,"]),
            kind,
        )
        .await
        .expect("out-of-range dates must not abort the request");
    let reported: Vec<(usize, &str)> = result
        .errors
        .iter()
        .map(|e| (e.row_number, e.message.as_str()))
        .collect();
    assert_eq!(
        reported,
        vec![(2, "invalid date format"), (3, "invalid date format")]
    );

    // 随后的有效导入照常提交
    let result = importer
        .import(&csv_payload(SCHEDULE_HEADER, &[",2099/01/01,,"]), kind)
        .await
        .expect("follow-up import failed");
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert_eq!(result.summary.created, 1);
}
