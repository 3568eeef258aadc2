//! End-to-end workflow scenarios against a file-backed database

mod common;

use common::{actor, assignment, count, create, setup};
use shared::ErrorCode;
use shared::message::{RealtimeEvent, Topic};
use shared::models::{
    CommentType, ReportStatus, ReportUpdate, Role, StaffEntryUpsert, StatusTransition,
    ReportTimeUpdate,
};

fn status(value: &str, reason: Option<&str>) -> StatusTransition {
    StatusTransition {
        status: value.into(),
        reason: reason.map(Into::into),
    }
}

#[tokio::test]
async fn concurrent_find_or_create_converges_on_one_row() {
    let server = setup(vec![], false).await;
    let workflow = server.state.workflow.clone();

    let mut tasks = Vec::new();
    for i in 0..8 {
        let workflow = workflow.clone();
        let site = if i % 2 == 0 { "Site B" } else { " site b " };
        tasks.push(tokio::spawn(async move {
            workflow
                .find_or_create(create("2025-11-02", site), &actor("Taro", Role::Staff))
                .await
        }));
    }

    let mut ids = Vec::new();
    let mut created = 0;
    for task in tasks {
        let (report, was_created) = task.await.unwrap().unwrap();
        ids.push(report.id);
        if was_created {
            created += 1;
        }
    }

    assert_eq!(created, 1);
    assert!(ids.windows(2).all(|w| w[0] == w[1]));
    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM report")
        .fetch_one(server.state.get_pool())
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn approval_round_trip_keeps_return_reason_in_history() {
    let server = setup(vec![], false).await;
    let workflow = &server.state.workflow;
    let staff = actor("Taro", Role::Staff);
    let chief = actor("Suzuki", Role::Chief);
    let sales = actor("Sato", Role::Sales);

    let (report, created) = workflow
        .find_or_create(create("2025-11-01", "Site A"), &staff)
        .await
        .unwrap();
    assert!(created);
    assert_eq!(report.status, ReportStatus::Draft);

    workflow
        .transition(report.id, status("staff_submitted", None), &staff)
        .await
        .unwrap();

    let patch = ReportUpdate {
        chief_report_content: Some(Some("All work done".into())),
        chief_name: Some(Some("Suzuki".into())),
        ..Default::default()
    };
    workflow.update(report.id, patch, &chief).await.unwrap();
    workflow
        .transition(report.id, status("chief_submitted_to_sales", None), &chief)
        .await
        .unwrap();

    let outcome = workflow
        .transition(report.id, status("returned_by_sales", Some("missing time")), &sales)
        .await
        .unwrap();
    assert_eq!(outcome.report.status, ReportStatus::ReturnedBySales);
    assert_eq!(outcome.report.return_reason.as_deref(), Some("missing time"));

    let outcome = workflow
        .transition(report.id, status("staff_submitted", None), &staff)
        .await
        .unwrap();
    assert_eq!(outcome.previous_status, ReportStatus::ReturnedBySales);
    assert_eq!(outcome.report.return_reason, None);

    let detail = workflow.get(report.id).await.unwrap();
    assert_eq!(detail.report.status, ReportStatus::StaffSubmitted);
    assert_eq!(
        detail.report.chief_report_content.as_deref(),
        Some("All work done")
    );

    let comments = workflow.list_comments(report.id).await.unwrap();
    let status_changes = comments
        .iter()
        .filter(|c| c.comment_type == CommentType::StatusChange)
        .count();
    assert_eq!(status_changes, 4);
    let reasons: Vec<_> = comments
        .iter()
        .filter(|c| c.comment_type == CommentType::ReturnReason)
        .collect();
    assert_eq!(reasons.len(), 1);
    assert_eq!(reasons[0].comment_text, "missing time");
    assert_eq!(reasons[0].created_by.as_deref(), Some("Sato"));
}

#[tokio::test]
async fn failed_audit_insert_rolls_back_status() {
    let server = setup(vec![], false).await;
    let workflow = &server.state.workflow;
    let staff = actor("Taro", Role::Staff);
    let (report, _) = workflow
        .find_or_create(create("2025-11-01", "Site A"), &staff)
        .await
        .unwrap();

    sqlx::query(
        "CREATE TRIGGER reject_comments BEFORE INSERT ON report_comment \
         BEGIN SELECT RAISE(ABORT, 'comment insert rejected'); END",
    )
    .execute(server.state.get_pool())
    .await
    .unwrap();

    let err = workflow
        .transition(report.id, status("staff_submitted", Some("reason")), &staff)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::DatabaseError);

    let detail = workflow.get(report.id).await.unwrap();
    assert_eq!(detail.report.status, ReportStatus::Draft);
    assert_eq!(detail.report.return_reason, None);
    assert_eq!(
        count(&server.state, "SELECT COUNT(*) FROM report_comment WHERE report_id = ?", report.id).await,
        0
    );
}

#[tokio::test]
async fn staff_entry_upsert_by_name() {
    let server = setup(vec![], false).await;
    let workflow = &server.state.workflow;
    let staff = actor("Taro", Role::Staff);
    let (report, _) = workflow
        .find_or_create(create("2025-11-01", "Site A"), &staff)
        .await
        .unwrap();
    let sql = "SELECT COUNT(*) FROM report_staff_entry WHERE report_id = ?";

    let first = StaffEntryUpsert {
        report_content: Some(Some("Set up scaffolding".into())),
        driving_allowance: Some(true),
        ..Default::default()
    };
    workflow
        .upsert_staff_entry(report.id, "Taro", first, &staff)
        .await
        .unwrap();
    assert_eq!(count(&server.state, sql, report.id).await, 1);

    let second = StaffEntryUpsert {
        report_content: Some(Some("Took down scaffolding".into())),
        ..Default::default()
    };
    let entry = workflow
        .upsert_staff_entry(report.id, "Taro", second, &staff)
        .await
        .unwrap();
    assert_eq!(count(&server.state, sql, report.id).await, 1);
    assert_eq!(entry.report_content.as_deref(), Some("Took down scaffolding"));
    assert!(entry.driving_allowance);
}

#[tokio::test]
async fn delete_report_cascades_children() {
    let server = setup(vec![], false).await;
    let workflow = &server.state.workflow;
    let staff = actor("Taro", Role::Staff);
    let (report, _) = workflow
        .find_or_create(create("2025-11-01", "Site A"), &staff)
        .await
        .unwrap();

    let time = ReportTimeUpdate {
        meeting_time: Some(Some("07:30".into())),
        ..Default::default()
    };
    workflow.upsert_time(report.id, time, &staff).await.unwrap();
    workflow
        .upsert_staff_entry(report.id, "Taro", StaffEntryUpsert::default(), &staff)
        .await
        .unwrap();
    workflow
        .transition(report.id, status("staff_submitted", None), &staff)
        .await
        .unwrap();
    workflow
        .add_comment(report.id, "Please check the photos", &staff)
        .await
        .unwrap();

    workflow
        .delete_report(report.id, &actor("Suzuki", Role::Chief))
        .await
        .unwrap();

    for table in ["report", "report_time", "report_staff_entry", "report_comment"] {
        let column = if table == "report" { "id" } else { "report_id" };
        let sql = format!("SELECT COUNT(*) FROM {table} WHERE {column} = ?");
        assert_eq!(count(&server.state, &sql, report.id).await, 0, "{table} not empty");
    }

    let err = workflow.get(report.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ReportNotFound);
    assert_eq!(err.details.unwrap()["report_id"], report.id);
}

#[tokio::test]
async fn disjoint_updates_accumulate() {
    let server = setup(vec![], false).await;
    let workflow = server.state.workflow.clone();
    let (report, _) = workflow
        .find_or_create(create("2025-11-01", "Site A"), &actor("Taro", Role::Staff))
        .await
        .unwrap();

    let staff_patch = ReportUpdate {
        staff_report_content: Some(Some("staff text".into())),
        ..Default::default()
    };
    let location_patch = ReportUpdate {
        location: Some(Some("North Gate".into())),
        ..Default::default()
    };
    let taro = actor("Taro", Role::Staff);
    let suzuki = actor("Suzuki", Role::Chief);
    let (a, b) = tokio::join!(
        workflow.update(report.id, staff_patch, &taro),
        workflow.update(report.id, location_patch, &suzuki),
    );
    a.unwrap();
    b.unwrap();

    let detail = workflow.get(report.id).await.unwrap();
    assert_eq!(detail.report.staff_report_content.as_deref(), Some("staff text"));
    assert_eq!(detail.report.location.as_deref(), Some("North Gate"));
}

#[tokio::test]
async fn sales_filter_uses_fuzzy_assignment() {
    let server = setup(vec![assignment("2025-11-01", "SiteA", "Sato")], false).await;
    let (report, _) = server
        .state
        .workflow
        .find_or_create(create("2025-11-01", "Site A"), &actor("Taro", Role::Staff))
        .await
        .unwrap();

    let resolver = &server.state.resolver;
    assert!(resolver.belongs_to(&report, "Sato").await.unwrap());
    assert!(!resolver.belongs_to(&report, "Tanaka").await.unwrap());
}

#[tokio::test]
async fn subscribers_see_status_changes() {
    let server = setup(vec![], false).await;
    let registry = server.state.registry.clone();
    let workflow = &server.state.workflow;

    let mut sales = registry.connect();
    registry.join(sales.id, Topic::Role(Role::Sales));

    let (report, _) = workflow
        .find_or_create(create("2025-11-01", "Site A"), &actor("Taro", Role::Staff))
        .await
        .unwrap();
    assert_eq!(
        sales.rx.recv().await.unwrap(),
        RealtimeEvent::ReportCreated { report_id: report.id }
    );

    workflow
        .transition(report.id, status("chief_submitted_to_sales", None), &actor("Suzuki", Role::Chief))
        .await
        .unwrap();
    assert_eq!(
        sales.rx.recv().await.unwrap(),
        RealtimeEvent::ReportStatusChanged {
            report_id: report.id,
            status: ReportStatus::ChiefSubmittedToSales,
        }
    );
}

const STATUS_CHANGES: &str =
    "SELECT COUNT(*) FROM report_comment WHERE report_id = ? AND comment_type = 'status_change'";

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_transitions_on_distinct_reports_all_commit() {
    let server = setup(vec![], false).await;
    let workflow = server.state.workflow.clone();
    let staff = actor("Taro", Role::Staff);

    let mut ids = Vec::new();
    for i in 0..40 {
        let (report, _) = workflow
            .find_or_create(create("2025-11-03", &format!("Site {i}")), &staff)
            .await
            .unwrap();
        ids.push(report.id);
    }

    let rounds = ["staff_submitted", "chief_submitted_to_sales", "submitted_to_accounting"];
    for target in rounds {
        let mut tasks = Vec::new();
        for &id in &ids {
            let workflow = workflow.clone();
            let staff = staff.clone();
            tasks.push(tokio::spawn(async move {
                workflow.transition(id, status(target, None), &staff).await
            }));
        }
        for task in tasks {
            let outcome = task.await.unwrap().unwrap();
            assert_eq!(outcome.report.status.as_str(), target);
        }
    }

    for id in ids {
        let report = workflow.get(id).await.unwrap().report;
        assert_eq!(report.status, ReportStatus::SubmittedToAccounting);
        assert_eq!(count(&server.state, STATUS_CHANGES, id).await, rounds.len() as i64);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_transitions_on_one_report_each_leave_a_comment() {
    let server = setup(vec![], false).await;
    let workflow = server.state.workflow.clone();
    let sales = actor("Sato", Role::Sales);

    let (report, _) = workflow
        .find_or_create(create("2025-11-03", "Site Z"), &sales)
        .await
        .unwrap();
    let id = report.id;

    let mut tasks = Vec::new();
    for i in 0..20 {
        let workflow = workflow.clone();
        let sales = sales.clone();
        let target = if i % 2 == 0 { "returned_by_sales" } else { "submitted_to_accounting" };
        tasks.push(tokio::spawn(async move {
            workflow
                .transition(id, status(target, Some("recheck")), &sales)
                .await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(count(&server.state, STATUS_CHANGES, id).await, 20);
    let reasons = count(
        &server.state,
        "SELECT COUNT(*) FROM report_comment WHERE report_id = ? AND comment_type = 'return_reason'",
        id,
    )
    .await;
    assert_eq!(reasons, 20);
}

#[tokio::test]
async fn child_writes_after_delete_report_not_found() {
    let server = setup(vec![], false).await;
    let workflow = &server.state.workflow;
    let chief = actor("Suzuki", Role::Chief);

    let (report, _) = workflow
        .find_or_create(create("2025-11-04", "Site Gone"), &chief)
        .await
        .unwrap();
    workflow.delete_report(report.id, &chief).await.unwrap();

    let err = workflow
        .upsert_time(report.id, ReportTimeUpdate::default(), &chief)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ReportNotFound);

    let err = workflow
        .upsert_staff_entry(report.id, "Taro", StaffEntryUpsert::default(), &chief)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ReportNotFound);

    let err = workflow
        .add_comment(report.id, "late note", &chief)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ReportNotFound);
}
