//! Integration tests for `RenderJobRepo` against a real SQLite database.

use assert_matches::assert_matches;
use renderq_core::render_job::RenderJobStatus;
use renderq_db::repositories::RenderJobRepo;
use sqlx::SqlitePool;

// ---------------------------------------------------------------------------
// Insert
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn insert_creates_pending_job(pool: SqlitePool) {
    let job = RenderJobRepo::insert(&pool, "user-1", Some("render the intro"))
        .await
        .unwrap();

    assert_eq!(job.requester_id, "user-1");
    assert_eq!(job.description.as_deref(), Some("render the intro"));
    assert_eq!(job.status, RenderJobStatus::Pending);
    assert!(job.assignee.is_none());
    assert!(job.result_url.is_none());
    assert!(job.created_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn insert_assigns_increasing_ids(pool: SqlitePool) {
    let mut last = 0;
    for i in 0..5 {
        let job = RenderJobRepo::insert(&pool, "user-1", Some(&format!("job {i}")))
            .await
            .unwrap();
        assert!(job.id > last, "id {} must exceed {last}", job.id);
        last = job.id;
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn insert_accepts_missing_description(pool: SqlitePool) {
    let job = RenderJobRepo::insert(&pool, "user-1", None).await.unwrap();
    assert!(job.description.is_none());
}

// ---------------------------------------------------------------------------
// List / find
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_open_is_empty_without_rows(pool: SqlitePool) {
    let open = RenderJobRepo::list_open(&pool).await.unwrap();
    assert!(open.is_empty());
    assert_eq!(RenderJobRepo::count_open(&pool).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_open_excludes_complete_jobs(pool: SqlitePool) {
    let pending = RenderJobRepo::insert(&pool, "u", Some("a")).await.unwrap();
    let claimed = RenderJobRepo::insert(&pool, "u", Some("b")).await.unwrap();
    let done = RenderJobRepo::insert(&pool, "u", Some("c")).await.unwrap();

    RenderJobRepo::update_claim(&pool, claimed.id, "staff").await.unwrap();
    RenderJobRepo::update_claim(&pool, done.id, "staff").await.unwrap();
    RenderJobRepo::update_complete(&pool, done.id, "http://example/c")
        .await
        .unwrap();

    let ids: Vec<_> = RenderJobRepo::list_open(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|job| job.id)
        .collect();
    assert_eq!(ids, vec![pending.id, claimed.id]);
    assert_eq!(RenderJobRepo::count_open(&pool).await.unwrap(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_by_id_returns_none_for_unknown_id(pool: SqlitePool) {
    assert!(RenderJobRepo::find_by_id(&pool, 999).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Conditional transitions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_claim_sets_assignee(pool: SqlitePool) {
    let job = RenderJobRepo::insert(&pool, "u", Some("a")).await.unwrap();

    let rows = RenderJobRepo::update_claim(&pool, job.id, "staffA").await.unwrap();
    assert_eq!(rows, 1);

    let job = RenderJobRepo::find_by_id(&pool, job.id).await.unwrap().unwrap();
    assert_eq!(job.status, RenderJobStatus::InProgress);
    assert_eq!(job.assignee.as_deref(), Some("staffA"));
    assert!(job.result_url.is_none());
}

/// A missing id is not a store error: zero rows change and the caller
/// decides what that means.
#[sqlx::test(migrations = "../../db/migrations")]
async fn update_claim_on_missing_id_affects_no_rows(pool: SqlitePool) {
    let rows = RenderJobRepo::update_claim(&pool, 999, "staffA").await.unwrap();
    assert_eq!(rows, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_claim_does_not_reclaim(pool: SqlitePool) {
    let job = RenderJobRepo::insert(&pool, "u", Some("a")).await.unwrap();
    RenderJobRepo::update_claim(&pool, job.id, "staffA").await.unwrap();

    let rows = RenderJobRepo::update_claim(&pool, job.id, "staffB").await.unwrap();
    assert_eq!(rows, 0);

    let job = RenderJobRepo::find_by_id(&pool, job.id).await.unwrap().unwrap();
    assert_eq!(job.assignee.as_deref(), Some("staffA"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_complete_requires_in_progress(pool: SqlitePool) {
    let job = RenderJobRepo::insert(&pool, "u", Some("a")).await.unwrap();

    let rows = RenderJobRepo::update_complete(&pool, job.id, "http://example/a")
        .await
        .unwrap();
    assert_eq!(rows, 0, "pending jobs cannot skip straight to complete");

    RenderJobRepo::update_claim(&pool, job.id, "staffA").await.unwrap();
    let rows = RenderJobRepo::update_complete(&pool, job.id, "http://example/a")
        .await
        .unwrap();
    assert_eq!(rows, 1);

    let job = RenderJobRepo::find_by_id(&pool, job.id).await.unwrap().unwrap();
    assert_eq!(job.status, RenderJobStatus::Complete);
    assert_eq!(job.result_url.as_deref(), Some("http://example/a"));
    assert_eq!(job.assignee.as_deref(), Some("staffA"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_claims_have_one_winner(pool: SqlitePool) {
    let job = RenderJobRepo::insert(&pool, "u", Some("a")).await.unwrap();

    let (a, b) = tokio::join!(
        RenderJobRepo::update_claim(&pool, job.id, "staffA"),
        RenderJobRepo::update_claim(&pool, job.id, "staffB"),
    );
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(a + b, 1, "exactly one claim may win");

    let job = RenderJobRepo::find_by_id(&pool, job.id).await.unwrap().unwrap();
    let winner = if a == 1 { "staffA" } else { "staffB" };
    assert_eq!(job.assignee.as_deref(), Some(winner));
}

// ---------------------------------------------------------------------------
// Status decoding
// ---------------------------------------------------------------------------

/// Rows written outside the bot with an unknown status are rejected on
/// read instead of leaking into the lifecycle code.
#[sqlx::test(migrations = false)]
async fn unknown_status_text_fails_to_decode(pool: SqlitePool) {
    sqlx::query(
        "CREATE TABLE renders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            description TEXT,
            status TEXT NOT NULL,
            assigned_to TEXT,
            result_url TEXT,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query("INSERT INTO renders (user_id, status) VALUES ('u', 'bogus')")
        .execute(&pool)
        .await
        .unwrap();

    assert_matches!(
        RenderJobRepo::list_open(&pool).await,
        Err(sqlx::Error::ColumnDecode { .. })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn check_constraint_rejects_unknown_status(pool: SqlitePool) {
    let result = sqlx::query("INSERT INTO renders (user_id, status) VALUES ('u', 'bogus')")
        .execute(&pool)
        .await;
    assert_matches!(result, Err(sqlx::Error::Database(_)));
}
