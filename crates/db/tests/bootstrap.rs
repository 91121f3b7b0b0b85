use sqlx::PgPool;

/// Connect, migrate, and verify the lookup tables are seeded.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    speakwell_db::health_check(&pool).await.unwrap();

    for (table, expected) in [("session_statuses", 4_i64), ("folder_statuses", 3)] {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, expected, "{table} seed rows");
    }
}

/// Lookup labels line up with the status enums.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_session_status_names(pool: PgPool) {
    let rows: Vec<(i16, String)> =
        sqlx::query_as("SELECT id, label FROM session_statuses ORDER BY id")
            .fetch_all(&pool)
            .await
            .unwrap();

    for (id, label) in rows {
        assert_eq!(speakwell_core::session_status::status_name(id), label);
    }
}
