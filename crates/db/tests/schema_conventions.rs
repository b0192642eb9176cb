//! Structural checks over the migrated schema.

use sqlx::PgPool;

const TRACKING_TABLES: [&str; 3] = ["linktree_views", "link_clicks", "article_views"];

async fn public_tables(pool: &PgPool) -> Vec<String> {
    sqlx::query_scalar(
        "SELECT table_name::TEXT FROM information_schema.tables
         WHERE table_schema = 'public'
           AND table_type = 'BASE TABLE'
           AND table_name <> '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(pool)
    .await
    .unwrap()
}

async fn column_type(pool: &PgPool, table: &str, column: &str) -> Option<String> {
    sqlx::query_scalar(
        "SELECT data_type::TEXT FROM information_schema.columns
         WHERE table_schema = 'public' AND table_name = $1 AND column_name = $2",
    )
    .bind(table)
    .bind(column)
    .fetch_optional(pool)
    .await
    .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn every_table_has_bigint_id_and_timestamps(pool: PgPool) {
    let tables = public_tables(&pool).await;
    assert_eq!(tables.len(), 9, "unexpected table set: {tables:?}");

    for table in &tables {
        assert_eq!(
            column_type(&pool, table, "id").await.as_deref(),
            Some("bigint"),
            "{table}.id"
        );
        for column in ["created_at", "updated_at"] {
            assert_eq!(
                column_type(&pool, table, column).await.as_deref(),
                Some("timestamp with time zone"),
                "{table}.{column}"
            );
        }
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn text_columns_are_unbounded(pool: PgPool) {
    let varchar: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name::TEXT, column_name::TEXT FROM information_schema.columns
         WHERE table_schema = 'public'
           AND data_type = 'character varying'
           AND table_name <> '_sqlx_migrations'",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(varchar.is_empty(), "VARCHAR columns: {varchar:?}");
}

#[sqlx::test(migrations = "./migrations")]
async fn unique_constraints_are_named(pool: PgPool) {
    let names: Vec<String> = sqlx::query_scalar(
        "SELECT constraint_name::TEXT FROM information_schema.table_constraints
         WHERE table_schema = 'public' AND constraint_type = 'UNIQUE'",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(names.contains(&"uq_users_email".to_string()));
    assert!(names.contains(&"uq_linktrees_slug".to_string()));
    for name in &names {
        assert!(name.starts_with("uq_"), "unique constraint {name}");
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn foreign_keys_are_indexed_with_delete_rule(pool: PgPool) {
    let fks: Vec<(String, String, String)> = sqlx::query_as(
        "SELECT kcu.table_name::TEXT, kcu.column_name::TEXT, rc.delete_rule::TEXT
         FROM information_schema.referential_constraints rc
         JOIN information_schema.key_column_usage kcu
           ON kcu.constraint_name = rc.constraint_name
          AND kcu.constraint_schema = rc.constraint_schema
         WHERE rc.constraint_schema = 'public'
         ORDER BY 1, 2",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!fks.is_empty());
    for (table, column, rule) in &fks {
        assert!(
            rule == "CASCADE" || rule == "SET NULL",
            "{table}.{column} deletes with {rule}"
        );

        let indexed: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM pg_indexes
                WHERE schemaname = 'public'
                  AND tablename = $1
                  AND indexdef LIKE '%(' || $2 || '%'
             )",
        )
        .bind(table)
        .bind(column)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(indexed, "{table}.{column} has no leading index");
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn updated_at_trigger_on_every_table(pool: PgPool) {
    for table in public_tables(&pool).await {
        let has_trigger: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM information_schema.triggers
                WHERE event_object_table = $1 AND trigger_name = 'set_updated_at'
             )",
        )
        .bind(&table)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(has_trigger, "{table} has no set_updated_at trigger");
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn tracking_tables_store_hashed_addresses_only(pool: PgPool) {
    for table in TRACKING_TABLES {
        assert_eq!(
            column_type(&pool, table, "ip_hash").await.as_deref(),
            Some("text"),
            "{table}.ip_hash"
        );
        for raw in ["ip", "ip_address"] {
            assert!(
                column_type(&pool, table, raw).await.is_none(),
                "{table} stores a raw address in {raw}"
            );
        }
    }
}
