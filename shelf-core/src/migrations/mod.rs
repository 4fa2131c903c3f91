//! Embedded SQL migrations
//!
//! Two DuckDB files carry a schema: `shelf.duckdb` (users) and
//! `logs.duckdb` (event log). Each has its own ordered migration list,
//! compiled in with include_str! and applied by `MigrationService`.

/// A migration as (file name, SQL)
pub type Migration = (&'static str, &'static str);

/// Name of the bootstrap migration that creates `sys_migrations`
pub const BOOTSTRAP_MIGRATION: &str = "000_migrations.sql";

/// Migrations for shelf.duckdb, in order.
///
/// When adding one, create `NNN_description.sql` next to this file and
/// append it here.
pub const MIGRATIONS: &[Migration] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    ("001_users.sql", include_str!("001_users.sql")),
];

/// Migrations for logs.duckdb, in order.
pub const LOG_MIGRATIONS: &[Migration] = &[
    ("000_migrations.sql", include_str!("logs/000_migrations.sql")),
    ("001_sys_logs.sql", include_str!("logs/001_sys_logs.sql")),
];
