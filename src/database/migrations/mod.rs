//! Schema migration ledger.
//!
//! Migrations are authored once, identified by a timestamp-derived id that
//! is never reused, and applied exactly once per database in strictly
//! ascending id order. The applied set is recorded in the `_migrations`
//! table; the schema change and its ledger row commit in one transaction,
//! so a failed bookkeeping write leaves the migration unapplied and it
//! will be retried on the next run. Reverting walks the applied entries
//! above the target version in descending order, removing each ledger row
//! as its `down` succeeds.
//!
//! A failure mid-sequence halts the run: entries already applied in this
//! run stay applied, and the failing entry's identity is surfaced for the
//! operator. There is no auto-retry and no auto-rollback of prior entries.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use thiserror::Error;
use tracing::{info, warn};

pub mod history;

#[derive(Debug, Error)]
pub enum MigrationError {
    /// The ledger itself is misconfigured (duplicate ids/names, ids out of
    /// order). Detected when the ledger is constructed, before anything
    /// touches the database.
    #[error("migration ledger is misconfigured: {0}")]
    Conflict(String),

    /// An `up` or `down` operation failed. Processing halts here; entries
    /// applied earlier in the run remain applied.
    #[error("migration {id} ({name}) failed")]
    Failed {
        id: i64,
        name: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// The database records an applied migration this build does not know.
    #[error("applied migration {0} is unknown to this build")]
    UnknownApplied(i64),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// One schema-change unit: a forward and a reverse transformation.
///
/// Implementations are immutable after authoring. `down` must undo `up`
/// as far as the data allows; lossy reversals are documented on the
/// individual migration.
#[async_trait]
pub trait Migration: Send + Sync {
    /// Timestamp-derived identifier assigned at authoring time.
    fn id(&self) -> i64;

    fn name(&self) -> &'static str;

    async fn up(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error>;

    async fn down(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error>;
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AppliedMigration {
    pub id: i64,
    pub name: String,
    pub applied_at: DateTime<Utc>,
}

pub struct LedgerStatus {
    pub applied: Vec<AppliedMigration>,
    pub pending: Vec<(i64, &'static str)>,
}

pub struct Ledger {
    migrations: Vec<Box<dyn Migration>>,
}

impl Ledger {
    /// Builds a ledger, validating that ids are strictly increasing and
    /// names are unique. Violations are configuration errors.
    pub fn new(migrations: Vec<Box<dyn Migration>>) -> Result<Self, MigrationError> {
        let mut names = HashSet::new();
        for migration in &migrations {
            if !names.insert(migration.name()) {
                return Err(MigrationError::Conflict(format!(
                    "duplicate migration name '{}'",
                    migration.name()
                )));
            }
        }

        for pair in migrations.windows(2) {
            if pair[1].id() <= pair[0].id() {
                return Err(MigrationError::Conflict(format!(
                    "migration {} ({}) does not come after {} ({})",
                    pair[1].id(),
                    pair[1].name(),
                    pair[0].id(),
                    pair[0].name()
                )));
            }
        }

        Ok(Self { migrations })
    }

    /// The full migration history shipped with this build.
    pub fn from_history() -> Result<Self, MigrationError> {
        Self::new(history::all())
    }

    /// Entries newer than `latest`, in application (ascending) order.
    fn pending(&self, latest: Option<i64>) -> Vec<&dyn Migration> {
        let floor = latest.unwrap_or(i64::MIN);
        self.migrations
            .iter()
            .map(AsRef::as_ref)
            .filter(|m| m.id() > floor)
            .collect()
    }

    /// Applied ids above `target`, newest first. Reversal order is the
    /// exact mirror of application order.
    fn revert_plan(applied: &[i64], target: i64) -> Vec<i64> {
        let mut plan: Vec<i64> = applied.iter().copied().filter(|id| *id > target).collect();
        plan.sort_unstable_by(|a, b| b.cmp(a));
        plan
    }

    /// Applies every entry newer than the latest applied one, recording
    /// each in the ledger table. Returns the new latest-applied id; a run
    /// with nothing pending is a successful no-op.
    pub async fn apply_forward(&self, pool: &PgPool) -> Result<Option<i64>, MigrationError> {
        Self::ensure_ledger_table(pool).await?;

        let latest = Self::latest_applied(pool).await?;
        let mut new_latest = latest;

        for migration in self.pending(latest) {
            let failed = |source| MigrationError::Failed {
                id: migration.id(),
                name: migration.name(),
                source,
            };

            let mut tx = pool.begin().await?;

            migration.up(&mut tx).await.map_err(failed)?;

            sqlx::query(r#"INSERT INTO "_migrations" ("id", "name", "applied_at") VALUES ($1, $2, now())"#)
                .bind(migration.id())
                .bind(migration.name())
                .execute(&mut *tx)
                .await
                .map_err(failed)?;

            tx.commit().await.map_err(failed)?;

            info!(id = migration.id(), name = migration.name(), "applied migration");
            new_latest = Some(migration.id());
        }

        Ok(new_latest)
    }

    /// Reverts every applied entry with an id above `target`, newest
    /// first, deleting each ledger row as its `down` succeeds. Returns
    /// the latest applied id after the run.
    pub async fn revert(&self, pool: &PgPool, target: i64) -> Result<Option<i64>, MigrationError> {
        Self::ensure_ledger_table(pool).await?;

        let applied = Self::applied_ids(pool).await?;

        for id in Self::revert_plan(&applied, target) {
            let migration = self
                .migrations
                .iter()
                .find(|m| m.id() == id)
                .ok_or(MigrationError::UnknownApplied(id))?;

            let failed = |source| MigrationError::Failed {
                id: migration.id(),
                name: migration.name(),
                source,
            };

            let mut tx = pool.begin().await?;

            migration.down(&mut tx).await.map_err(failed)?;

            sqlx::query(r#"DELETE FROM "_migrations" WHERE "id" = $1"#)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(failed)?;

            tx.commit().await.map_err(failed)?;

            warn!(id = migration.id(), name = migration.name(), "reverted migration");
        }

        Ok(Self::latest_applied(pool).await?)
    }

    pub async fn status(&self, pool: &PgPool) -> Result<LedgerStatus, MigrationError> {
        Self::ensure_ledger_table(pool).await?;

        let applied: Vec<AppliedMigration> = sqlx::query_as(
            r#"SELECT "id", "name", "applied_at" FROM "_migrations" ORDER BY "id" ASC"#,
        )
        .fetch_all(pool)
        .await?;

        let latest = applied.last().map(|m| m.id);
        let pending = self
            .pending(latest)
            .into_iter()
            .map(|m| (m.id(), m.name()))
            .collect();

        Ok(LedgerStatus { applied, pending })
    }

    pub async fn has_pending(&self, pool: &PgPool) -> Result<bool, MigrationError> {
        Self::ensure_ledger_table(pool).await?;
        let latest = Self::latest_applied(pool).await?;
        Ok(!self.pending(latest).is_empty())
    }

    async fn ensure_ledger_table(pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS "_migrations" (
                "id" BIGINT NOT NULL,
                "name" TEXT NOT NULL,
                "applied_at" TIMESTAMPTZ NOT NULL DEFAULT now(),
                CONSTRAINT "PK_migrations" PRIMARY KEY ("id"),
                CONSTRAINT "UQ_migrations_name" UNIQUE ("name")
            )"#,
        )
        .execute(pool)
        .await?;
        Ok(())
    }

    async fn latest_applied(pool: &PgPool) -> Result<Option<i64>, sqlx::Error> {
        sqlx::query_scalar(r#"SELECT max("id") FROM "_migrations""#)
            .fetch_one(pool)
            .await
    }

    async fn applied_ids(pool: &PgPool) -> Result<Vec<i64>, sqlx::Error> {
        sqlx::query_scalar(r#"SELECT "id" FROM "_migrations" ORDER BY "id" ASC"#)
            .fetch_all(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop {
        id: i64,
        name: &'static str,
    }

    #[async_trait]
    impl Migration for Noop {
        fn id(&self) -> i64 {
            self.id
        }

        fn name(&self) -> &'static str {
            self.name
        }

        async fn up(&self, _conn: &mut PgConnection) -> Result<(), sqlx::Error> {
            Ok(())
        }

        async fn down(&self, _conn: &mut PgConnection) -> Result<(), sqlx::Error> {
            Ok(())
        }
    }

    fn noop(id: i64, name: &'static str) -> Box<dyn Migration> {
        Box::new(Noop { id, name })
    }

    #[test]
    fn rejects_ids_out_of_order() {
        let result = Ledger::new(vec![noop(1002, "b"), noop(1001, "a")]);
        assert!(matches!(result, Err(MigrationError::Conflict(_))));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = Ledger::new(vec![noop(1001, "a"), noop(1001, "b")]);
        assert!(matches!(result, Err(MigrationError::Conflict(_))));
    }

    #[test]
    fn rejects_duplicate_names() {
        let result = Ledger::new(vec![noop(1001, "a"), noop(1002, "a")]);
        assert!(matches!(result, Err(MigrationError::Conflict(_))));
    }

    #[test]
    fn pending_selects_everything_above_the_latest_applied() {
        let ledger =
            Ledger::new(vec![noop(1001, "a"), noop(1002, "b"), noop(1003, "c")]).unwrap();

        let all: Vec<i64> = ledger.pending(None).iter().map(|m| m.id()).collect();
        assert_eq!(all, vec![1001, 1002, 1003]);

        let some: Vec<i64> = ledger.pending(Some(1001)).iter().map(|m| m.id()).collect();
        assert_eq!(some, vec![1002, 1003]);

        assert!(ledger.pending(Some(1003)).is_empty());
    }

    #[test]
    fn revert_plan_is_descending_and_stops_at_the_target() {
        let plan = Ledger::revert_plan(&[1001, 1002, 1003], 1001);
        assert_eq!(plan, vec![1003, 1002]);

        assert!(Ledger::revert_plan(&[1001], 1001).is_empty());
        assert_eq!(Ledger::revert_plan(&[1001, 1002], 0), vec![1002, 1001]);
    }

    #[test]
    fn shipped_history_is_a_valid_ledger() {
        let ledger = Ledger::from_history().expect("history must validate");
        assert!(!ledger.pending(None).is_empty());
    }
}
