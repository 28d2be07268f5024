//! Migration runner.
//!
//! Resolves the registered revisions into a linear history, works out which
//! revisions lie between the current version and a target, and runs each one
//! inside its own transaction together with the version table update.

use crate::error::{MigrateError, MigrateResult};
use crate::revision::{Capabilities, MigrationContext, Revision};
use crate::version_table::VersionTable;
use rl_core::{RevisionGraph, RevisionId};
use rl_db::{Database, DatabaseCore};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Where a migration should end up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// The latest revision
    Head,
    /// Before the first revision
    Base,
    /// A full revision id or a unique prefix of one
    Revision(String),
    /// A number of steps relative to the current revision (`+1`, `-2`)
    Relative(i64),
}

impl FromStr for Target {
    type Err = MigrateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "" => Err(MigrateError::InvalidTarget("empty target".to_string())),
            "head" | "heads" => Ok(Target::Head),
            "base" => Ok(Target::Base),
            _ if s.starts_with('+') || s.starts_with('-') => s
                .parse::<i64>()
                .map(Target::Relative)
                .map_err(|_| MigrateError::InvalidTarget(format!("'{s}' is not a relative step"))),
            _ => Ok(Target::Revision(s.to_string())),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Head => write!(f, "head"),
            Target::Base => write!(f, "base"),
            Target::Revision(id) => write!(f, "{id}"),
            Target::Relative(n) => write!(f, "{n:+}"),
        }
    }
}

/// Direction of a migration step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Upgrade,
    Downgrade,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Upgrade => write!(f, "upgrade"),
            Direction::Downgrade => write!(f, "downgrade"),
        }
    }
}

/// One revision to run in one direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationStep {
    pub revision: RevisionId,
    pub message: &'static str,
    pub direction: Direction,
    /// Version recorded once the step commits (`None` = base)
    pub resulting_version: Option<RevisionId>,
}

/// A revision as listed by [`Migrator::history`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub revision: RevisionId,
    pub down_revision: Option<RevisionId>,
    pub message: &'static str,
    pub applied: bool,
    pub is_current: bool,
    pub is_head: bool,
}

/// Applies and reverts registered revisions against one database
pub struct Migrator {
    db: Arc<dyn Database>,
    revisions: HashMap<RevisionId, Box<dyn Revision>>,
    graph: RevisionGraph,
    capabilities: Capabilities,
    version_table: VersionTable,
}

impl Migrator {
    /// Build a migrator over `revisions`, validating the history.
    ///
    /// Capabilities default to those of the connected dialect.
    pub fn new(db: Arc<dyn Database>, revisions: Vec<Box<dyn Revision>>) -> MigrateResult<Self> {
        let mut links = Vec::with_capacity(revisions.len());
        let mut by_id = HashMap::with_capacity(revisions.len());
        for revision in revisions {
            let id = RevisionId::parse(revision.id())?;
            let down = revision.down_revision().map(RevisionId::parse).transpose()?;
            links.push((id.clone(), down));
            by_id.insert(id, revision);
        }
        let graph = RevisionGraph::build(&links)?;
        let capabilities = Capabilities::for_dialect(db.dialect());

        Ok(Self {
            db,
            revisions: by_id,
            graph,
            capabilities,
            version_table: VersionTable::default(),
        })
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_version_table(mut self, version_table: VersionTable) -> Self {
        self.version_table = version_table;
        self
    }

    pub fn graph(&self) -> &RevisionGraph {
        &self.graph
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn db(&self) -> &dyn Database {
        self.db.as_ref()
    }

    /// The revision recorded in the version table, `None` at base.
    pub async fn current(&self) -> MigrateResult<Option<RevisionId>> {
        self.version_table.ensure(self.db.as_ref()).await?;
        let current = self.version_table.current(self.db.as_ref()).await?;
        if let Some(id) = &current {
            if !self.graph.contains(id) {
                return Err(rl_core::CoreError::UnknownRevision { id: id.to_string() }.into());
            }
        }
        Ok(current)
    }

    /// Number of applied revisions for a recorded version (0 = base)
    fn level_of(&self, version: Option<&RevisionId>) -> usize {
        version
            .and_then(|id| self.graph.position(id))
            .map_or(0, |pos| pos + 1)
    }

    /// Version recorded at a level (0 = base)
    fn version_at(&self, level: usize) -> Option<RevisionId> {
        level
            .checked_sub(1)
            .map(|idx| self.graph.ordered()[idx].clone())
    }

    fn resolve_level(&self, target: &Target, current: usize) -> MigrateResult<usize> {
        match target {
            Target::Head => Ok(self.graph.len()),
            Target::Base => Ok(0),
            Target::Revision(partial) => {
                let id = self.graph.resolve(partial)?;
                Ok(self.level_of(Some(&id)))
            }
            Target::Relative(steps) => i64::try_from(current)
                .ok()
                .and_then(|level| level.checked_add(*steps))
                .and_then(|level| usize::try_from(level).ok())
                .filter(|level| *level <= self.graph.len())
                .ok_or_else(|| {
                    MigrateError::InvalidTarget(format!(
                        "{target} from level {current} falls outside a history of {} revisions",
                        self.graph.len()
                    ))
                }),
        }
    }

    /// Work out the steps that move the database to `target`.
    pub async fn plan(&self, direction: Direction, target: &Target) -> MigrateResult<Vec<MigrationStep>> {
        let current_version = self.current().await?;
        let current = self.level_of(current_version.as_ref());
        let goal = self.resolve_level(target, current)?;

        let describe = |level: usize| {
            self.version_at(level)
                .map_or_else(|| "base".to_string(), |id| id.to_string())
        };

        let steps: Vec<MigrationStep> = match direction {
            Direction::Upgrade => {
                if goal < current {
                    return Err(MigrateError::InvalidTarget(format!(
                        "{} is behind the current revision {}; use downgrade",
                        describe(goal),
                        describe(current)
                    )));
                }
                (current..goal)
                    .map(|idx| self.step(idx, Direction::Upgrade, self.version_at(idx + 1)))
                    .collect()
            }
            Direction::Downgrade => {
                if goal > current {
                    return Err(MigrateError::InvalidTarget(format!(
                        "{} is ahead of the current revision {}; use upgrade",
                        describe(goal),
                        describe(current)
                    )));
                }
                (goal..current)
                    .rev()
                    .map(|idx| self.step(idx, Direction::Downgrade, self.version_at(idx)))
                    .collect()
            }
        };
        Ok(steps)
    }

    fn step(&self, idx: usize, direction: Direction, resulting_version: Option<RevisionId>) -> MigrationStep {
        let revision = self.graph.ordered()[idx].clone();
        let message = self
            .revisions
            .get(&revision)
            .map_or("", |r| r.message());
        MigrationStep {
            revision,
            message,
            direction,
            resulting_version,
        }
    }

    /// Apply revisions up to `target`, returning the steps that ran.
    pub async fn upgrade(&self, target: &Target) -> MigrateResult<Vec<MigrationStep>> {
        self.run(Direction::Upgrade, target).await
    }

    /// Revert revisions down to `target`, returning the steps that ran.
    pub async fn downgrade(&self, target: &Target) -> MigrateResult<Vec<MigrationStep>> {
        self.run(Direction::Downgrade, target).await
    }

    async fn run(&self, direction: Direction, target: &Target) -> MigrateResult<Vec<MigrationStep>> {
        let steps = self.plan(direction, target).await?;
        if steps.is_empty() {
            log::info!("Nothing to {direction}: already at {target}");
        }
        for step in &steps {
            self.run_step(step).await?;
        }
        Ok(steps)
    }

    /// Run one step and its version update in a single transaction, rolling
    /// back on error.
    async fn run_step(&self, step: &MigrationStep) -> MigrateResult<()> {
        let revision = self.revisions.get(&step.revision).ok_or_else(|| {
            rl_core::CoreError::UnknownRevision {
                id: step.revision.to_string(),
            }
        })?;
        let db = self.db.as_ref();
        let ctx = MigrationContext::new(db, self.capabilities);

        log::info!(
            "Running {} {} ({}) on {}",
            step.direction,
            step.revision,
            step.message,
            db.db_type()
        );

        db.begin()
            .await
            .map_err(|e| MigrateError::TransactionError(format!("BEGIN failed: {e}")))?;

        let body = match step.direction {
            Direction::Upgrade => revision.upgrade(&ctx).await,
            Direction::Downgrade => revision.downgrade(&ctx).await,
        };
        let result = match body {
            Ok(()) => {
                self.version_table
                    .set(db, step.resulting_version.as_ref())
                    .await
            }
            Err(source) => Err(MigrateError::RevisionFailed {
                revision: step.revision.to_string(),
                direction: step.direction,
                source,
            }),
        };

        match &result {
            Ok(()) => {
                if let Err(commit_err) = db.commit().await {
                    if let Err(rollback_err) = db.rollback().await {
                        log::warn!("ROLLBACK after failed COMMIT failed: {rollback_err}");
                    }
                    return Err(MigrateError::TransactionError(format!(
                        "COMMIT failed: {commit_err}"
                    )));
                }
            }
            Err(err) => {
                log::warn!("Rolling back {} {}: {err}", step.direction, step.revision);
                if let Err(rollback_err) = db.rollback().await {
                    log::warn!("ROLLBACK failed: {rollback_err}");
                }
            }
        }
        result
    }

    /// Record `target` as the current revision without running anything.
    ///
    /// Absolute targets never read the recorded version, so a version table
    /// holding an unknown id can be overwritten.
    pub async fn stamp(&self, target: &Target) -> MigrateResult<Option<RevisionId>> {
        let current = match target {
            Target::Relative(_) => self.level_of(self.current().await?.as_ref()),
            _ => {
                self.version_table.ensure(self.db.as_ref()).await?;
                0
            }
        };
        let version = self.version_at(self.resolve_level(target, current)?);
        self.version_table.set(self.db.as_ref(), version.as_ref()).await?;
        log::info!(
            "Stamped version table with {}",
            version.as_deref().unwrap_or("base")
        );
        Ok(version)
    }

    /// Every revision in apply order, marked with its applied state.
    pub async fn history(&self) -> MigrateResult<Vec<HistoryEntry>> {
        let current_version = self.current().await?;
        let applied = self.level_of(current_version.as_ref());
        let head = self.graph.head();

        Ok(self
            .graph
            .ordered()
            .iter()
            .enumerate()
            .map(|(idx, id)| HistoryEntry {
                revision: id.clone(),
                down_revision: self.graph.down_revision(id).cloned(),
                message: self.revisions.get(id).map_or("", |r| r.message()),
                applied: idx < applied,
                is_current: current_version.as_ref() == Some(id),
                is_head: head == Some(id),
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
