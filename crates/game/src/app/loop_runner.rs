use std::path::Path;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::Duration;

use hotswap_engine::{
    AssetPropagator, ContentManager, ContentWatcher, DirectorySource, HostVersion,
    PropagationResult, SharedLoader, TableError, WatchError,
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::bootstrap::AppWiring;
use crate::core_assets::core_asset_table;
use crate::world::{draw_frame, GameWorld};

#[derive(Debug, Error)]
pub(crate) enum LoopError {
    #[error("core asset table is invalid: {0}")]
    Table(#[from] TableError),
    #[error("content watch failed: {0}")]
    Watch(#[from] WatchError),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TickSummary {
    pub(crate) changed: usize,
    pub(crate) applied: usize,
    pub(crate) not_applicable: usize,
    pub(crate) failed: usize,
}

pub(crate) struct ReloadLoop {
    manager: Rc<ContentManager>,
    content: SharedLoader,
    watcher: ContentWatcher,
    table: AssetPropagator<GameWorld>,
    world: GameWorld,
}

impl ReloadLoop {
    pub(crate) fn new(
        content_dir: &Path,
        version: HostVersion,
        world: GameWorld,
    ) -> Result<Self, LoopError> {
        let table = core_asset_table(version)?;
        let manager = Rc::new(ContentManager::new(DirectorySource::new(content_dir)));
        let content: SharedLoader = manager.clone();
        let watcher = ContentWatcher::new(content_dir)?;
        info!(
            source = %manager.describe_source(),
            host_version = %version,
            exact_handlers = table.exact_handler_count(),
            namespaces = table.namespace_count(),
            tracked_files = watcher.tracked_file_count(),
            locations = ?world.location_names(),
            live_buildings = world.building_count(),
            "reload_loop_ready"
        );
        Ok(Self {
            manager,
            content,
            watcher,
            table,
            world,
        })
    }

    pub(crate) fn world(&self) -> &GameWorld {
        &self.world
    }

    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut GameWorld {
        &mut self.world
    }

    pub(crate) fn tick(&mut self, wait: Duration) -> TickSummary {
        let changed = self.watcher.poll_timeout(wait);
        let mut summary = TickSummary {
            changed: changed.len(),
            ..TickSummary::default()
        };
        if changed.is_empty() {
            return summary;
        }

        for key in &changed {
            let was_cached = self.manager.invalidate(key);
            match self.table.propagate_key(&self.content, &mut self.world, key) {
                Ok(PropagationResult::Applied) => {
                    summary.applied += 1;
                    info!(key = %key, was_cached, "asset_reloaded");
                }
                Ok(PropagationResult::NotApplicable) => {
                    summary.not_applicable += 1;
                    debug!(key = %key, was_cached, "asset_reload_skipped");
                }
                Err(err) => {
                    summary.failed += 1;
                    warn!(key = %key, error = %err, "asset_reload_failed");
                }
            }
        }

        let frame = draw_frame(&mut self.world);
        for failure in &frame.failures {
            warn!(key = %failure.key(), error = %failure, "deferred_asset_failed");
        }
        debug!(
            drawn = frame.drawn,
            unloaded = frame.unloaded,
            failed = frame.failures.len(),
            source_reads = self.manager.source_reads(),
            "frame_drawn"
        );
        summary
    }
}

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let content_dir = app.content_dir();
    let version = app.config.host_version;
    let mut reload = match ReloadLoop::new(&content_dir, version, GameWorld::sample(version)) {
        Ok(reload) => reload,
        Err(err) => {
            error!(error = %err, "startup_failed");
            return ExitCode::FAILURE;
        }
    };
    if let Some(player) = &reload.world().player {
        info!(player = %player.name, "player_loaded");
    }

    let interval = Duration::from_millis(app.config.poll_interval_ms);
    let mut polls = 0u64;
    while app.config.max_polls.map_or(true, |max| polls < max) {
        let summary = reload.tick(interval);
        polls += 1;
        if summary.changed > 0 {
            info!(
                changed = summary.changed,
                applied = summary.applied,
                not_applicable = summary.not_applicable,
                failed = summary.failed,
                "reload_tick_finished"
            );
        }
    }

    info!(polls, "reload_loop_stopped");
    ExitCode::SUCCESS
}
