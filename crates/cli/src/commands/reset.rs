use regimen_core::config::{AppConfig, LoadOptions};
use regimen_core::SnapshotStore;
use regimen_store::FileSnapshotStore;

use super::CommandResult;

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("reset", "configuration", error.to_string(), 1)
        }
    };

    let store = FileSnapshotStore::new(&config.storage.path);
    match store.reset_persisted_state() {
        Ok(()) => CommandResult::success(
            "reset",
            format!("persisted quiz progress cleared from `{}`", config.storage.path.display()),
        ),
        Err(error) => CommandResult::failure("reset", "persistence", error.to_string(), 1),
    }
}
