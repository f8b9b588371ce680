use registry_core::config::LoadOptions;

use crate::commands::{execute, open_database, CommandResult};

pub fn run(options: &LoadOptions) -> CommandResult {
    let outcome = execute("migrate", options, |config| async move {
        let pool = open_database(&config).await?;
        pool.close().await;
        Ok(())
    });

    match outcome {
        Ok(()) => CommandResult::success("migrate", "applied pending migrations"),
        Err(result) => result,
    }
}
