use registry_core::config::LoadOptions;
use registry_db::{DemoDataset, SqlCustomerRepository};

use crate::commands::{execute, open_database, CommandResult, Failure};

pub fn run(options: &LoadOptions) -> CommandResult {
    let outcome = execute("seed", options, |config| async move {
        let pool = open_database(&config).await?;
        let loaded = DemoDataset::load(SqlCustomerRepository::new(pool.clone()))
            .await
            .map_err(Failure::from);
        pool.close().await;
        loaded
    });

    match outcome {
        Ok(seeded) => CommandResult::success_with_data(
            "seed",
            seed_message(seeded.inserted.len(), seeded.skipped.len()),
            &seeded,
        ),
        Err(result) => result,
    }
}

fn seed_message(inserted: usize, skipped: usize) -> String {
    if inserted == 0 {
        format!("demo customers already present ({skipped} skipped)")
    } else {
        format!("registered {inserted} demo customers ({skipped} already present)")
    }
}

#[cfg(test)]
mod tests {
    use super::seed_message;

    #[test]
    fn seed_message_reports_rerun_as_noop() {
        assert_eq!(seed_message(0, 3), "demo customers already present (3 skipped)");
        assert_eq!(seed_message(2, 1), "registered 2 demo customers (1 already present)");
    }
}
