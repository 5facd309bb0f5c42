mod config;
mod output;
mod telemetry;

use clap::Parser;
use config::{CliArgs, CliConfig};
use short_duid::{BasicDuidGenerator, DuidGenerator, WallClock};
use telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    init_telemetry()?;
    let args = CliArgs::parse();
    let config = CliConfig::try_from(args)?;

    let generator = BasicDuidGenerator::new(
        config.shard_id,
        config.salt.as_str(),
        config.epoch_start,
        WallClock,
    );
    if config.drift_ms != 0 {
        generator.drift_time(config.drift_ms);
    }

    if cfg!(debug_assertions) {
        tracing::debug!("Generating IDs with full config: {:#?}", config);
    }
    tracing::info!(
        shard_id = generator.shard_id(),
        epoch_start = generator.epoch_start(),
        drift_ms = config.drift_ms,
        count = config.count,
        full_batch = config.full_batch,
        "generating ids"
    );

    let ids = if config.full_batch {
        generator.generate(config.count)?
    } else {
        generator.get_duid_int(config.count)?
    };
    if ids.len() != config.count {
        tracing::warn!(
            requested = config.count,
            returned = ids.len(),
            "legacy batch limit applied, pass --full-batch for the exact count"
        );
    }

    let stdout = std::io::stdout();
    output::write_ids(&mut stdout.lock(), &generator, &ids, config.format)?;
    Ok(())
}
