use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use short_duid::SHORT_DUID_EPOCH;

/// How generated IDs are written to stdout.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One exact decimal integer per line.
    Int,
    /// One salt-keyed short string per line.
    Short,
    /// A JSON array of `{ "id": "<decimal>", "short": "<string>" }` objects.
    Json,
}

/// Runtime configuration for the `short-duid` binary.
///
/// All values are parsed from CLI arguments or environment variables (a `.env`
/// file is loaded first if present).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "short-duid",
    version,
    about = "Print batches of sortable, shard-aware distributed unique IDs"
)]
pub struct CliArgs {
    /// Shard identity embedded in every ID. Only the low 10 bits are kept.
    ///
    /// Environment variable: `SHARD_ID`
    #[arg(long, env = "SHARD_ID", default_value_t = 0)]
    pub shard_id: u64,

    /// Salt keying the short string encoding.
    ///
    /// Environment variable: `DUID_SALT`
    #[arg(long, env = "DUID_SALT")]
    pub salt: String,

    /// Epoch origin in milliseconds since the Unix epoch. Future values fall
    /// back to the Unix epoch.
    ///
    /// Environment variable: `EPOCH_START`
    #[arg(long, env = "EPOCH_START", default_value_t = SHORT_DUID_EPOCH, allow_negative_numbers = true)]
    pub epoch_start: i64,

    /// Number of IDs to generate.
    ///
    /// Environment variable: `COUNT`
    #[arg(short = 'n', long, env = "COUNT", default_value_t = 1, allow_negative_numbers = true)]
    pub count: i64,

    /// Output format.
    ///
    /// Environment variable: `FORMAT`
    #[arg(long, env = "FORMAT", value_enum, default_value_t = OutputFormat::Short)]
    pub format: OutputFormat,

    /// Clock drift in milliseconds applied before generating, e.g. `-5000` to
    /// simulate a clock running five seconds behind.
    ///
    /// Environment variable: `DRIFT_MS`
    #[arg(long, env = "DRIFT_MS", default_value_t = 0, allow_negative_numbers = true)]
    pub drift_ms: i64,

    /// Return exactly `count` IDs instead of applying the legacy per-tick
    /// batch limit (`count % 8192`).
    ///
    /// Environment variable: `FULL_BATCH`
    #[arg(long, env = "FULL_BATCH", default_value_t = false)]
    pub full_batch: bool,
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub shard_id: u64,
    pub salt: String,
    pub epoch_start: i64,
    pub count: usize,
    pub format: OutputFormat,
    pub drift_ms: i64,
    pub full_batch: bool,
}

impl TryFrom<CliArgs> for CliConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.count < 0 {
            bail!("COUNT must not be negative (got {})", args.count);
        }
        let count = usize::try_from(args.count).context("COUNT does not fit in usize")?;

        Ok(Self {
            shard_id: args.shard_id,
            salt: args.salt,
            epoch_start: args.epoch_start,
            count,
            format: args.format,
            drift_ms: args.drift_ms,
            full_batch: args.full_batch,
        })
    }
}
