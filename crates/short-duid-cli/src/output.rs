use crate::config::OutputFormat;
use serde::Serialize;
use short_duid::{DuidGenerator, DuidId, TimeSource, as_decimal_duid};
use std::io::Write;

#[derive(Serialize)]
struct Record {
    #[serde(with = "as_decimal_duid")]
    id: DuidId,
    short: String,
}

/// Writes `ids` in the requested format, one record per line for the plain
/// formats.
pub fn write_ids<W, G, T>(
    out: &mut W,
    generator: &G,
    ids: &[DuidId],
    format: OutputFormat,
) -> anyhow::Result<()>
where
    W: Write,
    G: DuidGenerator<T>,
    T: TimeSource<i64>,
{
    match format {
        OutputFormat::Int => {
            for id in ids {
                writeln!(out, "{id}")?;
            }
        }
        OutputFormat::Short => {
            for id in ids {
                writeln!(out, "{}", generator.encode(*id))?;
            }
        }
        OutputFormat::Json => {
            let records: Vec<Record> = ids
                .iter()
                .map(|&id| Record {
                    id,
                    short: generator.encode(id),
                })
                .collect();
            serde_json::to_writer_pretty(&mut *out, &records)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}
