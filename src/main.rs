use std::env;
use std::io;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

use wal_frames::{create_wal_file, open_wal_file, SystemClock, WalConfig};

const ENTRIES: [(&str, &str); 2] = [
    ("name", "James Errington"),
    ("country", "United Kingdom"),
];

fn main() -> anyhow::Result<()> {
    let (writer, _guard) = tracing_appender::non_blocking(io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_timer(UtcTime::rfc_3339())
        .with_writer(writer)
        .init();

    let config = WalConfig::from_args(env::args().skip(1));

    let (path, mut wal) = create_wal_file(&config, &SystemClock)
        .with_context(|| format!("creating wal file under {}", config.data_dir.display()))?;
    wal.write_all_records(ENTRIES)?;
    wal.flush()?;
    info!(records = wal.records_written(), bytes = wal.bytes_written(), "wrote records");
    drop(wal);

    let reader = open_wal_file(&path)
        .with_context(|| format!("opening {}", path.display()))?;
    for s in reader {
        let s = s.with_context(|| format!("reading {}", path.display()))?;
        println!("{}", s);
    }

    Ok(())
}
