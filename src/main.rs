use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use torrent_bench_charts::report::{dump_data, generate_charts, print_tables};

#[derive(Parser)]
#[command(name = "torrent-bench-charts")]
#[command(about = "Render comparison charts from torrent creation benchmarks")]
struct Cli {
    /// Output directory for the chart images
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Print the underlying benchmark tables to the console
    #[arg(long, default_value = "false")]
    tables: bool,

    /// Also write the chart data as JSON
    #[arg(long, default_value = "false")]
    dump_data: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.tables {
        print_tables()?;
    }

    generate_charts(&cli.output)?;

    if cli.dump_data {
        dump_data(&cli.output)?;
    }

    Ok(())
}
