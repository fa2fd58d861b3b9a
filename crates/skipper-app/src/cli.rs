use clap::Parser;

/// Skipper launches the station applications, waits for the chart
/// service, and pins each window to its configured monitor.
#[derive(Parser, Debug)]
#[command(name = "skipper", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log filter directive override (e.g. "skipper=debug").
    #[arg(long)]
    pub log_level: Option<String>,

    /// Launch the applications but skip the browser viewer.
    #[arg(long)]
    pub skip_viewer: bool,

    /// Print the enumerated monitor table and exit.
    #[arg(long)]
    pub print_monitors: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
