use clap::{Parser, Subcommand};

/// Banner rotation service
#[derive(Parser, Debug)]
#[command(name = "banner-rotator", version, about)]
pub struct Cli {
    /// 配置文件路径
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server (default when no subcommand is given)
    Serve,
    /// Apply database migrations and exit
    Migrate,
}
