use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Compile a scan config (YAML or JSON) and show the result"
)]
pub struct Cli {
    /// Config file to compile (.yaml, .yml or .json)
    pub config: PathBuf,

    /// Working directory the config applies to (defaults to the current directory)
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Print the compiled config as JSON
    #[arg(long)]
    pub json: bool,
}
