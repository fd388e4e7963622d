use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "dldv-proofer")]
#[command(about = "Verify a normalized applicant against the DLDV state ID service")]
pub struct CliArgs {
    /// Path to the TOML proofer configuration
    #[arg(short, long, default_value = "proofer.toml")]
    pub config: String,

    /// Path to a JSON file holding one normalized applicant record
    #[arg(short, long)]
    pub applicant: String,

    /// Authentication token to embed in the request
    #[arg(long, default_value = "")]
    pub auth_token: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}
