use clap::Parser;

#[derive(Parser)]
#[command(name = "fy")]
#[command(about = "A multi-service command-line translator and dictionary.")]
#[command(version)]
pub struct Cli {
    /// Source language (canonical id, default auto-detect)
    #[arg(short = 'f', long, default_value = "auto")]
    pub from: String,

    /// Target language (canonical id, defaults to config)
    #[arg(short = 't', long)]
    pub to: Option<String>,

    /// Don't use cached result
    #[arg(short = 'n', long)]
    pub nocache: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Only query these providers (comma separated, e.g. youdao,deepl)
    #[arg(short = 'p', long)]
    pub providers: Option<String>,

    /// Choose color theme
    #[arg(short = 'T', long)]
    pub theme: Option<String>,

    /// Generate config sample
    #[arg(long)]
    pub generate_config: bool,

    /// Edit configuration file
    #[arg(long)]
    pub edit_config: bool,

    /// Show status
    #[arg(long)]
    pub status: bool,

    /// Query text
    #[arg(num_args = 1..)]
    pub query: Vec<String>,
}
