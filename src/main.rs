use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use monthlywrap::{
    cli, config, error,
    utils::{DEFAULT_LIMIT, MAX_LIMIT, MIN_LIMIT},
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the OAuth and proxy backend
    Serve,

    /// Show your monthly wrap from a running backend
    Wrap(WrapOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct WrapOptions {
    /// Backend base URL (defaults to MONTHLYWRAP_BACKEND or http://localhost:8080)
    #[clap(long)]
    pub backend: Option<String>,

    /// Session id printed after logging in
    #[clap(long, env = "MONTHLYWRAP_SESSION")]
    pub session: Option<String>,

    /// Number of top tracks to show
    #[clap(
        long,
        default_value_t = DEFAULT_LIMIT,
        value_parser = clap::value_parser!(u8).range((MIN_LIMIT as i64)..=(MAX_LIMIT as i64))
    )]
    pub limit: u8,

    /// Read new limits from stdin and reload on each
    #[clap(long)]
    pub interactive: bool,

    /// Open the login page in the browser when not logged in
    #[clap(long)]
    pub open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve().await,
        Command::Wrap(opt) => {
            let backend = opt.backend.unwrap_or_else(config::backend_url);
            cli::wrap(backend, opt.session, opt.limit, opt.interactive, opt.open).await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
