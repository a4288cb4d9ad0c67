use crate::demo::{run_demo, run_search, DemoArgs, SearchArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use workboard::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "workboard-api",
    about = "Serve, demonstrate and search the Workboard job marketplace",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Walk the job-post and application wizards through failures and success
    Demo(DemoArgs),
    /// Filter the listing catalog from the command line
    Search(SearchArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the directory holding the built single-page application
    #[arg(long)]
    pub(crate) static_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args),
        Command::Search(args) => run_search(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["workboard-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn serve_accepts_overrides() {
        let cli = Cli::try_parse_from([
            "workboard-api",
            "serve",
            "--port",
            "8080",
            "--static-dir",
            "dist",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Serve(args)) => {
                assert_eq!(args.port, Some(8080));
                assert_eq!(args.static_dir, Some(PathBuf::from("dist")));
                assert!(args.host.is_none());
            }
            other => panic!("expected serve command, got {other:?}"),
        }
    }

    #[test]
    fn search_splits_list_flags() {
        let cli = Cli::try_parse_from([
            "workboard-api",
            "search",
            "--workers",
            "--skills",
            "Forklift,Shipping",
            "--min-verification",
            "id_verified",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Search(args)) => {
                assert!(args.workers);
                assert_eq!(args.skills, vec!["Forklift", "Shipping"]);
                assert!(args.min_verification.is_some());
            }
            other => panic!("expected search command, got {other:?}"),
        }
    }

    #[test]
    fn search_rejects_unknown_verification_level() {
        assert!(Cli::try_parse_from([
            "workboard-api",
            "search",
            "--min-verification",
            "trusted"
        ])
        .is_err());
    }
}
