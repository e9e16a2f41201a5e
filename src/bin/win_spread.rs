// Compare projected season-end win totals for the teams in a matchup file.
//
// Usage: win-spread [MATCHUP.toml] [--json]
//
// Without a file the built-in Warriors vs 76ers demo is used. Logs go to
// stderr (filter with RUST_LOG); the chart goes to stdout.

use anyhow::{bail, Context};
use std::path::PathBuf;
use tracing::info;

use season_core::{ComparisonChart, JsonRenderer, MatchupConfig, Renderer, TextRenderer};

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    json: bool,
}

fn parse_args(args: impl Iterator<Item = String>) -> anyhow::Result<Args> {
    let mut parsed = Args::default();
    for arg in args {
        match arg.as_str() {
            "--json" => parsed.json = true,
            "-h" | "--help" => {
                println!("usage: win-spread [MATCHUP.toml] [--json]");
                std::process::exit(0);
            }
            flag if flag.starts_with('-') => bail!("unknown flag `{flag}`"),
            path => {
                if parsed.config.is_some() {
                    bail!("only one matchup file may be given");
                }
                parsed.config = Some(PathBuf::from(path));
            }
        }
    }
    Ok(parsed)
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("season_core=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let args = parse_args(std::env::args().skip(1))?;

    let config = match &args.config {
        Some(path) => MatchupConfig::load(path)
            .with_context(|| format!("failed to load matchup {}", path.display()))?,
        None => MatchupConfig::demo(),
    };
    info!(title = %config.title, teams = config.teams.len(), "matchup loaded");

    let teams = config
        .build_teams()
        .context("failed to compute win distributions")?;
    for team in &teams {
        let (low, high) = team.distribution().credible_interval(0.9);
        info!(
            team = team.name(),
            expected_wins = team.expected_wins(),
            low,
            high,
            "projected"
        );
    }

    let chart = ComparisonChart::from_teams(&config.title, &teams);
    let stdout = std::io::stdout().lock();
    if args.json {
        JsonRenderer::new(stdout).render(&chart)?;
    } else {
        TextRenderer::new(stdout).render(&chart)?;
    }
    Ok(())
}
