//! Terminal client: play a tournament round by round.
//!
//! Against a running `web` service:
//!     cargo run --bin rounds -- --tournament 1
//! Offline, with an in-process repository:
//!     cargo run --bin rounds -- --local --player Anna --player Bert --player Carl

use std::sync::{Arc, RwLock};

use anyhow::{bail, Context};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use dart_tournament_rounds::client::{
    Advance, HttpRepository, LocalRepository, MatchRepository, RankingsPresenter,
    RoundOrchestrator, SubmissionStatus,
};
use dart_tournament_rounds::models::{GroupStageFormat, NewTournament};
use dart_tournament_rounds::{
    ClientConfig, GameMatch, MatchId, PlayerId, Registry, RoundNumber, TournamentId,
};

/// Dart tournament rounds
///
/// Enter winners match by match and advance the tournament until the rankings are known.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Base URL of the match repository [env: DART_API_URL]
    #[arg(long, value_name = "url")]
    api: Option<String>,

    /// Tournament to play
    #[arg(long)]
    tournament: Option<TournamentId>,

    /// Round to start from
    #[arg(default_value_t = 1, long)]
    round: RoundNumber,

    /// Run against an in-process repository instead of the service
    #[arg(long)]
    local: bool,

    /// Player of the local tournament (repeat for each player)
    #[arg(long = "player", value_name = "name")]
    players: Vec<String>,

    /// Local tournament goes straight to the knockout stage
    #[arg(long)]
    no_group_stage: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    let args = Args::parse();

    if args.local {
        let (repository, tournament_id) = local_tournament(&args)?;
        let orchestrator = RoundOrchestrator::open(repository, tournament_id, 1).await?;
        return play(orchestrator).await;
    }

    let Some(tournament_id) = args.tournament else {
        bail!("--tournament is required unless --local is given");
    };
    let config = match args.api {
        Some(url) => ClientConfig::new(url),
        None => ClientConfig::from_env(),
    };
    let repository = HttpRepository::new(&config.api_url)?;
    let info = repository
        .fetch_tournament(tournament_id)
        .await
        .with_context(|| format!("loading tournament {tournament_id} from {}", config.api_url))?;
    println!("{} ({})", info.name, info.date);
    let orchestrator = RoundOrchestrator::open(repository, tournament_id, args.round).await?;
    play(orchestrator).await
}

fn local_tournament(args: &Args) -> anyhow::Result<(LocalRepository, TournamentId)> {
    let mut registry = Registry::new();
    let mut ids = Vec::with_capacity(args.players.len());
    for name in &args.players {
        ids.push(registry.add_player(name)?.player_id);
    }
    let mut request = NewTournament::new("Local tournament", ids);
    if args.no_group_stage {
        request.group_stage_format_id = GroupStageFormat::NoGroupStage;
    }
    let tournament_id = registry.create_tournament(&request)?;
    Ok((LocalRepository::new(Arc::new(RwLock::new(registry))), tournament_id))
}

fn print_help() {
    println!("show                           list the displayed matches");
    println!("win <match> <player> [second]  select the winner (and second place)");
    println!("next                           advance the tournament");
    println!("rankings                       show the current rankings");
    println!("quit                           leave");
}

fn name_of(game: &GameMatch, player_id: Option<PlayerId>) -> &str {
    player_id
        .and_then(|id| game.participant(id))
        .map_or("-", |p| p.name.as_str())
}

fn show<R: MatchRepository>(orchestrator: &RoundOrchestrator<R>) {
    let state = orchestrator.state();
    println!("{}", state.heading());
    for game in state.matches() {
        let group = game
            .group_number
            .map(|g| format!("[Group {g}] "))
            .unwrap_or_default();
        let players: Vec<String> = game
            .participants()
            .map(|p| format!("{} ({})", p.name, p.player_id))
            .collect();
        let players = players.join(" vs ");
        let status = match state.submission_status(game.match_id) {
            None => String::new(),
            Some(SubmissionStatus::Pending) => " (saving)".to_string(),
            Some(SubmissionStatus::Confirmed) => String::new(),
            Some(SubmissionStatus::Failed(reason)) => format!(" (not saved: {reason})"),
        };
        let mut line = format!(
            "  #{} {group}{players}  winner: {}",
            game.match_id,
            name_of(game, state.winner(game.match_id))
        );
        if state.has_player3() {
            line.push_str(&format!("  second: {}", name_of(game, state.second_place(game.match_id))));
        }
        println!("{line}{status}");
    }
    if let Some(error) = state.error() {
        println!("! {error}");
    }
    println!("[{}]", state.finish_label());
}

async fn play<R: MatchRepository>(orchestrator: RoundOrchestrator<R>) -> anyhow::Result<()> {
    show(&orchestrator);
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => {}
            ["show"] => show(&orchestrator),
            ["help"] => print_help(),
            ["quit"] | ["exit"] => break,
            ["win", game, winner, rest @ ..] if rest.len() <= 1 => {
                let parsed = (
                    game.parse::<MatchId>(),
                    winner.parse::<PlayerId>(),
                    rest.first().map(|s| s.parse::<PlayerId>()).transpose(),
                );
                let (Ok(game), Ok(winner), Ok(second)) = parsed else {
                    println!("? ids must be numbers");
                    continue;
                };
                match orchestrator.record_result(game, winner, second).await {
                    Ok(Some(SubmissionStatus::Failed(reason))) => println!("? not saved: {reason}"),
                    Ok(_) => println!("= ok"),
                    Err(e) => println!("? {e}"),
                }
            }
            ["next"] => match orchestrator.advance().await {
                Ok(Advance::Finished) => {
                    let presenter =
                        RankingsPresenter::open(orchestrator.repository(), orchestrator.tournament_id()).await;
                    print!("{presenter}");
                    break;
                }
                Ok(_) => show(&orchestrator),
                Err(e) => println!("? {e}"),
            },
            ["rankings"] => {
                let presenter =
                    RankingsPresenter::open(orchestrator.repository(), orchestrator.tournament_id()).await;
                print!("{presenter}");
            }
            _ => println!("? unknown command, try 'help'"),
        }
    }
    Ok(())
}
