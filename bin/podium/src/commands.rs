//! Subcommand dispatch.

use std::sync::Arc;

use eyre::{Result, WrapErr};
use podium_ranking::{DistributedLock, RankStore, Ranking};
use podium_redis::{RedisLock, RedisStore};
use tracing::info;

use crate::{
    cli::{Cli, Command},
    config::PodiumConfig,
};

/// Load configuration, connect, and run the requested command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let mut config = PodiumConfig::load(cli.config.as_deref())?;
    config.apply_args(&cli.redis, &cli.ranking);

    let previous = matches!(cli.command, Command::RemoveAll { previous: true });
    let today = chrono::Utc::now().date_naive();
    let ranking_config = config.ranking_config(today, previous)?;

    let conn = podium_redis::connect(&config.redis.url)
        .await
        .wrap_err_with(|| format!("Failed to connect to {}", config.redis.url))?;
    let ranking = Ranking::with_config(
        Arc::new(RedisStore::new(conn.clone())),
        Arc::new(RedisLock::new(conn)),
        ranking_config,
    );
    info!(ranking = ranking.name(), mode = %ranking.config().mode, "opened ranking");

    execute(&ranking, cli.command).await
}

async fn execute<S, L>(ranking: &Ranking<S, L>, command: Command) -> Result<()>
where
    S: RankStore + ?Sized,
    L: DistributedLock + ?Sized,
{
    match command {
        Command::Add { uid, delta } => {
            let total = ranking.add_score(uid, delta).await?;
            println!("{total}");
        }
        Command::List { start, end } => {
            let entries = ranking.list(start, end).await?;
            let first = if start < 0 {
                // Negative starts count from the bottom; resolve for display.
                let len = i64::try_from(ranking.len().await?).unwrap_or(i64::MAX);
                (len + start).max(0)
            } else {
                start
            };
            for (rank, entry) in (first..).zip(entries) {
                println!("{rank}\t{}\t{}", entry.uid, entry.score);
            }
        }
        Command::Rank { uid } => match ranking.standing(uid).await? {
            Some(standing) => println!("{}\t{}", standing.rank, standing.score),
            None => println!("{uid} is not ranked"),
        },
        Command::Remove { uid } => {
            if ranking.remove(uid).await? {
                println!("removed {uid}");
            } else {
                println!("{uid} is not ranked");
            }
        }
        Command::RemoveAll { .. } => {
            let removed = ranking.remove_all().await?;
            info!(ranking = ranking.name(), removed, "board removed");
            println!("removed {} ({removed} participants)", ranking.name());
        }
    }
    Ok(())
}
