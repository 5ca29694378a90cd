//! LRU Memory Cache - command replay tool
//!
//! Reads one command per line from stdin and applies it to a cache built
//! from the environment configuration:
//!
//! ```text
//! put <key> <value>
//! get <key>
//! remove <key>
//! evict
//! dump
//! stats
//! clear
//! ```

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lru_memory_cache::{CacheConfig, LruCache};

/// A parsed input line.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Put { key: &'a str, value: &'a str },
    Get { key: &'a str },
    Remove { key: &'a str },
    Evict,
    Dump,
    Stats,
    Clear,
}

fn parse_command(line: &str) -> anyhow::Result<Command<'_>> {
    let line = line.trim();
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim_start();

    let command = match verb {
        "put" => {
            let (key, value) = rest
                .split_once(' ')
                .context("usage: put <key> <value>")?;
            Command::Put { key, value }
        }
        "get" if !rest.is_empty() => Command::Get { key: rest },
        "remove" if !rest.is_empty() => Command::Remove { key: rest },
        "evict" => Command::Evict,
        "dump" => Command::Dump,
        "stats" => Command::Stats,
        "clear" => Command::Clear,
        other => bail!("unknown command: {other:?}"),
    };
    Ok(command)
}

fn run(cache: &mut LruCache, command: Command<'_>, out: &mut impl Write) -> anyhow::Result<()> {
    match command {
        Command::Put { key, value } => cache.put(key, value.to_string()),
        Command::Get { key } => match cache.get_ref(key) {
            Some(value) => writeln!(out, "{value}")?,
            None => writeln!(out, "(nil)")?,
        },
        Command::Remove { key } => {
            let removed = cache.remove(key).is_some();
            writeln!(out, "{}", u8::from(removed))?;
        }
        Command::Evict => match cache.evict_one() {
            Some((key, _)) => writeln!(out, "evicted {key}")?,
            None => writeln!(out, "(empty)")?,
        },
        Command::Dump => {
            for (key, value) in cache.iter() {
                writeln!(out, "{key}\t{value}")?;
            }
        }
        Command::Stats => {
            serde_json::to_writer(&mut *out, &cache.stats())?;
            writeln!(out)?;
        }
        Command::Clear => cache.clear(),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lru_memory_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = CacheConfig::from_env();
    config.validate().context("invalid cache configuration")?;
    info!(
        "Configuration loaded: max_entries={:?}, max_bytes={:?}, policy={}",
        config.max_entries, config.max_bytes, config.policy
    );

    let mut cache = LruCache::from_config(&config);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for (lineno, line) in stdin.lock().lines().enumerate() {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_command(&line) {
            Ok(command) => {
                debug!("line {}: {:?}", lineno + 1, command);
                run(&mut cache, command, &mut out)?;
            }
            Err(err) => writeln!(out, "error on line {}: {err}", lineno + 1)?,
        }
    }

    let stats = cache.stats();
    info!(
        "Replay finished: {} entries, {} evictions, {} dropped writes",
        stats.total_entries, stats.evictions, stats.dropped_writes
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replay(lines: &[&str]) -> String {
        let mut cache = LruCache::new();
        let mut out = Vec::new();
        for line in lines {
            let command = parse_command(line).unwrap();
            run(&mut cache, command, &mut out).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_put_keeps_spaces_in_value() {
        assert_eq!(
            parse_command("put greeting hello world").unwrap(),
            Command::Put {
                key: "greeting",
                value: "hello world"
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_lines() {
        assert!(parse_command("put onlykey").is_err());
        assert!(parse_command("get").is_err());
        assert!(parse_command("frobnicate x").is_err());
    }

    #[test]
    fn test_replay_dump_order() {
        let out = replay(&["put k1 v1", "put k2 v2", "put k3 v3", "get k2", "dump"]);
        assert_eq!(out, "v2\nk2\tv2\nk3\tv3\nk1\tv1\n");
    }

    #[test]
    fn test_replay_miss_and_evict() {
        let out = replay(&["get missing", "put a 1", "evict", "evict"]);
        assert_eq!(out, "(nil)\nevicted a\n(empty)\n");
    }

    #[test]
    fn test_replay_stats_is_json() {
        let out = replay(&["put a 1", "get a", "stats"]);
        let json: serde_json::Value = serde_json::from_str(out.lines().last().unwrap()).unwrap();
        assert_eq!(json["hits"], 1);
        assert_eq!(json["total_entries"], 1);
    }
}
