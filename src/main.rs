use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use serde::Deserialize;
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;

use idl_event_normalizer::normalization::{EventNormalizer, NormalizedEvent, NormalizerOptions};
use idl_event_normalizer::types::config::app::AppConfig;
use idl_event_normalizer::{Idl, RuntimeValue};

const DEFAULT_CONFIG_PATH: &str = "config/config.json";

/// One decoded event as handed over by the decoding layer.
#[derive(Debug, Deserialize)]
struct DecodedEventInput {
    name: String,
    #[serde(default)]
    data: serde_json::Value,
}

struct Args {
    events_path: PathBuf,
    config_path: PathBuf,
}

fn parse_args(args: &[String]) -> anyhow::Result<Args> {
    let mut events_path = None;
    let mut config_path = PathBuf::from(DEFAULT_CONFIG_PATH);

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            let path = iter.next().context("--config requires a path")?;
            config_path = PathBuf::from(path);
        } else if events_path.is_none() {
            events_path = Some(PathBuf::from(arg));
        } else {
            anyhow::bail!("Unexpected argument: {}", arg);
        }
    }

    let events_path =
        events_path.context("Usage: event-normalizer <events.json> [--config <path>]")?;

    Ok(Args {
        events_path,
        config_path,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let args = parse_args(&args)?;

    let config = AppConfig::load(&args.config_path)?;
    let idl = Idl::from_path(&config.idl_path, config.normalization.duplicate_types)
        .with_context(|| format!("Failed to load IDL at {}", config.idl_path.display()))?;

    tracing::info!(
        "Loaded IDL {} with {} type(s) and {} event(s)",
        idl.name.as_deref().unwrap_or("<unnamed>"),
        idl.registry.len(),
        idl.events.len()
    );

    let inputs = load_events(&args.events_path)?;
    let total = inputs.len();
    let results = normalize_all(Arc::new(idl), config.normalization.options(), inputs).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut failed = 0usize;
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(event) => {
                serde_json::to_writer(&mut out, &event)?;
                writeln!(out)?;
            }
            Err(e) => {
                failed += 1;
                tracing::error!("Event #{} failed: {:#}", index, e);
            }
        }
    }
    out.flush()?;

    tracing::info!(
        "Normalized {} of {} event(s), {} failed",
        total - failed,
        total,
        failed
    );

    Ok(())
}

fn load_events(path: &Path) -> anyhow::Result<Vec<DecodedEventInput>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read events file at {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse events file at {}", path.display()))
}

/// Normalize events on blocking worker threads, one chunk per worker.
/// Results come back in input order.
async fn normalize_all(
    idl: Arc<Idl>,
    options: NormalizerOptions,
    inputs: Vec<DecodedEventInput>,
) -> anyhow::Result<Vec<anyhow::Result<NormalizedEvent>>> {
    let workers = std::thread::available_parallelism().map_or(1, |n| n.get());
    normalize_in_chunks(idl, options, inputs, workers).await
}

async fn normalize_in_chunks(
    idl: Arc<Idl>,
    options: NormalizerOptions,
    inputs: Vec<DecodedEventInput>,
    workers: usize,
) -> anyhow::Result<Vec<anyhow::Result<NormalizedEvent>>> {
    let mut tasks = JoinSet::new();
    for (chunk_index, chunk) in chunk_inputs(inputs, workers).into_iter().enumerate() {
        let idl = Arc::clone(&idl);
        tasks.spawn_blocking(move || {
            let normalizer = EventNormalizer::new(&idl.registry, options);
            let results: Vec<anyhow::Result<NormalizedEvent>> = chunk
                .into_iter()
                .map(|input| normalize_input(&idl, &normalizer, input))
                .collect();
            (chunk_index, results)
        });
    }

    let mut finished = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        finished.push(joined.context("Normalization worker panicked")?);
    }
    finished.sort_by_key(|(chunk_index, _)| *chunk_index);

    Ok(finished.into_iter().flat_map(|(_, results)| results).collect())
}

/// Split into at most `workers` contiguous chunks of near-equal size.
fn chunk_inputs<T>(inputs: Vec<T>, workers: usize) -> Vec<Vec<T>> {
    let chunk_size = inputs.len().div_ceil(workers.max(1)).max(1);

    let mut chunks = Vec::new();
    let mut iter = inputs.into_iter().peekable();
    while iter.peek().is_some() {
        chunks.push(iter.by_ref().take(chunk_size).collect());
    }
    chunks
}

fn normalize_input(
    idl: &Idl,
    normalizer: &EventNormalizer<'_>,
    input: DecodedEventInput,
) -> anyhow::Result<NormalizedEvent> {
    let definition = idl
        .event(&input.name)
        .with_context(|| format!("Event '{}' is not declared in the IDL", input.name))?;
    let data = RuntimeValue::from_json(input.data);
    Ok(normalizer.normalize_event(definition, &data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let parsed = parse_args(&args(&["bin", "events.json"])).unwrap();
        assert_eq!(parsed.events_path, PathBuf::from("events.json"));
        assert_eq!(parsed.config_path, PathBuf::from(DEFAULT_CONFIG_PATH));

        let parsed = parse_args(&args(&["bin", "--config", "c.json", "e.json"])).unwrap();
        assert_eq!(parsed.events_path, PathBuf::from("e.json"));
        assert_eq!(parsed.config_path, PathBuf::from("c.json"));
    }

    #[test]
    fn test_chunk_inputs() {
        let chunks = chunk_inputs((0..10).collect(), 4);
        assert_eq!(chunks, vec![vec![0, 1, 2], vec![3, 4, 5], vec![6, 7, 8], vec![9]]);

        assert_eq!(chunk_inputs((0..2).collect(), 8), vec![vec![0], vec![1]]);
        assert_eq!(chunk_inputs((0..3).collect(), 0), vec![vec![0, 1, 2]]);
        assert!(chunk_inputs(Vec::<u8>::new(), 4).is_empty());
    }

    #[tokio::test]
    async fn test_normalize_in_chunks_keeps_order() {
        let idl = Idl::from_json_str(
            include_str!("../config/idl/order_book.json"),
            idl_event_normalizer::schema::DuplicatePolicy::Reject,
        )
        .unwrap();
        let samples: Vec<DecodedEventInput> =
            serde_json::from_str(include_str!("../config/events/sample.json")).unwrap();
        let (fill, balance) = (&samples[0], &samples[1]);

        let inputs: Vec<DecodedEventInput> = (0..10)
            .map(|i| {
                let sample = if i % 2 == 0 { fill } else { balance };
                DecodedEventInput {
                    name: if i == 7 { "Unknown".to_string() } else { sample.name.clone() },
                    data: sample.data.clone(),
                }
            })
            .collect();

        let results = normalize_in_chunks(Arc::new(idl), NormalizerOptions::default(), inputs, 4)
            .await
            .unwrap();

        assert_eq!(results.len(), 10);
        for (i, result) in results.iter().enumerate() {
            match (i, result) {
                (7, Err(e)) => assert!(e.to_string().contains("Unknown")),
                (7, Ok(_)) => panic!("event #7 should fail"),
                (_, Ok(event)) => {
                    let expected = if i % 2 == 0 { "FillLog" } else { "BalanceLog" };
                    assert_eq!(event.name, expected, "event #{}", i);
                }
                (_, Err(e)) => panic!("event #{} failed: {:#}", i, e),
            }
        }
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(&args(&["bin"])).is_err());
        assert!(parse_args(&args(&["bin", "a.json", "b.json"])).is_err());
        assert!(parse_args(&args(&["bin", "a.json", "--config"])).is_err());
    }
}
