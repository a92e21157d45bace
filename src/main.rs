//! page-turner - simulate a burst of controller presses against the dispatcher.
//!
//! Feeds `L`/`R` presses through a full session backed by a simulated executor
//! and reports which taps were actually issued and how long they took.

use anyhow::Result;
use clap::{value_parser, Arg, ArgAction, Command};
use page_turner::config::Config;
use page_turner::executor::SimulatedExecutor;
use page_turner::gate::MemorySettings;
use page_turner::geometry::{FixedGeometry, GeometryCache, ScreenGeometry};
use page_turner::input::keycode;
use page_turner::latency::ChannelSink;
use page_turner::{DispatcherPhase, GestureOutcome, PageTurnerSession, RawInputEvent};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Upper bound on how long to wait for the last gesture to drain.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let matches = Command::new("page-turner")
        .version(page_turner::VERSION)
        .about("Simulate game-controller page turning")
        .long_about(
            "Feeds a sequence of L/R button presses through the single-flight tap \
             dispatcher using a simulated gesture executor, then prints the taps that \
             were issued and their latency.",
        )
        .arg(
            Arg::new("presses")
                .help("Button presses to simulate, e.g. LRRRL")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML configuration file")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .default_value("1000")
                .value_parser(value_parser!(f32)),
        )
        .arg(
            Arg::new("height")
                .long("height")
                .default_value("1600")
                .value_parser(value_parser!(f32)),
        )
        .arg(
            Arg::new("gesture-ms")
                .long("gesture-ms")
                .help("Simulated time for the display to execute one tap")
                .default_value("40")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("interval-ms")
                .long("interval-ms")
                .help("Delay between simulated presses")
                .default_value("10")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("cancel")
                .long("cancel")
                .help("Report every gesture as cancelled instead of completed")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let config = load_config(matches.get_one::<PathBuf>("config"))?;
    let presses = parse_presses(
        matches
            .get_one::<String>("presses")
            .map(String::as_str)
            .unwrap_or_default(),
    )?;
    let geometry = ScreenGeometry::new(
        matches.get_one::<f32>("width").copied().unwrap_or(1000.0),
        matches.get_one::<f32>("height").copied().unwrap_or(1600.0),
    );
    let gesture_time = Duration::from_millis(
        matches.get_one::<u64>("gesture-ms").copied().unwrap_or(40),
    );
    let interval = Duration::from_millis(
        matches.get_one::<u64>("interval-ms").copied().unwrap_or(10),
    );
    let outcome = if matches.get_flag("cancel") {
        GestureOutcome::Cancelled
    } else {
        GestureOutcome::Completed
    };

    let (sample_tx, mut sample_rx) = mpsc::unbounded_channel();
    let (issued_tx, mut issued_rx) = mpsc::unbounded_channel();
    let session = PageTurnerSession::start(
        &config,
        Arc::new(MemorySettings::default()),
        Arc::new(GeometryCache::new(Box::new(FixedGeometry(geometry)))),
        Box::new(ChannelSink::new(sample_tx)),
        |notifier| {
            SimulatedExecutor::new(notifier, gesture_time)
                .with_outcome(outcome)
                .with_issue_log(issued_tx)
        },
    )?;

    let mut consumed = 0usize;
    for key_code in &presses {
        if session.handle_key_event(&RawInputEvent::gamepad_down(*key_code)) {
            consumed += 1;
        }
        tokio::time::sleep(interval).await;
    }

    let drained = tokio::time::timeout(DRAIN_TIMEOUT, async {
        loop {
            match session.snapshot().await {
                Ok(snapshot) if snapshot.phase == DispatcherPhase::Idle => break,
                Ok(_) => tokio::time::sleep(gesture_time / 2 + Duration::from_millis(1)).await,
                Err(_) => break,
            }
        }
    })
    .await;
    if drained.is_err() {
        eprintln!("warning: gestures still in flight after {DRAIN_TIMEOUT:?}");
    }
    session.stop().await?;

    let mut issued = 0usize;
    while let Ok((handle, request)) = issued_rx.try_recv() {
        issued += 1;
        println!("tap {handle} at ({:.1}, {:.1})", request.x, request.y);
    }

    let mut samples = Vec::new();
    while let Ok(sample) = sample_rx.try_recv() {
        samples.push(sample);
    }

    println!(
        "presses: {}, forwarded: {consumed}, taps issued: {issued}, coalesced or dropped: {}",
        presses.len(),
        consumed.saturating_sub(issued)
    );
    if !samples.is_empty() {
        let count = samples.len() as i64;
        let to_dispatch: i64 = samples.iter().map(|s| s.input_to_dispatch_ms).sum();
        let to_complete: i64 = samples.iter().map(|s| s.dispatch_to_complete_ms).sum();
        println!(
            "mean latency: input->dispatch {}ms, dispatch->complete {}ms",
            to_dispatch / count,
            to_complete / count
        );
    }

    Ok(())
}

#[cfg(feature = "config")]
fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    Ok(match path {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default()?,
    })
}

#[cfg(not(feature = "config"))]
fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    if path.is_some() {
        anyhow::bail!("configuration files require the `config` feature");
    }
    Ok(Config::default())
}

/// `L` presses D-pad left, `R` presses D-pad right. Spaces and commas are skipped.
fn parse_presses(presses: &str) -> Result<Vec<i32>> {
    presses
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != ',')
        .map(|ch| match ch.to_ascii_uppercase() {
            'L' => Ok(keycode::DPAD_LEFT),
            'R' => Ok(keycode::DPAD_RIGHT),
            other => anyhow::bail!("unknown press '{other}', expected L or R"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        assert!(!page_turner::VERSION.is_empty());
    }

    #[test]
    fn parses_press_sequences() {
        assert_eq!(
            parse_presses("L, r R").unwrap(),
            vec![keycode::DPAD_LEFT, keycode::DPAD_RIGHT, keycode::DPAD_RIGHT]
        );
        assert!(parse_presses("LXR").is_err());
    }
}
