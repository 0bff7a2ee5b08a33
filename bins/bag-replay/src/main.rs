// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Heavy bag replay (bag-replay)
//!
//! Drives the simulation headless from a scripted scenario, logs every
//! impact, and prints a JSON summary when the scenario ends.
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use bag_config_fs::FsConfigStore;
use bag_core::{Clock, ManualClock, MonotonicClock};
use bag_geom::Aabb;
use bag_sim::{
    ConfigService, ContactId, ImpactEvent, ImpactSink, LogSink, SimConfig, Simulation,
};
use clap::Parser;
use serde::Serialize;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

mod scenario;

use scenario::Scenario;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Scenario JSON; the built-in jab runs when omitted
    #[clap(short, long)]
    scenario: Option<PathBuf>,

    /// Config JSON; falls back to the stored config, then defaults
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Persist the effective config to the user config dir
    #[clap(long)]
    save_config: bool,

    /// Pace frames in wall time instead of stepping as fast as possible
    #[clap(long)]
    realtime: bool,

    /// Max log level
    #[clap(long, default_value_t = Level::INFO)]
    log_level: Level,
}

/// Logs each impact and keeps it for the summary.
#[derive(Default)]
struct Recorder {
    events: Vec<ImpactEvent>,
}

impl ImpactSink for Recorder {
    fn impact(&mut self, event: &ImpactEvent) {
        LogSink.impact(event);
        self.events.push(*event);
    }
}

#[derive(Serialize)]
struct Summary {
    frames: u64,
    impacts: Vec<ImpactEvent>,
    expired_torques: usize,
    orientation: [f32; 2],
    angular_velocity: [f32; 2],
}

fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    if let Some(path) = path {
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let cfg: SimConfig = serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing {}", path.display()))?;
        cfg.validate()?;
        info!("config loaded from {}", path.display());
        return Ok(cfg);
    }
    match FsConfigStore::new() {
        Ok(store) => Ok(ConfigService::new(store).load_sim_config()?),
        Err(e) => {
            warn!("config dir unavailable ({e}); using defaults");
            Ok(SimConfig::default())
        }
    }
}

/// Wall-clock pacer for `--realtime`. A stalled frame delays the rest
/// instead of bursting to catch up.
fn frame_ticker(period: Duration) -> Interval {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

async fn replay(
    sim: &mut Simulation,
    scenario: &Scenario,
    bag: Aabb,
    realtime: bool,
) -> Result<Summary> {
    let mut sink = Recorder::default();
    let mut expired_torques = 0;

    let mut manual = ManualClock::new();
    let monotonic = MonotonicClock::new();
    let mut ticker = frame_ticker(scenario.frame_period());

    for (i, frame) in scenario.frames.iter().enumerate() {
        if realtime {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = tokio::signal::ctrl_c() => {
                    warn!("interrupted at frame {i}");
                    break;
                }
            }
        }
        let now = if realtime { monotonic.now() } else { manual.now() };

        if i as u64 == scenario.bag_loaded_at_frame {
            sim.attach_bag(bag);
            info!("bag loaded at frame {i}");
        }
        if let Some((torque, lifetime)) = frame.shove() {
            let h = sim.push(torque, lifetime, now);
            info!(handle = h.value(), ?lifetime, "shove");
        }

        let report = sim.step(now, &frame.input(), &mut sink);
        expired_torques += report.expired;
        manual.advance(scenario.frame_period());
    }

    let body = sim.body();
    Ok(Summary {
        frames: sim.frame(),
        impacts: sink.events,
        expired_torques,
        orientation: body.orientation().to_array(),
        angular_velocity: body.angular_velocity().to_array(),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let cfg = load_config(args.config.as_deref())?;
    if args.save_config {
        let store = FsConfigStore::new()?;
        let path = store.path_for(bag_sim::SIM_CONFIG_KEY);
        ConfigService::new(store).save_sim_config(&cfg)?;
        info!("config saved to {}", path.display());
    }

    let scenario = match &args.scenario {
        Some(path) => Scenario::from_path(path)?,
        None => Scenario::builtin_jab(),
    };
    info!(
        frames = scenario.frames.len(),
        period_ms = scenario.frame_period_ms,
        realtime = args.realtime,
        "starting replay"
    );

    let mut sim = Simulation::new(&cfg)?;
    for id in ContactId::ALL {
        let hand = match id {
            ContactId::Left => &cfg.left,
            ContactId::Right => &cfg.right,
        };
        sim.attach_glove(id, hand.glove.to_aabb());
    }

    let summary = replay(&mut sim, &scenario, cfg.bag.to_aabb(), args.realtime).await?;
    info!(impacts = summary.impacts.len(), "replay finished");
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn realtime_ticker_delays_after_a_stall() {
        let ticker = frame_ticker(Duration::from_millis(11));
        assert_eq!(ticker.missed_tick_behavior(), MissedTickBehavior::Delay);
        assert_eq!(ticker.period(), Duration::from_millis(11));
    }
}
