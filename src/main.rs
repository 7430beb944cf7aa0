use std::time::Duration;

use anyhow::{Context, Result};
use bloch_qsim::bloch::to_scene_vector;
use bloch_qsim::engine::net_rotation;
use bloch_qsim::{BlochSession, EngineConfig, GateSymbol, RotationAxis, SeparatorPolicy};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Runs gates through a Bloch-sphere session on a synthetic clock and prints
/// the resulting evolution.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Gate sequence, e.g. "HTt". Valid gates: X Y Z H S s T t.
    sequence: Option<String>,

    /// Rx angle in radians, applied after the sequence.
    #[arg(long, allow_hyphen_values = true)]
    rx: Option<String>,

    /// Ry angle in radians, applied after Rx.
    #[arg(long, allow_hyphen_values = true)]
    ry: Option<String>,

    /// Rz angle in radians, applied after Ry.
    #[arg(long, allow_hyphen_values = true)]
    rz: Option<String>,

    /// Append this many random catalog gates.
    #[arg(long, default_value_t = 0)]
    random: usize,

    /// Seed for --random.
    #[arg(long)]
    seed: Option<u64>,

    /// Skip whitespace and commas silently instead of reporting them.
    #[arg(long)]
    ignore_separators: bool,

    /// Duration of one gate animation.
    #[arg(long, default_value_t = 100)]
    rotation_ms: u64,

    /// Interval between synthetic display ticks.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Trail positions recorded per gate.
    #[arg(long, default_value_t = 64)]
    trail_steps: usize,

    /// Print pointer coordinates in the Y-up scene frame.
    #[arg(long)]
    scene: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn random_sequence(count: usize, seed: Option<u64>) -> String {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    (0..count)
        .map(|_| GateSymbol::ALL[rng.random_range(0..GateSymbol::ALL.len())].symbol())
        .collect()
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let policy = if args.ignore_separators {
        SeparatorPolicy::Ignore
    } else {
        SeparatorPolicy::Strict
    };
    let config = EngineConfig::default()
        .with_rotation_duration(Duration::from_millis(args.rotation_ms))
        .with_trail_steps(args.trail_steps)
        .with_separator_policy(policy);
    let mut session = BlochSession::new(config);

    let mut sequence = args.sequence.clone().unwrap_or_default();
    if args.random > 0 {
        let random = random_sequence(args.random, args.seed);
        info!(%random, "appending random gates");
        sequence.push_str(&random);
    }

    let report = session.run_sequence(&sequence);
    for skipped in &report.skipped {
        println!("skipped: {}", skipped);
    }
    if let Ok(net) = net_rotation(&sequence) {
        info!(
            angle = net.angle,
            x = net.axis.x,
            y = net.axis.y,
            z = net.axis.z,
            "net rotation of sequence"
        );
    }

    for (axis, angle) in [
        (RotationAxis::X, &args.rx),
        (RotationAxis::Y, &args.ry),
        (RotationAxis::Z, &args.rz),
    ] {
        if let Some(angle) = angle {
            if let Err(err) = session.apply_rotation_input(axis, angle) {
                println!("skipped {}: {}", axis.gate_name(), err);
            }
        }
    }

    let frame_interval = Duration::from_millis(args.frame_ms.max(1));
    let mut now = Duration::ZERO;
    let mut frames = 0usize;
    loop {
        let tick = session.advance(now);
        for (id, err) in &tick.rejected {
            println!("rejected gate {}: {}", id.value(), err);
        }
        let Some(frame) = tick.frame else {
            break;
        };

        frames += 1;
        let pointer = if args.scene {
            to_scene_vector(&frame.pointer)
        } else {
            frame.pointer
        };
        debug!(
            gate = frame.gate_id.value(),
            t = frame.t,
            x = pointer.x,
            y = pointer.y,
            z = pointer.z,
            "frame"
        );
        now = now
            .checked_add(frame_interval)
            .context("synthetic clock overflowed")?;
    }

    for entry in session.history() {
        println!("{}", entry);
    }

    let angles = session.bloch_angles();
    let diagnostics = session.diagnostics();
    println!("final state: {}", session.state());
    println!("theta = {:.6}, phi = {:.6}", angles.theta, angles.phi);
    println!(
        "frames = {}, trail points = {}, normalization corrections = {}",
        frames,
        session.trail().len(),
        diagnostics.corrections
    );

    Ok(())
}
