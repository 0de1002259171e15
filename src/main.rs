//! Headless demo: run a full AI-vs-AI match and print the result
//!
//! The player's drone receives no input, so team A effectively plays a drone
//! down. Run with `RUST_LOG=info` to watch goals as they happen, or pass a
//! seed to replay a specific match.

use drone_soccer::consts::SIM_DT;
use drone_soccer::sim::{MatchConfig, MatchEvent, MatchState, tick};

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0xD05E);

    let config = MatchConfig::default();
    let mut state = match MatchState::new(config, seed) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("invalid match config: {e}");
            std::process::exit(1);
        }
    };
    state.start();

    println!("kickoff (seed {seed})");
    loop {
        let events = tick(&mut state, SIM_DT);
        for event in events {
            match event {
                MatchEvent::GoalScored { team, scores, .. } => {
                    println!(
                        "[{:>5.1}s] goal for team {team:?}: {}-{}",
                        state.config.duration_secs - state.time_remaining,
                        scores[0],
                        scores[1]
                    );
                }
                MatchEvent::MatchFinished { outcome } => {
                    println!(
                        "full time: {}-{} ({outcome:?})",
                        state.scores[0], state.scores[1]
                    );
                    return;
                }
                MatchEvent::AgentReturnedHome { .. } => {}
            }
        }
    }
}
