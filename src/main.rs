//! Headless demo entry point
//!
//! Runs an auto-play batch of rounds to settlement and logs each result.
//! Usage: plinko-drop [seed] [rounds]

use plinko_drop::clamp_bet;
use plinko_drop::consts::SIM_DT;
use plinko_drop::sim::{DropSession, RiskLevel, SessionPhase};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xD0_1234);
    let rounds: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(10);
    log::info!("plinko-drop demo starting (seed {seed}, {rounds} rounds)");

    let mut session = DropSession::new(10, RiskLevel::Medium, (800.0, 600.0), seed);
    session.set_on_settled(|outcome| {
        log::info!(
            "settled: bucket {} at {}x",
            outcome.bucket_index,
            outcome.multiplier
        );
    });

    let bet = clamp_bet(100.0);
    let mut staked = 0.0f32;
    let mut returned = 0.0f32;
    for round in 0..rounds {
        // Auto-play: each round starts straight from Idle/Completed
        let (outcome, path) = match session.start_round(10, RiskLevel::Medium) {
            Ok(started) => started,
            Err(err) => {
                log::error!("round {round} rejected: {err}");
                break;
            }
        };
        log::debug!(
            "round {round}: committed bucket {} ({} rights)",
            outcome.bucket_index,
            path.right_count()
        );

        let mut ticks = 0u32;
        while session.phase() != SessionPhase::Completed && ticks < 10_000 {
            if let Err(err) = session.tick(SIM_DT) {
                log::error!("tick failed: {err}");
                return;
            }
            ticks += 1;
        }

        if let Some(record) = session.round_record(bet) {
            staked += record.bet;
            returned += record.payout;
            log::info!(
                "round {round}: {}x, payout {:.2} after {ticks} ticks",
                record.multiplier,
                record.payout
            );
        }
    }

    if staked > 0.0 {
        log::info!(
            "batch done: staked {staked:.2}, returned {returned:.2} ({:.1}% RTP)",
            returned / staked * 100.0
        );
    }
}
