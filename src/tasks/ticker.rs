//! Timer tick background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::state::AppState;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Background task that advances the interval timer once per second while it runs.
///
/// The tick source only exists while the timer is running: it is created when
/// a start is observed and dropped as soon as the timer stops, so no queued
/// tick fires after a pause.
pub async fn ticker_task(state: Arc<AppState>) {
    info!("Starting timer tick task");

    let mut timer_rx = state.timer_update_tx.subscribe();

    loop {
        if !timer_rx.borrow_and_update().running {
            // Wait for the timer to be started
            if timer_rx.changed().await.is_err() {
                info!("Timer update channel closed, stopping tick task");
                return;
            }
            continue;
        }

        debug!("Timer running, starting tick source");
        let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match state.tick_timer() {
                        Ok(Some(change)) => {
                            info!("Entered {}: {}", change.new_phase, change.message());
                        }
                        Ok(None) => {}
                        Err(e) => error!("Failed to advance timer: {}", e),
                    }
                }

                changed = timer_rx.changed() => {
                    if changed.is_err() {
                        info!("Timer update channel closed, stopping tick task");
                        return;
                    }
                    if !timer_rx.borrow_and_update().running {
                        debug!("Timer stopped, cancelling tick source");
                        break;
                    }
                }
            }
        }
    }
}
