//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use super::{
    ConfigDraft, ConfigError, Dashboard, IntervalTimer, PhaseChange, PhaseNotifier, Task,
    TimerConfig, TimerSnapshot, TimerState,
};

/// Forwards phase changes to every subscriber of a broadcast channel
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<PhaseChange>,
}

impl BroadcastNotifier {
    pub fn new(tx: broadcast::Sender<PhaseChange>) -> Self {
        Self { tx }
    }
}

impl PhaseNotifier for BroadcastNotifier {
    fn notify(&mut self, change: &PhaseChange) {
        // no subscribers is normal when nobody has the dashboard open
        if self.tx.send(*change).is_err() {
            debug!("No listeners for phase change to {}", change.new_phase);
        }
    }
}

pub type SharedTimer = IntervalTimer<BroadcastNotifier>;

/// Main application state that owns the interval timer and dashboard
#[derive(Debug)]
pub struct AppState {
    /// Interval timer, the only mutator of countdown state
    pub timer: Arc<Mutex<SharedTimer>>,
    /// Focus mode, quick note and tasks
    pub dashboard: Arc<Mutex<Dashboard>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for phase change notifications
    pub phase_change_tx: broadcast::Sender<PhaseChange>,
    /// Channel for timer updates
    pub timer_update_tx: watch::Sender<TimerState>,
    /// Keep the receiver alive to prevent channel closure
    pub _timer_update_rx: watch::Receiver<TimerState>,
}

impl AppState {
    /// Create a new AppState with a stopped timer under `config`
    pub fn new(port: u16, host: String, config: TimerConfig) -> std::result::Result<Self, ConfigError> {
        let (phase_change_tx, _) = broadcast::channel(100);
        let timer = IntervalTimer::with_notifier(config, BroadcastNotifier::new(phase_change_tx.clone()))?;
        let (timer_update_tx, timer_update_rx) = watch::channel(timer.state().clone());

        Ok(Self {
            timer: Arc::new(Mutex::new(timer)),
            dashboard: Arc::new(Mutex::new(Dashboard::new())),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            phase_change_tx,
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
        })
    }

    fn lock_timer(&self) -> Result<MutexGuard<'_, SharedTimer>> {
        self.timer.lock().map_err(|_| AppError::LockPoisoned("timer"))
    }

    fn lock_dashboard(&self) -> Result<MutexGuard<'_, Dashboard>> {
        self.dashboard.lock().map_err(|_| AppError::LockPoisoned("dashboard"))
    }

    fn publish(&self, timer: &SharedTimer) {
        if let Err(e) = self.timer_update_tx.send(timer.state().clone()) {
            warn!("Failed to send timer update: {}", e);
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Run a timer command, publish the resulting state and record the action
    pub fn update_timer<F>(&self, action: &str, command: F) -> Result<TimerSnapshot>
    where
        F: FnOnce(&mut SharedTimer) -> std::result::Result<(), ConfigError>,
    {
        let mut timer = self.lock_timer()?;
        command(&mut *timer)?;
        // publish under the lock so watchers never see updates out of order
        self.publish(&*timer);
        let snapshot = timer.snapshot();
        drop(timer);

        self.record_action(action);
        Ok(snapshot)
    }

    pub fn start_timer(&self) -> Result<TimerSnapshot> {
        self.update_timer("start", |timer| {
            if timer.start() {
                info!("Timer started");
            }
            Ok(())
        })
    }

    pub fn pause_timer(&self) -> Result<TimerSnapshot> {
        self.update_timer("pause", |timer| {
            if timer.pause() {
                info!("Timer paused");
            }
            Ok(())
        })
    }

    pub fn toggle_timer(&self) -> Result<TimerSnapshot> {
        self.update_timer("toggle", |timer| {
            let running = timer.toggle();
            info!("Timer toggled, running={}", running);
            Ok(())
        })
    }

    pub fn reset_timer(&self) -> Result<TimerSnapshot> {
        self.update_timer("reset", |timer| {
            timer.reset();
            info!("Timer reset");
            Ok(())
        })
    }

    /// Validate and apply a configuration submitted by a caller
    pub fn apply_timer_config(&self, draft: ConfigDraft) -> Result<TimerSnapshot> {
        let result = draft
            .into_config()
            .map_err(AppError::from)
            .and_then(|config| self.update_timer("configure", |timer| timer.apply_config(config)));
        if let Err(AppError::InvalidConfiguration(e)) = &result {
            warn!("Rejected timer configuration: {}", e);
        }
        result
    }

    /// Advance the timer by one second, called by the tick task
    pub fn tick_timer(&self) -> Result<Option<PhaseChange>> {
        let mut timer = self.lock_timer()?;
        if !timer.is_running() {
            return Ok(None);
        }
        let change = timer.tick();
        self.publish(&*timer);
        Ok(change)
    }

    /// Get current timer snapshot
    pub fn get_timer(&self) -> Result<TimerSnapshot> {
        Ok(self.lock_timer()?.snapshot())
    }

    pub fn get_timer_config(&self) -> Result<TimerConfig> {
        Ok(*self.lock_timer()?.config())
    }

    /// Subscribe to phase change notifications
    pub fn subscribe_phase_changes(&self) -> broadcast::Receiver<PhaseChange> {
        self.phase_change_tx.subscribe()
    }

    /// Run a dashboard command and record the action
    pub fn update_dashboard<T, F>(&self, action: &str, command: F) -> Result<T>
    where
        F: FnOnce(&mut Dashboard) -> Result<T>,
    {
        let mut dashboard = self.lock_dashboard()?;
        let value = command(&mut *dashboard)?;
        drop(dashboard);

        self.record_action(action);
        Ok(value)
    }

    pub fn toggle_focus(&self) -> Result<bool> {
        self.update_dashboard("focus", |dashboard| {
            let focus = dashboard.toggle_focus();
            info!("Focus mode set to: {}", focus);
            Ok(focus)
        })
    }

    pub fn set_note(&self, text: String) -> Result<()> {
        self.update_dashboard("note", |dashboard| dashboard.set_note(text))
    }

    pub fn clear_note(&self) -> Result<()> {
        self.update_dashboard("clear-note", |dashboard| {
            dashboard.clear_note();
            Ok(())
        })
    }

    pub fn add_task(&self, text: &str) -> Result<Task> {
        self.update_dashboard("add-task", |dashboard| {
            let task = dashboard.add_task(text)?;
            info!("Task {} added", task.id);
            Ok(task)
        })
    }

    pub fn toggle_task(&self, id: u64) -> Result<Task> {
        self.update_dashboard("toggle-task", |dashboard| dashboard.toggle_task(id))
    }

    pub fn delete_task(&self, id: u64) -> Result<Task> {
        self.update_dashboard("delete-task", |dashboard| {
            let task = dashboard.delete_task(id)?;
            info!("Task {} deleted", task.id);
            Ok(task)
        })
    }

    /// Get current dashboard state
    pub fn get_dashboard(&self) -> Result<Dashboard> {
        Ok(self.lock_dashboard()?.clone())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
