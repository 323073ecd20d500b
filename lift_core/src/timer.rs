//! Rest timer.
//!
//! The countdown itself lives on [`SessionState::tick`](crate::SessionState::tick);
//! this module provides the clock that drives it: a cancellable background
//! ticker firing once per period, plus the cue invoked when a rest elapses.

use crate::Result;
use std::ops::ControlFlow;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Default tick period
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Outcome of one countdown tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Timer is not running; nothing changed
    Idle,
    /// Tick belonged to a timer that has since been replaced or stopped
    Stale,
    /// Counted down to the contained value (negative in overtime)
    Counted(i32),
    /// Counted from 1 to 0: the rest period is over
    Elapsed,
}

/// Side effect fired when a rest period elapses (a sound, a bell, ...)
pub trait RestCue: Send + Sync {
    fn play(&self) -> Result<()>;
}

/// Cue that does nothing
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentCue;

impl RestCue for SilentCue {
    fn play(&self) -> Result<()> {
        Ok(())
    }
}

/// Background thread calling `on_tick` once per period until stopped.
///
/// Dropping or stopping a ticker joins its thread, so no callback runs after
/// [`Ticker::stop`] returns.
#[derive(Debug)]
pub struct Ticker {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> Result<Self>
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("rest-timer".into())
            .spawn(move || loop {
                match stop_rx.recv_timeout(period) {
                    Err(RecvTimeoutError::Timeout) => {
                        if on_tick().is_break() {
                            break;
                        }
                    }
                    // Stop requested or the owning ticker was dropped
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;

        Ok(Self {
            stop: Some(stop_tx),
            handle: Some(handle),
        })
    }

    pub fn stop(&mut self) {
        drop(self.stop.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("Rest timer thread panicked");
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Idle/running clock owned by one session.
///
/// At most one tick stream exists at a time: starting while running replaces
/// the previous stream.
#[derive(Debug)]
pub struct RestTimer {
    period: Duration,
    ticker: Option<Ticker>,
}

impl RestTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            ticker: None,
        }
    }

    pub fn start<F>(&mut self, on_tick: F) -> Result<()>
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        self.stop();
        self.ticker = Some(Ticker::spawn(self.period, on_tick)?);
        tracing::debug!("Rest timer started ({:?} period)", self.period);
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.stop();
            tracing::debug!("Rest timer stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.ticker.as_ref().is_some_and(Ticker::is_active)
    }
}

impl Default for RestTimer {
    fn default() -> Self {
        Self::new(TICK_PERIOD)
    }
}

/// Format seconds as `M:SS`; overtime (negative) renders as `+M:SS`.
pub fn format_time(seconds: i32) -> String {
    let sign = if seconds < 0 { "+" } else { "" };
    let abs = seconds.unsigned_abs();
    format!("{}{}:{:02}", sign, abs / 60, abs % 60)
}
