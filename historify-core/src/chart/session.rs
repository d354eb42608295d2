//! Live chart session: parameters, refresh cycle, and request tagging.
//!
//! The session never performs I/O itself. It hands tagged [`FetchRequest`]s
//! to a [`ChartFetcher`] and later receives the outcome through
//! [`ChartSession::complete`], which drops anything that is no longer the
//! latest request for the current parameters.

use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::pane::{Pane, PaneKind, SeriesPane};
use super::params::{ChartParams, Exchange, Timeframe, ValidationError};
use super::snapshot::ChartSnapshot;
use super::timer::RefreshTimer;
use crate::data::ApiError;

pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub id: RequestId,
    pub params: ChartParams,
}

/// Where chart-data requests go. The TUI forwards them to its worker thread.
pub trait ChartFetcher {
    fn submit(&mut self, request: FetchRequest);
}

impl<F: FnMut(FetchRequest)> ChartFetcher for F {
    fn submit(&mut self, request: FetchRequest) {
        self(request)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Loading,
    Ready,
    Disposed,
}

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("chart session is closed")]
    Disposed,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// What happened to a completed fetch.
#[derive(Debug)]
pub enum Disposition {
    /// Drawn to both panes.
    Published,
    /// Surfaced to the user; the previous snapshot stays on screen.
    Failed(ApiError),
    /// Superseded by a newer request or parameter change.
    Stale,
    /// Arrived after the session was disposed.
    Dropped,
}

pub struct ChartSession<P: Pane = SeriesPane> {
    params: ChartParams,
    state: SessionState,
    timer: RefreshTimer,
    next_id: RequestId,
    latest: Option<FetchRequest>,
    snapshot: Option<ChartSnapshot>,
    last_error: Option<String>,
    price: P,
    oscillator: P,
    fetcher: Box<dyn ChartFetcher>,
}

impl ChartSession<SeriesPane> {
    /// Session with terminal-backed panes of the given width.
    pub fn with_series_panes(
        params: ChartParams,
        width: u16,
        fetcher: Box<dyn ChartFetcher>,
    ) -> Result<Self, SessionError> {
        Self::open(
            params,
            SeriesPane::new(PaneKind::Price, width),
            SeriesPane::new(PaneKind::Oscillator, width),
            fetcher,
        )
    }
}

impl<P: Pane> ChartSession<P> {
    /// Validate `params`, take ownership of both panes, and issue the first
    /// fetch.
    pub fn open(
        params: ChartParams,
        price: P,
        oscillator: P,
        fetcher: Box<dyn ChartFetcher>,
    ) -> Result<Self, SessionError> {
        params.validate()?;
        let mut session = Self {
            params,
            state: SessionState::Idle,
            timer: RefreshTimer::default(),
            next_id: 1,
            latest: None,
            snapshot: None,
            last_error: None,
            price,
            oscillator,
            fetcher,
        };
        session.fetch()?;
        Ok(session)
    }

    pub fn params(&self) -> &ChartParams {
        &self.params
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn snapshot(&self) -> Option<&ChartSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn auto_refresh(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn timer(&self) -> &RefreshTimer {
        &self.timer
    }

    /// Id of the request whose response would be accepted, if any.
    pub fn pending_request(&self) -> Option<RequestId> {
        self.latest.as_ref().map(|r| r.id)
    }

    pub fn price_pane(&self) -> &P {
        &self.price
    }

    pub fn oscillator_pane(&self) -> &P {
        &self.oscillator
    }

    pub fn select_instrument(
        &mut self,
        symbol: &str,
        exchange: Exchange,
    ) -> Result<Option<RequestId>, SessionError> {
        self.update(|p| {
            p.symbol = symbol.trim().to_string();
            p.exchange = exchange;
        })
    }

    pub fn set_exchange(&mut self, exchange: Exchange) -> Result<Option<RequestId>, SessionError> {
        self.update(|p| p.exchange = exchange)
    }

    pub fn set_timeframe(&mut self, timeframe: Timeframe) -> Result<Option<RequestId>, SessionError> {
        self.update(|p| p.timeframe = timeframe)
    }

    pub fn set_moving_average_period(
        &mut self,
        period: u32,
    ) -> Result<Option<RequestId>, SessionError> {
        self.update(|p| p.ma_period = period)
    }

    pub fn set_oscillator_period(
        &mut self,
        period: u32,
    ) -> Result<Option<RequestId>, SessionError> {
        self.update(|p| p.osc_period = period)
    }

    /// Apply a parameter edit. Returns the id of the triggered fetch, or
    /// `None` when the edit left the parameters unchanged.
    fn update(
        &mut self,
        edit: impl FnOnce(&mut ChartParams),
    ) -> Result<Option<RequestId>, SessionError> {
        self.ensure_open()?;
        let mut next = self.params.clone();
        edit(&mut next);
        if next == self.params {
            return Ok(None);
        }
        next.validate()?;

        if !next.same_feed(&self.params) {
            self.timer.rearm();
        }
        self.params = next;
        self.fetch().map(Some)
    }

    /// Arm or disarm the 30 s refresh timer.
    pub fn set_auto_refresh(&mut self, on: bool) -> Result<(), SessionError> {
        self.ensure_open()?;
        if on {
            self.timer.arm();
        } else {
            self.timer.disarm();
        }
        info!(on, params = %self.params, "auto-refresh toggled");
        Ok(())
    }

    pub fn toggle_auto_refresh(&mut self) -> Result<bool, SessionError> {
        let on = !self.timer.is_armed();
        self.set_auto_refresh(on)?;
        Ok(on)
    }

    pub fn manual_refresh(&mut self) -> Result<RequestId, SessionError> {
        self.fetch()
    }

    /// Drive the refresh timer. Returns the id of a fetch issued because the
    /// timer fired.
    pub fn tick(&mut self, now: Instant) -> Option<RequestId> {
        if self.state == SessionState::Disposed || !self.timer.poll(now) {
            return None;
        }
        debug!(params = %self.params, "auto-refresh fired");
        self.fetch().ok()
    }

    fn fetch(&mut self) -> Result<RequestId, SessionError> {
        self.ensure_open()?;
        let id = self.next_id;
        self.next_id += 1;
        let request = FetchRequest {
            id,
            params: self.params.clone(),
        };
        self.latest = Some(request.clone());
        self.state = SessionState::Loading;
        debug!(id, params = %self.params, "chart fetch issued");
        self.fetcher.submit(request);
        Ok(id)
    }

    /// Accept or discard the outcome of request `id`, fetched with `params`.
    pub fn complete(
        &mut self,
        id: RequestId,
        params: &ChartParams,
        result: Result<ChartSnapshot, ApiError>,
    ) -> Disposition {
        if self.state == SessionState::Disposed {
            debug!(id, "response after dispose dropped");
            return Disposition::Dropped;
        }
        let is_latest = self
            .latest
            .as_ref()
            .is_some_and(|r| r.id == id && r.params == *params);
        if !is_latest || *params != self.params {
            debug!(id, params = %params, "stale chart response discarded");
            return Disposition::Stale;
        }
        self.latest = None;
        self.state = SessionState::Ready;

        match result {
            Ok(snapshot) => {
                for pane in [&mut self.price, &mut self.oscillator] {
                    pane.set_data(&snapshot);
                    pane.fit_content();
                }
                info!(
                    id,
                    params = %params,
                    bars = snapshot.candles().len(),
                    "chart snapshot published"
                );
                self.snapshot = Some(snapshot);
                self.last_error = None;
                Disposition::Published
            }
            Err(err) => {
                if err.is_domain() {
                    info!(id, params = %params, error = %err, "chart data unavailable");
                } else {
                    warn!(id, params = %params, error = %err, "chart fetch failed");
                }
                self.last_error = Some(err.to_string());
                Disposition::Failed(err)
            }
        }
    }

    /// Keep both pane widths in step with their container.
    pub fn resize(&mut self, width: u16) {
        if self.state == SessionState::Disposed {
            return;
        }
        self.price.resize(width);
        self.oscillator.resize(width);
    }

    /// Disarm the timer and dispose both panes. Idempotent.
    pub fn dispose(&mut self) {
        if self.state == SessionState::Disposed {
            return;
        }
        self.timer.disarm();
        self.price.dispose();
        self.oscillator.dispose();
        self.latest = None;
        self.snapshot = None;
        self.state = SessionState::Disposed;
        debug!(params = %self.params, "chart session disposed");
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.state == SessionState::Disposed {
            Err(SessionError::Disposed)
        } else {
            Ok(())
        }
    }
}

impl<P: Pane> Drop for ChartSession<P> {
    fn drop(&mut self) {
        self.dispose();
    }
}
