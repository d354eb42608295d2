//! Live price/oscillator chart: parameters, snapshots, panes, and the
//! session that keeps them in step.

pub mod pane;
pub mod params;
pub mod session;
pub mod snapshot;
pub mod timer;

pub use pane::{Pane, PaneKind, SeriesPane};
pub use params::{
    ChartParams, Exchange, Timeframe, ValidationError, DEFAULT_MA_PERIOD, DEFAULT_OSC_PERIOD,
    MAX_MA_PERIOD, MAX_OSC_PERIOD,
};
pub use session::{
    ChartFetcher, ChartSession, Disposition, FetchRequest, RequestId, SessionError, SessionState,
};
pub use snapshot::{Candle, ChartDataResponse, ChartSnapshot, ChartTime, LinePoint};
pub use timer::{RefreshTimer, REFRESH_INTERVAL};
