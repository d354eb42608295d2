//! Chart panes: the surfaces a session publishes snapshots to.

use super::snapshot::{Candle, ChartSnapshot, ChartTime, LinePoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneKind {
    /// Candlesticks with the moving-average overlay.
    Price,
    /// RSI line.
    Oscillator,
}

impl PaneKind {
    /// Fixed height in terminal rows, borders included.
    pub fn height(self) -> u16 {
        match self {
            PaneKind::Price => 20,
            PaneKind::Oscillator => 8,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PaneKind::Price => "Price",
            PaneKind::Oscillator => "RSI",
        }
    }
}

/// A chart surface owned by a session.
///
/// Panes are created once and disposed once. After `dispose` every other
/// call is ignored.
pub trait Pane {
    fn kind(&self) -> PaneKind;

    /// Replace the series in place with those from `snapshot`.
    fn set_data(&mut self, snapshot: &ChartSnapshot);

    /// Fit the visible time range to the loaded data.
    fn fit_content(&mut self);

    fn resize(&mut self, width: u16);

    /// Release series data and stop reacting to resize.
    fn dispose(&mut self);

    fn is_disposed(&self) -> bool;
}

/// Pane that holds its series and viewport for a renderer to draw.
#[derive(Debug, Clone)]
pub struct SeriesPane {
    kind: PaneKind,
    width: u16,
    candles: Vec<Candle>,
    line: Vec<LinePoint>,
    bar_times: Vec<ChartTime>,
    extent: Option<(ChartTime, ChartTime)>,
    visible: Option<(ChartTime, ChartTime)>,
    disposed: bool,
}

impl SeriesPane {
    pub fn new(kind: PaneKind, width: u16) -> Self {
        Self {
            kind,
            width,
            candles: Vec::new(),
            line: Vec::new(),
            bar_times: Vec::new(),
            extent: None,
            visible: None,
            disposed: false,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.kind.height()
    }

    /// Candles (price pane only).
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    /// Moving average on the price pane, RSI on the oscillator pane.
    pub fn line(&self) -> &[LinePoint] {
        &self.line
    }

    pub fn visible_range(&self) -> Option<(ChartTime, ChartTime)> {
        self.visible
    }

    /// Bar times of the published snapshot, kept by both pane kinds.
    pub fn bar_times(&self) -> &[ChartTime] {
        &self.bar_times
    }

    /// First and last time of the newest bars that fit in `columns`, capped
    /// at the pane width. Panes with the same snapshot and width agree.
    pub fn visible_window(&self, columns: usize) -> Option<(ChartTime, ChartTime)> {
        let (lo, hi) = self.visible?;
        let start = self.bar_times.partition_point(|t| *t < lo);
        let end = self.bar_times.partition_point(|t| *t <= hi);
        let keep = columns.min(self.width as usize).min(end - start);
        if keep == 0 {
            return None;
        }
        Some((self.bar_times[end - keep], self.bar_times[end - 1]))
    }

    pub fn has_data(&self) -> bool {
        !self.candles.is_empty() || !self.line.is_empty()
    }
}

impl Pane for SeriesPane {
    fn kind(&self) -> PaneKind {
        self.kind
    }

    fn set_data(&mut self, snapshot: &ChartSnapshot) {
        if self.disposed {
            return;
        }
        match self.kind {
            PaneKind::Price => {
                self.candles = snapshot.candles().to_vec();
                self.line = snapshot.moving_average().to_vec();
            }
            PaneKind::Oscillator => {
                self.candles.clear();
                self.line = snapshot.oscillator().to_vec();
            }
        }
        self.bar_times = snapshot.candles().iter().map(|c| c.time).collect();
        self.extent = snapshot.time_extent();
    }

    fn fit_content(&mut self) {
        if self.disposed {
            return;
        }
        self.visible = self.extent;
    }

    fn resize(&mut self, width: u16) {
        if self.disposed {
            return;
        }
        self.width = width;
    }

    fn dispose(&mut self) {
        self.candles = Vec::new();
        self.line = Vec::new();
        self.bar_times = Vec::new();
        self.extent = None;
        self.visible = None;
        self.disposed = true;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}
