//! Command-line flags. Anything given here overrides the config file.

use std::path::PathBuf;

use clap::Parser;

use historify_core::chart::{ChartParams, Exchange};
use historify_core::config::DashboardConfig;

#[derive(Debug, Parser)]
#[command(
    name = "historify",
    about = "Historify results desk: backtest books and live charts in the terminal"
)]
pub struct Cli {
    /// Backtest run to open. Defaults to the latest completed run.
    #[arg(long)]
    pub backtest_id: Option<i64>,

    /// Config file. Defaults to <config dir>/historify/config.toml.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Dashboard API base URL, e.g. http://127.0.0.1:5001.
    #[arg(long)]
    pub api_url: Option<String>,

    /// Initial chart symbol.
    #[arg(long)]
    pub symbol: Option<String>,

    /// Initial chart exchange (NSE, NFO, BSE, BFO, MCX).
    #[arg(long)]
    pub exchange: Option<Exchange>,

    /// Directory CSV exports are written to.
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Offline mode: serve deterministic sample data instead of calling the API.
    #[arg(long, default_value_t = false)]
    pub demo: bool,
}

impl Cli {
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(default_config_path)
    }

    /// Fold flag overrides into the loaded config.
    pub fn apply(&self, config: &mut DashboardConfig) {
        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
        }
        if let Some(exchange) = self.exchange {
            config.chart.default_exchange = exchange;
        }
        if let Some(dir) = &self.export_dir {
            config.export.dir = dir.clone();
        }
    }

    /// Chart parameters the chart panel first opens with. An empty symbol is
    /// filled from the watchlist once it arrives.
    pub fn chart_params(&self, config: &DashboardConfig) -> ChartParams {
        let symbol = self
            .symbol
            .as_deref()
            .map(|s| s.trim().to_uppercase())
            .unwrap_or_default();
        ChartParams::new(symbol, config.chart.default_exchange)
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("historify")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "historify",
            "--api-url",
            "http://10.0.0.2:5001",
            "--exchange",
            "bse",
            "--symbol",
            " tcs ",
        ])
        .unwrap();
        let mut config = DashboardConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.api.base_url, "http://10.0.0.2:5001");
        assert_eq!(config.chart.default_exchange, Exchange::Bse);

        let params = cli.chart_params(&config);
        assert_eq!(params.symbol, "TCS");
        assert_eq!(params.exchange, Exchange::Bse);
    }

    #[test]
    fn defaults_leave_config_alone() {
        let cli = Cli::try_parse_from(["historify"]).unwrap();
        let mut config = DashboardConfig::default();
        cli.apply(&mut config);
        assert_eq!(config, DashboardConfig::default());
        assert!(cli.chart_params(&config).symbol.is_empty());
        assert!(!cli.demo);
        assert!(cli.config_path().ends_with("historify/config.toml"));
    }

    #[test]
    fn unknown_exchange_is_rejected() {
        assert!(Cli::try_parse_from(["historify", "--exchange", "LSE"]).is_err());
    }
}
