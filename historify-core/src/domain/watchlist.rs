use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Watchlist entry from `GET /api/watchlist/items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistItem {
    pub id: i64,
    pub symbol: String,
    pub name: Option<String>,
    #[serde(default = "default_exchange")]
    pub exchange: String,
    pub added_on: NaiveDateTime,
}

fn default_exchange() -> String {
    "NSE".to_string()
}

impl WatchlistItem {
    /// Name when present, otherwise the symbol.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_defaults_to_nse() {
        let json = r#"{"id":1,"symbol":"TCS","name":null,"added_on":"2024-03-01T10:00:00"}"#;
        let item: WatchlistItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.exchange, "NSE");
        assert_eq!(item.display_name(), "TCS");
    }
}
