use serde::Deserialize;

/// Fallback symbol and timeframe for payloads that name only a strategy.
#[derive(Debug, Clone)]
pub struct RequestDefaults {
    pub symbol: String,
    pub timeframe: String,
}

/// A parsed webhook request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalRequest {
    pub strategy: String,
    pub symbol: String,
    pub timeframe: String,
}

#[derive(Deserialize)]
struct JsonPayload {
    #[serde(alias = "strategy_id", alias = "signal")]
    strategy: String,
    #[serde(default, alias = "ticker")]
    symbol: Option<String>,
    #[serde(default, alias = "interval")]
    timeframe: Option<String>,
}

impl SignalRequest {
    /// Parse a webhook body.
    ///
    /// Accepts a JSON object (`{"strategy": .., "symbol": .., "timeframe": ..}`)
    /// or plain text `STRATEGY [SYMBOL [TIMEFRAME]]` separated by whitespace or
    /// commas. Parsing never fails: an unusable body yields a request whose
    /// strategy id will not resolve.
    pub fn parse(body: &str, defaults: &RequestDefaults) -> Self {
        let body = body.trim();

        if body.starts_with('{') {
            if let Ok(p) = serde_json::from_str::<JsonPayload>(body) {
                return Self::from_parts(&p.strategy, p.symbol.as_deref(), p.timeframe.as_deref(), defaults);
            }
        }

        let mut tokens = body
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty());
        let strategy = tokens.next().unwrap_or_default();
        let symbol = tokens.next();
        let timeframe = tokens.next();
        Self::from_parts(strategy, symbol, timeframe, defaults)
    }

    fn from_parts(
        strategy: &str,
        symbol: Option<&str>,
        timeframe: Option<&str>,
        defaults: &RequestDefaults,
    ) -> Self {
        let symbol = symbol
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_uppercase)
            .unwrap_or_else(|| defaults.symbol.clone());
        let timeframe = timeframe
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| defaults.timeframe.clone());

        Self {
            strategy: strategy.trim().to_uppercase(),
            symbol,
            timeframe,
        }
    }
}
