//! Log output settings read at startup.

/// Filter used when `RUST_LOG` is unset. Matcher decisions stay visible at
/// `info`; the oracle's HTTP client and the database drivers only speak up
/// when something is wrong.
pub const DEFAULT_FILTER: &str = "info,mingle=info,mingle::services::matching=info,\
actix_web=info,reqwest=warn,hyper=warn,sqlx=warn,sea_orm=warn";

/// Shape of the lines written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line, for log shippers
    #[default]
    Json,
    /// Human-readable lines for a local terminal
    Pretty,
}

impl LogFormat {
    /// Read `MINGLE_LOG_FORMAT`; anything unrecognised keeps JSON.
    pub fn from_env() -> Self {
        std::env::var("MINGLE_LOG_FORMAT")
            .ok()
            .and_then(|raw| Self::parse(&raw))
            .unwrap_or_default()
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "pretty" | "text" => Some(LogFormat::Pretty),
            _ => None,
        }
    }
}
