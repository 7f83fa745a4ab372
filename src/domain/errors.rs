use wasm_bindgen::JsValue;

/// Simplified error system - one enum, a message per variant.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    NetworkError(String),
    FeedError(String),
    InvalidTimeZone(String),
    RenderingError(String),
    ConfigError(String),
}

impl AppError {
    /// Bare message, without the variant prefix. This is what the view shows.
    pub fn message(&self) -> &str {
        match self {
            AppError::NetworkError(msg)
            | AppError::FeedError(msg)
            | AppError::InvalidTimeZone(msg)
            | AppError::RenderingError(msg)
            | AppError::ConfigError(msg) => msg,
        }
    }

    /// Wrap a rejected browser call (canvas, window, ...) as a rendering error.
    pub fn from_js(context: &str, value: JsValue) -> Self {
        let detail = value.as_string().unwrap_or_else(|| format!("{value:?}"));
        AppError::RenderingError(format!("{context}: {detail}"))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NetworkError(msg) => write!(f, "Network Error: {}", msg),
            AppError::FeedError(msg) => write!(f, "Feed Error: {}", msg),
            AppError::InvalidTimeZone(msg) => write!(f, "Invalid Time Zone: {}", msg),
            AppError::RenderingError(msg) => write!(f, "Rendering Error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Config Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<AppError> for JsValue {
    fn from(error: AppError) -> Self {
        JsValue::from_str(&error.to_string())
    }
}

pub type FeedResult<T> = Result<T, AppError>;
pub type RenderingResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn message_strips_variant_prefix() {
        let err = AppError::FeedError("relation \"brent_crude\" does not exist".to_string());
        assert_eq!(err.message(), "relation \"brent_crude\" does not exist");
        assert_eq!(err.to_string(), "Feed Error: relation \"brent_crude\" does not exist");
    }
}
