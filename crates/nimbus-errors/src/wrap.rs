#[cfg(feature = "wrap-reqwest")]
use crate::code::{codes, ErrorCode};
#[cfg(feature = "wrap-reqwest")]
use crate::model::{ErrorBuilder, ErrorObj};

#[cfg(feature = "wrap-reqwest")]
impl From<reqwest::Error> for ErrorObj {
    fn from(e: reqwest::Error) -> Self {
        let code: ErrorCode = if e.is_timeout() {
            codes::STORAGE_UNAVAILABLE
        } else {
            codes::PROVIDER_UNAVAILABLE
        };
        ErrorBuilder::new(code)
            .user_msg("Upstream provider is unavailable. Please retry later.")
            .dev_msg(format!("reqwest: {e}"))
            .meta_kv("provider", serde_json::json!("http"))
            .build()
    }
}
