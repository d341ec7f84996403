/// Single endpoint every command is dispatched to.
pub const API_URL: &str = "https://www.coinpayments.net/api.php";

/// API version sent with every command unless overridden.
pub const DEFAULT_API_VERSION: &str = "1";

/// Value of the `error` field on a successful structured response.
pub const SUCCESS_STATUS: &str = "ok";

/// Header carrying the hex HMAC of the encoded parameters.
pub const HMAC_HEADER: &str = "hmac";

/// Content type of every POST body.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Upper bound the server accepts for `get_tx_ids`.
pub const MAX_TX_IDS_LIMIT: u32 = 100;

/// Default page size for history listings.
pub const DEFAULT_LIST_LIMIT: u32 = 25;

/// Fiat currency used when the caller does not name one.
pub const DEFAULT_FIAT: &str = "USD";

/// Total attempts per logical request (first try included).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Per-attempt HTTP timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
