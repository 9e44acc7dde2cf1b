//! Blum endpoint and browser fingerprint constants
//!
//! The header set mirrors the Telegram web app running in desktop Chrome 124
//! on macOS. These values are not configurable; only the base origins are.

/// Gateway origin serving the identity endpoint
pub const GATEWAY_URL: &str = "https://gateway.blum.codes";

/// Game-domain origin serving balance and farming endpoints
pub const GAME_URL: &str = "https://game-domain.blum.codes";

/// "Who am I" path on the gateway
pub const USER_ME_PATH: &str = "/v1/user/me";

/// Balance and farming status path on the game domain
pub const BALANCE_PATH: &str = "/api/v1/user/balance";

/// Claim completed farming (POST, empty body)
pub const FARMING_CLAIM_PATH: &str = "/api/v1/farming/claim";

/// Start a farming session (POST, empty body)
pub const FARMING_START_PATH: &str = "/api/v1/farming/start";

/// Server error code carried in a 401 body when the token is unauthenticated
pub const UNAUTHENTICATED_CODE: i64 = 16;

pub const ORIGIN: &str = "https://telegram.blum.codes";
pub const REFERER: &str = "https://telegram.blum.codes/";
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Static headers sent with every request, in the order a browser sends them.
pub const BROWSER_HEADERS: &[(&str, &str)] = &[
    ("accept", "application/json, text/plain, */*"),
    ("accept-language", "en-GB,en-US;q=0.9,en;q=0.8"),
    ("origin", ORIGIN),
    ("referer", REFERER),
    (
        "sec-ch-ua",
        r#""Chromium";v="124", "Google Chrome";v="124", "Not-A.Brand";v="99""#,
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", "macOS"),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "same-site"),
    ("user-agent", USER_AGENT),
];
