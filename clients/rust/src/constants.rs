//! Fixed endpoints and tuning values for the claim flow.

use std::time::Duration;

/// Squid v2 route endpoint used for bridge/swap quotes.
pub const DEFAULT_QUOTE_URL: &str = "https://v2.api.squidrouter.com/v2/route";

/// Integrator id sent with quote requests.
pub const DEFAULT_INTEGRATOR_ID: &str = "link-claim";

/// The relay backend ignores the key; it only has to be present.
pub const PLACEHOLDER_API_KEY: &str = "doesnt-matter";

/// Relay route for same-chain gasless claims, relative to the proxy base URL.
pub const SAME_CHAIN_CLAIM_PATH: &str = "/claim-v2";

/// Relay route for cross-chain gasless claims.
pub const CROSS_CHAIN_CLAIM_PATH: &str = "/claim-x-chain";

/// Proxied quote route the cross-chain relay uses to re-derive its route.
pub const RELAY_ROUTE_PATH: &str = "/get-squid-route";

/// Slippage tolerance for quotes, in percent.
pub const DEFAULT_SLIPPAGE_PERCENT: u32 = 1;

/// Wait after a wallet chain switch so wallet state can propagate.
pub const NETWORK_SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Interval between rotating progress labels while a relay call is pending.
pub const PROGRESS_ROTATION_INTERVAL: Duration = Duration::from_secs(2);
