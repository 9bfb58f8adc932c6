//! Default value functions for configuration.

// =============================================================================
// Gateway Defaults
// =============================================================================

pub fn default_gateway_url() -> String {
    "wss://gateway.discord.gg/?v=10&encoding=json".to_string()
}

pub fn default_api_base() -> String {
    "https://discord.com/api/v10".to_string()
}

// =============================================================================
// Dispatch Defaults
// =============================================================================

pub fn default_shutdown_grace_secs() -> u64 {
    5
}
