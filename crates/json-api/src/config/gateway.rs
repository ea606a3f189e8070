//! Payment Gateway Config

use std::time::Duration;

use clap::Args;

use cinemates_app::gateway::{DEFAULT_API_BASE, RazorpayConfig};

/// Razorpay settings.
#[derive(Debug, Args)]
pub struct GatewayConfig {
    /// Razorpay key id, handed to the checkout widget
    #[arg(long, env = "RAZORPAY_KEY_ID")]
    pub razorpay_key_id: String,

    /// Razorpay key secret, used for API auth and payment signatures
    #[arg(long, env = "RAZORPAY_KEY_SECRET", hide_env_values = true)]
    pub razorpay_key_secret: String,

    /// Razorpay API base URL
    #[arg(long, env = "RAZORPAY_API_BASE", default_value = DEFAULT_API_BASE)]
    pub razorpay_api_base: String,

    /// Deadline for each gateway call, in seconds
    #[arg(long, env = "PAYMENT_GATEWAY_TIMEOUT_SECONDS", default_value_t = 10_u64)]
    pub payment_gateway_timeout_seconds: u64,
}

impl GatewayConfig {
    /// Client settings for the gateway.
    #[must_use]
    pub fn to_razorpay_config(&self) -> RazorpayConfig {
        RazorpayConfig {
            api_base: self.razorpay_api_base.trim_end_matches('/').to_string(),
            key_id: self.razorpay_key_id.clone(),
            key_secret: self.razorpay_key_secret.clone(),
            timeout: Duration::from_secs(self.payment_gateway_timeout_seconds),
        }
    }
}
