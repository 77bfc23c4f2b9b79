//! Order server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Order server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// WhatsApp Cloud API access token
    pub waba_access_token: String,
    /// WhatsApp business phone number ID (sender)
    pub waba_phone_number_id: String,
    /// Owner's WhatsApp number in international format
    pub waba_owner_number: String,
    /// Shared secret echoed during webhook subscription verification
    pub waba_verify_token: String,
    /// M-Pesa Daraja consumer key
    pub mpesa_consumer_key: String,
    /// M-Pesa Daraja consumer secret
    pub mpesa_consumer_secret: String,
    /// Paybill/till shortcode receiving the payments
    pub mpesa_shortcode: String,
    /// STK push passkey issued for the shortcode
    pub mpesa_passkey: String,
    /// Public URL Daraja calls back with payment results
    pub mpesa_callback_url: String,
    /// Daraja environment: sandbox | production
    pub mpesa_env: String,
    /// Cleaning fee in whole shillings when the order does not name one
    pub default_cleaning_fee: i64,
}

impl Config {
    /// Fetch a secret from the environment.
    ///
    /// Outside development the variable must be set and non-empty. In
    /// development a recognizable placeholder is substituted so the server
    /// boots without real credentials; the gateways treat it as unconfigured.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let dev = environment == "development";
        match std::env::var(name) {
            Ok(v) if !v.is_empty() => Ok(v),
            _ if dev => Ok(format!("dev-{name}-not-for-production")),
            _ => Err(format!("{name} must be set and non-empty in {environment}").into()),
        }
    }

    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            waba_access_token: Self::require_secret("WABA_ACCESS_TOKEN", &environment)?,
            waba_phone_number_id: std::env::var("WABA_PHONE_NUMBER_ID").unwrap_or_default(),
            waba_owner_number: std::env::var("WABA_OWNER_NUMBER").unwrap_or_default(),
            waba_verify_token: Self::require_secret("WABA_VERIFY_TOKEN", &environment)?,
            mpesa_consumer_key: Self::require_secret("MPESA_CONSUMER_KEY", &environment)?,
            mpesa_consumer_secret: Self::require_secret("MPESA_CONSUMER_SECRET", &environment)?,
            mpesa_shortcode: std::env::var("MPESA_SHORTCODE").unwrap_or_else(|_| "174379".into()),
            mpesa_passkey: Self::require_secret("MPESA_PASSKEY", &environment)?,
            mpesa_callback_url: std::env::var("MPESA_CALLBACK_URL")
                .unwrap_or_else(|_| "http://localhost:3000/api/payments/callback".into()),
            mpesa_env: std::env::var("MPESA_ENV").unwrap_or_else(|_| "sandbox".into()),
            default_cleaning_fee: std::env::var("DEFAULT_CLEANING_FEE")
                .ok()
                .and_then(|f| f.parse().ok())
                .unwrap_or(300),
            environment,
        })
    }
}
