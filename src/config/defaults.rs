use super::*;

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            // 2024 strømstøtte
            rebate_threshold: 0.73,
            rebate_factor: 0.9,
            vat_multiplier: 1.25,
            day_start_hour: 6,
            day_end_hour: 22,
            currency: "NOK".to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            price_api_base: "https://www.hvakosterstrommen.no/api/v1/prices".to_string(),
            charger_api_base: "https://api.easee.com/api".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            file: String::new(),
            backup_count: 5,
            console_output: true,
            json_format: false,
        }
    }
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            stale_after_seconds: 3600,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings_path: "data.json".to_string(),
            timezone: "Europe/Oslo".to_string(),
            pricing: PricingPolicy::default(),
            http: HttpConfig::default(),
            logging: LoggingConfig::default(),
            lock: LockConfig::default(),
        }
    }
}
