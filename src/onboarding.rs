//! First-run interactive setup
//!
//! Asks the operator for everything the settings record needs. Only `main`
//! calls this, and only when no record exists yet; the job itself never
//! reads from the console.

use crate::error::{Result, StromprisError};
use crate::settings::{Settings, TokenPair, Zone};
use std::io::{BufRead, Write};

const SITE_ID_HELP: &str = "https://easee.cloud/sites";
const AUTHENTICATION_HELP: &str = "https://developer.easee.com/docs/authentication-1";
const REFRESH_TOKEN_HELP: &str =
    "https://developer.easee.com/reference/post_api-accounts-refresh-token";

/// Console prompts over any reader/writer pair
pub struct Onboarding<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Onboarding<R, W> {
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prompt for a full settings record
    pub fn run(&mut self) -> Result<Settings> {
        writeln!(self.output, "\nSite ID can be found at: {}", SITE_ID_HELP)?;
        let site_id = self.ask("Site ID", "site_id", parse_site_id)?;

        writeln!(self.output, "\nYour local power distributor has this information.")?;
        let transmission_day =
            self.ask("Transmission fee daytime", "transmission_day", parse_decimal)?;
        let transmission_night =
            self.ask("Transmission fee nighttime", "transmission_night", parse_decimal)?;

        writeln!(self.output, "Misc other fees.")?;
        let misc_costs = self.ask("Additional costs", "misc_costs", parse_decimal)? / 100.0;

        writeln!(
            self.output,
            "\nType what power zone you're in: NO1, NO2, NO3, NO4, NO5 or NO6."
        )?;
        let zone = self.ask("Zone", "zone", |s| s.parse::<Zone>().map_err(|e| e.to_string()))?;

        writeln!(self.output, "\nAccess Token can be setup here: {}", AUTHENTICATION_HELP)?;
        let access_token = self.ask("Access Token", "access_token", parse_token)?;

        writeln!(self.output, "\nRefresh Token can be found here: {}", REFRESH_TOKEN_HELP)?;
        let refresh_token = self.ask("Refresh Token", "refresh_token", parse_token)?;

        Ok(Settings {
            site_id,
            transmission_day,
            transmission_night,
            misc_costs,
            zone,
            tokens: TokenPair::new(access_token, refresh_token),
        })
    }

    fn ask<T>(
        &mut self,
        prompt: &str,
        field: &str,
        parse: impl Fn(&str) -> std::result::Result<T, String>,
    ) -> Result<T> {
        write!(self.output, "{}: ", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(StromprisError::validation(field, "no input"));
        }
        parse(line.trim()).map_err(|message| StromprisError::validation(field, message))
    }
}

fn parse_site_id(s: &str) -> std::result::Result<u64, String> {
    s.parse::<u64>()
        .map_err(|_| format!("expected a whole number, got {:?}", s))
}

fn parse_decimal(s: &str) -> std::result::Result<f64, String> {
    // Accept the Norwegian decimal comma
    let value = s
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| format!("expected a number, got {:?}", s))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("expected a finite number, got {:?}", s))
    }
}

fn parse_token(s: &str) -> std::result::Result<String, String> {
    if s.is_empty() {
        Err("token cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_accepts_comma() {
        assert!((parse_decimal("39,5").unwrap() - 39.5).abs() < f64::EPSILON);
        assert!(parse_decimal("abc").is_err());
        assert!(parse_decimal("inf").is_err());
    }

    #[test]
    fn test_parse_site_id() {
        assert_eq!(parse_site_id("123456").unwrap(), 123_456);
        assert!(parse_site_id("12.5").is_err());
    }
}
