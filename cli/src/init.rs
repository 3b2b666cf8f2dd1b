use anyhow::Context;
use cliclack::input;

use crate::{app_config::AppConfig, profile::Profile};

pub fn read_profile(defaults: &AppConfig) -> anyhow::Result<Profile> {
    let profile = Profile {
        api_url: Some(read_api_url(&defaults.api_url)?),
        token: read_token()?,
        per_page: Some(read_per_page(defaults.per_page)?),
        debounce_ms: Some(defaults.debounce_ms),
    };

    Ok(profile)
}

fn read_api_url(default: &str) -> anyhow::Result<String> {
    input("API base URL")
        .placeholder(default)
        .default_input(default)
        .required(true)
        .validate(|value: &String| {
            if value.starts_with("http://") || value.starts_with("https://") {
                Ok(())
            } else {
                Err("URL must start with http:// or https://")
            }
        })
        .interact()
        .context("Couldn't read API URL")
}

fn read_token() -> anyhow::Result<Option<String>> {
    let token: String = input("API token (leave empty for none)")
        .required(false)
        .interact()
        .context("Couldn't read API token")?;

    Ok(Some(token.trim().to_string()).filter(|t| !t.is_empty()))
}

fn read_per_page(default: u32) -> anyhow::Result<u32> {
    input("Notes per page")
        .default_input(&default.to_string())
        .validate(|value: &String| match value.parse::<u32>() {
            Ok(n) if n > 0 => Ok(()),
            _ => Err("Enter a positive number"),
        })
        .interact()
        .context("Couldn't read page size")
}
