use std::path::Path;

use anyhow::Context;
use cliclack::{confirm, intro, outro};

use crate::{app_config::AppConfig, init::read_profile};

pub fn init_cmd(config: &AppConfig, profile_path: &Path) -> anyhow::Result<()> {
    intro("NoteHub profile setup")?;

    if profile_path.exists() {
        let overwrite = confirm(format!(
            "Profile {} already exists. Overwrite it?",
            profile_path.display()
        ))
        .initial_value(false)
        .interact()?;

        if !overwrite {
            outro("Profile left unchanged")?;
            return Ok(());
        }
    }

    let profile = read_profile(config)?;
    profile
        .save(profile_path)
        .with_context(|| format!("Couldn't save profile to {}", profile_path.display()))?;

    outro(format!("Profile saved to {}", profile_path.display()))?;

    Ok(())
}
