//! Profile command implementation.

use crate::cli::{ProfileAction, ProfileArgs};
use crate::config::{Config, Profile};
use crate::error::{CliError, Result};
use crate::output::Formatter;

/// Execute the profile command.
pub async fn execute_profile(args: ProfileArgs, config: &mut Config, formatter: &Formatter) -> Result<()> {
    match args.action {
        ProfileAction::List => list_profiles(config, formatter),
        ProfileAction::Show => show_active_profile(config, formatter),
        ProfileAction::Switch { name } => switch_profile(config, name, formatter),
        ProfileAction::Set {
            name,
            url,
            model,
            api_key_env,
            referer,
            app_title,
        } => {
            let update = ProfileUpdate {
                url,
                model,
                api_key_env,
                referer,
                app_title,
            };
            set_profile(config, name, update, formatter)
        }
        ProfileAction::Delete { name } => delete_profile(config, name, formatter),
    }
}

/// Fields given to `profile set`; unset ones keep their current value.
#[derive(Debug, Default)]
struct ProfileUpdate {
    url: Option<String>,
    model: Option<String>,
    api_key_env: Option<String>,
    referer: Option<String>,
    app_title: Option<String>,
}

impl ProfileUpdate {
    fn apply(self, profile: &mut Profile) {
        if let Some(url) = self.url {
            profile.base_url = url;
        }
        if let Some(model) = self.model {
            profile.model = Some(model);
        }
        if let Some(env) = self.api_key_env {
            profile.api_key_env = env;
        }
        if let Some(referer) = self.referer {
            profile.referer = referer;
        }
        if let Some(title) = self.app_title {
            profile.app_title = title;
        }
    }
}

/// List all profiles.
fn list_profiles(config: &Config, formatter: &Formatter) -> Result<()> {
    if config.profiles.is_empty() {
        println!("{}", formatter.info("No profiles configured"));
        return Ok(());
    }

    println!("Available profiles:");
    for (name, profile) in &config.profiles {
        if name == &config.active_profile {
            println!("* {}", formatter.success(name));
        } else {
            println!("  {}", name);
        }
        print_profile(profile, "    ");
    }

    Ok(())
}

/// Show the active profile.
fn show_active_profile(config: &Config, formatter: &Formatter) -> Result<()> {
    let profile = config.get_active_profile()?;

    println!("Active profile: {}", formatter.success(&config.active_profile));
    print_profile(profile, "  ");
    if profile.api_key_from_env().is_none() {
        println!(
            "{}",
            formatter.warning(&format!("${} is not set", profile.api_key_env))
        );
    }

    Ok(())
}

fn print_profile(profile: &Profile, indent: &str) {
    println!("{}URL: {}", indent, profile.base_url);
    println!("{}Model: {}", indent, profile.model.as_deref().unwrap_or("(none)"));
    println!("{}API key variable: {}", indent, profile.api_key_env);
}

/// Switch to a different profile.
fn switch_profile(config: &mut Config, name: String, formatter: &Formatter) -> Result<()> {
    config.switch_profile(name.clone())?;
    config.save()?;
    println!(
        "{}",
        formatter.success(&format!("Switched to profile '{}'", name))
    );
    Ok(())
}

/// Create or update a profile.
fn set_profile(config: &mut Config, name: String, update: ProfileUpdate, formatter: &Formatter) -> Result<()> {
    let action = if config.profiles.contains_key(&name) {
        "Updated"
    } else {
        "Created"
    };

    let mut profile = config.profiles.get(&name).cloned().unwrap_or_default();
    update.apply(&mut profile);

    config.set_profile(name.clone(), profile);
    config.save()?;

    println!(
        "{}",
        formatter.success(&format!("{} profile '{}'", action, name))
    );

    Ok(())
}

/// Delete a profile.
fn delete_profile(config: &mut Config, name: String, formatter: &Formatter) -> Result<()> {
    if name == config.active_profile {
        return Err(CliError::NotPermitted(
            "Cannot delete the active profile".to_string(),
        ));
    }

    if config.profiles.remove(&name).is_some() {
        config.save()?;
        println!(
            "{}",
            formatter.success(&format!("Deleted profile '{}'", name))
        );
    } else {
        println!(
            "{}",
            formatter.warning(&format!("Profile '{}' does not exist", name))
        );
    }

    Ok(())
}
