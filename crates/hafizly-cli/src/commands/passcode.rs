//! Passcode command handlers

use anyhow::Result;

use hafizly_core::{Config, PasscodeVault};

use crate::output::{Output, OutputFormat};
use crate::prompt;

/// Set or change the private-links passcode
pub fn set(config: &Config, output: &Output) -> Result<()> {
    let vault = PasscodeVault::new(config.passcode_path());

    let passcode = prompt::prompt_passcode("New password: ")?;
    let confirm = prompt::prompt_passcode("Confirm password: ")?;

    vault.store(&passcode, &confirm)?;

    output.success("Password set successfully");
    Ok(())
}

/// Show whether a passcode is set
pub fn status(config: &Config, output: &Output) -> Result<()> {
    let vault = PasscodeVault::new(config.passcode_path());
    let is_set = vault.is_set();

    match output.format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "passcode_set": is_set }));
        }
        OutputFormat::Quiet => {
            println!("{}", if is_set { "set" } else { "unset" });
        }
        OutputFormat::Human => {
            println!(
                "Private links password: {}",
                if is_set { "Set" } else { "Not set" }
            );
        }
    }

    Ok(())
}
