//! Status command handler

use anyhow::Result;

use hafizly_core::{Config, LinkStore, PasscodeVault};

use crate::output::{Output, OutputFormat};

/// Show backend status and link counts
pub async fn show(store: &mut LinkStore, config: &Config, output: &Output) -> Result<()> {
    let fetch_error = store.refresh().await.err();
    let passcode_set = PasscodeVault::new(config.passcode_path()).is_set();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "table_url": config.table_url,
                    "table": config.table,
                    "reachable": fetch_error.is_none(),
                    "passcode_set": passcode_set,
                    "counts": {
                        "links": store.len(),
                        "public": store.public_count(),
                        "private": store.private_count()
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", store.len());
        }
        OutputFormat::Human => {
            println!("HafizLy Status");
            println!("==============");
            println!();
            println!("Backend:");
            println!(
                "  Table URL:  {}",
                config.table_url.as_deref().unwrap_or("(not set)")
            );
            println!("  Collection: {}", config.table);
            match &fetch_error {
                None => println!("  Reachable:  yes"),
                Some(e) => println!("  Reachable:  no ({})", e.user_message()),
            }
            println!();
            println!("Local:");
            println!("  Data dir: {}", config.data_dir.display());
            println!(
                "  Passcode: {}",
                if passcode_set { "set" } else { "not set" }
            );
            println!();
            println!("Contents:");
            println!(
                "  Links: {} ({} public, {} private)",
                store.len(),
                store.public_count(),
                store.private_count()
            );
        }
    }

    Ok(())
}
