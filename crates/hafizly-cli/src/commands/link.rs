//! Link command handlers

use anyhow::{bail, Result};

use hafizly_core::{
    filter_links, CategoryFilter, Config, Link, LinkDraft, LinkStore, PasscodeVault,
};

use crate::metadata;
use crate::output::Output;
use crate::prompt;

/// Save a new link
pub async fn add(
    store: &mut LinkStore,
    url: String,
    name: Option<String>,
    description: Option<String>,
    private: bool,
    output: &Output,
) -> Result<()> {
    // Pre-fill from page metadata when no name was given; validation
    // still rejects the draft if the page yields nothing usable
    let (name, description) = if name.is_none() {
        let fetched = metadata::fetch_metadata(&url).await;
        (fetched.title, description.or(fetched.description))
    } else {
        (name, description)
    };

    let draft = LinkDraft::new(
        name.unwrap_or_default(),
        description.unwrap_or_default(),
        url,
        !private,
    );
    store.add(&draft).await?;

    output.success(&format!("Saved link: {}", draft.name.trim()));
    // The snapshot is newest-first after the re-fetch
    if let Some(link) = store.links().first() {
        output.print_link(link);
    }

    Ok(())
}

/// List links, filtered by category and an optional search term
pub async fn list(
    store: &mut LinkStore,
    config: &Config,
    filter: CategoryFilter,
    search: Option<String>,
    output: &Output,
) -> Result<()> {
    if filter == CategoryFilter::Private {
        ensure_private_access(config)?;
    }

    store.refresh().await?;
    let term = search.unwrap_or_default();
    let links = filter_links(store.links(), filter, &term);
    output.print_links(&links);
    Ok(())
}

/// Show a single link
pub async fn show(
    store: &mut LinkStore,
    config: &Config,
    id: i64,
    output: &Output,
) -> Result<()> {
    store.refresh().await?;
    let link = find_link(store, id)?.clone();

    if !link.is_public() {
        ensure_private_access(config)?;
    }

    output.print_link(&link);
    Ok(())
}

/// Edit a link interactively
pub async fn edit(
    store: &mut LinkStore,
    config: &Config,
    id: i64,
    output: &Output,
) -> Result<()> {
    store.refresh().await?;
    let link = find_link(store, id)?.clone();

    if !link.is_public() {
        ensure_private_access(config)?;
    }

    println!("Editing link: {}", link.id);
    println!("Press Enter to keep current value, or type new value.\n");

    let name = prompt::prompt_with_default("Name", &link.name)?.unwrap_or_else(|| link.name.clone());

    let current_desc = link.description.clone().unwrap_or_default();
    let description =
        prompt::prompt_with_default("Description", &current_desc)?.unwrap_or(current_desc);

    let url = prompt::prompt_with_default("URL", &link.url)?.unwrap_or_else(|| link.url.clone());

    let is_public =
        match prompt::prompt_with_default("Category (Public/Private)", link.category.as_str())? {
            None => link.is_public(),
            Some(value) => match value.to_lowercase().as_str() {
                "public" => true,
                "private" => false,
                other => bail!("Unknown category: '{}'. Use 'Public' or 'Private'.", other),
            },
        };

    let draft = LinkDraft::new(name, description, url, is_public);
    store.update(link.id, &draft).await?;

    output.success("Link updated");
    if let Some(updated) = store.get(link.id) {
        output.print_link(updated);
    }

    Ok(())
}

/// Delete a link
pub async fn delete(store: &mut LinkStore, id: i64, output: &Output) -> Result<()> {
    store.refresh().await?;
    let link = find_link(store, id)?;

    // Confirm deletion
    if output.should_prompt() {
        println!("Delete link: {} - {}", link.id, link.name);
        if !prompt::confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.delete(id).await?;
    output.success(&format!("Deleted link: {}", id));

    Ok(())
}

/// Flip a link between Public and Private
pub async fn toggle(store: &mut LinkStore, id: i64, output: &Output) -> Result<()> {
    store.refresh().await?;
    let current = find_link(store, id)?.category;

    store.toggle_privacy(id, current).await?;

    output.success(&format!("Link {} is now {}", id, current.toggled()));
    Ok(())
}

/// Look up a link in the snapshot by id
fn find_link(store: &LinkStore, id: i64) -> Result<&Link> {
    store
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("Link not found: {}", id))
}

/// Check the passcode before showing private links
///
/// With no passcode stored, access is open.
fn ensure_private_access(config: &Config) -> Result<()> {
    let vault = PasscodeVault::new(config.passcode_path());
    match vault.load()? {
        None => Ok(()),
        Some(stored) => {
            let input = prompt::prompt_passcode("Passcode: ")?;
            if input == stored {
                Ok(())
            } else {
                bail!("Authentication failed")
            }
        }
    }
}
