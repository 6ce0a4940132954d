//! Prune command implementation for the deckhand CLI.

use std::time::Duration;

use deckhand_core::WorkRoot;

/// Delete staging directories at least `older_than_hours` old.
pub fn execute(root: &WorkRoot, older_than_hours: u64) -> anyhow::Result<()> {
    let age = Duration::from_secs(older_than_hours.saturating_mul(3600));
    let removed = root.prune(age)?;

    for path in &removed {
        tracing::debug!("Removed {}", path.display());
    }
    println!(
        "Removed {} staging director{} from {}",
        removed.len(),
        if removed.len() == 1 { "y" } else { "ies" },
        root.path().display()
    );

    Ok(())
}
