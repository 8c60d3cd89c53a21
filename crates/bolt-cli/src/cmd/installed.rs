use anyhow::Result;

use crate::paths::installed_path;
use crate::store::FileHashStore;

/// Print the identifier recorded for each provider.
pub fn installed() -> Result<()> {
    let store = FileHashStore::open(installed_path()?)?;
    let entries = store.entries();

    if entries.is_empty() {
        println!("No clients installed.");
        return Ok(());
    }

    let width = entries.keys().map(String::len).max().unwrap_or(0);
    for (key, id) in &entries {
        println!("{key:<width$}  {id}");
    }
    Ok(())
}
