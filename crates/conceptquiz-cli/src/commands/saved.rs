//! The `conceptquiz saved` command.

use std::path::PathBuf;

use anyhow::Result;

use conceptquiz_client::config::load_config_from;
use conceptquiz_core::traits::RelationStore;

use super::search::relations_table;

pub fn execute(rel_filter: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = config.store()?;

    let relations = match &rel_filter {
        Some(rel) => store.load(&|r| r.id.eq_ignore_ascii_case(rel)),
        None => store.load_all(),
    };

    if relations.is_empty() {
        println!("No relations saved. Run `conceptquiz search <term>` first.");
        return Ok(());
    }

    println!("{}", relations_table(&relations));
    println!("{} relation(s)", relations.len());

    Ok(())
}
