use super::load_config;
use crate::output::{print_json, print_table, truncate};
use clap::Subcommand;
use crew_core::cache::MetadataCache;
use std::path::Path;

#[derive(Subcommand)]
pub enum CacheSubcommand {
    /// Show every cached persona
    Show,

    /// Forget one agent's persona so the next generate mints a new one
    Delete {
        /// Agent identifier
        name: String,
    },

    /// Forget every persona
    Clear,
}

pub fn run(root: &Path, subcmd: CacheSubcommand, json: bool) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let mut cache = MetadataCache::open(root, &config);

    match subcmd {
        CacheSubcommand::Show => {
            let entries = cache.entries();
            if json {
                return print_json(entries);
            }
            if entries.is_empty() {
                println!("Cache is empty.");
                return Ok(());
            }
            let rows = entries
                .iter()
                .map(|(name, p)| {
                    vec![
                        name.clone(),
                        p.display_name.clone(),
                        p.gender.to_string(),
                        p.source.to_string(),
                        truncate(&p.tagline, 40),
                    ]
                })
                .collect();
            print_table(&["AGENT", "DISPLAY NAME", "GENDER", "SOURCE", "TAGLINE"], rows);
        }
        CacheSubcommand::Delete { name } => {
            if !cache.delete(&name)? {
                anyhow::bail!("no cached persona for '{name}'");
            }
            if json {
                return print_json(&serde_json::json!({ "deleted": name }));
            }
            println!("Deleted persona for {name}");
        }
        CacheSubcommand::Clear => {
            let removed = cache.clear()?;
            if json {
                return print_json(&serde_json::json!({ "removed": removed }));
            }
            println!("Removed {removed} cached personas");
        }
    }
    Ok(())
}
