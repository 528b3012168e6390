use super::{load_config, repository};
use crate::output::{print_json, print_table, truncate};
use anyhow::Context;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let skills = repository(root, &config, None, false)
        .skills()
        .context("failed to scan skills")?;

    if json {
        return print_json(&skills);
    }
    if skills.is_empty() {
        println!("No skills found.");
        return Ok(());
    }

    let rows = skills
        .iter()
        .map(|s| {
            vec![
                s.name.clone(),
                s.scope.to_string(),
                s.allowed_tools.join(", "),
                truncate(&s.description, 60),
            ]
        })
        .collect();
    print_table(&["NAME", "SCOPE", "TOOLS", "DESCRIPTION"], rows);
    Ok(())
}
