use crate::config::{self, Config};
use anyhow::{Context, Result};

pub fn list(config: &Config) -> Result<()> {
    // Config derives Serialize, so pretty TOML is the cheapest listing
    let toml_str = toml::to_string_pretty(config).context("Failed to serialize config")?;
    println!("{}", toml_str);
    Ok(())
}

pub fn get(key: &str, config: &Config) -> Result<()> {
    // Convert to a JSON value and walk the dot path
    let value = serde_json::to_value(config).context("Failed to serialize config")?;

    // Support dot notation: "milestones.default_status"
    let mut current = &value;
    for part in key.split('.') {
        current = current
            .get(part)
            .context(format!("Key not found: {}", part))?;
    }

    match current {
        serde_json::Value::String(s) => println!("{}", s),
        v => println!("{}", v),
    }

    Ok(())
}

pub fn set(key: &str, value: &str) -> Result<()> {
    // Rewrites the file through the toml serializer, so hand-written
    // comments do not survive. Array-valued keys (dates.extra_formats)
    // still need manual editing.
    let path = config::config_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let mut root: toml::Table = if path.exists() {
        std::fs::read_to_string(&path)
            .context("Failed to read config file")?
            .parse()
            .context("Failed to parse config file")?
    } else {
        toml::Table::new()
    };

    let mut parts: Vec<&str> = key.split('.').collect();
    let leaf = parts.pop().context("Empty config key")?;

    let mut table = &mut root;
    for part in parts {
        table = table
            .entry(part)
            .or_insert_with(|| toml::Value::Table(toml::Table::new()))
            .as_table_mut()
            .with_context(|| format!("Key segment '{}' is not a table", part))?;
    }
    table.insert(leaf.to_string(), toml::Value::String(value.to_string()));

    // Reject the write if the result no longer deserializes or validates
    let parsed: Config = toml::Value::Table(root.clone())
        .try_into()
        .context("Resulting config is invalid")?;
    parsed.validate()?;

    std::fs::write(&path, toml::to_string_pretty(&root)?).context("Failed to write config file")?;
    println!("✓ Set {} = {}", key, value);

    Ok(())
}
