use clap::Subcommand;
use studyplan_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "planner.start_time", "export.time_zone")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value (subjects take a JSON array or a comma-separated list)
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &subjects_value(&key, &value))?;
            config.save()?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}

/// `planner.subjects` also accepts "Math, Physics"; turn that into a JSON array.
fn subjects_value(key: &str, value: &str) -> String {
    if key != "planner.subjects" || value.trim_start().starts_with('[') {
        return value.to_string();
    }
    let subjects: Vec<&str> = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    serde_json::to_string(&subjects).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_list_becomes_json_array() {
        assert_eq!(
            subjects_value("planner.subjects", "Math, Physics,"),
            r#"["Math","Physics"]"#
        );
        assert_eq!(subjects_value("planner.subjects", r#"["A"]"#), r#"["A"]"#);
        assert_eq!(subjects_value("planner.days", "3"), "3");
    }
}
