use crate::cli::ConfigAction;
use crate::config::Config;
use anyhow::{bail, Result};

pub fn run(config: &Config, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            match Config::path() {
                Some(path) => println!("# {}", path.display()),
                None => println!("# no config directory available"),
            }
            print!("{}", toml::to_string_pretty(config)?);
        }
        ConfigAction::Init { force } => {
            if let Some(path) = Config::path() {
                if path.exists() && !force {
                    bail!(
                        "Config already exists at {} (use --force to overwrite)",
                        path.display()
                    );
                }
            }
            let path = Config::default().save()?;
            println!("Wrote default config to {}", path.display());
        }
    }
    Ok(())
}
