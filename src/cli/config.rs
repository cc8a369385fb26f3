//! Show the effective configuration.

use crate::config::Config;
use crate::error::Error;
use crate::patterns::PATTERN_VERSION;

/// Print the config that applies to the current directory.
pub fn show() -> Result<(), Error> {
    let project_root = std::env::current_dir()?;
    let project_path = Config::path(&project_root);

    let source = if project_path.exists() {
        project_path.display().to_string()
    } else {
        match Config::global_path().filter(|p| p.exists()) {
            Some(global) => global.display().to_string(),
            None => "built-in defaults".to_string(),
        }
    };

    let config = Config::load(&project_root)?;
    println!("# source: {}", source);
    println!("# pattern tables: v{}", PATTERN_VERSION);
    print!("{}", config.to_toml()?);
    Ok(())
}
