use crate::config::Config;
use crate::errors::{AppError, AppResult};
use std::fs;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    /// Print the YAML on disk, or the effective defaults when there is no file.
    pub fn print(cfg: &Config) -> AppResult<()> {
        let path = Config::config_file();
        let content = if path.exists() {
            fs::read_to_string(&path)?
        } else {
            serde_yaml::to_string(cfg).map_err(|e| AppError::Config(e.to_string()))?
        };
        println!("{}", content);
        Ok(())
    }

    pub fn edit(editor: &Option<String>) -> AppResult<()> {
        let path = Config::config_file();
        if !path.exists() {
            return Err(AppError::Config(format!(
                "{} does not exist, run `logipunch init` first",
                path.display()
            )));
        }

        let ed = editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok())
            .unwrap_or_else(|| {
                if cfg!(target_os = "windows") {
                    "notepad".into()
                } else {
                    "nano".into()
                }
            });

        Command::new(ed)
            .arg(&path)
            .status()
            .map_err(|e| AppError::Config(e.to_string()))?;

        Ok(())
    }
}
