use crate::errors::{AppError, AppResult};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// First day of the week used by the week views and the timesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn weekday(&self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// Join code of the company this terminal belongs to.
    #[serde(default)]
    pub company_code: Option<String>,
    #[serde(default = "default_week_start")]
    pub week_starts_on: WeekStart,
    /// Group whose members show up in every group's timesheet.
    #[serde(default = "default_shared_group")]
    pub shared_group: Option<String>,
    #[serde(default = "default_yard_project")]
    pub yard_project_name: String,
    #[serde(default = "default_mechanic_project_name")]
    pub mechanic_project_name: String,
    #[serde(default = "default_mechanic_project_number")]
    pub mechanic_project_number: String,
    #[serde(default = "default_sms_ttl")]
    pub sms_code_ttl_minutes: i64,
    #[serde(default = "default_sms_template")]
    pub sms_template: String,
    #[serde(default)]
    pub twilio_account_sid: Option<String>,
    #[serde(default)]
    pub twilio_auth_token: Option<String>,
    #[serde(default)]
    pub twilio_from: Option<String>,
}

fn default_week_start() -> WeekStart {
    WeekStart::Sunday
}
fn default_shared_group() -> Option<String> {
    Some("Groupe DDL".to_string())
}
fn default_yard_project() -> String {
    "Éco-Vrac".to_string()
}
fn default_mechanic_project_name() -> String {
    "Mécanique".to_string()
}
fn default_mechanic_project_number() -> String {
    "26-MEC".to_string()
}
fn default_sms_ttl() -> i64 {
    10
}
fn default_sms_template() -> String {
    "Votre code TapIN : {code} (valide 10 minutes)".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            company_code: None,
            week_starts_on: default_week_start(),
            shared_group: default_shared_group(),
            yard_project_name: default_yard_project(),
            mechanic_project_name: default_mechanic_project_name(),
            mechanic_project_number: default_mechanic_project_number(),
            sms_code_ttl_minutes: default_sms_ttl(),
            sms_template: default_sms_template(),
            twilio_account_sid: None,
            twilio_auth_token: None,
            twilio_from: None,
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("logipunch")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".logipunch")
        }
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join("logipunch.conf")
    }

    pub fn database_file() -> PathBuf {
        Self::config_dir().join("logipunch.sqlite")
    }

    /// Directory holding uploaded company logos, next to the database.
    pub fn storage_dir(&self) -> PathBuf {
        PathBuf::from(&self.database)
            .parent()
            .map(|p| p.join("files"))
            .unwrap_or_else(|| Self::config_dir().join("files"))
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn save(&self) -> AppResult<()> {
        fs::create_dir_all(Self::config_dir())?;
        let yaml = serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))?;
        fs::write(Self::config_file(), yaml)?;
        Ok(())
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Config> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB path: user provided or default
        let db_path = match custom_db {
            Some(name) => {
                let p = PathBuf::from(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::database_file(),
        };

        let mut config = if Self::config_file().exists() {
            Self::load()?
        } else {
            Config::default()
        };
        config.database = db_path.to_string_lossy().to_string();

        if !is_test {
            config.save()?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(config)
    }

    /// Twilio credentials, with environment variables taking precedence.
    pub fn twilio_credentials(&self) -> Option<(String, String, String)> {
        let pick = |var: &str, fallback: &Option<String>| {
            env::var(var)
                .ok()
                .filter(|v| !v.is_empty())
                .or_else(|| fallback.clone())
        };

        Some((
            pick("TWILIO_ACCOUNT_SID", &self.twilio_account_sid)?,
            pick("TWILIO_AUTH_TOKEN", &self.twilio_auth_token)?,
            pick("TWILIO_PHONE_NUMBER", &self.twilio_from)?,
        ))
    }
}
