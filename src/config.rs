use std::{path::PathBuf, time::Duration};

use crate::agents::Pace;
use crate::error::{RestaurantError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub students: usize,
    pub courses: usize,
    pub max_walk: Duration,
    pub max_eat: Duration,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            students: 7,
            courses: 3,
            max_walk: Duration::from_millis(300),
            max_eat: Duration::from_millis(100),
            log_file: PathBuf::from("restaurant.log"),
        }
    }
}

fn invalid(message: String) -> RestaurantError {
    RestaurantError::InvalidConfig { message }
}

fn number(flag: &str, value: Option<String>) -> Result<u64> {
    let value = value.ok_or_else(|| invalid(format!("{} needs a value", flag)))?;
    value
        .parse()
        .map_err(|_| invalid(format!("{} expects a number, got {:?}", flag, value)))
}

impl Config {
    /// Parses `--students N --courses N --walk-ms N --eat-ms N --log PATH`,
    /// starting from the defaults. The program name must not be included.
    pub fn from_args<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Config::default();
        let mut args = args.into_iter();
        while let Some(flag) = args.next() {
            match flag.as_str() {
                "--students" => config.students = number(&flag, args.next())? as usize,
                "--courses" => config.courses = number(&flag, args.next())? as usize,
                "--walk-ms" => {
                    config.max_walk = Duration::from_millis(number(&flag, args.next())?);
                }
                "--eat-ms" => {
                    config.max_eat = Duration::from_millis(number(&flag, args.next())?);
                }
                "--log" => {
                    let path = args
                        .next()
                        .ok_or_else(|| invalid("--log needs a path".to_string()))?;
                    config.log_file = PathBuf::from(path);
                }
                other => return Err(invalid(format!("unknown argument {:?}", other))),
            }
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.students == 0 {
            return Err(invalid("at least one student is needed".to_string()));
        }
        if self.courses == 0 {
            return Err(invalid("at least one course is needed".to_string()));
        }
        Ok(())
    }

    pub fn pace(&self) -> Pace {
        Pace {
            max_walk: self.max_walk,
            max_eat: self.max_eat,
        }
    }
}
