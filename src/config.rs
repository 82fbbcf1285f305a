use std::path::PathBuf;

use envconfig::Envconfig;

/// Environment variable naming the dataset when no path argument is given.
pub const DATA_PATH_ENV: &str = "RESTAURANT_DASH_DATA";
pub const DEFAULT_DATA_PATH: &str = "zomato.csv";

pub const DEFAULT_MIN_RATING: f64 = 3.5;
/// Initial cost-for-two window, clamped to the selected city's maximum.
pub const DEFAULT_COST_RANGE: (u32, u32) = (200, 1000);
/// How many cuisines of the city are preselected.
pub const DEFAULT_CUISINE_COUNT: usize = 3;
pub const TOP_CUISINES: usize = 10;
pub const PREVIEW_ROWS: usize = 20;

// ---------------------------------------------------------------------------
// Startup configuration
// ---------------------------------------------------------------------------

#[derive(Envconfig)]
struct EnvConfig {
    #[envconfig(from = "RESTAURANT_DASH_DATA")]
    data_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_path: PathBuf,
}

impl Config {
    /// First positional argument, else `RESTAURANT_DASH_DATA`, else `zomato.csv`.
    pub fn from_env() -> Self {
        let env = match EnvConfig::init_from_env() {
            Ok(env) => env.data_path,
            Err(e) => {
                log::warn!("Ignoring {DATA_PATH_ENV}: {e}");
                None
            }
        };
        let config = Self::resolve(std::env::args().nth(1), env);
        log::debug!("Config loaded: data_path={}", config.data_path.display());
        config
    }

    fn resolve(arg: Option<String>, env: Option<String>) -> Self {
        let data_path = arg
            .or(env)
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());
        Config {
            data_path: PathBuf::from(data_path),
        }
    }
}
