use once_cell::sync::Lazy;
use std::io;
use std::path::PathBuf;

const APP_DIR: &str = "minishop";

static PLATFORM_CONFIG_DIR: Lazy<Option<PathBuf>> = Lazy::new(dirs::config_dir);
static PLATFORM_DATA_DIR: Lazy<Option<PathBuf>> = Lazy::new(dirs::data_local_dir);

/// `$<xdg_var>/minishop`, else the platform directory joined with `minishop`.
fn app_dir(xdg_var: &str, platform_dir: &Option<PathBuf>) -> io::Result<PathBuf> {
    std::env::var_os(xdg_var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| platform_dir.clone())
        .map(|base| base.join(APP_DIR))
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("Neither {xdg_var} nor a platform default is available"),
            )
        })
}

pub fn get_config_dir() -> io::Result<PathBuf> {
    app_dir("XDG_CONFIG_HOME", &PLATFORM_CONFIG_DIR)
}

/// Directory for logs and readline history. Created on first access.
pub fn get_data_dir() -> io::Result<PathBuf> {
    let path = app_dir("XDG_DATA_HOME", &PLATFORM_DATA_DIR)?;
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

pub fn get_default_config() -> &'static str {
    include_str!("../data/config.yml")
}
