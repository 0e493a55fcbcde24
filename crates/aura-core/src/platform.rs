use std::path::PathBuf;

/// Environment override that roots both data and config under one directory.
/// Handy for portable installs and for running several profiles side by side.
pub const HOME_ENV: &str = "AURA_HOME";

fn home_override() -> Option<PathBuf> {
    let dir = std::env::var_os(HOME_ENV)?;
    if dir.is_empty() {
        return None;
    }
    Some(PathBuf::from(dir))
}

pub fn data_dir() -> PathBuf {
    if let Some(home) = home_override() {
        return home.join("data");
    }

    // On macOS and Linux, use ~/.local/share/aura/ (XDG standard)
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(temp_dir)
            .join(".local")
            .join("share")
            .join("aura")
    }
    #[cfg(windows)]
    {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("aura")
    }
}

pub fn config_dir() -> PathBuf {
    if let Some(home) = home_override() {
        return home;
    }

    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("aura")
    }
    #[cfg(windows)]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("aura")
    }
}

pub fn temp_dir() -> PathBuf {
    std::env::temp_dir()
}
