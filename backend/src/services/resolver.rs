use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::utils::error::AppError;

/// Nama binary converter sesuai platform.
#[cfg(windows)]
pub const CONVERTER_BINARY: &str = "ffmpeg.exe";
#[cfg(not(windows))]
pub const CONVERTER_BINARY: &str = "ffmpeg";

/// Lokasi converter relatif terhadap root resource (dev maupun bundle).
fn relative_converter_path() -> PathBuf {
    Path::new("helpers").join("ffmpeg").join(CONVERTER_BINARY)
}

/// Strategi untuk menemukan executable converter.
///
/// Handler hanya bergantung pada trait ini, sehingga test bisa memasang
/// resolver palsu (closure) tanpa menyentuh layout deployment.
pub trait ConverterResolver: Send + Sync {
    fn resolve(&self) -> Result<PathBuf, AppError>;
}

impl<F> ConverterResolver for F
where
    F: Fn() -> Result<PathBuf, AppError> + Send + Sync,
{
    fn resolve(&self) -> Result<PathBuf, AppError> {
        self()
    }
}

/// Resolver default: override → bundle root → folder executable.
#[derive(Debug, Clone, Default)]
pub struct LayoutResolver {
    override_path: Option<PathBuf>,
    bundle_root: Option<PathBuf>,
}

impl LayoutResolver {
    pub fn new(override_path: Option<PathBuf>, bundle_root: Option<PathBuf>) -> Self {
        Self {
            override_path,
            bundle_root,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.converter_path.clone(), config.bundle_root.clone())
    }

    /// Layout development: di samping binary server yang sedang berjalan.
    fn development_root() -> Result<PathBuf, AppError> {
        let exe = std::env::current_exe()
            .map_err(|e| AppError::io("Gagal menentukan lokasi executable server", e))?;

        exe.parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| AppError::Internal(format!("Executable '{}' tidak punya parent", exe.display())))
    }
}

impl ConverterResolver for LayoutResolver {
    fn resolve(&self) -> Result<PathBuf, AppError> {
        if let Some(path) = &self.override_path {
            return Ok(path.clone());
        }

        let root = match &self.bundle_root {
            Some(root) => root.clone(),
            None => Self::development_root()?,
        };

        Ok(root.join(relative_converter_path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_over_bundle_root() {
        let resolver = LayoutResolver::new(
            Some(PathBuf::from("/usr/local/bin/ffmpeg")),
            Some(PathBuf::from("/opt/bundle")),
        );
        assert_eq!(resolver.resolve().unwrap(), PathBuf::from("/usr/local/bin/ffmpeg"));
    }

    #[test]
    fn bundle_root_uses_helpers_layout() {
        let resolver = LayoutResolver::new(None, Some(PathBuf::from("/opt/bundle")));
        assert_eq!(
            resolver.resolve().unwrap(),
            Path::new("/opt/bundle").join("helpers").join("ffmpeg").join(CONVERTER_BINARY)
        );
    }

    #[test]
    fn development_layout_sits_next_to_executable() {
        let exe_dir = std::env::current_exe().unwrap().parent().unwrap().to_path_buf();
        let resolved = LayoutResolver::default().resolve().unwrap();

        assert!(resolved.starts_with(&exe_dir));
        assert!(resolved.ends_with(Path::new("helpers").join("ffmpeg").join(CONVERTER_BINARY)));
    }

    #[test]
    fn closures_are_resolvers() {
        let resolver = || -> Result<PathBuf, AppError> { Ok(PathBuf::from("/fake/ffmpeg")) };
        assert_eq!(ConverterResolver::resolve(&resolver).unwrap(), PathBuf::from("/fake/ffmpeg"));
    }
}
