//! Konfigurasi server.
//!
//! Semua nilai dibaca dari argumen CLI, dengan fallback ke environment variable
//! (`CONVERTER_*`). Contoh:
//!
//! ```bash
//! CONVERTER_PORT=8080 CONVERTER_PATH=/usr/bin/ffmpeg convert-server
//! convert-server --bundle-root /opt/convert-server --timeout-secs 30
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Host tempat server bind
    #[arg(long, env = "CONVERTER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port HTTP
    #[arg(long, env = "CONVERTER_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Path eksplisit ke executable converter (mengabaikan layout bundle/dev)
    #[arg(long = "converter", env = "CONVERTER_PATH")]
    pub converter_path: Option<PathBuf>,

    /// Root resource bundle saat dijalankan sebagai aplikasi terpaket
    #[arg(long, env = "CONVERTER_BUNDLE_ROOT")]
    pub bundle_root: Option<PathBuf>,

    /// Folder untuk file sementara (default: temp dir OS)
    #[arg(long, env = "CONVERTER_SCRATCH_DIR")]
    pub scratch_dir: Option<PathBuf>,

    /// Batas waktu satu proses converter, dalam detik
    #[arg(
        long,
        env = "CONVERTER_TIMEOUT_SECS",
        default_value_t = 60,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Ukuran upload maksimum, dalam byte
    #[arg(long, env = "CONVERTER_MAX_UPLOAD_BYTES", default_value_t = 100 * 1024 * 1024)]
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.scratch_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let config = Config::parse_from([
            "convert-server",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--converter",
            "/usr/bin/ffmpeg",
            "--scratch-dir",
            "/var/tmp/convert",
            "--timeout-secs",
            "5",
        ]);

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.converter_path, Some(PathBuf::from("/usr/bin/ffmpeg")));
        assert_eq!(config.scratch_dir(), PathBuf::from("/var/tmp/convert"));
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn scratch_dir_falls_back_to_os_temp() {
        let config = Config {
            host: "127.0.0.1".into(),
            port: 5000,
            converter_path: None,
            bundle_root: None,
            scratch_dir: None,
            timeout_secs: 60,
            max_upload_bytes: 1024,
        };
        assert_eq!(config.scratch_dir(), std::env::temp_dir());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let result = Config::try_parse_from(["convert-server", "--timeout-secs", "0"]);
        assert!(result.is_err());

        let config = Config::try_parse_from(["convert-server", "--timeout-secs", "1"]).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(1));
    }
}
