use std::ffi::OsString;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::Command;

use crate::services::resolver::ConverterResolver;
use crate::utils::error::AppError;
use crate::utils::scratch::ScratchFiles;

/// Hasil satu proses converter: status keluar + stderr yang ditangkap.
#[derive(Debug)]
pub struct ConverterOutcome {
    pub status: ExitStatus,
    pub stderr: String,
}

impl ConverterOutcome {
    /// Exit 0 → `Ok`, selain itu → `ConversionFailed` berisi stderr apa adanya.
    pub fn into_result(self) -> Result<(), AppError> {
        self.status
            .success()
            .then_some(())
            .ok_or(AppError::ConversionFailed {
                details: self.stderr,
            })
    }
}

/* =========================================================
   SINGLE-PURPOSE HELPERS (fungsi tunggal)
   ========================================================= */

/// Menyusun argumen CLI converter: `-y -i <input> <output>`.
fn build_converter_args(input: &Path, output: &Path) -> impl IntoIterator<Item = OsString> {
    [
        OsString::from("-y"),
        OsString::from("-i"),
        input.as_os_str().to_owned(),
        output.as_os_str().to_owned(),
    ]
}

/// Menjalankan OS process converter (effectful).
///
/// Proses dibunuh jika melewati `timeout` atau jika future ini di-drop.
pub async fn run_converter(
    executable: &Path,
    input: &Path,
    output: &Path,
    timeout: Duration,
) -> Result<ConverterOutcome, AppError> {
    let mut command = Command::new(executable);
    command
        .args(build_converter_args(input, output))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    tracing::debug!(
        converter = %executable.display(),
        input = %input.display(),
        output = %output.display(),
        "Running converter"
    );

    let result = tokio::time::timeout(timeout, command.output())
        .await
        .map_err(|_| AppError::ConversionFailed {
            details: format!("converter timed out after {}s", timeout.as_secs_f64()),
        })?
        .map_err(|e| {
            AppError::io(
                format!("Gagal menjalankan converter '{}'", executable.display()),
                e,
            )
        })?;

    Ok(ConverterOutcome {
        status: result.status,
        stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
    })
}

/* =========================================================
   ORCHESTRATOR (memanggil helper di atas)
   ========================================================= */

/// Konversi satu file scratch dan kembalikan byte hasilnya.
///
/// Alur:
/// 1) `resolver.resolve()` → cari executable converter
/// 2) `run_converter(...)` → jalankan proses, tangkap stderr
/// 3) `into_result()` → exit non-zero jadi `ConversionFailed`
/// 4) `read_output()` → baca file output ke memori
///
/// Pembersihan file bukan tugas fungsi ini; `ScratchFiles` milik caller.
pub async fn convert_file(
    resolver: &dyn ConverterResolver,
    scratch: &ScratchFiles,
    timeout: Duration,
) -> Result<Vec<u8>, AppError> {
    let executable = resolver.resolve()?;

    run_converter(&executable, scratch.input(), scratch.output(), timeout)
        .await?
        .into_result()?;

    scratch.read_output().await
}
