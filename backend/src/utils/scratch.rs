use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::utils::error::AppError;

/// Ekstensi file input yang diharapkan converter.
pub const INPUT_EXTENSION: &str = "webp";
/// Ekstensi file hasil konversi.
pub const OUTPUT_EXTENSION: &str = "png";

/* =========================================================
   SINGLE-PURPOSE HELPERS (fungsi tunggal)
   ========================================================= */

/// Membuat path input unik di dalam `dir`.
fn input_path(dir: &Path) -> PathBuf {
    dir.join(format!("{}.{INPUT_EXTENSION}", Uuid::new_v4()))
}

/// Path output = path input dengan ekstensi diganti.
pub fn output_path_for(input: &Path) -> PathBuf {
    input.with_extension(OUTPUT_EXTENSION)
}

/// Hapus file jika ada; `NotFound` bukan error.
fn remove_if_exists(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::trace!(path = %path.display(), "Scratch file removed"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), "Gagal menghapus scratch file: {e}"),
    }
}

/* =========================================================
   SCOPED GUARD
   ========================================================= */

/// Pasangan file sementara (input + output) untuk satu request.
///
/// Kedua path didaftarkan untuk dihapus begitu file input berhasil dibuat.
/// Jalur normal memanggil `remove()`; kalau tidak sempat, `Drop` yang
/// menghapus, jadi berjalan di semua jalur keluar: sukses, error yang
/// di-`?`, maupun future handler yang di-drop.
#[derive(Debug)]
pub struct ScratchFiles {
    input: PathBuf,
    output: PathBuf,
    removed: bool,
}

impl ScratchFiles {
    /// Tulis `data` ke file input baru di `dir`.
    ///
    /// File dibuat dengan `create_new`, sehingga path yang sudah ada tidak
    /// pernah ditimpa atau dihapus oleh guard ini.
    pub async fn create(dir: &Path, data: &[u8]) -> Result<Self, AppError> {
        let input = input_path(dir);

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&input)
            .await
            .map_err(|e| AppError::io(format!("Gagal membuat file input '{}'", input.display()), e))?;

        let scratch = Self {
            output: output_path_for(&input),
            input,
            removed: false,
        };

        file.write_all(data)
            .await
            .map_err(|e| AppError::io(format!("Gagal menulis file input '{}'", scratch.input.display()), e))?;
        file.flush()
            .await
            .map_err(|e| AppError::io(format!("Gagal menulis file input '{}'", scratch.input.display()), e))?;

        Ok(scratch)
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Nama file yang disarankan untuk `Content-Disposition`.
    pub fn download_name(&self) -> String {
        self.output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("converted.{OUTPUT_EXTENSION}"))
    }

    /// Baca seluruh file output ke memori.
    pub async fn read_output(&self) -> Result<Vec<u8>, AppError> {
        tokio::fs::read(&self.output)
            .await
            .map_err(|e| AppError::io(format!("Gagal membaca file output '{}'", self.output.display()), e))
    }

    /// Hapus kedua file tanpa memblokir worker Tokio. Jalur normal handler.
    pub async fn remove(mut self) {
        for path in [&self.input, &self.output] {
            match tokio::fs::remove_file(path).await {
                Ok(()) => tracing::trace!(path = %path.display(), "Scratch file removed"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(path = %path.display(), "Gagal menghapus scratch file: {e}"),
            }
        }
        self.removed = true;
    }
}

// Fallback untuk jalur error dan future yang di-drop. `remove_file` di sini
// blocking, tapi hanya dua file kecil per request.
impl Drop for ScratchFiles {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        remove_if_exists(&self.input);
        remove_if_exists(&self.output);
    }
}
