//! バイナリ用のログ設定
//!
//! 全レコードを stderr と、ログディレクトリ下のタイムスタンプ付きファイルに書く。

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::LoggingConfig;

/// 書き込みを stderr とログファイルの両方に複製する
struct TeeWriter {
    file: BufWriter<File>,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

/// ログファイルパス `<dir>/<prefix>_YYYYmmdd_HHMMSS.log`
pub fn log_file_path(dir: &Path, prefix: &str) -> PathBuf {
    let ts = chrono::Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("{prefix}_{ts}.log"))
}

/// グローバルロガーを初期化し、ログファイルのパスを返す
///
/// `RUST_LOG` があれば設定のレベルより優先する。
pub fn init(config: &LoggingConfig, prefix: &str) -> Result<PathBuf> {
    let dir = Path::new(&config.directory);
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let path = log_file_path(dir, prefix);
    let file = File::create(&path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    env_logger::Builder::new()
        .parse_filters(&config.level)
        .parse_env("RUST_LOG")
        .format_timestamp_secs()
        .target(env_logger::Target::Pipe(Box::new(TeeWriter {
            file: BufWriter::new(file),
        })))
        .try_init()
        .context("logger already initialized")?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_path_format() {
        let path = log_file_path(Path::new("logs"), "analysis");
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("analysis_"));
        assert!(name.ends_with(".log"));
        // analysis_ + YYYYmmdd_HHMMSS + .log
        assert_eq!(name.len(), "analysis_".len() + 15 + ".log".len());
        assert_eq!(path.parent(), Some(Path::new("logs")));
    }
}
