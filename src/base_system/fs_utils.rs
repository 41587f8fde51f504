//! 文件写入与导出后的源文件清理。

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub fn is_empty_dir(path: impl AsRef<Path>) -> io::Result<bool> {
    let path = path.as_ref();
    let mut entries = fs::read_dir(path)?;
    Ok(entries.next().is_none())
}

/// 先写入 `*.{ext}part` 再改名，避免中断留下半个文件被误当作已完成。
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = path.with_extension(format!(
        "{}part",
        path.extension().and_then(|s| s.to_str()).unwrap_or("")
    ));
    fs::write(&tmp, bytes)?;
    // 目标已存在时先删除，失败也继续尝试改名
    let _ = fs::remove_file(path);
    fs::rename(tmp, path)?;
    Ok(())
}

/// 删除给定文件；目录随之变空时一并删除。
pub fn remove_files_and_empty_dir(dir: &Path, files: &[PathBuf]) -> io::Result<()> {
    for file in files {
        match fs::remove_file(file) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err),
        }
    }
    if dir.is_dir() && is_empty_dir(dir)? {
        fs::remove_dir(dir)?;
    }
    Ok(())
}
