//! 章节选择解析：`n` 或闭区间 `a-b`。

use thiserror::Error;

/// 单次区间最多包含的章节数。
pub const MAX_SELECTION_LEN: u32 = 100_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Invalid chapter(s) integer/range: {0}")]
    InvalidChapterRange(String),
}

/// 解析 `-c/--chapters` 参数。
///
/// 只接受十进制数字，起始值至少为 1；`5-3` 这样的反向区间得到空列表，由下载流程报错。
/// 区间长度超过 [`MAX_SELECTION_LEN`] 视为无效。
pub fn parse_chapter_selection(raw: &str) -> Result<Vec<u32>, SelectionError> {
    let text = raw.trim();
    let invalid = || SelectionError::InvalidChapterRange(text.to_string());

    let parts: Vec<&str> = text.split('-').collect();
    if parts.is_empty()
        || parts.len() > 2
        || parts
            .iter()
            .any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()))
    {
        return Err(invalid());
    }

    let nums = parts
        .iter()
        .map(|p| p.parse::<u32>().map_err(|_| invalid()))
        .collect::<Result<Vec<u32>, _>>()?;

    let start = nums[0];
    if start < 1 {
        return Err(invalid());
    }

    match nums.as_slice() {
        [single] => Ok(vec![*single]),
        [start, end] if end.saturating_sub(*start) >= MAX_SELECTION_LEN => Err(invalid()),
        [start, end] => Ok((*start..=*end).collect()),
        _ => Err(invalid()),
    }
}
