//! 章节名清洗：生成可直接用作目录名/文件名的章节标题。

use unicode_normalization::UnicodeNormalization;
use unicode_properties::{GeneralCategoryGroup, UnicodeGeneralCategory};

pub const MAX_NAME_LEN: usize = 255;

const FORBIDDEN: [char; 10] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*', '\0'];

/// 清洗章节标题。
///
/// 顺序：NFKD 规范化并剔除 C* 类别字符 → 非法字符替换为空格 → 去掉首尾的点和空格 →
/// 合并连续下划线 → 空串回退为 `unnamed` → 截断到 255 个字符后再去掉尾部的点和空格。
///
/// 替换出来的空格不会被合并，`a::b` 得到 `a  b`。
pub fn sanitize_chapter_name(raw: &str) -> String {
    let replaced: String = raw
        .nfkd()
        .filter(|c| c.general_category_group() != GeneralCategoryGroup::Other)
        .map(|c| if FORBIDDEN.contains(&c) { ' ' } else { c })
        .collect();

    let trimmed = replaced.trim_matches(['.', ' ']);

    let mut cleaned = String::with_capacity(trimmed.len());
    let mut prev_underscore = false;
    for ch in trimmed.chars() {
        if ch == '_' {
            if prev_underscore {
                continue;
            }
            prev_underscore = true;
        } else {
            prev_underscore = false;
        }
        cleaned.push(ch);
    }

    if cleaned.is_empty() {
        cleaned.push_str("unnamed");
    }

    if cleaned.chars().count() > MAX_NAME_LEN {
        let truncated: String = cleaned.chars().take(MAX_NAME_LEN).collect();
        cleaned = truncated.trim_end_matches(['.', ' ']).to_string();
    }

    cleaned
}

/// 作品目录名：小写，空格替换为下划线。
pub fn manga_dir_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}
