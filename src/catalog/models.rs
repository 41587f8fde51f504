//! MangaLib 接口返回结构。
//!
//! 接口字段类型并不稳定（章节号/卷号有时是字符串，有时是数字），统一规整为字符串。

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Label {
    #[serde(default, deserialize_with = "string_or_number")]
    pub label: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TitleStats {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub name: String,
    #[serde(default)]
    pub rus_name: Option<String>,
    #[serde(default)]
    pub eng_name: Option<String>,
    #[serde(default, rename = "ageRestriction")]
    pub age_restriction: Option<Label>,
    #[serde(default)]
    pub is_licensed: bool,
    #[serde(default)]
    pub status: Option<Label>,
    #[serde(default, rename = "releaseDateString")]
    pub release_date: Option<String>,
}

impl TitleStats {
    pub fn age_restriction_label(&self) -> &str {
        self.age_restriction.as_ref().map_or("", |l| l.label.as_str())
    }

    pub fn status_label(&self) -> &str {
        self.status.as_ref().map_or("", |l| l.label.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChapterRecord {
    pub index: u32,
    #[serde(default, deserialize_with = "string_or_number")]
    pub volume: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub number: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub name: String,
}

/// 按用户可见序号（index）索引的章节表；重复 index 时后出现的覆盖前者。
#[derive(Debug, Clone, Default)]
pub struct ChapterList {
    by_index: BTreeMap<u32, ChapterRecord>,
}

impl ChapterList {
    pub fn get(&self, index: u32) -> Option<&ChapterRecord> {
        self.by_index.get(&index)
    }

    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }
}

impl FromIterator<ChapterRecord> for ChapterList {
    fn from_iter<I: IntoIterator<Item = ChapterRecord>>(iter: I) -> Self {
        Self {
            by_index: iter.into_iter().map(|c| (c.index, c)).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PageEntry {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChapterPages {
    #[serde(default)]
    pub pages: Vec<PageEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}
