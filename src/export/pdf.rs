//! 章节 PDF 导出。
//!
//! 每张图片一页，页面尺寸按 DPI 换算（`px * 72 / dpi` pt），图片以 JPEG（DCTDecode）嵌入。
//! 两种来源：下载过程中缓存在内存里的页面，或已经落盘的章节目录。

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::RgbImage;
use lopdf::{Document, Object, Stream, dictionary};
use thiserror::Error;
use tracing::{debug, info};

use super::image_utils::{decode_page_file, encode_jpeg, is_page_file};
use crate::base_system::context::Config;
use crate::base_system::fs_utils::{remove_files_and_empty_dir, write_atomic};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no pages to export")]
    Empty,
    #[error("image error at {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("pdf write failed: {0}")]
    Pdf(String),
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct PdfAssembler {
    dpi: f32,
    jpeg_quality: u8,
}

impl PdfAssembler {
    pub fn new(dpi: f32, jpeg_quality: u8) -> Self {
        Self {
            dpi: if dpi.is_finite() && dpi > 0.0 { dpi } else { 100.0 },
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.pdf_dpi, config.jpeg_quality)
    }

    /// 按给定顺序把页面写成一个 PDF。
    pub fn assemble_images(&self, pages: &[RgbImage], dest: &Path) -> Result<(), ExportError> {
        if pages.is_empty() {
            return Err(ExportError::Empty);
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());

        for page in pages {
            let jpeg = encode_jpeg(page, self.jpeg_quality).map_err(|source| ExportError::Image {
                path: dest.to_path_buf(),
                source,
            })?;
            let (w, h) = page.dimensions();
            let (pw, ph) = (self.to_points(w), self.to_points(h));

            let image_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => i64::from(w),
                    "Height" => i64::from(h),
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8_i64,
                    "Filter" => "DCTDecode",
                },
                jpeg,
            ));

            let content = format!("q\n{pw:.4} 0 0 {ph:.4} 0 0 cm\n/Im0 Do\nQ\n");
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![
                    0_i64.into(),
                    0_i64.into(),
                    Object::Real(pw.into()),
                    Object::Real(ph.into()),
                ],
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "XObject" => dictionary! { "Im0" => image_id },
                },
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|source| ExportError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        write_atomic(dest, &bytes).map_err(|source| ExportError::Io {
            path: dest.to_path_buf(),
            source,
        })?;

        info!(target: "export", "已导出 {} 页: {}", pages.len(), dest.display());
        Ok(())
    }

    /// 把章节目录中的页面图片合并为 `{父目录}/{display_name}.pdf`，成功后删除源图片。
    ///
    /// 只取文件名为 `1..=page_count` 的页面，按页码升序；目录里的其他文件保持不动。
    pub fn assemble_directory(
        &self,
        chapter_dir: &Path,
        display_name: &str,
        page_count: usize,
    ) -> Result<PathBuf, ExportError> {
        let files = list_page_files(chapter_dir, page_count).map_err(|source| ExportError::Io {
            path: chapter_dir.to_path_buf(),
            source,
        })?;
        if files.is_empty() {
            return Err(ExportError::Empty);
        }

        let mut pages = Vec::with_capacity(files.len());
        for file in &files {
            let img = decode_page_file(file).map_err(|source| ExportError::Image {
                path: file.clone(),
                source,
            })?;
            pages.push(img);
        }

        let parent = chapter_dir.parent().unwrap_or_else(|| Path::new("."));
        let dest = parent.join(format!("{display_name}.pdf"));
        self.assemble_images(&pages, &dest)?;
        drop(pages);

        remove_files_and_empty_dir(chapter_dir, &files).map_err(|source| ExportError::Io {
            path: chapter_dir.to_path_buf(),
            source,
        })?;
        debug!(target: "export", "已清理 {} 个源图片: {}", files.len(), chapter_dir.display());
        Ok(dest)
    }

    fn to_points(&self, px: u32) -> f32 {
        px as f32 * 72.0 / self.dpi
    }
}

/// 目录中页码为 `1..=page_count` 的页面图片，按页码升序；同一页码有多个文件时只取文件名最小的一个。
pub fn list_page_files(dir: &Path, page_count: usize) -> io::Result<Vec<PathBuf>> {
    let mut by_page: BTreeMap<usize, PathBuf> = BTreeMap::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || !is_page_file(&path) {
            continue;
        }
        let Some(page) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|p| (1..=page_count).contains(p))
        else {
            continue;
        };
        match by_page.get(&page) {
            Some(existing) if existing <= &path => {}
            _ => {
                by_page.insert(page, path);
            }
        }
    }
    Ok(by_page.into_values().collect())
}
