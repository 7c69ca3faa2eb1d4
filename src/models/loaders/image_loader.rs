use crate::error::{AppError, AppResult, FileError};
use crate::models::sheet_image::{ImageMime, SheetImage};
use std::path::Path;
use tokio::fs;

/// 从磁盘读取答题卡图片
///
/// 只接受 PNG、JPG、WEBP，类型按扩展名判断。
pub async fn load_sheet_image(path: &Path) -> AppResult<SheetImage> {
    let mime_type = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(ImageMime::from_extension)
        .ok_or_else(|| FileError::UnsupportedImageType {
            path: path.display().to_string(),
        })?;

    let bytes = fs::read(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

    let file_name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    tracing::debug!("读取图片 {} ({}, {} 字节)", file_name, mime_type, bytes.len());

    Ok(SheetImage::new(file_name, mime_type, bytes))
}
