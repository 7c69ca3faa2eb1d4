//! 答题卡图片
//!
//! 持有上传图片的原始字节。会话替换或清除图片时旧图片随之释放。

use base64::{engine::general_purpose, Engine as _};

/// 支持的图片类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMime {
    Png,
    Jpeg,
    Webp,
}

impl ImageMime {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageMime::Png => "image/png",
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Webp => "image/webp",
        }
    }

    /// 根据扩展名判断图片类型（忽略大小写）
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageMime::Png),
            "jpg" | "jpeg" => Some(ImageMime::Jpeg),
            "webp" => Some(ImageMime::Webp),
            _ => None,
        }
    }
}

impl std::fmt::Display for ImageMime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 待识别的答题卡图片
#[derive(Clone, PartialEq, Eq)]
pub struct SheetImage {
    file_name: String,
    mime_type: ImageMime,
    bytes: Vec<u8>,
}

impl SheetImage {
    pub fn new(file_name: impl Into<String>, mime_type: ImageMime, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type,
            bytes,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> ImageMime {
        self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// 生成发送给 Vision API 的 data URL
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

// 不打印图片字节
impl std::fmt::Debug for SheetImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetImage")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
