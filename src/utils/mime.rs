//! MIME 类型工具
//!
//! 媒体格式常量、格式判断与扩展名推断

/// 通配图片类型（部分机型的索引会返回该值）
pub const MIME_TYPE_IMAGE_ANY: &str = "image/*";

pub const MIME_TYPE_JPEG: &str = "image/jpeg";
pub const MIME_TYPE_GIF: &str = "image/gif";
pub const MIME_TYPE_WEBP: &str = "image/webp";
pub const MIME_TYPE_BMP: &str = "image/bmp";
pub const MIME_TYPE_X_MS_BMP: &str = "image/x-ms-bmp";
pub const MIME_TYPE_WAP_BMP: &str = "image/vnd.wap.wbmp";
pub const MIME_TYPE_HEIC: &str = "image/heic";

const IMAGE_PREFIX: &str = "image";
const VIDEO_PREFIX: &str = "video";

/// 是否为图片类型
pub fn is_image(mime: &str) -> bool {
    !mime.is_empty() && mime.starts_with(IMAGE_PREFIX)
}

/// 是否为视频类型
pub fn is_video(mime: &str) -> bool {
    !mime.is_empty() && mime.starts_with(VIDEO_PREFIX)
}

pub fn is_gif(mime: &str) -> bool {
    mime.eq_ignore_ascii_case(MIME_TYPE_GIF)
}

pub fn is_webp(mime: &str) -> bool {
    mime.eq_ignore_ascii_case(MIME_TYPE_WEBP)
}

pub fn is_bmp(mime: &str) -> bool {
    mime.eq_ignore_ascii_case(MIME_TYPE_BMP)
}

pub fn is_x_ms_bmp(mime: &str) -> bool {
    mime.eq_ignore_ascii_case(MIME_TYPE_X_MS_BMP)
}

pub fn is_wap_bmp(mime: &str) -> bool {
    mime.eq_ignore_ascii_case(MIME_TYPE_WAP_BMP)
}

/// BMP 及其两个变体
pub fn is_bmp_family(mime: &str) -> bool {
    is_bmp(mime) || is_x_ms_bmp(mime) || is_wap_bmp(mime)
}

pub fn is_heic(mime: &str) -> bool {
    mime.eq_ignore_ascii_case(MIME_TYPE_HEIC)
}

/// 从路径中提取文件名（最后一个 `/` 之后的部分）
pub fn extract_file_name(path: &str) -> String {
    match path.rfind('/') {
        Some(idx) => path[idx + 1..].to_string(),
        None => String::new(),
    }
}

/// 根据扩展名推断具体的图片/视频 MIME 类型
///
/// 无法推断或推断结果不是图片/视频时返回 `None`
pub fn mime_from_path(path: &str) -> Option<String> {
    let guess = mime_guess::from_path(path).first()?;
    let mime = guess.essence_str().to_ascii_lowercase();
    if (is_image(&mime) || is_video(&mime)) && mime != MIME_TYPE_IMAGE_ANY {
        Some(mime)
    } else {
        None
    }
}
