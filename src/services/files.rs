//! # 업로드 파일 저장 서비스
//!
//! 첨부파일과 증빙서류를 업로드 디렉토리에 저장하고 지웁니다.
//!
//! - 저장 이름: `<uuid v7>-<slug>.<ext>` (원래 이름은 DB에 따로 보관)
//! - 공개 경로: `/uploads/<하위 디렉토리>/<저장 이름>` (ServeDir로 서빙)
//! - base64 입력은 순수 base64와 `data:<mime>;base64,<payload>` 둘 다 받습니다.

use crate::error::AppError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// 공개 URL 접두사. 라우터의 ServeDir 경로와 같아야 합니다.
pub const PUBLIC_PREFIX: &str = "/uploads";

pub const ATTACHMENTS_DIR: &str = "attachments";
pub const DOCUMENTS_DIR: &str = "documents";
pub const MIGRATED_DIR: &str = "migrated";

/// 디코딩된 base64 데이터
#[derive(Debug)]
pub struct DecodedFile {
    pub bytes: Vec<u8>,
    /// data URL에 들어 있던 MIME 타입
    pub mime_type: Option<String>,
}

/// 디스크에 저장된 파일
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub public_path: String,
    pub mime_type: Option<String>,
    pub size: i64,
}

/// 순수 base64 또는 data URL을 디코딩합니다. 줄바꿈 등 공백은 무시합니다.
pub fn decode_base64_payload(input: &str) -> Result<DecodedFile, AppError> {
    let (mime_type, payload) = match input.trim().strip_prefix("data:") {
        Some(rest) => {
            let (header, payload) = rest
                .split_once(',')
                .ok_or_else(|| AppError::BadRequest("Malformed data URL".to_string()))?;
            let mime = header.strip_suffix(";base64").ok_or_else(|| {
                AppError::BadRequest("Only base64 data URLs are supported".to_string())
            })?;
            let mime = (!mime.is_empty()).then(|| mime.to_string());
            (mime, payload)
        }
        None => (None, input),
    };

    let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64
        .decode(cleaned.as_bytes())
        .map_err(|e| AppError::BadRequest(format!("Invalid base64 data: {}", e)))?;

    Ok(DecodedFile { bytes, mime_type })
}

/// MIME 타입마다 여러 확장자가 있을 때 먼저 고를 확장자
const PREFERRED_EXTENSIONS: [&str; 16] = [
    "jpg", "png", "gif", "webp", "tif", "svg", "pdf", "txt", "csv", "json", "html", "doc", "docx",
    "xls", "xlsx", "zip",
];

/// 저장할 확장자. 원래 파일 이름 → MIME 타입 순서로 찾고, 없으면 `bin`.
pub fn extension_for(file_name: Option<&str>, mime_type: Option<&str>) -> String {
    let from_name = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    from_name
        .or_else(|| mime_type.and_then(extension_for_mime))
        .unwrap_or_else(|| "bin".to_string())
}

/// MIME 타입의 확장자. `/uploads`가 같은 타입으로 다시 서빙하도록,
/// 그 확장자로 추정한 타입이 원래 타입과 같은 것만 고릅니다.
///
/// `mime_guess`의 확장자 목록은 알파벳순이라 (`image/jpeg` → `jfif`)
/// 흔히 쓰는 확장자를 먼저 봅니다.
fn extension_for_mime(mime_type: &str) -> Option<String> {
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    let candidates = mime_guess::get_mime_extensions_str(&essence)?;
    let maps_back = |ext: &str| {
        mime_guess::from_ext(ext)
            .first()
            .is_some_and(|guessed| guessed.essence_str() == essence)
    };

    PREFERRED_EXTENSIONS
        .iter()
        .copied()
        .find(|ext| candidates.contains(ext) && maps_back(*ext))
        .or_else(|| candidates.iter().copied().find(|ext| maps_back(*ext)))
        .map(str::to_string)
}

/// 디스크에 저장할 고유한 파일 이름
pub fn stored_name(file_name: Option<&str>, mime_type: Option<&str>) -> String {
    let stem = file_name
        .and_then(|name| Path::new(name).file_stem())
        .and_then(|stem| stem.to_str())
        .map(slug::slugify)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "file".to_string());

    format!(
        "{}-{}.{}",
        uuid::Uuid::now_v7(),
        stem,
        extension_for(file_name, mime_type)
    )
}

/// 파일 이름으로 MIME 타입을 추측합니다.
pub fn guess_mime(file_name: &str) -> Option<String> {
    mime_guess::from_path(file_name).first().map(|m| m.to_string())
}

/// 바이트를 `uploads_path/subdir/` 아래에 저장하고 공개 경로를 반환합니다.
pub async fn save_bytes(
    uploads_path: &str,
    subdir: &str,
    file_name: Option<&str>,
    mime_type: Option<&str>,
    bytes: &[u8],
) -> Result<StoredFile, AppError> {
    let dir = PathBuf::from(uploads_path).join(subdir);
    fs::create_dir_all(&dir).await?;

    let name = stored_name(file_name, mime_type);
    fs::write(dir.join(&name), bytes).await?;

    // octet-stream은 브라우저가 형식을 모를 때 붙이는 값이라 파일 이름으로 다시 추정합니다.
    let mime_type = mime_type
        .filter(|m| *m != "application/octet-stream")
        .map(str::to_string)
        .or_else(|| file_name.and_then(guess_mime));

    tracing::debug!(subdir, name = %name, size = bytes.len(), "Stored upload");
    Ok(StoredFile {
        public_path: format!("{}/{}/{}", PUBLIC_PREFIX, subdir, name),
        mime_type,
        size: bytes.len() as i64,
    })
}

/// base64(또는 data URL)를 디코딩하여 저장합니다.
pub async fn save_base64(
    uploads_path: &str,
    subdir: &str,
    file_name: Option<&str>,
    data: &str,
) -> Result<StoredFile, AppError> {
    let decoded = decode_base64_payload(data)?;
    save_bytes(
        uploads_path,
        subdir,
        file_name,
        decoded.mime_type.as_deref(),
        &decoded.bytes,
    )
    .await
}

/// 공개 경로를 디스크 경로로 바꿉니다. 업로드 디렉토리 밖을 가리키면 `None`.
pub fn disk_path(uploads_path: &str, public_path: &str) -> Option<PathBuf> {
    let relative = Path::new(public_path.strip_prefix(PUBLIC_PREFIX)?.strip_prefix('/')?);

    if relative.as_os_str().is_empty()
        || !relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
    {
        return None;
    }
    Some(PathBuf::from(uploads_path).join(relative))
}

/// 저장된 파일을 지웁니다. 실패는 로그만 남깁니다.
pub async fn remove_public_path(uploads_path: &str, public_path: &str) {
    let Some(path) = disk_path(uploads_path, public_path) else {
        tracing::warn!(public_path, "Refusing to remove file outside uploads directory");
        return;
    };

    match fs::remove_file(&path).await {
        Ok(()) => tracing::debug!(path = %path.display(), "Removed stored file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), "Failed to remove stored file: {}", e),
    }
}

pub async fn remove_all(uploads_path: &str, public_paths: &[String]) {
    for public_path in public_paths {
        remove_public_path(uploads_path, public_path).await;
    }
}
