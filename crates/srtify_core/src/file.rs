use bytes::Bytes;

/// Extensions offered by the file picker. The filter is advisory only.
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["mp4", "mkv", "mov", "mp3", "wav", "m4a"];

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// A media file chosen by the user. Replaced wholesale on re-selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    payload: Bytes,
    media_type: String,
}

impl SelectedFile {
    /// Builds a file and derives its media type from the name's extension.
    pub fn new(name: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        let name = name.into();
        let media_type = extension_of(&name)
            .map(|ext| media_type_for_extension(&ext))
            .unwrap_or(FALLBACK_MEDIA_TYPE)
            .to_string();
        Self {
            name,
            payload: payload.into(),
            media_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn size(&self) -> usize {
        self.payload.len()
    }

    /// Lowercase extension after the last dot, if any.
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.name)
    }

    pub fn has_supported_extension(&self) -> bool {
        self.extension()
            .is_some_and(|ext| is_supported_extension(&ext))
    }
}

pub fn is_supported_extension(ext: &str) -> bool {
    let ext = ext.trim_start_matches('.');
    SUPPORTED_EXTENSIONS
        .iter()
        .any(|supported| supported.eq_ignore_ascii_case(ext))
}

pub fn media_type_for_extension(ext: &str) -> &'static str {
    match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
        "mp4" => "video/mp4",
        "mkv" => "video/x-matroska",
        "mov" => "video/quicktime",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        _ => FALLBACK_MEDIA_TYPE,
    }
}

fn extension_of(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    (!ext.is_empty()).then(|| ext.to_ascii_lowercase())
}
