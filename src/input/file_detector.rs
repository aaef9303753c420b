//! File type detection

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileType {
    Json,
    Toml,
    Text,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "json" => FileType::Json,
            "toml" => FileType::Toml,
            "txt" | "md" | "markdown" | "csv" => FileType::Text,
            _ => FileType::Unknown,
        }
    }
}
