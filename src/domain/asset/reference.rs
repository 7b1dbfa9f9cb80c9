//! Asset reference classification and resolution.
//!
//! Stored image references come in three historical shapes: inline data
//! embedded by the editor, full URLs written by older records, and
//! bucket-relative paths written by the current flow. This module tags
//! each shape once at the boundary and resolves it to either a
//! pass-through value or an object key ready for URL signing. No I/O;
//! malformed input degrades to the original reference rather than
//! failing.

/// Tagged shape of a raw stored reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetRef {
    /// Embedded image data or an ephemeral browser blob; never signed.
    Inline(String),
    /// Absolute URL from an older record; the store path must be extracted.
    LegacyUrl(String),
    /// Path relative to the private bucket, used directly.
    RelativePath(String),
}

/// Outcome of resolving a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedAsset {
    /// Displayed verbatim, bypasses signing entirely.
    Inline(String),
    /// Object key within the private bucket, ready for signing.
    StorePath(String),
}

/// Pure resolver from stored references to signing decisions.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    /// Private bucket name, e.g. "signatures".
    private_bucket: String,
}

impl AssetResolver {
    /// Creates a resolver for the given private bucket.
    pub fn new(private_bucket: impl Into<String>) -> Self {
        Self {
            private_bucket: private_bucket.into(),
        }
    }

    /// Tags a raw reference by shape.
    ///
    /// Anything carrying a `base64` marker counts as inline wherever it
    /// appears; editors have produced bare payloads without the `data:`
    /// scheme.
    pub fn classify(&self, raw: &str) -> AssetRef {
        if raw.starts_with("data:") || raw.starts_with("blob:") || raw.contains("base64") {
            AssetRef::Inline(raw.to_string())
        } else if raw.starts_with("http://") || raw.starts_with("https://") {
            AssetRef::LegacyUrl(raw.to_string())
        } else {
            AssetRef::RelativePath(raw.to_string())
        }
    }

    /// Resolves a stored reference.
    ///
    /// Returns `None` for an absent or empty reference. Never fails:
    /// input the extraction rules cannot make sense of comes back as a
    /// store path holding the original reference, and the signing stage's
    /// fallback covers the rest.
    pub fn resolve(&self, raw: Option<&str>) -> Option<ResolvedAsset> {
        let raw = raw?.trim();
        if raw.is_empty() {
            return None;
        }

        let resolved = match self.classify(raw) {
            AssetRef::Inline(value) => ResolvedAsset::Inline(value),
            AssetRef::LegacyUrl(url) => ResolvedAsset::StorePath(self.extract_from_url(&url)),
            AssetRef::RelativePath(path) => ResolvedAsset::StorePath(self.normalize_path(&path)),
        };
        Some(resolved)
    }

    /// Extracts the object key from a full URL.
    ///
    /// A URL carrying the private-bucket marker yields everything after
    /// it. Any other URL falls back to its last two path segments
    /// (bucket convention: `folder/filename`).
    fn extract_from_url(&self, url: &str) -> String {
        let marker = format!("/{}/", self.private_bucket);
        let without_query = strip_query(url);

        if let Some((_, key)) = without_query.split_once(&marker) {
            if !key.is_empty() {
                return key.to_string();
            }
        }

        let after_scheme = without_query
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(without_query);
        let segments: Vec<&str> = match after_scheme.split_once('/') {
            Some((_, path)) => path.split('/').filter(|s| !s.is_empty()).collect(),
            None => Vec::new(),
        };

        match segments.len() {
            0 => without_query.to_string(),
            1 => segments[0].to_string(),
            n => format!("{}/{}", segments[n - 2], segments[n - 1]),
        }
    }

    /// Normalizes a relative path to an object key.
    fn normalize_path(&self, path: &str) -> String {
        let without_query = strip_query(path);
        let trimmed = without_query.trim_start_matches('/');

        // Stored refs carry the bucket prefix ("signatures/abc.png");
        // the key inside the bucket does not.
        let bucket_prefix = format!("{}/", self.private_bucket);
        let key = trimmed.strip_prefix(&bucket_prefix).unwrap_or(trimmed);

        if key.is_empty() {
            without_query.to_string()
        } else {
            key.to_string()
        }
    }
}

fn strip_query(value: &str) -> &str {
    value.split('?').next().unwrap_or(value)
}
