use std::path::{Path, PathBuf};

/// An asset reference that resolved to something displayable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    /// The reference as written in the listing.
    pub reference: String,
    /// Where the asset was found.
    pub location: PathBuf,
}

/// Reasons an asset reference fails to load.
///
/// These never reach the user: the card renderer substitutes a placeholder
/// or initials instead.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// Nothing exists at the resolved location.
    #[error("asset '{reference}' not found at {}", location.display())]
    NotFound {
        /// The reference as written in the listing.
        reference: String,
        /// Where the asset was looked for.
        location: PathBuf,
    },

    /// The location exists but is not a readable, non-empty file.
    #[error("asset '{reference}' is not loadable: {reason}")]
    Unloadable {
        /// The reference as written in the listing.
        reference: String,
        /// Why it cannot be loaded.
        reason: String,
    },
}

/// Resolves image and logo references of listings.
pub trait AssetResolver {
    /// Resolves a single reference.
    ///
    /// # Errors
    ///
    /// Returns an `AssetError` if the asset cannot be loaded.
    fn resolve(&self, reference: &str) -> Result<ResolvedAsset, AssetError>;
}

impl<R: AssetResolver + ?Sized> AssetResolver for &R {
    fn resolve(&self, reference: &str) -> Result<ResolvedAsset, AssetError> {
        (**self).resolve(reference)
    }
}

/// Serves assets from a directory, the way a static file server would.
///
/// `/images/vara.png` resolves to `<root>/images/vara.png`. Empty files and
/// directories count as load failures.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    /// Creates a resolver rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory assets are served from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn location(&self, reference: &str) -> PathBuf {
        self.root.join(reference.trim_start_matches('/'))
    }
}

impl AssetResolver for DirectoryAssets {
    fn resolve(&self, reference: &str) -> Result<ResolvedAsset, AssetError> {
        let location = self.location(reference);
        let unloadable = |reason: String| AssetError::Unloadable {
            reference: reference.to_string(),
            reason,
        };

        if reference.trim().is_empty() {
            return Err(unloadable("empty reference".to_string()));
        }

        let metadata = match std::fs::metadata(&location) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AssetError::NotFound {
                    reference: reference.to_string(),
                    location,
                });
            }
            Err(e) => return Err(unloadable(e.to_string())),
        };

        if !metadata.is_file() {
            return Err(unloadable("not a file".to_string()));
        }
        if metadata.len() == 0 {
            return Err(unloadable("file is empty".to_string()));
        }

        Ok(ResolvedAsset {
            reference: reference.to_string(),
            location,
        })
    }
}

/// Computes the fallback initials of an authority.
///
/// Takes the first character of every whitespace-separated word, so
/// "Central Bank UAE" becomes "CBU". Case is kept as written.
#[must_use]
pub fn initials(authority: &str) -> String {
    authority
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect()
}
