//! Reserved file names inside a persisted resource directory.

use std::path::Path;

/// Files the codec owns in a resource or type directory. Any other regular
/// file found there is rejected on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceFile {
    /// `attributes.dmr`, the configuration attributes of the resource
    Attributes,
    /// `order.txt`, the optional child order manifest
    Order,
}

impl ResourceFile {
    pub const ALL: [ResourceFile; 2] = [Self::Attributes, Self::Order];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attributes => "attributes.dmr",
            Self::Order => "order.txt",
        }
    }

    /// Match a directory entry name against the reserved names.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

impl AsRef<Path> for ResourceFile {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for ResourceFile {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for ResourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
