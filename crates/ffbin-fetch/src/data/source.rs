use std::fmt;

use serde::Serialize;

/// Release directory of the upstream FFmpeg builds.
pub const DIRECT_ORIGIN: &str = "https://github.com/BtbN/FFmpeg-Builds/releases/download/latest/";

/// Small file fetched in full to estimate a source's throughput.
pub const REFERENCE_URL: &str = "https://raw.githubusercontent.com/BtbN/FFmpeg-Builds/master/README.md";

pub const USER_AGENT: &str = concat!("ffbin/", env!("CARGO_PKG_VERSION"));

const RELEASES_SUFFIX: &str = "/releases/download/latest/";

/// Proxy hosts that forward to [`DIRECT_ORIGIN`] when it is appended to them.
const MIRROR_PREFIXES: [(&str, &str); 11] = [
    ("ghfast", "https://ghfast.top/"),
    ("yylx", "https://git.yylx.win/"),
    ("gh-proxy", "https://gh-proxy.com/"),
    ("geekertao", "https://ghfile.geekertao.top/"),
    ("gh-proxy.net", "https://gh-proxy.net/"),
    ("1win", "https://j.1win.ggff.net/"),
    ("078465", "https://ghm.078465.xyz/"),
    ("127731", "https://gitproxy.127731.xyz/"),
    ("jiashu", "https://jiashu.1win.eu.org/"),
    ("tbedu", "https://github.tbedu.top/"),
    ("ghproxy", "https://mirror.ghproxy.com/"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// The upstream release host itself.
    Direct,
    /// A proxy in front of the upstream host.
    Mirror,
}

/// A place release archives can be downloaded from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Source {
    pub name: String,
    pub base_url: String,
    pub kind: SourceKind,
}

impl Source {
    pub fn direct() -> Self {
        Self {
            name: "github".to_string(),
            base_url: DIRECT_ORIGIN.to_string(),
            kind: SourceKind::Direct,
        }
    }

    pub fn mirror(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            kind: SourceKind::Mirror,
        }
    }

    /// A mirror that proxies [`DIRECT_ORIGIN`] behind `prefix`.
    pub fn proxy(name: impl Into<String>, prefix: &str) -> Self {
        Self::mirror(name, format!("{prefix}{DIRECT_ORIGIN}"))
    }

    pub fn is_direct(&self) -> bool {
        self.kind == SourceKind::Direct
    }

    /// URL of the reference file as served through this source.
    pub fn probe_url(&self) -> String {
        if self.is_direct() {
            return REFERENCE_URL.to_string();
        }
        match self.base_url.strip_suffix(DIRECT_ORIGIN) {
            Some(prefix) => format!("{prefix}{REFERENCE_URL}"),
            None => {
                let base = self
                    .base_url
                    .strip_suffix(RELEASES_SUFFIX)
                    .unwrap_or(self.base_url.trim_end_matches('/'));
                format!("{base}/{REFERENCE_URL}")
            }
        }
    }

    pub fn archive_url(&self, file_name: &str) -> String {
        format!("{}{}", self.base_url, file_name)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Ordered list of sources. Element 0 is always the direct origin.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SourceList {
    sources: Vec<Source>,
}

impl SourceList {
    /// Build a list from the direct origin followed by `mirrors`.
    pub fn new(mirrors: impl IntoIterator<Item = Source>) -> Self {
        let mut sources = vec![Source::direct()];
        sources.extend(mirrors);
        Self { sources }
    }

    pub fn direct(&self) -> &Source {
        &self.sources[0]
    }

    pub fn mirrors(&self) -> &[Source] {
        &self.sources[1..]
    }

    pub fn as_slice(&self) -> &[Source] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Source at a 1-based position, as users count them.
    pub fn get_one_based(&self, index: usize) -> Option<&Source> {
        index.checked_sub(1).and_then(|i| self.sources.get(i))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Source> {
        self.sources.iter()
    }
}

impl Default for SourceList {
    fn default() -> Self {
        Self::new(
            MIRROR_PREFIXES
                .iter()
                .map(|(name, prefix)| Source::proxy(*name, prefix)),
        )
    }
}

impl<'a> IntoIterator for &'a SourceList {
    type Item = &'a Source;
    type IntoIter = std::slice::Iter<'a, Source>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
