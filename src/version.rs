//! `persona-switcher version` output, from values `build.rs` bakes in.

use std::fmt;

/// Git state of the tree the binary was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Revision {
    pub hash: &'static str,
    pub branch: &'static str,
    /// `None` when git was unavailable at build time.
    pub dirty: Option<bool>,
}

impl Revision {
    const fn parse_dirty(raw: &str) -> Option<bool> {
        match raw.as_bytes() {
            b"true" => Some(true),
            b"false" => Some(false),
            _ => None,
        }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dirty {
            Some(true) => write!(f, "{}-dirty", self.hash),
            _ => f.write_str(self.hash),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub revision: Revision,
    pub built_at: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
    pub rustc: &'static str,
}

impl BuildInfo {
    pub const fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            revision: Revision {
                hash: env!("PERSONA_SWITCHER_GIT_HASH"),
                branch: env!("PERSONA_SWITCHER_GIT_BRANCH"),
                dirty: Revision::parse_dirty(env!("PERSONA_SWITCHER_GIT_DIRTY")),
            },
            built_at: env!("PERSONA_SWITCHER_BUILD_TIMESTAMP"),
            target: env!("PERSONA_SWITCHER_TARGET"),
            profile: env!("PERSONA_SWITCHER_PROFILE"),
            rustc: env!("PERSONA_SWITCHER_RUSTC_VERSION"),
        }
    }

    /// `<version>-<hash>`, with `-dirty` for uncommitted builds.
    pub fn full_version(&self) -> String {
        format!("{}-{}", self.version, self.revision)
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.name, self.full_version())?;
        writeln!(f, "  revision  {} ({})", self.revision, self.revision.branch)?;
        writeln!(f, "  built     {} [{}]", self.built_at, self.profile)?;
        writeln!(f, "  target    {}", self.target)?;
        writeln!(f, "  compiler  {}", self.rustc)
    }
}

pub fn print_version() {
    print!("{}", BuildInfo::current());
}
