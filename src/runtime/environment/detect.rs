use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Environment variable through which an embedding proxy host lists the
/// globals it exposes, comma separated (e.g. `$task` or
/// `$environment.surge-version`).
pub const HOST_GLOBALS_ENV: &str = "CHECKIN_HOST_GLOBALS";

/// Runtime the shim is executing under.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum HostEnvironment {
    Surge,
    Loon,
    QuantumultX,
    Stash,
    Shadowrocket,
    Server,
    Unknown,
}

impl HostEnvironment {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// True for the proxy scripting runtimes.
    #[must_use]
    pub fn is_proxy(self) -> bool {
        !matches!(self, Self::Server | Self::Unknown)
    }
}

/// Marker order: proxy-specific globals first, module system last.
const MARKERS: [(&str, HostEnvironment); 6] = [
    ("$environment.surge-version", HostEnvironment::Surge),
    ("$environment.stash-version", HostEnvironment::Stash),
    ("$task", HostEnvironment::QuantumultX),
    ("$loon", HostEnvironment::Loon),
    ("$rocket", HostEnvironment::Shadowrocket),
    ("module", HostEnvironment::Server),
];

/// Answers whether an ambient host marker is present.
pub trait Ambient {
    fn has(&self, marker: &str) -> bool;
}

/// Ambient view backed by the current process: proxy markers come from
/// [`HOST_GLOBALS_ENV`], and `module` is present for a standalone process.
#[derive(Debug, Clone, Default)]
pub struct ProcessAmbient {
    markers: HashSet<String>,
    standalone: bool,
}

impl ProcessAmbient {
    pub fn from_env() -> Self {
        Self {
            markers: std::env::var(HOST_GLOBALS_ENV)
                .map(|raw| parse_markers(&raw))
                .unwrap_or_default(),
            standalone: true,
        }
    }
}

impl Ambient for ProcessAmbient {
    fn has(&self, marker: &str) -> bool {
        self.markers.contains(marker) || (marker == "module" && self.standalone)
    }
}

/// Fixed marker set, for embedders and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticAmbient(HashSet<String>);

impl StaticAmbient {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(markers.into_iter().map(Into::into).collect())
    }
}

impl Ambient for StaticAmbient {
    fn has(&self, marker: &str) -> bool {
        self.0.contains(marker)
    }
}

fn parse_markers(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Classify the runtime from `ambient`. Uncached and side-effect free.
pub fn detect_with(ambient: &dyn Ambient) -> HostEnvironment {
    MARKERS
        .iter()
        .find(|(marker, _)| ambient.has(marker))
        .map_or(HostEnvironment::Unknown, |(_, env)| *env)
}

/// Detected runtime for this process, computed once on first use.
pub fn detect() -> HostEnvironment {
    static DETECTED: OnceLock<HostEnvironment> = OnceLock::new();
    *DETECTED.get_or_init(|| detect_with(&ProcessAmbient::from_env()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn no_markers_is_unknown() {
        assert_eq!(detect_with(&StaticAmbient::default()), HostEnvironment::Unknown);
    }

    #[test]
    fn each_marker_maps_to_its_variant() {
        for (marker, expected) in MARKERS {
            assert_eq!(detect_with(&StaticAmbient::new([marker])), expected);
        }
    }

    #[test]
    fn proxy_markers_win_over_module_system() {
        let ambient = StaticAmbient::new(["module", "$loon"]);
        assert_eq!(detect_with(&ambient), HostEnvironment::Loon);
    }

    #[test]
    fn surge_wins_over_later_proxy_markers() {
        let ambient = StaticAmbient::new(["$task", "$environment.surge-version", "$rocket"]);
        assert_eq!(detect_with(&ambient), HostEnvironment::Surge);
    }

    #[test]
    fn standalone_process_is_server() {
        let ambient = ProcessAmbient {
            markers: HashSet::new(),
            standalone: true,
        };
        assert_eq!(detect_with(&ambient), HostEnvironment::Server);
    }

    #[test]
    fn marker_list_parsing_trims_and_skips_blanks() {
        let markers = parse_markers(" $task, ,$loon ");
        assert!(markers.contains("$task"));
        assert!(markers.contains("$loon"));
        assert_eq!(markers.len(), 2);
    }

    #[test]
    fn names_are_kebab_case_and_parse_back() {
        assert_eq!(HostEnvironment::QuantumultX.as_str(), "quantumult-x");
        for env in HostEnvironment::iter() {
            assert_eq!(env.as_str().parse::<HostEnvironment>().unwrap(), env);
        }
        assert!(HostEnvironment::Stash.is_proxy());
        assert!(!HostEnvironment::Server.is_proxy());
    }
}
