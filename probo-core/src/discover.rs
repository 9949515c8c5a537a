//! Name-based test selection.
//!
//! A registered test is a candidate iff its name starts with the configured
//! prefix. A target of the form `unit:name1,name2` narrows the selection to a
//! module-path unit and, optionally, to explicitly named tests. The names in
//! the list are matched against the portion of the test name that follows the
//! prefix (the full name is accepted too).

use crate::TestDef;

/// Parsed discovery target.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Target {
    /// Module-path unit filter; `None` means the whole registry.
    pub unit: Option<String>,
    /// Explicit test names; empty means every prefixed test in the unit.
    pub names: Vec<String>,
}

impl Target {
    /// Target covering the whole registry.
    pub fn all() -> Self {
        Self::default()
    }
}

/// Find the name-list separator: a `:` that is not part of a `::`
/// module-path segment divider.
fn split_names(raw: &str) -> Option<(&str, &str)> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b':' {
            if bytes.get(i + 1) == Some(&b':') {
                i += 2;
                continue;
            }
            return Some((&raw[..i], &raw[i + 1..]));
        }
        i += 1;
    }
    None
}

/// Parse a raw target string of the form `unit`, `unit:name1,name2`, or
/// `:name1,name2`. The unit may itself contain `::` path separators.
pub fn parse_target(raw: &str) -> Target {
    match split_names(raw) {
        Some((unit, names)) => Target {
            unit: (!unit.is_empty()).then(|| unit.to_string()),
            names: names
                .split(',')
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .collect(),
        },
        None => Target {
            unit: (!raw.is_empty()).then(|| raw.to_string()),
            names: Vec::new(),
        },
    }
}

/// Whether `unit` names a segment-aligned piece of `module_path`.
///
/// `tests::parsing` matches `my_crate::tests::parsing` but not
/// `my_crate::tests::parsing_extra`.
fn unit_matches(module_path: &str, unit: &str) -> bool {
    if module_path == unit {
        return true;
    }
    module_path.strip_suffix(unit).is_some_and(|rest| rest.ends_with("::"))
        || module_path.strip_prefix(unit).is_some_and(|rest| rest.starts_with("::"))
        || module_path.contains(&format!("::{unit}::"))
}

/// Select the tests matching `prefix` and `target`.
///
/// Tests flagged `skip` are included only when explicitly named in the
/// target's name list. The returned order preserves the input order.
pub fn select<'a>(
    tests: impl IntoIterator<Item = &'a TestDef>,
    prefix: &str,
    target: &Target,
) -> Vec<&'a TestDef> {
    tests
        .into_iter()
        .filter(|t| t.name.starts_with(prefix))
        .filter(|t| {
            target
                .unit
                .as_deref()
                .is_none_or(|u| unit_matches(t.module_path, u))
        })
        .filter(|t| {
            if target.names.is_empty() {
                return !t.skip;
            }
            let short = t.name.strip_prefix(prefix).unwrap_or(t.name);
            target.names.iter().any(|n| n == short || n == t.name)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() {}

    const fn def(name: &'static str, module_path: &'static str, skip: bool) -> TestDef {
        TestDef {
            name,
            module_path,
            file: "discover.rs",
            line: 0,
            skip,
            runner_fn: noop,
        }
    }

    static DEFS: [TestDef; 5] = [
        def("test_alpha", "demo::sorting", false),
        def("test_beta", "demo::sorting", false),
        def("test_gamma", "demo::parsing", false),
        def("test_skipped", "demo::parsing", true),
        def("helper_fn", "demo::parsing", false),
    ];

    #[test]
    fn parse_plain_unit() {
        assert_eq!(
            parse_target("demo::sorting"),
            Target {
                unit: Some("demo::sorting".to_string()),
                names: vec![],
            }
        );
    }

    #[test]
    fn parse_unit_with_names() {
        let target = parse_target("sorting:alpha,beta");
        assert_eq!(target.unit.as_deref(), Some("sorting"));
        assert_eq!(target.names, vec!["alpha", "beta"]);
    }

    #[test]
    fn parse_pathed_unit_with_names() {
        // `::` separators inside the unit are not the name-list separator.
        let target = parse_target("demo::sorting:alpha,beta");
        assert_eq!(target.unit.as_deref(), Some("demo::sorting"));
        assert_eq!(target.names, vec!["alpha", "beta"]);

        let target = parse_target("a::b::c");
        assert_eq!(target.unit.as_deref(), Some("a::b::c"));
        assert!(target.names.is_empty());
    }

    #[test]
    fn parse_bare_names() {
        let target = parse_target(":alpha");
        assert_eq!(target.unit, None);
        assert_eq!(target.names, vec!["alpha"]);
    }

    #[test]
    fn parse_empty_is_everything() {
        assert_eq!(parse_target(""), Target::all());
    }

    #[test]
    fn select_honors_prefix() {
        let selected = select(DEFS.iter(), "test_", &Target::all());
        let names: Vec<_> = selected.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["test_alpha", "test_beta", "test_gamma"]);
    }

    #[test]
    fn select_counts_every_prefixed_member() {
        // Attempted count must equal the number of prefix matches.
        let selected = select(DEFS.iter(), "helper_", &Target::all());
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn select_narrows_to_unit() {
        let target = parse_target("sorting");
        let selected = select(DEFS.iter(), "test_", &target);
        let names: Vec<_> = selected.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["test_alpha", "test_beta"]);
    }

    #[test]
    fn unit_must_be_segment_aligned() {
        assert!(unit_matches("demo::parsing", "parsing"));
        assert!(unit_matches("demo::parsing", "demo"));
        assert!(unit_matches("a::b::c", "b"));
        assert!(!unit_matches("demo::parsing_extra", "parsing"));
        assert!(!unit_matches("demo::reparsing", "parsing"));
    }

    #[test]
    fn names_match_suffix_after_prefix() {
        let target = parse_target(":alpha,gamma");
        let selected = select(DEFS.iter(), "test_", &target);
        let names: Vec<_> = selected.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["test_alpha", "test_gamma"]);
    }

    #[test]
    fn skipped_only_runs_when_named() {
        let selected = select(DEFS.iter(), "test_", &parse_target("parsing"));
        assert_eq!(selected.iter().map(|t| t.name).collect::<Vec<_>>(), vec!["test_gamma"]);

        let selected = select(DEFS.iter(), "test_", &parse_target("parsing:skipped"));
        assert_eq!(selected.iter().map(|t| t.name).collect::<Vec<_>>(), vec!["test_skipped"]);
    }
}
