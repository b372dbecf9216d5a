//! # Dependency & Alias Resolver
//!
//! Turns a user-requested list of operation/alias names into the ordered,
//! deduplicated, dependency-first sequence the executor runs.
//!
//! The caller's list expresses *desired outputs*, not execution order: each
//! name is expanded through the alias table, then depth-first walked over
//! the static dependency graph so prerequisites land before dependents.
//! Resolution is deterministic - the tables are static slices, and the
//! relative order of independently-requested operations is stable.

use crate::core::registry::OpRegistry;
use crate::error::ResolveError;

/// Prerequisites per operation. Every name on either side must exist in
/// the registry (asserted by a test below).
///
/// `veins` hangs off `select_mask`: vein maps are always extracted against
/// a selected channel.
const DEPENDENCIES: &[(&str, &[&str])] = &[
    ("gaussian_blur", &[]),
    ("rgb2lab", &[]),
    ("mask", &["rgb2lab"]),
    ("fill_holes", &["mask"]),
    ("analyse", &["fill_holes"]),
    ("select_mask", &["analyse"]),
    ("veins", &["select_mask"]),
    ("remove_background", &["select_mask"]),
    ("hull_fill", &["select_mask"]),
    ("crop", &["select_mask"]),
    ("blur", &["crop"]),
];

/// User-facing composite names. A name with no entry expands to itself.
const ALIASES: &[(&str, &[&str])] = &[
    // Legacy spelling of the threshold step.
    ("otsu", &["mask"]),
    // "Give me the final blurred crop."
    ("crop_blur", &["remove_background", "crop", "blur"]),
];

fn alias_expansion(name: &str) -> Option<&'static [&'static str]> {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, expansion)| *expansion)
}

fn dependencies_of(name: &str) -> &'static [&'static str] {
    DEPENDENCIES
        .iter()
        .find(|(op, _)| *op == name)
        .map(|(_, deps)| *deps)
        .unwrap_or(&[])
}

/// The resolved execution plan for one run.
///
/// `ordered` is what actually executes; `requested` keeps the caller's raw
/// (alias-level) names so variant extraction can honor composite intent.
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    requested: Vec<String>,
    ordered: Vec<&'static str>,
}

impl ExecutionPlan {
    /// The dependency-first operation sequence.
    pub fn ordered(&self) -> &[&'static str] {
        &self.ordered
    }

    /// The caller's raw requested names, aliases included.
    pub fn requested(&self) -> &[String] {
        &self.requested
    }

    /// True when `name` is in the executed set.
    pub fn was_applied(&self, name: &str) -> bool {
        self.ordered.iter().any(|op| *op == name)
    }

    /// True when the caller asked for `name` verbatim (alias or concrete).
    pub fn was_requested(&self, name: &str) -> bool {
        self.requested.iter().any(|op| op == name)
    }
}

/// Resolve requested names into an [`ExecutionPlan`].
///
/// Fails with [`ResolveError::UnknownOperation`] before any processing when
/// a name is neither a registered operation nor an alias.
pub fn resolve(requested: &[String], registry: &OpRegistry) -> Result<ExecutionPlan, ResolveError> {
    // Expand aliases, validating as we go.
    let mut expanded: Vec<&'static str> = Vec::new();
    for name in requested {
        match alias_expansion(name) {
            Some(expansion) => expanded.extend_from_slice(expansion),
            None => match registry.canonical_name(name) {
                Some(canonical) => expanded.push(canonical),
                None => {
                    return Err(ResolveError::UnknownOperation {
                        name: name.clone(),
                        available: registry.available_ops().join(", "),
                    })
                }
            },
        }
    }

    // Depth-first, dependencies before dependents, memoized.
    let mut ordered: Vec<&'static str> = Vec::new();
    let mut seen: Vec<&'static str> = Vec::new();
    for name in expanded {
        visit(name, &mut ordered, &mut seen);
    }

    Ok(ExecutionPlan {
        requested: requested.to_vec(),
        ordered,
    })
}

fn visit(name: &'static str, ordered: &mut Vec<&'static str>, seen: &mut Vec<&'static str>) {
    if seen.contains(&name) {
        return;
    }
    seen.push(name);
    for dep in dependencies_of(name) {
        visit(dep, ordered, seen);
    }
    ordered.push(name);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_names(names: &[&str]) -> Vec<&'static str> {
        let requested: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        resolve(&requested, &OpRegistry::standard())
            .unwrap()
            .ordered()
            .to_vec()
    }

    #[test]
    fn every_graph_name_exists_in_registry_or_alias_table() {
        let registry = OpRegistry::standard();
        for (op, deps) in DEPENDENCIES {
            assert!(registry.contains(op), "graph key {op} not registered");
            for dep in *deps {
                assert!(registry.contains(dep), "dependency {dep} not registered");
            }
        }
        for (_, expansion) in ALIASES {
            for op in *expansion {
                assert!(registry.contains(op), "alias target {op} not registered");
            }
        }
    }

    #[test]
    fn dependencies_precede_dependents() {
        let ordered = resolve_names(&["crop", "veins", "mask"]);
        for (i, op) in ordered.iter().enumerate() {
            for dep in dependencies_of(op) {
                let dep_pos = ordered.iter().position(|o| o == dep);
                assert!(
                    matches!(dep_pos, Some(pos) if pos < i),
                    "{dep} must precede {op} in {ordered:?}"
                );
            }
        }
    }

    #[test]
    fn no_duplicates_even_when_requested_twice() {
        let once = resolve_names(&["analyse"]);
        let twice = resolve_names(&["analyse", "analyse"]);
        assert_eq!(once, twice);

        let mut deduped = twice.clone();
        deduped.dedup();
        assert_eq!(twice, deduped);
    }

    #[test]
    fn no_dependency_op_resolves_to_itself() {
        assert_eq!(resolve_names(&["rgb2lab"]), vec!["rgb2lab"]);
    }

    #[test]
    fn alias_matches_explicit_expansion() {
        let via_alias = resolve_names(&["crop_blur"]);
        let explicit = resolve_names(&["remove_background", "crop", "blur"]);
        assert_eq!(via_alias, explicit);

        assert_eq!(resolve_names(&["otsu"]), resolve_names(&["mask"]));
    }

    #[test]
    fn crop_blur_builds_full_chain_ending_with_blur() {
        let ordered = resolve_names(&["crop_blur"]);
        assert_eq!(
            ordered,
            vec![
                "rgb2lab",
                "mask",
                "fill_holes",
                "analyse",
                "select_mask",
                "remove_background",
                "crop",
                "blur",
            ]
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let names = ["veins", "crop_blur", "gaussian_blur"];
        assert_eq!(resolve_names(&names), resolve_names(&names));
    }

    #[test]
    fn unknown_name_fails_before_processing() {
        let requested = vec!["sharpen".to_string()];
        let err = resolve(&requested, &OpRegistry::standard()).unwrap_err();
        let ResolveError::UnknownOperation { name, .. } = err;
        assert_eq!(name, "sharpen");
    }

    #[test]
    fn plan_tracks_applied_versus_requested() {
        let requested = vec!["crop_blur".to_string()];
        let plan = resolve(&requested, &OpRegistry::standard()).unwrap();
        assert!(plan.was_requested("crop_blur"));
        assert!(!plan.was_applied("crop_blur"));
        assert!(plan.was_applied("blur"));
        assert!(!plan.was_requested("blur"));
    }
}
