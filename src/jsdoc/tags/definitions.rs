//! Tag vocabulary
//!
//! Two static tables drive normalization: the alias table, which maps
//! historical spellings onto one canonical title, and the definition table,
//! which records per canonical title whether a type literal is required,
//! forbidden or optional, and whether a name follows the type.
//!
//! Titles are matched case-insensitively; the canonical spelling is the one
//! stored in the definition (`inheritDoc`, `fileoverview` → `file`).

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Whether a tag carries a `{type}` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypePolicy {
    /// `@param`, `@returns`: a missing type is a defect
    Required,
    /// `@private`, `@constructor`: any type clause is discarded
    Forbidden,
    Optional,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDefinition {
    pub title: &'static str,
    pub type_policy: TypePolicy,
    /// A name token follows the type (`@param {T} name`)
    pub takes_name: bool,
    /// Without a name the tag is meaningless and gets rejected
    pub requires_name: bool,
}

/// The definition used for titles outside the vocabulary.
pub const UNKNOWN: TagDefinition = TagDefinition {
    title: "",
    type_policy: TypePolicy::Optional,
    takes_name: false,
    requires_name: false,
};

static ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("arg", "param"),
        ("argument", "param"),
        ("return", "returns"),
        ("prop", "property"),
        ("augments", "extends"),
        ("constant", "const"),
        ("desc", "description"),
        ("exception", "throws"),
        ("fires", "emits"),
        ("func", "function"),
        ("method", "function"),
        ("var", "member"),
        ("virtual", "abstract"),
        ("host", "external"),
        ("defaultvalue", "default"),
        ("class", "constructor"),
        ("fileoverview", "file"),
        ("overview", "file"),
        ("yield", "yields"),
    ])
});

use TypePolicy::{Forbidden, Optional, Required};

// (title, type policy, takes name, requires name)
const DEFINITIONS: &[(&str, TypePolicy, bool, bool)] = &[
    // Typed, named
    ("param", Required, true, true),
    ("property", Required, true, true),
    // Typed
    ("returns", Required, false, false),
    ("type", Required, false, false),
    ("this", Required, false, false),
    ("define", Required, true, false),
    ("implements", Required, false, false),
    // Type is optional
    ("throws", Optional, false, false),
    ("yields", Optional, false, false),
    ("enum", Optional, false, false),
    ("typedef", Optional, true, false),
    ("const", Optional, true, false),
    ("member", Optional, true, false),
    ("namespace", Optional, true, false),
    ("extends", Optional, true, false),
    ("default", Optional, false, false),
    ("package", Optional, false, false),
    ("export", Optional, false, false),
    ("template", Optional, true, true),
    // No type clause
    ("constructor", Forbidden, true, false),
    ("private", Forbidden, false, false),
    ("public", Forbidden, false, false),
    ("protected", Forbidden, false, false),
    ("abstract", Forbidden, false, false),
    ("override", Forbidden, false, false),
    ("static", Forbidden, false, false),
    ("interface", Forbidden, true, false),
    ("record", Forbidden, false, false),
    ("final", Forbidden, false, false),
    ("inheritDoc", Forbidden, false, false),
    ("ignore", Forbidden, false, false),
    ("deprecated", Forbidden, false, false),
    ("since", Forbidden, false, false),
    ("version", Forbidden, false, false),
    ("author", Forbidden, false, false),
    ("license", Forbidden, false, false),
    ("see", Forbidden, false, false),
    ("description", Forbidden, false, false),
    ("summary", Forbidden, false, false),
    // Named, untyped by convention but tolerated
    ("callback", Optional, true, true),
    ("function", Optional, true, false),
    ("name", Optional, true, true),
    ("event", Optional, true, true),
    ("emits", Optional, true, true),
    ("listens", Optional, true, true),
    ("module", Optional, true, false),
    ("memberof", Optional, true, true),
    ("alias", Optional, true, true),
    ("mixes", Optional, true, true),
    ("mixin", Optional, true, false),
    ("external", Optional, true, true),
    ("requires", Optional, true, true),
    ("borrows", Optional, true, true),
    ("lends", Optional, true, true),
    ("exports", Optional, true, true),
    ("tutorial", Optional, true, true),
    // Free text
    ("access", Optional, false, false),
    ("async", Optional, false, false),
    ("example", Optional, false, false),
    ("file", Optional, false, false),
    ("generator", Optional, false, false),
    ("global", Optional, false, false),
    ("hideconstructor", Optional, false, false),
    ("inner", Optional, false, false),
    ("instance", Optional, false, false),
    ("kind", Optional, false, false),
    ("readonly", Optional, false, false),
    ("copyright", Optional, false, false),
    ("todo", Optional, false, false),
    ("variation", Optional, false, false),
    ("nocollapse", Optional, false, false),
    ("nosideeffects", Optional, false, false),
    ("struct", Optional, false, false),
    ("dict", Optional, false, false),
    ("suppress", Optional, false, false),
    ("preserve", Optional, false, false),
];

/// Definitions keyed by lowercased canonical title.
static TABLE: Lazy<HashMap<String, TagDefinition>> = Lazy::new(|| {
    DEFINITIONS
        .iter()
        .map(|&(title, type_policy, takes_name, requires_name)| {
            (
                title.to_ascii_lowercase(),
                TagDefinition {
                    title,
                    type_policy,
                    takes_name,
                    requires_name,
                },
            )
        })
        .collect()
});

/// Resolve aliases and casing. Unknown titles come back unchanged.
pub fn canonical_title(title: &str) -> String {
    let lower = title.to_ascii_lowercase();
    if let Some(target) = ALIASES.get(lower.as_str()) {
        return (*target).to_string();
    }
    match TABLE.get(&lower) {
        Some(definition) => definition.title.to_string(),
        None => title.to_string(),
    }
}

/// Look up a title (alias or canonical) in the vocabulary.
pub fn definition(title: &str) -> Option<&'static TagDefinition> {
    let lower = title.to_ascii_lowercase();
    let key = ALIASES
        .get(lower.as_str())
        .copied()
        .unwrap_or(lower.as_str());
    TABLE.get(key)
}

/// The definition for a title, falling back to [`UNKNOWN`].
pub fn definition_or_unknown(title: &str) -> &'static TagDefinition {
    definition(title).unwrap_or(&UNKNOWN)
}

pub fn is_known(title: &str) -> bool {
    definition(title).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_resolve() {
        assert_eq!(canonical_title("arg"), "param");
        assert_eq!(canonical_title("argument"), "param");
        assert_eq!(canonical_title("return"), "returns");
        assert_eq!(canonical_title("augments"), "extends");
        assert_eq!(canonical_title("class"), "constructor");
        assert_eq!(canonical_title("fileoverview"), "file");
    }

    #[test]
    fn test_casing_is_canonicalized() {
        assert_eq!(canonical_title("inheritdoc"), "inheritDoc");
        assert_eq!(canonical_title("Param"), "param");
        assert_eq!(canonical_title("customThing"), "customThing");
    }

    #[test]
    fn test_every_alias_targets_a_definition() {
        for target in ALIASES.values() {
            assert!(is_known(target), "alias target `{}` has no definition", target);
        }
    }

    #[test]
    fn test_policies() {
        assert_eq!(definition("param").map(|d| d.type_policy), Some(Required));
        assert_eq!(definition("return").map(|d| d.type_policy), Some(Required));
        assert_eq!(definition("private").map(|d| d.type_policy), Some(Forbidden));
        assert_eq!(definition("throws").map(|d| d.type_policy), Some(Optional));
        assert!(definition("arg").is_some_and(|d| d.takes_name));
        assert!(definition("nope").is_none());
        assert_eq!(definition_or_unknown("nope"), &UNKNOWN);
    }
}
