//! # Relationship and query classification
//!
//! Naming heuristics that decide whether a member reference plausibly
//! denotes a lazily-resolved relationship, and whether a call chain denotes
//! query execution against a data source. Both classifiers are built from
//! curated vocabularies held in static sets initialized once.
//!
//! The relationship classifier applies its rejections in order and accepts
//! whatever survives: the exclusion lists must stay conservative (a true
//! relationship must never be hidden), and the loose final acceptance means
//! some ordinary members will classify as relationships. That asymmetry is
//! intentional; coverage checks downstream keep the noise down.

use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;

use crate::chain::{CallChain, ChainRoot, Segment};

/// Common member names that are never relationships: identifiers,
/// timestamps, status fields, generic scalar nouns.
static NON_RELATIONSHIP_NAMES: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        // identifiers and keys
        "id", "key", "uuid", "ulid", "guid", "slug", "token", "code", "hash", "secret",
        // naming and labels
        "name", "title", "label", "username", "email", "password", "phone",
        // status and flags
        "type", "status", "state", "flag", "active", "enabled", "visible", "published",
        "locked", "deleted", "archived", "verified", "confirmed",
        // generic scalar nouns
        "value", "data", "body", "content", "text", "description", "summary", "excerpt",
        "note", "notes", "message", "subject", "url", "uri", "link", "path", "file",
        "filename", "extension", "mime", "image", "avatar", "icon", "color", "locale",
        "language", "currency", "timezone", "format", "version", "priority", "position",
        "level", "score", "rank", "rating", "size", "weight", "width", "height",
        "amount", "price", "cost", "quantity", "total", "count", "sum", "number",
        // temporal
        "date", "time", "timestamp", "timestamps", "duration", "age",
        // bags of scalars
        "meta", "metadata", "options", "settings", "config", "attributes", "properties",
        "payload", "context", "params", "headers",
        // ORM bookkeeping members
        "pivot", "exists", "table", "connection", "relations", "casts", "fillable",
        "guarded", "hidden", "appends",
    ]
    .into_iter()
    .collect()
});

/// Method names that are helpers on entity instances, never relationships.
static NON_RELATIONSHIP_METHODS: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        "save", "update", "delete", "destroy", "restore", "refresh", "fresh", "replicate",
        "touch", "push", "fill", "only", "except", "append", "toArray", "toJson",
        "jsonSerialize", "offsetGet", "offsetSet", "offsetExists", "offsetUnset",
        "relationLoaded", "makeHidden", "makeVisible", "is", "isNot", "wasChanged",
        "isDirty", "isClean",
    ]
    .into_iter()
    .collect()
});

/// Terminal fetch/aggregate calls that execute a query.
static QUERY_EXEC_METHODS: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        "get", "first", "firstOrFail", "firstOr", "firstWhere", "sole", "find",
        "findOrFail", "findMany", "findOr", "value", "pluck", "count", "sum", "avg",
        "average", "min", "max", "exists", "doesntExist", "paginate", "simplePaginate",
        "cursorPaginate",
    ]
    .into_iter()
    .collect()
});

/// Chunked/streamed iteration calls. These are the accepted fix for
/// per-iteration fetching and are never reported.
static BATCH_METHODS: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        "chunk", "chunkById", "chunkByIdDesc", "chunkMap", "each", "eachById", "lazy",
        "lazyById", "lazyByIdDesc", "cursor",
    ]
    .into_iter()
    .collect()
});

/// Constraint-building calls; evidence that a bare variable holds a query
/// builder rather than an ordinary collection.
static FILTER_METHODS: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        "where", "orWhere", "whereIn", "whereNotIn", "whereNull", "whereNotNull",
        "whereHas", "orWhereHas", "whereDoesntHave", "whereBetween", "whereNotBetween",
        "whereDate", "whereMonth", "whereYear", "whereDay", "whereTime", "whereColumn",
        "whereKey", "whereKeyNot", "whereRaw",
    ]
    .into_iter()
    .collect()
});

/// Capitalized symbols that are helpers, not data entities.
static UTILITY_CLASSES: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        "Arr", "Str", "Collection", "Carbon", "CarbonImmutable", "Date", "DateTime",
        "DateTimeImmutable", "Cache", "Config", "Log", "Route", "Session", "Storage",
        "View", "Validator", "Hash", "Crypt", "Event", "Queue", "Bus", "Gate", "Lang",
        "App", "Auth", "Cookie", "Request", "Response", "Redirect", "URL", "Blade",
        "File", "Http", "Number", "Process",
    ]
    .into_iter()
    .collect()
});

/// The query facade: a data source even though it is not an entity type.
static QUERY_FACADES: Lazy<FxHashSet<&'static str>> =
    Lazy::new(|| ["DB"].into_iter().collect());

const REJECTED_PREFIXES: &[&str] = &["is_", "has_", "can_", "should_", "was_", "will_"];
const REJECTED_SUFFIXES: &[&str] = &["_id", "_at", "_count", "_total", "_sum", "_avg", "_min", "_max"];
const DERIVED_PREFIXES: &[&str] = &["raw_", "original_", "cached_", "computed_"];

/// Ordered rejections shared by the property and method classifiers.
fn rejected_by_shape(name: &str) -> bool {
    if name.len() <= 1 || name.starts_with('_') {
        return true;
    }
    if NON_RELATIONSHIP_NAMES.contains(name) {
        return true;
    }
    if REJECTED_PREFIXES.iter().any(|p| name.starts_with(p)) {
        return true;
    }
    if REJECTED_SUFFIXES.iter().any(|s| name.ends_with(s)) {
        return true;
    }
    DERIVED_PREFIXES.iter().any(|p| name.starts_with(p))
}

/// Whether a camel-case helper prefix is followed by a capitalized tail
/// (`getName`, `scopeActive`), as opposed to a plain word (`settings`).
fn has_camel_prefix(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .and_then(|tail| tail.chars().next())
        .is_some_and(|c| c.is_ascii_uppercase())
}

/// Whether a property name plausibly denotes a relationship.
pub fn looks_like_relationship_property(name: &str) -> bool {
    !rejected_by_shape(name)
}

/// Whether a method name plausibly denotes a relationship accessor.
pub fn looks_like_relationship_method(name: &str) -> bool {
    if rejected_by_shape(name) || NON_RELATIONSHIP_METHODS.contains(name) {
        return false;
    }
    if has_camel_prefix(name, "get")
        || has_camel_prefix(name, "set")
        || has_camel_prefix(name, "scope")
        || name.ends_with("Attribute")
        || name.starts_with("boot")
    {
        return false;
    }
    true
}

/// Whether a call name executes a query (terminal fetch/aggregate, and not
/// one of the batch-iteration calls).
pub fn is_query_execution_call(name: &str) -> bool {
    QUERY_EXEC_METHODS.contains(name) && !BATCH_METHODS.contains(name)
}

pub fn is_filter_call(name: &str) -> bool {
    FILTER_METHODS.contains(name)
}

/// Eager-load directives recognized anywhere in an assignment chain.
pub fn is_eager_directive_call(name: &str) -> bool {
    matches!(name, "with" | "load" | "loadMissing")
}

/// Incremental load calls that extend an existing variable's provenance.
pub fn is_merge_directive_call(name: &str) -> bool {
    matches!(name, "load" | "loadMissing")
}

pub fn is_presence_check_call(name: &str) -> bool {
    name == "relationLoaded"
}

fn is_capitalized(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// The leading run of relationship-like property segments on a
/// variable-rooted chain. This is the access path checked against
/// provenance.
pub fn leading_property_path<'a>(chain: &CallChain<'a>) -> Vec<&'a str> {
    let mut path = Vec::new();
    for segment in &chain.segments {
        match segment {
            Segment::Property {
                name: Some(name), ..
            } if looks_like_relationship_property(name) => path.push(name.as_str()),
            _ => break,
        }
    }
    path
}

/// Whether the chain hangs off a relationship on its root variable: the
/// receiver of the first call is a property access whose final segment
/// passes the property classifier, or an argument-less
/// relationship-accessor method.
fn has_relationship_origin(chain: &CallChain<'_>) -> bool {
    let mut last_property: Option<&str> = None;
    for segment in &chain.segments {
        match segment {
            Segment::Property { name, .. } => match name {
                Some(name) => last_property = Some(name.as_str()),
                None => return false,
            },
            Segment::Method { name, args, .. } => {
                return match last_property {
                    Some(property) => looks_like_relationship_property(property),
                    None => match name {
                        Some(name) => args.is_empty() && looks_like_relationship_method(name),
                        None => false,
                    },
                };
            }
        }
    }
    false
}

/// Whether a call chain originates from a data source.
///
/// A capitalized non-utility class root is taken as a data-entity type; a
/// relationship origin on a variable root counts as well. A bare variable
/// with no relationship origin gives no type evidence, so both a
/// filter-class and a fetch-class call must appear in the chain before it
/// is believed to be a query.
pub fn originates_from_data_source(chain: &CallChain<'_>) -> bool {
    match &chain.root {
        ChainRoot::Class { class } => {
            let name = class.effective_name();
            QUERY_FACADES.contains(name)
                || (is_capitalized(name) && !UTILITY_CLASSES.contains(name))
        }
        ChainRoot::Variable { .. } => {
            if has_relationship_origin(chain) {
                return true;
            }
            let mut has_filter = false;
            let mut has_exec = false;
            for segment in &chain.segments {
                if let Segment::Method {
                    name: Some(name), ..
                } = segment
                {
                    has_filter |= is_filter_call(name);
                    has_exec |= is_query_execution_call(name);
                }
            }
            has_filter && has_exec
        }
        ChainRoot::Function { .. } | ChainRoot::Other(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plural_nouns_as_relationships() {
        assert!(looks_like_relationship_property("author"));
        assert!(looks_like_relationship_property("comments"));
        assert!(looks_like_relationship_property("team"));
    }

    #[test]
    fn rejects_curated_scalar_names() {
        assert!(!looks_like_relationship_property("name"));
        assert!(!looks_like_relationship_property("status"));
        assert!(!looks_like_relationship_property("pivot"));
    }

    #[test]
    fn rejects_structural_shapes() {
        assert!(!looks_like_relationship_property("user_id"));
        assert!(!looks_like_relationship_property("created_at"));
        assert!(!looks_like_relationship_property("is_admin"));
        assert!(!looks_like_relationship_property("comments_count"));
        assert!(!looks_like_relationship_property("raw_body"));
        assert!(!looks_like_relationship_property("x"));
        assert!(!looks_like_relationship_property("_internal"));
    }

    #[test]
    fn method_classifier_adds_helper_conventions() {
        assert!(looks_like_relationship_method("author"));
        assert!(!looks_like_relationship_method("getName"));
        assert!(!looks_like_relationship_method("setStatus"));
        assert!(!looks_like_relationship_method("scopeActive"));
        assert!(!looks_like_relationship_method("getFullNameAttribute"));
        assert!(!looks_like_relationship_method("boot"));
        assert!(!looks_like_relationship_method("relationLoaded"));
        // A lowercase tail after "get" is not the getter convention.
        assert!(looks_like_relationship_method("getaways"));
    }

    #[test]
    fn batch_calls_are_not_query_execution() {
        assert!(is_query_execution_call("get"));
        assert!(is_query_execution_call("count"));
        assert!(!is_query_execution_call("chunk"));
        assert!(!is_query_execution_call("cursor"));
        assert!(!is_query_execution_call("where"));
    }

    #[test]
    fn directive_vocabularies() {
        assert!(is_eager_directive_call("with"));
        assert!(is_eager_directive_call("load"));
        assert!(is_merge_directive_call("loadMissing"));
        assert!(!is_merge_directive_call("with"));
        assert!(is_presence_check_call("relationLoaded"));
    }
}
