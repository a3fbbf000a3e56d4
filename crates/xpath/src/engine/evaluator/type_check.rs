//! Static type conformance (`treat as`, function return types).
//!
//! Conformance never converts: a value accepted under a declared supertype
//! keeps its dynamic kind, so an `xs:yearMonthDuration` returned through an
//! `xs:duration` signature still dispatches as `xs:yearMonthDuration`.

use crate::engine::runtime::Error;
use crate::xdm::{AtomicType, ExpandedName, XdmAtomicValue};

/// Whether `value` is an instance of `declared`.
pub fn instance_of(value: &XdmAtomicValue, declared: AtomicType) -> bool {
    value.kind().is_subtype_of(declared)
}

/// Check `value` against `declared` and hand it back unchanged.
pub fn treat_as(value: XdmAtomicValue, declared: AtomicType) -> Result<XdmAtomicValue, Error> {
    if instance_of(&value, declared) {
        Ok(value)
    } else {
        Err(Error::type_error(format!(
            "{} value '{value}' does not match declared type {declared}",
            value.kind()
        )))
    }
}

/// Resolve a declared type given by name. Only XML Schema built-ins (xs:*)
/// are recognized; unknown namespaces and local names do not match.
pub fn atomic_type_by_name(name: &ExpandedName) -> Option<AtomicType> {
    if let Some(ns) = &name.ns_uri
        && ns.as_str() != crate::consts::XS
    {
        return None;
    }
    AtomicType::from_local_name(&name.local)
}

/// [`treat_as`] with the declared type given by name.
pub fn treat_as_named(value: XdmAtomicValue, declared: &ExpandedName) -> Result<XdmAtomicValue, Error> {
    match atomic_type_by_name(declared) {
        Some(t) => treat_as(value, t),
        None => Err(Error::type_error(format!("unknown atomic type '{}'", declared.local))),
    }
}
