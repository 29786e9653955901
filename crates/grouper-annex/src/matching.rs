//! Code-matching helpers shared by the evaluators.

use std::collections::BTreeSet;

use grouper_model::{PrincipalMode, ProcedureList};

/// Positions holding `principal` that may act as the principal procedure.
pub fn principal_positions<'a>(
    procedures: &'a ProcedureList,
    mode: PrincipalMode,
    principal: &'a str,
) -> impl Iterator<Item = usize> + 'a {
    procedures
        .principal_positions(mode)
        .filter(move |&pos| procedures.codes.get(pos).is_some_and(|code| code == principal))
}

/// True when `principal` may act as the principal procedure.
pub fn has_principal(procedures: &ProcedureList, mode: PrincipalMode, principal: &str) -> bool {
    principal_positions(procedures, mode, principal)
        .next()
        .is_some()
}

/// True when any code is a member of `set`.
pub fn any_in<S: AsRef<str>>(codes: &[S], set: &BTreeSet<String>) -> bool {
    codes.iter().any(|code| set.contains(code.as_ref()))
}

/// True when any code starts with any of the prefixes.
pub fn starts_with_any<S: AsRef<str>>(codes: &[S], prefixes: &[String]) -> bool {
    codes.iter().any(|code| {
        let code = code.as_ref();
        prefixes
            .iter()
            .any(|prefix| !prefix.is_empty() && code.starts_with(prefix.as_str()))
    })
}
