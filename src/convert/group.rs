use thiserror::Error;

use super::url::{build_url, BuildError};
use crate::models::NamedQueryGroup;

/// Separates entries inside a serialized group.
pub const GROUP_SEPARATOR: &str = " ||";
/// Separates a query name from its URL.
pub const KV_SEPARATOR: &str = "== ";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupError {
    #[error("query group is empty")]
    EmptyGroup,

    #[error("query '{name}' failed to build: {source}")]
    GroupBuildFailed {
        name: String,
        #[source]
        source: BuildError,
    },

    #[error("query '{name}' contains a reserved separator")]
    ReservedSeparator { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed entry '{0}': missing name separator")]
pub struct ParseError(pub String);

/// Serializes every query of a group as `name== url`, joined by ` ||`.
///
/// All or nothing: the first query that fails to build fails the group.
/// Entries come out in name order. Names may not contain either separator
/// and URLs may not contain ` ||`, so [`parse_group`] always recovers them.
pub fn serialize_group(group: &NamedQueryGroup) -> Result<String, GroupError> {
    if group.is_empty() {
        return Err(GroupError::EmptyGroup);
    }

    let mut output = String::new();
    for (name, query) in group {
        if name.contains(KV_SEPARATOR) || name.contains(GROUP_SEPARATOR) {
            return Err(GroupError::ReservedSeparator { name: name.clone() });
        }

        let url = build_url(query).map_err(|source| GroupError::GroupBuildFailed {
            name: name.clone(),
            source,
        })?;
        if url.contains(GROUP_SEPARATOR) {
            return Err(GroupError::ReservedSeparator { name: name.clone() });
        }

        if !output.is_empty() {
            output.push_str(GROUP_SEPARATOR);
        }
        output.push_str(name);
        output.push_str(KV_SEPARATOR);
        output.push_str(&url);
    }
    Ok(output)
}

/// Splits a serialized group back into `(name, url)` pairs.
pub fn parse_group(serialized: &str) -> Result<Vec<(String, String)>, ParseError> {
    if serialized.is_empty() {
        return Ok(Vec::new());
    }

    serialized
        .split(GROUP_SEPARATOR)
        .map(|entry| {
            entry
                .split_once(KV_SEPARATOR)
                .map(|(name, url)| (name.to_string(), url.to_string()))
                .ok_or_else(|| ParseError(entry.to_string()))
        })
        .collect()
}
