//! Identifier to environment-key mapping.
//!
//! Every uppercase character after the first starts a new segment, so
//! acronyms split letter by letter: `AWSEnabled` becomes `A_W_S_ENABLED`.
//! Deployments already export variables under these names; keep the
//! behaviour stable.

use crate::constants::ENV_KEY_SEPARATOR;

/// Convert a PascalCase or camelCase identifier to an upper-snake-case
/// environment key.
pub fn to_env_key(identifier: &str) -> String {
    let mut key = String::with_capacity(identifier.len() + identifier.len() / 2);
    for (i, c) in identifier.chars().enumerate() {
        if i > 0 && c.is_uppercase() {
            key.push(ENV_KEY_SEPARATOR);
        }
        key.extend(c.to_uppercase());
    }
    key
}
