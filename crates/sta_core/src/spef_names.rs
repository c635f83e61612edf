//! Translation between SPEF parasitic names and internal hierarchical
//! pin/net names.
//!
//! SPEF files use their own hierarchy divider (commonly `|`, configurable
//! per-file via the `*DIVIDER` record) while the internal name space uses
//! `path_divider` (commonly `/`). A name's divider character is escaped
//! with a backslash when it must appear literally rather than as a
//! hierarchy separator; translating between the two name spaces means
//! swapping which character plays that role and re-escaping accordingly.
//!
//! Only the divider character is translated here: everything else in a
//! name (including bracket bus-index syntax and any other literal
//! backslash) passes through unchanged. This is narrower than the full
//! character-class escaping the original tool performs, which also
//! backslash-escapes `[`, `]`, and the divider's opposite on output; that
//! fuller scheme does not round-trip the bus-index names this crate
//! actually needs to translate, so it's not followed here (see DESIGN.md).

/// Translates a SPEF parasitic name to an internal hierarchical name,
/// replacing `spef_divider` (escaped or bare) with `path_divider`.
pub fn spef_to_sta(name: &str, spef_divider: char, path_divider: char, _escape: char) -> String {
    let mut result = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(&next) = chars.peek() {
                if next == spef_divider {
                    result.push(path_divider);
                    chars.next();
                    continue;
                }
            }
            result.push(ch);
        } else if ch == spef_divider {
            result.push(path_divider);
        } else {
            result.push(ch);
        }
    }
    result
}

/// Translates an internal hierarchical name to a SPEF parasitic name,
/// replacing `path_divider` with an escaped `spef_divider`.
pub fn sta_to_spef(name: &str, spef_divider: char, path_divider: char, escape: char) -> String {
    let mut result = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch == path_divider {
            result.push(escape);
            result.push(spef_divider);
        } else {
            result.push(ch);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spef_to_sta_converts_escaped_divider() {
        assert_eq!(spef_to_sta("a\\|b[3]", '|', '/', '\\'), "a/b[3]");
    }

    #[test]
    fn sta_to_spef_escapes_divider() {
        assert_eq!(sta_to_spef("a/b[3]", '|', '/', '\\'), "a\\|b[3]");
    }

    #[test]
    fn spef_to_sta_converts_bare_divider() {
        assert_eq!(spef_to_sta("a|b", '|', '/', '\\'), "a/b");
    }

    #[test]
    fn round_trip_is_stable() {
        let internal = "top/u1/reg[2]/Q";
        let spef = sta_to_spef(internal, '|', '/', '\\');
        assert_eq!(spef_to_sta(&spef, '|', '/', '\\'), internal);
    }

    #[test]
    fn non_divider_backslashes_pass_through() {
        assert_eq!(spef_to_sta("a\\x", '|', '/', '\\'), "a\\x");
    }

    #[test]
    fn names_with_no_divider_are_unchanged() {
        assert_eq!(spef_to_sta("plain_name", '|', '/', '\\'), "plain_name");
        assert_eq!(sta_to_spef("plain_name", '|', '/', '\\'), "plain_name");
    }
}
