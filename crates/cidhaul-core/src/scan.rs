use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::cid::Cid;

/// Matches an identifier optionally wrapped in gateway-URL or
/// `ipfs://` scaffolding. The scaffold is case-insensitive; the
/// identifier body is not, since the base58/base32 alphabets are
/// case-significant. The V0 branch matches a maximal alphanumeric
/// run so overlong runs can be rejected whole instead of silently
/// truncated to a 46-character prefix.
static CID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:(?i:https?://[^/\s]*ipfs[^/\s]*/(?:ipfs/)?|ipfs://))?(Qm[a-zA-Z0-9]{44,}|baf[a-z0-9]{50,})",
    )
    .expect("static pattern")
});

/// Scan arbitrary text for embedded identifiers.
///
/// Lazy, finite, and stateless: the returned iterator borrows the
/// input and can be restarted by calling again.
pub fn find_cids(text: &str) -> impl Iterator<Item = Cid> + '_ {
    CID_PATTERN.captures_iter(text).filter_map(|caps| {
        let body = caps.get(1)?.as_str();
        if body.starts_with("Qm") && body.len() != 46 {
            // An overlong base58 run is noise, not a V0 identifier.
            return None;
        }
        Cid::parse(body).ok()
    })
}

/// Collect every identifier in `text`, dropping `exclude` so a
/// document containing its own identifier (a permalink field, say)
/// cannot requeue itself.
pub fn scan_text(text: &str, exclude: Option<&Cid>) -> HashSet<Cid> {
    find_cids(text).filter(|cid| Some(cid) != exclude).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v0(fill: &str) -> String {
        format!("Qm{}", fill.repeat(44))
    }

    fn v1(fill: &str) -> String {
        format!("baf{}", fill.repeat(52))
    }

    fn all(text: &str) -> Vec<Cid> {
        find_cids(text).collect()
    }

    #[test]
    fn finds_bare_v0() {
        let s = v0("A");
        let found = all(&s);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].as_str(), s);
    }

    #[test]
    fn finds_v0_inside_prose() {
        let s = v0("z");
        let found = all(&format!("animation stored at {s}, see notes"));
        assert_eq!(found, vec![Cid::parse(&s).unwrap()]);
    }

    #[test]
    fn off_by_one_runs_do_not_match() {
        assert!(all(&format!("Qm{}", "A".repeat(43))).is_empty());
        assert!(all(&format!("Qm{}", "A".repeat(45))).is_empty());
    }

    #[test]
    fn finds_v1() {
        let s = v1("7");
        assert_eq!(all(&s).len(), 1);
    }

    #[test]
    fn strips_gateway_url_scaffold() {
        let s = v0("B");
        let found = all(&format!("https://ipfs.io/ipfs/{s}"));
        assert_eq!(found[0].as_str(), s);
    }

    #[test]
    fn strips_ipfs_scheme() {
        let s = v1("k");
        let found = all(&format!("ipfs://{s}"));
        assert_eq!(found[0].as_str(), s);
    }

    #[test]
    fn scaffold_is_case_insensitive_body_is_not() {
        let s = v0("C");
        assert_eq!(all(&format!("IPFS://{s}")).len(), 1);
        // Lowercasing the V0 prefix breaks the identifier itself.
        assert!(all(&format!("qm{}", "C".repeat(44))).is_empty());
    }

    #[test]
    fn path_suffix_terminates_the_run() {
        let s = v0("D");
        let found = all(&format!("https://ipfs.io/ipfs/{s}/asset.png"));
        assert_eq!(found[0].as_str(), s);
    }

    #[test]
    fn finds_multiple_identifiers() {
        let a = v0("E");
        let b = v1("3");
        let found = all(&format!("{a} and ipfs://{b}"));
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn scan_text_excludes_parent() {
        let parent = Cid::parse(&v0("F")).unwrap();
        let other = v0("G");
        let text = format!("self={} child={}", parent, other);
        let found = scan_text(&text, Some(&parent));
        assert_eq!(found.len(), 1);
        assert!(found.contains(&Cid::parse(&other).unwrap()));
    }

    #[test]
    fn scan_text_deduplicates() {
        let s = v0("H");
        let found = scan_text(&format!("{s} {s} {s}"), None);
        assert_eq!(found.len(), 1);
    }
}
