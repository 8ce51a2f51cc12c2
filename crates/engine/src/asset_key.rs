use std::fmt;

pub const CANONICAL_SEPARATOR: char = '/';

// Raw keys differing only in case or separator style normalize to the same value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn normalize(raw: &str) -> Self {
        let mut out = String::with_capacity(raw.len());
        let mut last_was_separator = false;
        for ch in raw.trim().chars() {
            if ch == '/' || ch == '\\' {
                if !last_was_separator {
                    out.push(CANONICAL_SEPARATOR);
                }
                last_was_separator = true;
                continue;
            }
            last_was_separator = false;
            out.extend(ch.to_lowercase());
        }
        Self(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn starts_with(&self, prefix: &CanonicalKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub fn join(&self, segment: &str) -> Self {
        Self::normalize(&format!("{}{}{}", self.0, CANONICAL_SEPARATOR, segment))
    }

    pub fn is_namespace(&self) -> bool {
        self.0.ends_with(CANONICAL_SEPARATOR)
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CanonicalKey {
    fn from(raw: &str) -> Self {
        Self::normalize(raw)
    }
}

pub fn normalize_asset_key(raw: &str) -> CanonicalKey {
    CanonicalKey::normalize(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_and_separator_variants_collapse_to_one_key() {
        let variants = [
            "LooseSprites/Cursors",
            r"LooseSprites\Cursors",
            "loosesprites/cursors",
            r"LOOSESPRITES\\CURSORS",
            "  LooseSprites//Cursors ",
        ];
        for raw in variants {
            assert_eq!(
                normalize_asset_key(raw).as_str(),
                "loosesprites/cursors",
                "raw={raw}"
            );
        }
    }

    #[test]
    fn namespace_prefix_keeps_trailing_separator() {
        let prefix = normalize_asset_key(r"Buildings\");
        assert_eq!(prefix.as_str(), "buildings/");
        assert!(prefix.is_namespace());
        assert!(normalize_asset_key(r"Buildings\Barn").starts_with(&prefix));
        assert!(!normalize_asset_key("buildingsx/barn").starts_with(&prefix));
    }

    #[test]
    fn join_normalizes_the_segment() {
        let prefix = normalize_asset_key("buildings/");
        assert_eq!(prefix.join("Big Barn").as_str(), "buildings/big barn");
        assert_eq!(normalize_asset_key("buildings").join("Coop").as_str(), "buildings/coop");
    }

    #[test]
    fn normalization_is_total_and_idempotent() {
        for raw in ["", "   ", r"\\", "ÄBC/Déf", "a\tb"] {
            let once = normalize_asset_key(raw);
            let twice = normalize_asset_key(once.as_str());
            assert_eq!(once, twice, "raw={raw:?}");
        }
        assert!(normalize_asset_key("  ").is_empty());
    }
}
