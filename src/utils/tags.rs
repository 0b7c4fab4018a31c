/// Canonical form of a comma-separated tag list: segments trimmed, empty
/// segments dropped, joined by a bare comma.
pub fn normalize_tags(raw: &str) -> String {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_drops_empty_segments() {
        assert_eq!(normalize_tags(" a, b,, c "), "a,b,c");
        assert_eq!(normalize_tags("algo"), "algo");
        assert_eq!(normalize_tags(" , ,"), "");
        assert_eq!(normalize_tags(""), "");
    }

    #[test]
    fn keeps_inner_whitespace_and_case() {
        assert_eq!(normalize_tags("Data Structures ,  web"), "Data Structures,web");
    }

    #[test]
    fn normalization_is_idempotent() {
        let inputs = [
            "",
            ",",
            " a, b , c ",
            "x,,y,,,z",
            "  spaced out  , tabs\t,\tnewline\n",
            "already,canonical",
        ];
        for input in inputs {
            let once = normalize_tags(input);
            assert_eq!(normalize_tags(&once), once, "input {input:?}");
        }
    }
}
