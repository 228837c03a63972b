// ============================================================
// HEADER NORMALIZATION
// ============================================================
// Canonical field identifiers from a raw header row

/// Build canonical column names from a raw header row.
///
/// Normalization lower-cases, collapses non-alphanumeric runs to a single
/// underscore, and strips edge underscores. Empty or colliding results get
/// `_2`, `_3`, ... suffixes so names stay unique; with `normalize` off the
/// raw names are kept verbatim but still disambiguated.
pub fn build_header(raw: &[String], normalize: bool) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(raw.len());
    for name in raw {
        let base = if normalize {
            normalize_name(name)
        } else {
            name.clone()
        };
        names.push(uniquify(base, &names));
    }
    names
}

/// Lower-case and keep only alphanumeric runs, joined by underscores.
fn normalize_name(name: &str) -> String {
    let mut mapped = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            mapped.extend(c.to_lowercase());
        } else {
            mapped.push('_');
        }
    }
    mapped
        .split('_')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Suffix a candidate name until it is non-empty and unused.
fn uniquify(base: String, taken: &[String]) -> String {
    let base = if base.is_empty() {
        "column".to_string()
    } else {
        base
    };
    if !taken.contains(&base) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}_{}", base, n);
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
