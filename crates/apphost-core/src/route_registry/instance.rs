//! Instance naming: `wiki`, `wiki__2`, `wiki__3`, ...

const INSTANCE_SEP: &str = "__";

/// Id of the `n`th instance of an app (1-based). The first instance carries
/// the bare manifest id.
pub fn instance_app_id(base: &str, n: u32) -> String {
    if n <= 1 {
        base.to_string()
    } else {
        format!("{base}{INSTANCE_SEP}{n}")
    }
}

/// Manifest id an instance id was derived from (`wiki__2` → `wiki`).
pub fn base_app_id(app_id: &str) -> &str {
    match app_id.rsplit_once(INSTANCE_SEP) {
        Some((base, n)) if !base.is_empty() && n.parse::<u32>().is_ok_and(|n| n >= 2) => base,
        _ => app_id,
    }
}

/// Lowest instance id of `base` for which `taken` returns false.
pub(super) fn lowest_free_instance(base: &str, taken: impl Fn(&str) -> bool) -> String {
    let mut n = 1;
    loop {
        let candidate = instance_app_id(base, n);
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
