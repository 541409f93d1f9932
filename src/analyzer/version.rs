/// Range operator characters stripped from a declared version.
const RANGE_OPERATORS: [char; 5] = ['^', '~', '>', '=', '<'];

/// Strips range operators from a declared version spec.
///
/// The result is a best-effort version token, not validated semver:
/// `">=1.0.0 <2.0.0"` becomes `"1.0.0 2.0.0"`.
pub fn normalize(raw_spec: &str) -> String {
    raw_spec
        .chars()
        .filter(|c| !RANGE_OPERATORS.contains(c))
        .collect()
}
