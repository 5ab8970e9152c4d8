//! Name helpers shared by the parser and the Go emitter.

/// Segments that Go convention writes fully upper-cased.
const INITIALISMS: &[&str] = &[
    "api", "cpu", "http", "id", "ip", "json", "mac", "url", "uuid",
];

/// Joins a dotted property path.
pub fn join_path(prefix: &str, name: &str) -> String {
    join(prefix, name, '.')
}

/// Joins two parts of a field name with an underscore.
///
/// Used for synthesized field names such as `device_id`.
pub fn join_name(prefix: &str, name: &str) -> String {
    join(prefix, name, '_')
}

fn join(prefix: &str, name: &str, separator: char) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else if name.is_empty() {
        prefix.to_string()
    } else {
        format!("{prefix}{separator}{name}")
    }
}

/// Converts a schema or field name to an exported Go identifier.
///
/// # Examples
///
/// ```
/// use structgen_core::to_go_name;
///
/// assert_eq!(to_go_name("device_id", ""), "DeviceID");
/// assert_eq!(to_go_name("port.config", "Raw"), "PortConfigRaw");
/// assert_eq!(to_go_name("mac-address", ""), "MACAddress");
/// ```
pub fn to_go_name(name: &str, suffix: &str) -> String {
    let mut result = String::with_capacity(name.len() + suffix.len());
    for segment in name
        .split(|c: char| c == '_' || c == '-' || c == '.' || c.is_whitespace())
        .chain(suffix.split(|c: char| c == '_' || c == '-' || c.is_whitespace()))
        .filter(|segment| !segment.is_empty())
    {
        if INITIALISMS.contains(&segment.to_ascii_lowercase().as_str()) {
            result.push_str(&segment.to_ascii_uppercase());
            continue;
        }
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_skips_empty_parts() {
        assert_eq!(join_path("", "port"), "port");
        assert_eq!(join_path("port", "config"), "port.config");
        assert_eq!(join_name("device", "id"), "device_id");
        assert_eq!(join_name("device", ""), "device");
    }

    #[test]
    fn test_to_go_name_capitalizes_segments() {
        assert_eq!(to_go_name("network_interface", ""), "NetworkInterface");
        assert_eq!(to_go_name("name", ""), "Name");
        assert_eq!(to_go_name("vlanTag", ""), "VlanTag");
    }

    #[test]
    fn test_to_go_name_uppercases_initialisms() {
        assert_eq!(to_go_name("ip_url", ""), "IPURL");
        assert_eq!(to_go_name("uuid", ""), "UUID");
    }

    #[test]
    fn test_to_go_name_appends_suffix() {
        assert_eq!(to_go_name("port", "raw_data"), "PortRawData");
        assert_eq!(to_go_name("", "x"), "X");
    }
}
