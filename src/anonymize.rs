//! School identifier anonymization
//!
//! Reports never carry the raw school identifier. It is replaced with a
//! short rolling hash (`h = h * 31 + code_unit`, wrapped to a signed 32-bit
//! integer over the UTF-16 code units) rendered in base 36. The hash is
//! deterministic and deliberately weak: collisions are acceptable because
//! it only de-identifies, it does not protect integrity.

/// One-way, non-cryptographic hash of a school identifier
pub fn hash_school_id(raw_id: &str) -> String {
    let hash = raw_id
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as i32));
    to_base36(hash)
}

fn to_base36(value: i32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let mut n = value.unsigned_abs();
    if n == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    if value < 0 {
        out.push(b'-');
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash_school_id("school-42"), hash_school_id("school-42"));
        assert_ne!(hash_school_id("school-42"), hash_school_id("school-43"));
    }

    #[test]
    fn test_known_values() {
        assert_eq!(hash_school_id(""), "0");
        // 'a' = 97 = 2*36 + 25
        assert_eq!(hash_school_id("a"), "2p");
        // "ab" = 97*31 + 98 = 3105 = 2*1296 + 14*36 + 9
        assert_eq!(hash_school_id("ab"), "2e9");
    }

    #[test]
    fn test_wraps_to_signed_32_bit() {
        let long = "z".repeat(64);
        let hashed = hash_school_id(&long);
        let parsed = i64::from_str_radix(&hashed, 36).unwrap();
        assert!(parsed >= i32::MIN as i64 && parsed <= i32::MAX as i64);
    }

    #[test]
    fn test_output_does_not_contain_input() {
        let raw = "springfield-elementary";
        assert!(!hash_school_id(raw).contains(raw));
    }

    #[test]
    fn test_min_value_renders() {
        assert_eq!(to_base36(i32::MIN), "-zik0zk");
    }
}
