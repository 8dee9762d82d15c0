use rand::RngCore;

/// Generate `num_bytes` of cryptographically random data, hex encoded.
/// Used both for challenge nonces (spec §4.8) and is the Rust analogue
/// of `secrets.token_hex` in the Python prototype.
pub fn random_hex(num_bytes: usize) -> String {
    let mut buf = vec![0u8; num_bytes];
    rand::rngs::OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_expected_length() {
        assert_eq!(random_hex(10).len(), 20);
    }

    #[test]
    fn is_not_constant() {
        assert_ne!(random_hex(16), random_hex(16));
    }
}
