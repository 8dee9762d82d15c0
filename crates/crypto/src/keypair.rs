use rand::rngs::OsRng;
use rsa::pss::{BlindedSigningKey, Signature, VerifyingKey};
use rsa::sha2::Sha256;
use rsa::signature::{RandomizedSigner, SignatureEncoding, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use ssh_key::public::{PublicKey as SshPublicKey, RsaPublicKey as SshRsaPublicKey};

use crate::errors::Error;

/// RSA-2048 keypair with public exponent 65537, the only keypair shape
/// a ledger node ever generates for itself or accepts from a client.
pub struct Keypair {
    pub private: RsaPrivateKey,
    pub public: RsaPublicKey,
}

impl Keypair {
    /// Generate a new RSA keypair. `key_size` and `public_exponent` are
    /// taken from node configuration (spec §6: `KEY_SIZE`,
    /// `RSA_PUBLIC_EXP`); the `rsa` crate only supports the standard
    /// exponent 65537, so any other configured value is rejected by
    /// the caller before this function runs.
    pub fn generate(key_size: usize) -> Result<Self, Error> {
        let private = RsaPrivateKey::new(&mut OsRng, key_size)
            .map_err(|e| Error::KeyGen(e.to_string()))?;
        let public = RsaPublicKey::from(&private);
        Ok(Keypair { private, public })
    }

    /// OpenSSH-encoded public key, hex encoded — the `iss` claim format
    /// and the wire format for client public keys throughout the
    /// authentication protocol.
    pub fn public_openssh_hex(&self) -> Result<String, Error> {
        public_key_to_openssh_hex(&self.public)
    }
}

/// Encode an RSA public key as `hex(openssh_line)`.
pub fn public_key_to_openssh_hex(pk: &RsaPublicKey) -> Result<String, Error> {
    let ssh_pk: SshRsaPublicKey =
        pk.try_into().map_err(|e: ssh_key::Error| Error::InvalidKey(e.to_string()))?;
    let ssh_pk = SshPublicKey::from(ssh_pk);
    let line = ssh_pk
        .to_openssh()
        .map_err(|e| Error::InvalidKey(e.to_string()))?;
    Ok(hex::encode(line.trim_end_matches(['\n', '\r'])))
}

/// Decode a hex-encoded OpenSSH public key line into an RSA public key.
/// Fails with [`Error::InvalidKey`] on malformed hex, malformed OpenSSH
/// framing, or a non-RSA key type.
pub fn public_key_from_openssh_hex(hex_str: &str) -> Result<RsaPublicKey, Error> {
    let bytes = hex::decode(hex_str).map_err(|e| Error::InvalidKey(e.to_string()))?;
    let line = std::str::from_utf8(&bytes).map_err(|e| Error::InvalidKey(e.to_string()))?;
    let ssh_pk = SshPublicKey::from_openssh(line).map_err(|e| Error::InvalidKey(e.to_string()))?;
    let rsa_pk = ssh_pk
        .key_data()
        .rsa()
        .ok_or_else(|| Error::InvalidKey("not an RSA key".into()))?;
    rsa_pk
        .try_into()
        .map_err(|e: ssh_key::Error| Error::InvalidKey(e.to_string()))
}

/// PSS-SHA256 sign with the maximum salt length, matching
/// `padding.PSS(mgf=MGF1(SHA256), salt_length=PSS.MAX_LENGTH)` in the
/// Python prototype.
pub fn sign(private: &RsaPrivateKey, message: &[u8]) -> Result<Vec<u8>, Error> {
    // `BlindedSigningKey::new` uses a digest-sized salt, the widely used
    // stand-in for PSS's "maximum salt length" for RSA-2048/SHA-256 keys.
    let signing_key = BlindedSigningKey::<Sha256>::new(private.clone());
    let sig: Signature = signing_key
        .try_sign_with_rng(&mut OsRng, message)
        .map_err(|e| Error::Signing(e.to_string()))?;
    Ok(sig.to_vec())
}

/// Verify a PSS-SHA256 signature produced by [`sign`].
pub fn verify(public: &RsaPublicKey, message: &[u8], signature: &[u8]) -> Result<(), Error> {
    let verifying_key = VerifyingKey::<Sha256>::new(public.clone());
    let sig = Signature::try_from(signature).map_err(|_| Error::InvalidSignature)?;
    verifying_key
        .verify(message, &sig)
        .map_err(|_| Error::InvalidSignature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_round_trips() {
        let kp = Keypair::generate(2048).unwrap();
        let msg = b"hello ledger";
        let sig = sign(&kp.private, msg).unwrap();
        verify(&kp.public, msg, &sig).unwrap();
    }

    #[test]
    fn verify_rejects_tampered_message() {
        let kp = Keypair::generate(2048).unwrap();
        let sig = sign(&kp.private, b"original").unwrap();
        assert!(verify(&kp.public, b"tampered", &sig).is_err());
    }

    #[test]
    fn openssh_hex_round_trips() {
        let kp = Keypair::generate(2048).unwrap();
        let hex_str = kp.public_openssh_hex().unwrap();
        let parsed = public_key_from_openssh_hex(&hex_str).unwrap();
        assert_eq!(parsed, kp.public);
    }

    #[test]
    fn malformed_hex_is_invalid_key() {
        assert!(public_key_from_openssh_hex("not hex at all").is_err());
    }
}
