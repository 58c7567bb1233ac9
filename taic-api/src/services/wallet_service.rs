use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use rand::Rng;
use sha3::{Digest, Keccak256};

use taic_shared::errors::{AppError, ErrorCode};

/// Exact message template the client must sign. The nonce binds the
/// signature to one challenge window.
pub fn login_message(nonce: &str) -> String {
    format!("Logging in to TAIC: {nonce}")
}

/// Single-use challenge nonce, 32 random bytes hex-encoded.
pub fn generate_nonce() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    hex::encode(bytes)
}

/// Lowercase an EVM address after checking its shape (`0x` + 40 hex chars).
pub fn normalize_address(address: &str) -> Result<String, AppError> {
    let address = address.trim();
    let hex_part = address
        .strip_prefix("0x")
        .ok_or_else(|| AppError::new(ErrorCode::InvalidWalletAddress, "wallet address must start with 0x"))?;
    if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AppError::new(
            ErrorCode::InvalidWalletAddress,
            "wallet address must be 0x followed by 40 hex characters",
        ));
    }
    Ok(address.to_lowercase())
}

/// Recover the signer address from a `personal_sign` signature over
/// `message`. The signature is the usual 65-byte r‖s‖v blob, hex-encoded,
/// with v accepted as 0/1 or 27/28.
pub fn recover_address(message: &str, signature: &str) -> Result<String, AppError> {
    let sig_hex = signature.strip_prefix("0x").unwrap_or(signature);
    let bytes = hex::decode(sig_hex)
        .map_err(|_| AppError::new(ErrorCode::SignatureMalformed, "signature is not valid hex"))?;
    if bytes.len() != 65 {
        return Err(AppError::new(ErrorCode::SignatureMalformed, "signature must be 65 bytes"));
    }

    let v = bytes[64];
    let recid_byte = if v >= 27 { v - 27 } else { v };
    let recovery_id = RecoveryId::try_from(recid_byte)
        .map_err(|_| AppError::new(ErrorCode::SignatureMalformed, "invalid recovery id"))?;
    let signature = Signature::from_slice(&bytes[..64])
        .map_err(|_| AppError::new(ErrorCode::SignatureMalformed, "invalid signature encoding"))?;

    let digest = personal_sign_digest(message);
    let verifying_key = VerifyingKey::recover_from_prehash(&digest, &signature, recovery_id)
        .map_err(|_| AppError::new(ErrorCode::VerificationFailed, "signature verification failed"))?;

    Ok(address_from_key(&verifying_key))
}

/// EIP-191 digest: Keccak-256 over the prefixed message.
fn personal_sign_digest(message: &str) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(format!("\x19Ethereum Signed Message:\n{}", message.len()));
    hasher.update(message.as_bytes());
    hasher.finalize().into()
}

/// Address is the last 20 bytes of the Keccak-256 of the uncompressed
/// public key (without the 0x04 prefix byte).
fn address_from_key(key: &VerifyingKey) -> String {
    let point = key.to_encoded_point(false);
    let digest = Keccak256::digest(&point.as_bytes()[1..]);
    format!("0x{}", hex::encode(&digest[12..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::SigningKey;

    fn signer_address(key: &SigningKey) -> String {
        address_from_key(key.verifying_key())
    }

    fn sign_message(key: &SigningKey, message: &str, v_offset: u8) -> String {
        let digest = personal_sign_digest(message);
        let (signature, recovery_id) = key.sign_prehash_recoverable(&digest).unwrap();
        let mut bytes = signature.to_bytes().to_vec();
        bytes.push(recovery_id.to_byte() + v_offset);
        format!("0x{}", hex::encode(bytes))
    }

    #[test]
    fn message_template_is_fixed() {
        assert_eq!(login_message("N1"), "Logging in to TAIC: N1");
    }

    #[test]
    fn nonce_shape() {
        let nonce = generate_nonce();
        assert_eq!(nonce.len(), 64);
        assert!(nonce.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(nonce, generate_nonce());
    }

    #[test]
    fn normalize_accepts_and_lowercases() {
        let addr = normalize_address("0x8Ba1f109551bD432803012645Ac136ddd64DBA72").unwrap();
        assert_eq!(addr, "0x8ba1f109551bd432803012645ac136ddd64dba72");
    }

    #[test]
    fn normalize_rejects_bad_shapes() {
        assert!(normalize_address("8ba1f109551bd432803012645ac136ddd64dba72").is_err());
        assert!(normalize_address("0x8ba1").is_err());
        assert!(normalize_address("0xzz a1f109551bd432803012645ac136ddd64dba7").is_err());
    }

    #[test]
    fn recovers_signer_address() {
        let key = SigningKey::random(&mut rand::rngs::OsRng);
        let message = login_message(&generate_nonce());

        let signature = sign_message(&key, &message, 27);
        let recovered = recover_address(&message, &signature).unwrap();
        assert_eq!(recovered, signer_address(&key));
    }

    #[test]
    fn accepts_raw_recovery_id() {
        let key = SigningKey::random(&mut rand::rngs::OsRng);
        let message = login_message("abc123");

        let signature = sign_message(&key, &message, 0);
        let recovered = recover_address(&message, &signature).unwrap();
        assert_eq!(recovered, signer_address(&key));
    }

    #[test]
    fn tampered_message_does_not_recover_signer() {
        let key = SigningKey::random(&mut rand::rngs::OsRng);
        let signature = sign_message(&key, &login_message("nonce-one"), 27);

        match recover_address(&login_message("nonce-two"), &signature) {
            Ok(recovered) => assert_ne!(recovered, signer_address(&key)),
            Err(_) => {}
        }
    }

    #[test]
    fn malformed_signatures_rejected() {
        let message = login_message("n");
        assert!(recover_address(&message, "0xnot-hex").is_err());
        assert!(recover_address(&message, "0xdeadbeef").is_err());

        // 65 bytes but an impossible recovery id
        let mut bytes = vec![1u8; 64];
        bytes.push(29);
        assert!(recover_address(&message, &hex::encode(bytes)).is_err());
    }
}
