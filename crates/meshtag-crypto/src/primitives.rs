// [crates/meshtag-crypto/src/primitives.rs]
//
// =================================================================
// APARATO: CHANNEL KEY PRIMITIVES (V1.0)
// CLASIFICACION: CORE CRYPTO (ESTRATO L1)
// RESPONSABILIDAD: DERIVACION DE LLAVE, HASH DE CANAL, TAG Y DESCIFRADO
//
// Cada funcion es pura y de bajo nivel, compuesta a partir de SHA-256
// y AES-128-CTR. El contrato completo esta descrito a nivel de crate;
// este modulo solo implementa los cinco pasos que lo satisfacen.
// =================================================================

use aes::Aes128;
use ctr::cipher::{KeyIvInit, StreamCipher};
use sha2::{Digest, Sha256};

use crate::errors::CryptoError;

/// Llave simetrica de 16 bytes derivada de un nombre de sala.
pub type Key = [u8; 16];

/// Hash de un byte que identifica el canal derivado de una llave.
pub type ChannelHash = u8;

/// Tag de autenticacion truncado de 2 bytes.
pub type Tag = [u8; 2];

type Aes128Ctr = ctr::Ctr128BE<Aes128>;

/// Trama descifrada: un timestamp Unix de 32 bits mas el cuerpo del mensaje.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptedFrame {
    /// Timestamp Unix (segundos) embebido en los primeros 4 bytes del texto plano.
    pub timestamp: u32,
    /// Bytes restantes del texto plano, el cuerpo del mensaje.
    pub body: Vec<u8>,
}

/// Deriva una llave AES-128 de 16 bytes a partir de un nombre de sala.
///
/// `derive_key(room_name) = SHA-256("#" + room_name)[0..16]`.
#[inline]
#[must_use]
pub fn derive_key(room_name: &str) -> Key {
    let mut hasher = Sha256::new();
    hasher.update(b"#");
    hasher.update(room_name.as_bytes());
    let digest = hasher.finalize();
    let mut key = [0u8; 16];
    key.copy_from_slice(&digest[0..16]);
    key
}

/// Calcula el byte de hash de canal asociado a una llave.
///
/// `channel_hash(key) = SHA-256(key)[31]` (el byte menos significativo).
#[inline]
#[must_use]
pub fn channel_hash(key: &Key) -> ChannelHash {
    let mut hasher = Sha256::new();
    hasher.update(key);
    let digest = hasher.finalize();
    digest[31]
}

/// Calcula el tag de autenticacion truncado de un texto cifrado bajo una llave.
///
/// `compute_tag(key, ciphertext) = SHA-256(key || ciphertext)[0..2]`.
///
/// Este no es un MAC de grado criptografico: su unico proposito es un filtro
/// barato de 2 bytes antes de invertir el costo de un descifrado completo,
/// con un presupuesto de colision de aproximadamente 2⁻¹⁶ candidatos erroneos.
#[inline]
#[must_use]
pub fn compute_tag(key: &Key, ciphertext: &[u8]) -> Tag {
    let mut hasher = Sha256::new();
    hasher.update(key);
    hasher.update(ciphertext);
    let digest = hasher.finalize();
    [digest[0], digest[1]]
}

/// Verifica que un tag observado coincida con el tag calculado para una llave
/// y un texto cifrado dados.
#[inline]
#[must_use]
pub fn verify_tag(key: &Key, ciphertext: &[u8], observed: &Tag) -> bool {
    &compute_tag(key, ciphertext) == observed
}

/// Descifra un texto cifrado bajo AES-128 en modo CTR con un bloque contador
/// inicial en cero.
///
/// La llave es de un solo uso por intento de crackeo, asi que la reutilizacion
/// de nonce entre llaves distintas no es una preocupacion. Los primeros 4 bytes
/// del texto plano resultante son un timestamp Unix en big-endian; el resto es
/// el cuerpo del mensaje.
///
/// # Errors
///
/// Retorna [`CryptoError::CiphertextTooShort`] si `ciphertext` mide menos de 5
/// bytes (no alcanza para un timestamp de 4 bytes mas un byte de mensaje).
pub fn decrypt(key: &Key, ciphertext: &[u8]) -> Result<DecryptedFrame, CryptoError> {
    if ciphertext.len() < 5 {
        return Err(CryptoError::CiphertextTooShort(ciphertext.len()));
    }

    let mut plaintext = ciphertext.to_vec();
    let iv = [0u8; 16];
    let mut cipher = Aes128Ctr::new(key.into(), &iv.into());
    cipher.apply_keystream(&mut plaintext);

    let timestamp = u32::from_be_bytes([plaintext[0], plaintext[1], plaintext[2], plaintext[3]]);
    let body = plaintext[4..].to_vec();

    Ok(DecryptedFrame { timestamp, body })
}

/// Cifra un cuerpo de mensaje bajo una llave, anteponiendo el timestamp dado.
///
/// Inversa de [`decrypt`]; usada por los generadores de pruebas y por la
/// trama de extremo a extremo para construir paquetes autoconsistentes sin
/// depender de un vector externo.
#[must_use]
pub fn encrypt(key: &Key, timestamp: u32, body: &[u8]) -> Vec<u8> {
    let mut plaintext = Vec::with_capacity(4 + body.len());
    plaintext.extend_from_slice(&timestamp.to_be_bytes());
    plaintext.extend_from_slice(body);

    let iv = [0u8; 16];
    let mut cipher = Aes128Ctr::new(key.into(), &iv.into());
    cipher.apply_keystream(&mut plaintext);
    plaintext
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_key_is_deterministic() {
        let a = derive_key("general");
        let b = derive_key("general");
        assert_eq!(a, b);
    }

    #[test]
    fn derive_key_distinguishes_room_names() {
        assert_ne!(derive_key("general"), derive_key("genera1"));
    }

    #[test]
    fn channel_hash_is_deterministic_for_a_key() {
        let key = derive_key("test-room");
        assert_eq!(channel_hash(&key), channel_hash(&key));
    }

    #[test]
    fn encrypt_then_decrypt_round_trips() {
        let key = derive_key("roundtrip");
        let ciphertext = encrypt(&key, 1_700_000_000, b"hello mesh");
        let frame = decrypt(&key, &ciphertext).expect("decrypt should succeed");
        assert_eq!(frame.timestamp, 1_700_000_000);
        assert_eq!(frame.body, b"hello mesh");
    }

    #[test]
    fn tag_verifies_only_for_matching_key() {
        let key_a = derive_key("alpha");
        let key_b = derive_key("beta");
        let ciphertext = encrypt(&key_a, 0, b"x");
        let tag = compute_tag(&key_a, &ciphertext);
        assert!(verify_tag(&key_a, &ciphertext, &tag));
        assert!(!verify_tag(&key_b, &ciphertext, &tag));
    }

    #[test]
    fn decrypt_rejects_short_ciphertext() {
        let key = derive_key("short");
        let err = decrypt(&key, &[0u8; 3]).unwrap_err();
        assert!(matches!(err, CryptoError::CiphertextTooShort(3)));
    }

    proptest::proptest! {
        #[test]
        fn round_trip_preserves_arbitrary_bodies(body in proptest::collection::vec(proptest::prelude::any::<u8>(), 0..64), ts: u32) {
            let key = derive_key("proptest-room");
            let ciphertext = encrypt(&key, ts, &body);
            let frame = decrypt(&key, &ciphertext).unwrap();
            proptest::prop_assert_eq!(frame.timestamp, ts);
            proptest::prop_assert_eq!(frame.body, body);
        }
    }
}
