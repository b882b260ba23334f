// [crates/meshtag-crypto/src/lib.rs]

#![deny(missing_docs)]

//! # APARATO: CRYPTO STRATUM ROOT
//! CLASIFICACION: CORE CRYPTOGRAPHY (ESTRATO L1)
//! RESPONSABILIDAD: DERIVACION DE LLAVE, HASH DE CANAL, TAG Y DESCIFRADO
//!
//! Primitivas deterministas y sin estado sobre las que se apoyan tanto el
//! ejecutor por lotes (portable y acelerado) como la cadena de filtros: dado
//! un nombre de sala candidato se deriva su llave, su hash de canal de un
//! byte, y su tag de verificacion de dos bytes, sin necesidad de invertir el
//! costo de un descifrado completo hasta que un candidato ya superó esos dos
//! filtros baratos.

/// Catalogo de errores de la capa de primitivas.
pub mod errors;

/// Normalizacion y decodificacion de la entrada hexadecimal de un paquete.
pub mod hexcodec;

/// Derivacion de llave, hash de canal, tag y descifrado/cifrado AES-128-CTR.
pub mod primitives;

pub use crate::errors::CryptoError;
pub use crate::hexcodec::decode_hex_packet;
pub use crate::primitives::{
    channel_hash, compute_tag, decrypt, derive_key, encrypt, verify_tag, ChannelHash,
    DecryptedFrame, Key, Tag,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certify_stratum_visibility() {
        let _key_id = std::any::TypeId::of::<Key>();
        let _error_id = std::any::TypeId::of::<CryptoError>();
    }
}
