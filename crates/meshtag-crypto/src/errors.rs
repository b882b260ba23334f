// [crates/meshtag-crypto/src/errors.rs]
// =================================================================
// APARATO: CRYPTO ERRORS
// RESPONSABILIDAD: CATALOGO DE FALLOS EN LA CAPA DE PRIMITIVAS
// =================================================================

use thiserror::Error;

/// Errores que puede producir la capa de primitivas criptograficas.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// El texto cifrado es mas corto que el umbral minimo de una trama valida
    /// (el timestamp de 4 bytes mas al menos un byte de mensaje).
    #[error("ciphertext demasiado corto: se recibieron {0} bytes, se requieren al menos 5")]
    CiphertextTooShort(usize),

    /// La llave provista no mide exactamente 16 bytes (AES-128).
    #[error("longitud de llave invalida: se esperaban 16 bytes, se recibieron {0}")]
    InvalidKeyLength(usize),

    /// La cadena de entrada no es hexadecimal valida tras normalizar
    /// espacios en blanco y un prefijo `0x`/`0X` opcional.
    #[error("hexadecimal invalido: {0}")]
    InvalidHex(String),
}
