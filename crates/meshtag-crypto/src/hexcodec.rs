// [crates/meshtag-crypto/src/hexcodec.rs]
//
// =================================================================
// APARATO: HEX PACKET CODEC (V1.0)
// CLASIFICACION: CORE CRYPTO (ESTRATO L1)
// RESPONSABILIDAD: NORMALIZACION Y DECODIFICACION DE LA ENTRADA HEXADECIMAL
//
// La superficie externa del motor acepta paquetes como una cadena
// hexadecimal, no como bytes ya decodificados: insensible a mayusculas,
// con un prefijo `0x`/`0X` opcional, y espacios en blanco intercalados
// tolerados (copiar-pegar desde un log suele arrastrarlos).
// =================================================================

use tracing::trace;

use crate::errors::CryptoError;

/// Decodifica una cadena hexadecimal de entrada a sus bytes crudos.
///
/// Tolera espacios en blanco (se eliminan antes de decodificar), es
/// insensible a mayusculas/minusculas, y acepta un prefijo `0x`/`0X`
/// opcional.
///
/// # Errors
///
/// Retorna [`CryptoError::InvalidHex`] si, tras la normalizacion, la
/// cadena resultante no es hexadecimal valida (longitud impar o digitos
/// fuera de `0-9a-fA-F`).
pub fn decode_hex_packet(input: &str) -> Result<Vec<u8>, CryptoError> {
    let without_whitespace: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = without_whitespace
        .strip_prefix("0x")
        .or_else(|| without_whitespace.strip_prefix("0X"))
        .unwrap_or(&without_whitespace);

    let bytes = hex::decode(digits).map_err(|error| CryptoError::InvalidHex(error.to_string()))?;
    trace!(byte_count = bytes.len(), "🔡 [HEXCODEC]: decoded hex packet input.");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_lowercase_hex() {
        assert_eq!(decode_hex_packet("deadbeef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn decodes_uppercase_hex_with_0x_prefix() {
        assert_eq!(decode_hex_packet("0xDEADBEEF").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn strips_interleaved_whitespace() {
        assert_eq!(decode_hex_packet(" de ad\tbe ef\n").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn rejects_odd_length_input() {
        assert!(decode_hex_packet("abc").is_err());
    }

    #[test]
    fn rejects_non_hex_digits() {
        assert!(decode_hex_packet("zzzz").is_err());
    }
}
