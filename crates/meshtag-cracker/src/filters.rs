// [crates/meshtag-cracker/src/filters.rs]
//
// =================================================================
// APARATO: FALSE-POSITIVE FILTER CHAIN (V1.0)
// CLASIFICACION: DOMAIN STRATEGY (ESTRATO L2)
// RESPONSABILIDAD: SUPRESION DE FALSOS POSITIVOS TRAS UN TAG VALIDO
//
// Un candidato que supera el filtro de hash de canal y el tag de 2 bytes
// todavia puede ser una colision accidental (presupuesto ~2⁻¹⁶). Esta
// cadena, en orden fijo, decide si el resultado descifrado es plausible:
// descifrar -> ventana de tiempo -> verosimilitud UTF-8 -> presencia de
// remitente.
// =================================================================

use meshtag_crypto::{decrypt, DecryptedFrame, Key};

/// Cadena de filtros de plausibilidad aplicada a un candidato que ya paso
/// la verificacion de hash de canal y de tag.
#[derive(Debug, Clone, Copy)]
pub struct FilterChain {
    /// Ventana de tolerancia, en segundos, alrededor de `now` dentro de la
    /// cual un timestamp descifrado se considera plausible.
    pub timestamp_window_seconds: i64,
    /// Si el filtro de ventana de timestamp esta activo.
    pub use_timestamp_filter: bool,
    /// Si el filtro de verosimilitud UTF-8 esta activo.
    pub use_utf8_filter: bool,
}

impl FilterChain {
    /// Construye una cadena de filtros con la ventana de tiempo dada y los
    /// interruptores de activacion de cada filtro opcional.
    #[must_use]
    pub fn new(timestamp_window_seconds: i64, use_timestamp_filter: bool, use_utf8_filter: bool) -> Self {
        Self {
            timestamp_window_seconds,
            use_timestamp_filter,
            use_utf8_filter,
        }
    }

    /// Aplica la cadena completa de filtros a un texto cifrado bajo `key`.
    ///
    /// Retorna `Some(frame)` solo si el descifrado tiene exito y la trama
    /// pasa los filtros de plausibilidad activos, en orden. Un filtro
    /// desactivado se salta por completo, nunca rechaza.
    #[must_use]
    pub fn evaluate(&self, key: &Key, ciphertext: &[u8], now_unix_seconds: i64) -> Option<DecryptedFrame> {
        let frame = decrypt(key, ciphertext).ok()?;

        if self.use_timestamp_filter && !self.timestamp_in_window(frame.timestamp, now_unix_seconds) {
            return None;
        }

        if self.use_utf8_filter && !Self::body_is_plausible_utf8(&frame.body) {
            return None;
        }

        if !Self::sender_present(&frame) {
            return None;
        }

        Some(frame)
    }

    fn timestamp_in_window(&self, timestamp: u32, now_unix_seconds: i64) -> bool {
        let delta = (timestamp as i64 - now_unix_seconds).abs();
        delta <= self.timestamp_window_seconds
    }

    /// Un cuerpo descifrado se considera UTF-8 plausible si su conversion
    /// con perdida no introduce el caracter de reemplazo `U+FFFD`, que solo
    /// aparece cuando los bytes no son UTF-8 valido (la senal que un texto
    /// cifrado bajo la llave equivocada produce casi siempre).
    fn body_is_plausible_utf8(body: &[u8]) -> bool {
        !String::from_utf8_lossy(body).contains('\u{FFFD}')
    }

    /// Filtro de presencia de remitente: no-op documentado.
    ///
    /// El modelo de datos de [`DecryptedFrame`] no define un campo de
    /// remitente, asi que no hay nada que este filtro pueda verificar sin
    /// inventar un campo fuera del modelo de datos. Se mantiene como un
    /// paso explicito (en vez de eliminarlo de la cadena) para que una
    /// futura extension del decodificador de tramas tenga un lugar
    /// documentado donde conectar la verificacion real.
    fn sender_present(_frame: &DecryptedFrame) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshtag_crypto::{derive_key, encrypt};

    #[test]
    fn accepts_frame_within_timestamp_window() {
        let key = derive_key("filters-accept");
        let now = 1_700_000_000i64;
        let ciphertext = encrypt(&key, now as u32, b"hello");
        let chain = FilterChain::new(3600, true, true);
        assert!(chain.evaluate(&key, &ciphertext, now).is_some());
    }

    #[test]
    fn rejects_frame_outside_timestamp_window() {
        let key = derive_key("filters-reject-window");
        let now = 1_700_000_000i64;
        let stale_timestamp = (now - 10_000) as u32;
        let ciphertext = encrypt(&key, stale_timestamp, b"hello");
        let chain = FilterChain::new(3600, true, true);
        assert!(chain.evaluate(&key, &ciphertext, now).is_none());
    }

    #[test]
    fn disabling_the_timestamp_filter_accepts_a_stale_frame() {
        let key = derive_key("filters-disabled-window");
        let now = 1_700_000_000i64;
        let stale_timestamp = (now - 10_000) as u32;
        let ciphertext = encrypt(&key, stale_timestamp, b"hello");
        let chain = FilterChain::new(3600, false, true);
        assert!(chain.evaluate(&key, &ciphertext, now).is_some());
    }

    #[test]
    fn disabling_the_utf8_filter_accepts_non_utf8_bodies() {
        let key = derive_key("filters-disabled-utf8");
        let now = 1_700_000_000i64;
        let ciphertext = encrypt(&key, now as u32, &[0xff, 0xfe, 0xfd]);
        let chain = FilterChain::new(3600, true, false);
        assert!(chain.evaluate(&key, &ciphertext, now).is_some());
    }

    #[test]
    fn rejects_ciphertext_decrypted_under_the_wrong_key() {
        let real_key = derive_key("filters-real");
        let wrong_key = derive_key("filters-wrong");
        let now = 1_700_000_000i64;
        let ciphertext = encrypt(&real_key, now as u32, "not ascii: \u{2603}".as_bytes());
        let chain = FilterChain::new(3600, true, true);
        // Decrypting non-matching ciphertext under the wrong key produces
        // near-random bytes, which is overwhelmingly likely to contain an
        // invalid UTF-8 sequence.
        assert!(chain.evaluate(&wrong_key, &ciphertext, now).is_none());
    }
}
