// [crates/meshtag-models/src/packet.rs]
//
// =================================================================
// APARATO: GROUP-TEXT PACKET (V1.0)
// CLASIFICACION: DOMAIN MODELS (ESTRATO L2)
// RESPONSABILIDAD: LAYOUT DE BYTES DEL PAQUETE CIFRADO
// =================================================================

use crate::errors::ModelError;

/// Un paquete group-text cifrado: un byte de hash de canal, un texto
/// cifrado de longitud variable y un tag de verificacion de 2 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Byte que identifica el canal (ver `meshtag_crypto::channel_hash`).
    pub channel_hash: u8,
    /// Cuerpo cifrado (timestamp + mensaje bajo AES-128-CTR).
    pub ciphertext: Vec<u8>,
    /// Tag de verificacion truncado de 2 bytes.
    pub tag: [u8; 2],
}

impl Packet {
    /// Separa un blob de bytes crudo en sus tres campos constituyentes.
    ///
    /// Layout: `[channel_hash: 1][ciphertext: N][tag: 2]`.
    ///
    /// # Errors
    ///
    /// Retorna [`ModelError::PacketTooShort`] si `raw` mide menos de 3 bytes.
    pub fn parse(raw: &[u8]) -> Result<Self, ModelError> {
        if raw.len() < 3 {
            return Err(ModelError::PacketTooShort(raw.len()));
        }

        let channel_hash = raw[0];
        let tag_start = raw.len() - 2;
        let ciphertext = raw[1..tag_start].to_vec();
        let tag = [raw[tag_start], raw[tag_start + 1]];

        Ok(Self {
            channel_hash,
            ciphertext,
            tag,
        })
    }

    /// Reconstruye la representacion en bytes crudos del paquete.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.ciphertext.len() + 2);
        out.push(self.channel_hash);
        out.extend_from_slice(&self.ciphertext);
        out.extend_from_slice(&self.tag);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_then_to_bytes_round_trips() {
        let raw = vec![0x42, 0xAA, 0xBB, 0xCC, 0x01, 0x02];
        let packet = Packet::parse(&raw).unwrap();
        assert_eq!(packet.channel_hash, 0x42);
        assert_eq!(packet.ciphertext, vec![0xAA, 0xBB, 0xCC]);
        assert_eq!(packet.tag, [0x01, 0x02]);
        assert_eq!(packet.to_bytes(), raw);
    }

    #[test]
    fn parse_rejects_short_packets() {
        assert!(matches!(
            Packet::parse(&[0x01, 0x02]),
            Err(ModelError::PacketTooShort(2))
        ));
    }

    #[test]
    fn parse_accepts_empty_ciphertext() {
        let packet = Packet::parse(&[0x01, 0x02, 0x03]).unwrap();
        assert!(packet.ciphertext.is_empty());
    }
}
