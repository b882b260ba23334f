// [crates/meshtag-cracker/src/executor/portable.rs]
//
// =================================================================
// APARATO: PORTABLE BATCH EXECUTOR (V1.0)
// CLASIFICACION: DOMAIN STRATEGY (ESTRATO L2)
// RESPONSABILIDAD: FALLBACK DE CPU SIEMPRE DISPONIBLE
//
// Recorre un lote de candidatos sobre un pool de rayon: el orden dentro
// del lote no tiene un requisito de visibilidad externa (solo el orden
// entre lotes y entre fases lo tiene), asi que el abanico interno es
// seguro.
// =================================================================

use meshtag_crypto::{channel_hash, compute_tag, derive_key};
use meshtag_models::{BackendUsed, Packet};
use rayon::prelude::*;

use super::{BatchExecutor, PORTABLE_BATCH_SIZE};
use crate::errors::CrackerError;

/// Backend de fuerza bruta portable, respaldado por CPU.
pub struct PortableExecutor {
    batch_size: usize,
}

impl PortableExecutor {
    /// Construye un ejecutor portable con el tamano de lote por defecto.
    #[must_use]
    pub fn new() -> Self {
        Self {
            batch_size: PORTABLE_BATCH_SIZE,
        }
    }
}

impl Default for PortableExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchExecutor for PortableExecutor {
    fn execute_batch(
        &mut self,
        candidates: &[String],
        packet: &Packet,
    ) -> Result<Vec<String>, CrackerError> {
        let matches: Vec<String> = candidates
            .par_iter()
            .filter(|candidate| {
                let key = derive_key(candidate);
                channel_hash(&key) == packet.channel_hash
                    && compute_tag(&key, &packet.ciphertext) == packet.tag
            })
            .cloned()
            .collect();

        Ok(matches)
    }

    fn backend(&self) -> BackendUsed {
        BackendUsed::Cpu
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshtag_crypto::encrypt;

    #[test]
    fn finds_the_candidate_whose_key_matches_the_packet() {
        let key = derive_key("winner");
        let ciphertext = encrypt(&key, 0, b"x");
        let packet = Packet {
            channel_hash: channel_hash(&key),
            tag: compute_tag(&key, &ciphertext),
            ciphertext,
        };

        let candidates: Vec<String> = vec!["loser1", "loser2", "winner", "loser3"]
            .into_iter()
            .map(String::from)
            .collect();

        let mut executor = PortableExecutor::new();
        let matches = executor.execute_batch(&candidates, &packet).unwrap();
        assert_eq!(matches, vec!["winner".to_string()]);
    }

    #[test]
    fn empty_batch_yields_no_matches() {
        let packet = Packet {
            channel_hash: 0,
            ciphertext: vec![0u8; 5],
            tag: [0, 0],
        };
        let mut executor = PortableExecutor::new();
        assert!(executor.execute_batch(&[], &packet).unwrap().is_empty());
    }
}
