// [crates/meshtag-cracker/src/api.rs]
//
// =================================================================
// APARATO: PUBLIC ENGINE FACADE (V1.0)
// CLASIFICACION: EXTERNAL INTERFACE (ESTRATO L3)
// RESPONSABILIDAD: SUPERFICIE DE API ESTABLE PARA QUIEN INVOCA EL MOTOR
//
// Agrupa el estado mutable (diccionario cargado, senal de cancelacion) que
// las funciones libres de los modulos internos dejan a cargo de quien las
// invoca, detras de un manejador con la forma que el contrato externo
// describe: cargar diccionario, decodificar un paquete, crackear,
// abortar, consultar disponibilidad de GPU, liberar recursos.
// =================================================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use meshtag_models::{BackendUsed, CrackOptions, CrackResult, DictionaryIndex, Packet, ProgressReport};

use crate::errors::CrackerError;
use crate::executor::accelerator::GpuExecutor;
use crate::{dictionary, orchestrator};

/// Manejador con estado del motor de crackeo: mantiene el diccionario
/// cargado y la senal de cancelacion entre llamadas.
pub struct CrackEngine {
    dictionary: DictionaryIndex,
    cancel: Arc<AtomicBool>,
}

impl CrackEngine {
    /// Crea un motor sin ningun diccionario cargado todavia.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dictionary: DictionaryIndex::empty(),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Descarga una lista de palabras desde `url` y la adopta como el
    /// diccionario activo.
    ///
    /// # Errors
    ///
    /// Retorna [`CrackerError::WordlistLoadFailed`] si la descarga falla.
    pub fn load_wordlist(&mut self, url: &str) -> Result<(), CrackerError> {
        self.dictionary = dictionary::load_wordlist(url)?;
        Ok(())
    }

    /// Adopta un diccionario ya construido como el diccionario activo,
    /// sin pasar por una descarga de red.
    pub fn set_wordlist(&mut self, index: DictionaryIndex) {
        self.dictionary = index;
    }

    /// Decodifica una cadena hexadecimal de entrada (insensible a
    /// mayusculas, prefijo `0x`/`0X` opcional, espacios en blanco
    /// tolerados) en un [`Packet`] estructurado.
    ///
    /// Retorna `None` si la entrada no es hexadecimal valida o si los
    /// bytes decodificados son mas cortos que el encabezado minimo del
    /// protocolo, en lugar de propagar el error: quien invoca el motor
    /// distingue "no es un paquete" comprobando este `None`, no
    /// inspeccionando una variante de error.
    #[must_use]
    pub fn decode_packet(&self, hex_str: &str) -> Option<Packet> {
        Self::try_decode_packet(hex_str).ok()
    }

    fn try_decode_packet(hex_str: &str) -> Result<Packet, CrackerError> {
        let raw = meshtag_crypto::decode_hex_packet(hex_str)?;
        Ok(Packet::parse(&raw)?)
    }

    /// Ejecuta una busqueda completa sobre el paquete codificado en
    /// `hex_str`, reportando avance a traves de `on_progress`.
    ///
    /// `now_unix_seconds` ancla la ventana de plausibilidad del timestamp.
    /// Si `hex_str` no decodifica a un paquete valido, retorna de inmediato
    /// un [`CrackResult::failed`] sin haber verificado ningun candidato.
    pub fn crack(
        &self,
        hex_str: &str,
        options: &CrackOptions,
        now_unix_seconds: i64,
        on_progress: impl FnMut(ProgressReport),
    ) -> CrackResult {
        self.cancel.store(false, Ordering::Relaxed);

        let packet = match Self::try_decode_packet(hex_str) {
            Ok(packet) => packet,
            Err(error) => {
                return CrackResult::failed(format!("Invalid packet: {error}"), 0, BackendUsed::Cpu);
            }
        };

        orchestrator::crack(
            &packet,
            options,
            &self.dictionary,
            now_unix_seconds,
            Arc::clone(&self.cancel),
            on_progress,
        )
    }

    /// Senala una cancelacion cooperativa de la busqueda en curso.
    ///
    /// La busqueda observa esta senal en el limite de cada lote (fuerza
    /// bruta) o de cada entrada (diccionario), nunca a mitad de una
    /// verificacion individual.
    pub fn abort(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// `true` si un backend acelerado por GPU esta disponible en este host.
    #[must_use]
    pub fn is_gpu_available() -> bool {
        GpuExecutor::is_available()
    }

    /// Libera el diccionario cargado y restablece la senal de cancelacion.
    ///
    /// No hay otro recurso que liberar explicitamente: el backend
    /// acelerado, si alguno quedo en uso dentro de una llamada a
    /// [`Self::crack`], ya se libero al retornar esa llamada.
    pub fn destroy(&mut self) {
        self.dictionary = DictionaryIndex::empty();
        self.cancel.store(false, Ordering::Relaxed);
    }
}

impl Default for CrackEngine {
    fn default() -> Self {
        Self::new()
    }
}
