// [crates/meshtag-cracker/src/lib.rs]

#![deny(missing_docs)]

//! # APARATO: CRACKER STRATUM ROOT
//! CLASIFICACION: DOMAIN STRATEGY (ESTRATO L2)
//! RESPONSABILIDAD: ORQUESTACION DEL MOTOR DE CRACKEO DE PAQUETES GROUP-TEXT
//!
//! Compone el enumerador de candidatos, el indice de diccionario, los dos
//! backends de ejecucion por lotes (portable y acelerado por GPU) y la
//! cadena de filtros de plausibilidad en un unico orquestador de busqueda
//! de tres fases: sala publica conocida, barrido de diccionario, fuerza
//! bruta sobre el espacio de nombres de sala.

/// Fachada de API publica: motor con estado (diccionario, cancelacion).
pub mod api;
/// Construccion y carga de indices de diccionario (archivo local o URL).
pub mod dictionary;
/// Indexacion biyectiva de radix mixto del espacio de nombres de sala.
pub mod enumerator;
/// Catalogo de errores del motor de busqueda.
pub mod errors;
/// Backends de ejecucion por lotes (portable y acelerado) y su contrato comun.
pub mod executor;
/// Cadena de filtros de plausibilidad aplicada tras un tag valido.
pub mod filters;
/// Orquestador de busqueda de tres fases con reanudacion y cancelacion.
pub mod orchestrator;

pub use crate::api::CrackEngine;
pub use crate::dictionary::{build_index, load_wordlist, load_wordlist_from_path};
pub use crate::errors::CrackerError;
pub use crate::executor::{accelerator::GpuExecutor, portable::PortableExecutor, BatchExecutor};
pub use crate::filters::FilterChain;
pub use crate::orchestrator::crack;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certify_stratum_visibility() {
        let _error_id = std::any::TypeId::of::<CrackerError>();
        let _filter_id = std::any::TypeId::of::<FilterChain>();
    }
}
