// [crates/meshtag-cracker/src/dictionary.rs]
//
// =================================================================
// APARATO: DICTIONARY BUILDER & LOADER (V1.0)
// CLASIFICACION: DOMAIN STRATEGY (ESTRATO L2)
// RESPONSABILIDAD: CONSTRUCCION DEL INDICE Y CARGA DE LISTAS DE PALABRAS
// =================================================================

use std::time::Duration;

use meshtag_crypto::{channel_hash, derive_key};
use meshtag_models::{DictionaryIndex, IndexedWord, RoomName};
use tracing::{info, warn};

use crate::errors::CrackerError;

const WORDLIST_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Construye un [`DictionaryIndex`] en un solo barrido lineal sobre las
/// palabras fuente.
///
/// Cada palabra se normaliza (recortada, en minusculas) y se valida contra
/// el alfabeto del protocolo; las palabras que no validan se descartan
/// silenciosamente (son entradas de diccionario que nunca podrian ser un
/// nombre de sala legitimo, no un error de entrada).
#[must_use]
pub fn build_index<I, S>(words: I) -> DictionaryIndex
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut index = DictionaryIndex::empty();
    let mut accepted = 0usize;
    let mut rejected = 0usize;

    for raw_word in words {
        let normalized = raw_word.as_ref().trim().to_lowercase();
        match RoomName::new(normalized.clone()) {
            Ok(_) => {
                let key = derive_key(&normalized);
                let bucket = channel_hash(&key);
                index.insert(IndexedWord {
                    word: normalized,
                    bucket,
                });
                accepted += 1;
            }
            Err(_) => rejected += 1,
        }
    }

    info!(
        "📖 [DICTIONARY]: indexed {} words across {} buckets ({} rejected as invalid glyphs)",
        accepted,
        meshtag_models::BUCKET_COUNT,
        rejected
    );

    index
}

/// Descarga una lista de palabras desde una URL y construye su indice.
///
/// Usa el cliente bloqueante de `reqwest` porque el orquestador de busqueda
/// opera en un modelo sincrono/cooperativo, no `tokio`-asincrono.
///
/// # Errors
///
/// Retorna [`CrackerError::WordlistLoadFailed`] si la solicitud de red
/// falla o si el cuerpo de la respuesta no es texto valido.
pub fn load_wordlist(url: &str) -> Result<DictionaryIndex, CrackerError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(WORDLIST_FETCH_TIMEOUT)
        .build()
        .map_err(|e| CrackerError::WordlistLoadFailed(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| CrackerError::WordlistLoadFailed(e.to_string()))?;

    if !response.status().is_success() {
        warn!("⚠️ [DICTIONARY]: wordlist fetch returned HTTP {}", response.status());
        return Err(CrackerError::WordlistLoadFailed(format!(
            "HTTP {}",
            response.status()
        )));
    }

    let body = response
        .text()
        .map_err(|e| CrackerError::WordlistLoadFailed(e.to_string()))?;

    Ok(build_index(body.lines()))
}

/// Construye un indice de diccionario a partir de un archivo local, una
/// linea por palabra.
///
/// # Errors
///
/// Retorna [`CrackerError::WordlistLoadFailed`] si el archivo no puede
/// leerse.
pub fn load_wordlist_from_path(path: &std::path::Path) -> Result<DictionaryIndex, CrackerError> {
    let body = std::fs::read_to_string(path)
        .map_err(|e| CrackerError::WordlistLoadFailed(e.to_string()))?;
    Ok(build_index(body.lines()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn build_index_accepts_valid_words_and_skips_invalid() {
        let words = vec!["General", " room-one ", "--bad--", "", "ok9"];
        let index = build_index(words);
        // "General" lowercases to "general" (valid), "room-one" valid,
        // "--bad--" invalid (leading dash), "" invalid (empty), "ok9" valid.
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn load_wordlist_from_path_reads_one_word_per_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "alpha").unwrap();
        writeln!(file, "bravo").unwrap();
        writeln!(file, "charlie").unwrap();
        let index = load_wordlist_from_path(file.path()).unwrap();
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn load_wordlist_from_missing_path_fails() {
        let missing = std::path::Path::new("/nonexistent/meshtag-wordlist.txt");
        assert!(load_wordlist_from_path(missing).is_err());
    }
}
