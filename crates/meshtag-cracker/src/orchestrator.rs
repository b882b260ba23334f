// [crates/meshtag-cracker/src/orchestrator.rs]
//
// =================================================================
// APARATO: SEARCH ORCHESTRATOR (V1.0)
// CLASIFICACION: DOMAIN STRATEGY (ESTRATO L2)
// RESPONSABILIDAD: DESPACHO SECUENCIAL DE LAS TRES FASES DE BUSQUEDA
//
// Fase A (sala publica) -> Fase B (diccionario) -> Fase C (fuerza bruta),
// con semantica de reanudacion estricta, cancelacion cooperativa y
// reportes de avance monotonamente crecientes en `checked`.
// =================================================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use meshtag_crypto::{channel_hash, compute_tag, derive_key};
use meshtag_models::{
    BackendUsed, CrackOptions, CrackResult, DictionaryIndex, Packet, PreferredBackend,
    ProgressReport, ResumeCursor, ResumeType, MIN_EMIT_INTERVAL_MILLIS, PUBLIC_ROOM_NAME,
};
use tracing::{info, instrument, warn};

use crate::executor::accelerator::GpuExecutor;
use crate::executor::portable::PortableExecutor;
use crate::executor::{BatchExecutor, PORTABLE_BATCH_SIZE};
use crate::filters::FilterChain;
use crate::enumerator;

/// Selecciona un ejecutor por lotes segun las preferencias de backend.
///
/// Con [`PreferredBackend::Auto`] intenta el backend acelerado y recurre
/// silenciosamente al portable si no hay adaptador disponible, tal como
/// exige el diseño de manejo de errores: un fallo de backend nunca debe
/// impedir que la busqueda continue con el fallback.
fn select_executor(
    preferred: PreferredBackend,
    initial_batch_size: usize,
    gpu_dispatch_ms: u64,
) -> Box<dyn BatchExecutor> {
    match preferred {
        PreferredBackend::PortableOnly => Box::new(PortableExecutor::new()),
        PreferredBackend::Auto => match GpuExecutor::try_new(initial_batch_size, gpu_dispatch_ms) {
            Some(gpu) => Box::new(gpu),
            None => {
                warn!("🐢 [ORCHESTRATOR]: no GPU adapter available, falling back to portable backend.");
                Box::new(PortableExecutor::new())
            }
        },
    }
}

/// Ejecuta una operacion de crackeo completa sobre un paquete, a traves de
/// las tres fases en orden, honrando `options.resume_from` si esta
/// presente y deteniendose cooperativamente cuando `cancel` se activa.
///
/// `now_unix_seconds` es el reloj de referencia para el filtro de ventana
/// de timestamp; se pasa explicitamente (en vez de leerse del reloj del
/// sistema dentro de esta funcion) para mantenerla determinista y testeable.
#[instrument(skip(packet, options, dictionary, cancel, on_progress), fields(max_room_name_length = options.max_room_name_length))]
pub fn crack(
    packet: &Packet,
    options: &CrackOptions,
    dictionary: &DictionaryIndex,
    now_unix_seconds: i64,
    cancel: Arc<AtomicBool>,
    mut on_progress: impl FnMut(ProgressReport),
) -> CrackResult {
    let filter_chain = FilterChain::new(
        options.timestamp_window_seconds,
        options.use_timestamp_filter,
        options.use_utf8_filter,
    );
    let mut total_checked: u64 = 0;

    let resume_phase = options.resume_from.as_ref().map(|cursor| cursor.phase);

    // --- FASE A: SALA PUBLICA ---
    // Siempre se prueba, nunca se salta por reanudacion: un cursor de Fase A
    // solo existe tras cancelar *dentro* de ella, y el unico candidato que
    // prueba es el fijo, asi que reanudarla es identico a no reanudar.
    if resume_phase.is_none() {
        total_checked += 1;
        if let Some(result) = try_single_candidate(
            PUBLIC_ROOM_NAME,
            packet,
            &filter_chain,
            now_unix_seconds,
            total_checked,
            ResumeCursor::after(ResumeType::PublicRoom, PUBLIC_ROOM_NAME),
        ) {
            info!("✅ [PHASE_A]: public room candidate matched.");
            return result;
        }

        if cancel.load(Ordering::Relaxed) {
            return CrackResult::cancelled(
                total_checked,
                ResumeCursor::after(ResumeType::PublicRoom, PUBLIC_ROOM_NAME),
                BackendUsed::Cpu,
            );
        }
    }

    // --- FASE B: DICCIONARIO ---
    if options.use_dictionary
        && (resume_phase.is_none() || resume_phase == Some(ResumeType::Dictionary))
    {
        let words = dictionary.bucket(packet.channel_hash);
        let dictionary_start_index = match &options.resume_from {
            Some(cursor) if cursor.phase == ResumeType::Dictionary => {
                if cursor.room_name.is_empty() {
                    0
                } else {
                    words
                        .iter()
                        .position(|w| w.word == cursor.room_name)
                        .map(|position| position + 1)
                        .unwrap_or(0)
                }
            }
            _ => 0,
        };

        let phase_started = Instant::now();
        let mut last_emit = Instant::now();
        let mut last_checked_word = String::new();

        for (offset, indexed_word) in words.iter().enumerate().skip(dictionary_start_index) {
            if cancel.load(Ordering::Relaxed) {
                return CrackResult::cancelled(
                    total_checked,
                    ResumeCursor::after(ResumeType::Dictionary, last_checked_word.clone()),
                    BackendUsed::Cpu,
                );
            }

            total_checked += 1;
            if let Some(result) = try_single_candidate(
                &indexed_word.word,
                packet,
                &filter_chain,
                now_unix_seconds,
                total_checked,
                ResumeCursor::after(ResumeType::Dictionary, indexed_word.word.clone()),
            ) {
                info!("✅ [PHASE_B]: dictionary candidate matched.");
                return result;
            }
            last_checked_word = indexed_word.word.clone();

            if last_emit.elapsed().as_millis() as u64 >= MIN_EMIT_INTERVAL_MILLIS {
                on_progress(ProgressReport::new(
                    ResumeType::Dictionary,
                    (offset + 1) as u64,
                    Some(words.len() as u64),
                    phase_started.elapsed().as_secs_f64(),
                ));
                last_emit = Instant::now();
            }
        }
    }

    // --- FASE C: FUERZA BRUTA ---
    let from_scratch_index = enumerator::cumulative_offset_before(options.starting_length);
    let brute_force_start_index = match &options.resume_from {
        Some(cursor) if cursor.phase == ResumeType::BruteForce => {
            if cursor.room_name.is_empty() {
                from_scratch_index
            } else {
                enumerator::room_name_to_global_index(&cursor.room_name)
                    .map(|index| index + 1)
                    .unwrap_or(from_scratch_index)
            }
        }
        _ => from_scratch_index,
    };

    let total_space = enumerator::total_space_size(options.max_room_name_length);
    let mut executor = select_executor(
        options.preferred_backend,
        PORTABLE_BATCH_SIZE,
        options.gpu_dispatch_ms,
    );
    let backend_used = executor.backend();
    let phase_started = Instant::now();
    let mut last_emit = Instant::now();
    let mut global_index = brute_force_start_index;
    let mut last_decoded_name = if brute_force_start_index > 0 {
        enumerator::global_index_to_length_and_local(brute_force_start_index - 1, options.max_room_name_length)
            .and_then(|(length, local)| enumerator::index_to_room_name(local, length))
    } else {
        None
    };

    while global_index < total_space {
        if cancel.load(Ordering::Relaxed) {
            return CrackResult::cancelled(
                total_checked,
                ResumeCursor::after(ResumeType::BruteForce, last_decoded_name.clone().unwrap_or_default()),
                backend_used,
            );
        }

        let batch_size = executor.batch_size() as u64;
        let batch_end = (global_index + batch_size).min(total_space);

        let mut batch_candidates = Vec::with_capacity((batch_end - global_index) as usize);
        for index in global_index..batch_end {
            total_checked += 1;
            if let Some((length, local_index)) =
                enumerator::global_index_to_length_and_local(index, options.max_room_name_length)
            {
                if let Some(name) = enumerator::index_to_room_name(local_index, length) {
                    last_decoded_name = Some(name.clone());
                    batch_candidates.push(name);
                }
            }
        }

        let matches = match executor.execute_batch(&batch_candidates, packet) {
            Ok(matches) => matches,
            Err(error) => {
                warn!("❌ [PHASE_C]: backend failure: {error}, falling back to portable executor.");
                executor = Box::new(PortableExecutor::new());
                match executor.execute_batch(&batch_candidates, packet) {
                    Ok(matches) => matches,
                    Err(error) => {
                        return CrackResult::failed(error.to_string(), total_checked, backend_used);
                    }
                }
            }
        };

        for candidate in &matches {
            if let Some(result) = try_single_candidate(
                candidate,
                packet,
                &filter_chain,
                now_unix_seconds,
                total_checked,
                ResumeCursor::after(ResumeType::BruteForce, candidate.clone()),
            ) {
                info!("✅ [PHASE_C]: brute-force candidate matched.");
                return result;
            }
        }

        if last_emit.elapsed().as_millis() as u64 >= MIN_EMIT_INTERVAL_MILLIS {
            on_progress(ProgressReport::new(
                ResumeType::BruteForce,
                global_index - brute_force_start_index,
                Some(total_space - brute_force_start_index),
                phase_started.elapsed().as_secs_f64(),
            ));
            last_emit = Instant::now();
        }

        global_index = batch_end;
    }

    info!("🏁 [ORCHESTRATOR]: search space exhausted without a match, checked {} candidates.", total_checked);
    let exhausted_cursor = enumerator::global_index_to_length_and_local(total_space.saturating_sub(1), options.max_room_name_length)
        .and_then(|(length, local)| enumerator::index_to_room_name(local, length))
        .unwrap_or_default();
    CrackResult::exhausted(
        total_checked,
        backend_used,
        ResumeCursor::after(ResumeType::BruteForce, exhausted_cursor),
    )
}

#[allow(clippy::too_many_arguments)]
fn try_single_candidate(
    room_name: &str,
    packet: &Packet,
    filter_chain: &FilterChain,
    now_unix_seconds: i64,
    checked: u64,
    resume_cursor: ResumeCursor,
) -> Option<CrackResult> {
    let key = derive_key(room_name);
    if channel_hash(&key) != packet.channel_hash {
        return None;
    }
    if compute_tag(&key, &packet.ciphertext) != packet.tag {
        return None;
    }

    let frame = filter_chain.evaluate(&key, &packet.ciphertext, now_unix_seconds)?;

    Some(CrackResult::found(
        room_name.to_string(),
        key,
        frame.body,
        frame.timestamp,
        checked,
        BackendUsed::Cpu,
        resume_cursor,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshtag_crypto::encrypt;
    use meshtag_models::{CrackOptions, IndexedWord};

    fn packet_for(room_name: &str, timestamp: u32, message: &[u8]) -> Packet {
        let key = derive_key(room_name);
        let ciphertext = encrypt(&key, timestamp, message);
        Packet {
            channel_hash: channel_hash(&key),
            tag: compute_tag(&key, &ciphertext),
            ciphertext,
        }
    }

    #[test]
    fn phase_a_finds_the_public_room_immediately() {
        let now = 1_700_000_000u32;
        let packet = packet_for(PUBLIC_ROOM_NAME, now, b"hi");
        let options = CrackOptions {
            preferred_backend: PreferredBackend::PortableOnly,
            ..Default::default()
        };
        let dictionary = DictionaryIndex::empty();
        let result = crack(
            &packet,
            &options,
            &dictionary,
            now as i64,
            Arc::new(AtomicBool::new(false)),
            |_| {},
        );
        assert_eq!(result.room_name, Some(PUBLIC_ROOM_NAME.to_string()));
        assert_eq!(result.checked, 1);
        assert_eq!(
            result.resume_cursor.as_ref().map(|c| c.room_name.as_str()),
            Some(PUBLIC_ROOM_NAME)
        );
    }

    #[test]
    fn phase_b_finds_a_dictionary_word_when_public_room_misses() {
        let now = 1_700_000_000u32;
        let packet = packet_for("secretword", now, b"dictionary hit");
        let mut dictionary = DictionaryIndex::empty();
        let bucket = packet.channel_hash;
        dictionary.insert(IndexedWord {
            word: "secretword".to_string(),
            bucket,
        });

        let options = CrackOptions {
            preferred_backend: PreferredBackend::PortableOnly,
            max_room_name_length: 3,
            ..Default::default()
        };

        let result = crack(
            &packet,
            &options,
            &dictionary,
            now as i64,
            Arc::new(AtomicBool::new(false)),
            |_| {},
        );
        assert_eq!(result.room_name, Some("secretword".to_string()));
    }

    #[test]
    fn disabling_the_dictionary_skips_straight_to_brute_force() {
        let now = 1_700_000_000u32;
        let packet = packet_for("ab", now, b"skip dict");
        let mut dictionary = DictionaryIndex::empty();
        dictionary.insert(IndexedWord {
            word: "ab".to_string(),
            bucket: packet.channel_hash,
        });

        let options = CrackOptions {
            preferred_backend: PreferredBackend::PortableOnly,
            max_room_name_length: 2,
            use_dictionary: false,
            ..Default::default()
        };

        let result = crack(
            &packet,
            &options,
            &dictionary,
            now as i64,
            Arc::new(AtomicBool::new(false)),
            |_| {},
        );
        assert_eq!(result.room_name, Some("ab".to_string()));
        assert_eq!(result.resume_cursor.unwrap().phase, ResumeType::BruteForce);
    }

    #[test]
    fn phase_c_finds_a_short_room_name_via_brute_force() {
        let now = 1_700_000_000u32;
        let packet = packet_for("ab", now, b"bf hit");
        let options = CrackOptions {
            preferred_backend: PreferredBackend::PortableOnly,
            max_room_name_length: 2,
            ..Default::default()
        };
        let dictionary = DictionaryIndex::empty();
        let result = crack(
            &packet,
            &options,
            &dictionary,
            now as i64,
            Arc::new(AtomicBool::new(false)),
            |_| {},
        );
        assert_eq!(result.room_name, Some("ab".to_string()));
    }

    #[test]
    fn starting_length_skips_shorter_candidates() {
        let now = 1_700_000_000u32;
        let packet = packet_for("ab", now, b"starting length hit");
        let options = CrackOptions {
            preferred_backend: PreferredBackend::PortableOnly,
            max_room_name_length: 2,
            starting_length: 2,
            use_dictionary: false,
            ..Default::default()
        };
        let dictionary = DictionaryIndex::empty();
        let result = crack(
            &packet,
            &options,
            &dictionary,
            now as i64,
            Arc::new(AtomicBool::new(false)),
            |_| {},
        );
        assert_eq!(result.room_name, Some("ab".to_string()));
        // Only length-2 candidates were ever checked (Phase A's one candidate
        // plus the length-2 space), never any length-1 candidate.
        assert!(result.checked <= 1 + enumerator::count_names_for_length(2));
    }

    #[test]
    fn cancellation_mid_brute_force_yields_a_resume_cursor() {
        let now = 1_700_000_000u32;
        // A room name long enough that cancellation fires before exhaustion.
        let packet = packet_for("zz9", now, b"never found early");
        let options = CrackOptions {
            preferred_backend: PreferredBackend::PortableOnly,
            max_room_name_length: 3,
            resume_from: Some(ResumeCursor::after(ResumeType::BruteForce, String::new())),
            ..Default::default()
        };
        let dictionary = DictionaryIndex::empty();
        let cancel = Arc::new(AtomicBool::new(true));
        let result = crack(&packet, &options, &dictionary, now as i64, cancel, |_| {});
        assert!(result.room_name.is_none());
        let cursor = result.resume_cursor.unwrap();
        assert_eq!(cursor.phase, ResumeType::BruteForce);
    }

    #[test]
    fn resuming_a_brute_force_cursor_does_not_recheck_the_matched_name() {
        let now = 1_700_000_000u32;
        let packet = packet_for("ab", now, b"resume hit");
        let options = CrackOptions {
            preferred_backend: PreferredBackend::PortableOnly,
            max_room_name_length: 2,
            resume_from: Some(ResumeCursor::after(ResumeType::BruteForce, "ab".to_string())),
            ..Default::default()
        };
        let dictionary = DictionaryIndex::empty();
        let result = crack(
            &packet,
            &options,
            &dictionary,
            now as i64,
            Arc::new(AtomicBool::new(false)),
            |_| {},
        );
        assert!(result.room_name.is_none());
        assert!(result.error.is_none());
    }

    #[test]
    fn exhausting_the_space_without_a_match_reports_no_error() {
        let now = 1_700_000_000u32;
        // Encrypt under a room name longer than max_room_name_length so it
        // can never be found within the configured brute-force space.
        let packet = packet_for("unreachablename", now, b"x");
        let options = CrackOptions {
            preferred_backend: PreferredBackend::PortableOnly,
            max_room_name_length: 1,
            ..Default::default()
        };
        let dictionary = DictionaryIndex::empty();
        let result = crack(
            &packet,
            &options,
            &dictionary,
            now as i64,
            Arc::new(AtomicBool::new(false)),
            |_| {},
        );
        assert!(result.room_name.is_none());
        assert!(result.error.is_none());
        assert!(result.resume_cursor.is_some());
    }
}
