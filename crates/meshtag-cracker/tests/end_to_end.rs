// [crates/meshtag-cracker/tests/end_to_end.rs]
//
// =================================================================
// PRUEBA DE INTEGRACION: CICLO COMPLETO DE CRACKEO
// =================================================================
//
// Construye paquetes con las propias primitivas del workspace (en vez de
// los vectores hexadecimales literales de un esquema externo irreproducible)
// y ejerce las propiedades estructurales: orden de fases, reanudacion tras
// cancelacion, y agotamiento sin coincidencia.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use meshtag_crypto::{channel_hash, compute_tag, derive_key, encrypt};
use meshtag_models::{
    BackendUsed, CrackOptions, DictionaryIndex, IndexedWord, Packet, PreferredBackend, ResumeCursor,
    ResumeType,
};

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
fn full_search_recovers_a_brute_force_only_room_name() {
    let now = 1_700_000_000u32;
    let packet = packet_for("z9", now, b"brute force recovered this");

    let options = CrackOptions {
        preferred_backend: PreferredBackend::PortableOnly,
        max_room_name_length: 2,
        ..Default::default()
    };

    let dictionary = DictionaryIndex::empty();
    let result = meshtag_cracker::crack(
        &packet,
        &options,
        &dictionary,
        now as i64,
        Arc::new(AtomicBool::new(false)),
        |_| {},
    );

    assert_eq!(result.room_name.as_deref(), Some("z9"));
    assert_eq!(result.backend_used, BackendUsed::Cpu);
    assert!(result.error.is_none());
}

#[test]
fn dictionary_phase_takes_priority_over_brute_force() {
    let now = 1_700_000_000u32;
    let packet = packet_for("myroom", now, b"dictionary wins");

    let mut dictionary = DictionaryIndex::empty();
    dictionary.insert(IndexedWord {
        word: "myroom".to_string(),
        bucket: packet.channel_hash,
    });

    let options = CrackOptions {
        preferred_backend: PreferredBackend::PortableOnly,
        max_room_name_length: 2, // too short to ever reach "myroom" by brute force
        ..Default::default()
    };

    let result = meshtag_cracker::crack(
        &packet,
        &options,
        &dictionary,
        now as i64,
        Arc::new(AtomicBool::new(false)),
        |_| {},
    );

    assert_eq!(result.room_name.as_deref(), Some("myroom"));
}

#[test]
fn resuming_from_a_dictionary_cursor_skips_already_checked_words() {
    let now = 1_700_000_000u32;
    let packet = packet_for("wordthree", now, b"resumed hit");

    let bucket = packet.channel_hash;
    let mut dictionary = DictionaryIndex::empty();
    for word in ["wordone", "wordtwo", "wordthree"] {
        dictionary.insert(IndexedWord {
            word: word.to_string(),
            bucket,
        });
    }

    // Resume cursor claims "wordone" was already checked, so the search
    // should start at "wordtwo" and still find "wordthree".
    let options = CrackOptions {
        preferred_backend: PreferredBackend::PortableOnly,
        max_room_name_length: 2,
        resume_from: Some(ResumeCursor::after(ResumeType::Dictionary, "wordone".to_string())),
        ..Default::default()
    };

    let result = meshtag_cracker::crack(
        &packet,
        &options,
        &dictionary,
        now as i64,
        Arc::new(AtomicBool::new(false)),
        |_| {},
    );

    assert_eq!(result.room_name.as_deref(), Some("wordthree"));
}

#[test]
fn an_already_cancelled_search_reports_a_resume_cursor_and_no_match() {
    let now = 1_700_000_000u32;
    let packet = packet_for("neverreached", now, b"x");

    let options = CrackOptions {
        preferred_backend: PreferredBackend::PortableOnly,
        max_room_name_length: 3,
        ..Default::default()
    };

    let dictionary = DictionaryIndex::empty();
    let result = meshtag_cracker::crack(
        &packet,
        &options,
        &dictionary,
        now as i64,
        Arc::new(AtomicBool::new(true)),
        |_| {},
    );

    assert!(result.room_name.is_none());
    assert!(result.resume_cursor.is_some());
    assert!(result.error.is_none());
}

#[test]
fn progress_callback_reports_monotonically_increasing_checked_counts() {
    let now = 1_700_000_000u32;
    // A room name outside the explored brute-force space so the search
    // runs to exhaustion and the progress callback fires for every batch.
    let packet = packet_for("definitely-not-in-range", now, b"x");

    let options = CrackOptions {
        preferred_backend: PreferredBackend::PortableOnly,
        max_room_name_length: 3,
        ..Default::default()
    };

    let dictionary = DictionaryIndex::empty();
    let checked_values = Arc::new(std::sync::Mutex::new(Vec::new()));
    let checked_values_clone = Arc::clone(&checked_values);

    let result = meshtag_cracker::crack(
        &packet,
        &options,
        &dictionary,
        now as i64,
        Arc::new(AtomicBool::new(false)),
        move |report| {
            checked_values_clone.lock().unwrap().push(report.checked);
        },
    );

    assert!(result.room_name.is_none());
    let values = checked_values.lock().unwrap();
    for window in values.windows(2) {
        assert!(window[1] >= window[0]);
    }
}

#[test]
fn a_fresh_crack_call_clears_a_stale_abort_signal() {
    use meshtag_cracker::CrackEngine;

    let now = 1_700_000_000i64;
    let packet = packet_for("ab", now as u32, b"should still be found");
    let hex_str = packet
        .to_bytes()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<String>();

    let mut engine = CrackEngine::new();
    engine.abort();

    let options = CrackOptions {
        preferred_backend: PreferredBackend::PortableOnly,
        max_room_name_length: 2,
        ..Default::default()
    };

    let result = engine.crack(&hex_str, &options, now, |_| {});
    assert_eq!(result.room_name.as_deref(), Some("ab"));

    engine.destroy();
}

#[test]
fn crack_via_the_hex_facade_reports_an_invalid_packet_error() {
    use meshtag_cracker::CrackEngine;

    let engine = CrackEngine::new();
    let options = CrackOptions::default();
    let result = engine.crack("not a valid hex string", &options, 1_700_000_000, |_| {});

    assert!(result.room_name.is_none());
    assert_eq!(result.checked, 0);
    let error = result.error.expect("invalid hex input should report an error");
    assert!(error.contains("Invalid packet"));
}
