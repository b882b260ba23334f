// [crates/meshtag-cracker/src/executor/accelerator.rs]
//
// =================================================================
// APARATO: GPU ACCELERATED BATCH EXECUTOR (V1.0)
// CLASIFICACION: DOMAIN STRATEGY (ESTRATO L2)
// RESPONSABILIDAD: FILTRO DE HASH DE CANAL ACELERADO POR COMPUTO GPU
//
// Un kernel WGSL deriva la llave y el hash de canal de hasta 32 candidatos
// por invocacion de workgroup y anota los indices que coinciden contra el
// hash de canal objetivo en un buffer de almacenamiento protegido por un
// contador atomico. El host solo paga el costo de SHA-256(llave, texto
// cifrado) -- el tag de verificacion de 2 bytes -- para los candidatos que
// el GPU ya senalo, que en la practica son ~1/256 del lote.
// =================================================================

use std::sync::Arc;
use std::time::Instant;

use meshtag_crypto::{compute_tag, derive_key};
use meshtag_models::{BackendUsed, Packet};
use tracing::{info, warn};
use wgpu::util::DeviceExt;

use super::autotune::{BatchSizeTuner, DEFAULT_TARGET_DISPATCH_MILLIS};
use super::BatchExecutor;
use crate::errors::CrackerError;

/// Numero maximo de bytes de un candidato de nombre de sala que el kernel
/// acepta (incluye el prefijo `#` antepuesto por `derive_key`).
const MAX_CANDIDATE_BYTES: usize = 24;

/// Cupo maximo de coincidencias de hash de canal que el kernel puede
/// reportar por lote; un lote que produjera mas estaria efectivamente
/// atacando un canal sin hash de canal util (no deberia ocurrir en
/// practica dado un presupuesto de colision de 1/256).
const MAX_MATCHES_PER_BATCH: u32 = 4096;

const CANDIDATE_FILTER_SHADER: &str = r#"
struct Candidate {
    bytes: array<u32, 6>, // hasta 24 bytes empacados, little-endian por palabra
    length: u32,
};

struct Params {
    candidate_count: u32,
    target_channel_hash: u32,
};

@group(0) @binding(0) var<storage, read> candidates: array<Candidate>;
@group(0) @binding(1) var<storage, read_write> match_count: atomic<u32>;
@group(0) @binding(2) var<storage, read_write> match_indices: array<u32>;
@group(0) @binding(3) var<uniform> params: Params;

const K = array<u32, 64>(
    0x428a2f98u, 0x71374491u, 0xb5c0fbcfu, 0xe9b5dba5u, 0x3956c25bu, 0x59f111f1u, 0x923f82a4u, 0xab1c5ed5u,
    0xd807aa98u, 0x12835b01u, 0x243185beu, 0x550c7dc3u, 0x72be5d74u, 0x80deb1feu, 0x9bdc06a7u, 0xc19bf174u,
    0xe49b69c1u, 0xefbe4786u, 0x0fc19dc6u, 0x240ca1ccu, 0x2de92c6fu, 0x4a7484aau, 0x5cb0a9dcu, 0x76f988dau,
    0x983e5152u, 0xa831c66du, 0xb00327c8u, 0xbf597fc7u, 0xc6e00bf3u, 0xd5a79147u, 0x06ca6351u, 0x14292967u,
    0x27b70a85u, 0x2e1b2138u, 0x4d2c6dfcu, 0x53380d13u, 0x650a7354u, 0x766a0abbu, 0x81c2c92eu, 0x92722c85u,
    0xa2bfe8a1u, 0xa81a664bu, 0xc24b8b70u, 0xc76c51a3u, 0xd192e819u, 0xd6990624u, 0xf40e3585u, 0x106aa070u,
    0x19a4c116u, 0x1e376c08u, 0x2748774cu, 0x34b0bcb5u, 0x391c0cb3u, 0x4ed8aa4au, 0x5b9cca4fu, 0x682e6ff3u,
    0x748f82eeu, 0x78a5636fu, 0x84c87814u, 0x8cc70208u, 0x90befffau, 0xa4506cebu, 0xbef9a3f7u, 0xc67178f2u
);

fn ch(x: u32, y: u32, z: u32) -> u32 { return (x & y) ^ (~x & z); }
fn maj(x: u32, y: u32, z: u32) -> u32 { return (x & y) ^ (x & z) ^ (y & z); }
fn rotr(x: u32, n: u32) -> u32 { return (x >> n) | (x << (32u - n)); }
fn big_sigma0(x: u32) -> u32 { return rotr(x, 2u) ^ rotr(x, 13u) ^ rotr(x, 22u); }
fn big_sigma1(x: u32) -> u32 { return rotr(x, 6u) ^ rotr(x, 11u) ^ rotr(x, 25u); }
fn small_sigma0(x: u32) -> u32 { return rotr(x, 7u) ^ rotr(x, 18u) ^ (x >> 3u); }
fn small_sigma1(x: u32) -> u32 { return rotr(x, 17u) ^ rotr(x, 19u) ^ (x >> 10u); }

// SHA-256 de un solo bloque (el mensaje cabe en 55 bytes o menos, que es
// el caso de "#" + nombre de sala y de una llave de 16 bytes).
fn sha256_single_block(block: array<u32, 16>) -> array<u32, 8> {
    var w: array<u32, 64>;
    for (var i = 0u; i < 16u; i = i + 1u) {
        w[i] = block[i];
    }
    for (var i = 16u; i < 64u; i = i + 1u) {
        w[i] = small_sigma1(w[i - 2u]) + w[i - 7u] + small_sigma0(w[i - 15u]) + w[i - 16u];
    }

    var state = array<u32, 8>(
        0x6a09e667u, 0xbb67ae85u, 0x3c6ef372u, 0xa54ff53au,
        0x510e527fu, 0x9b05688cu, 0x1f83d9abu, 0x5be0cd19u
    );

    for (var i = 0u; i < 64u; i = i + 1u) {
        let t1 = state[7] + big_sigma1(state[4]) + ch(state[4], state[5], state[6]) + K[i] + w[i];
        let t2 = big_sigma0(state[0]) + maj(state[0], state[1], state[2]);
        state[7] = state[6];
        state[6] = state[5];
        state[5] = state[4];
        state[4] = state[3] + t1;
        state[3] = state[2];
        state[2] = state[1];
        state[1] = state[0];
        state[0] = t1 + t2;
    }

    var h_init = array<u32, 8>(
        0x6a09e667u, 0xbb67ae85u, 0x3c6ef372u, 0xa54ff53au,
        0x510e527fu, 0x9b05688cu, 0x1f83d9abu, 0x5be0cd19u
    );
    var out: array<u32, 8>;
    for (var i = 0u; i < 8u; i = i + 1u) {
        out[i] = h_init[i] + state[i];
    }
    return out;
}

// Empaca hasta 55 bytes (con su terminador 0x80 y longitud en bits
// big-endian) en un unico bloque de 16 palabras big-endian, como exige el
// padding estandar de SHA-256.
fn pad_single_block(raw: array<u32, 6>, length_bytes: u32) -> array<u32, 16> {
    var block: array<u32, 16>;
    for (var i = 0u; i < 16u; i = i + 1u) {
        block[i] = 0u;
    }

    // raw ya contiene los bytes empacados big-endian por palabra de 4 bytes.
    let full_words = length_bytes / 4u;
    for (var i = 0u; i < full_words; i = i + 1u) {
        block[i] = raw[i];
    }

    let remainder = length_bytes % 4u;
    if (remainder > 0u) {
        let shift = (4u - remainder) * 8u;
        block[full_words] = (raw[full_words] & (0xffffffffu << shift)) | (0x80u << (shift - 8u));
    } else if (length_bytes < 56u) {
        block[full_words] = 0x80000000u;
    }

    let bit_length = length_bytes * 8u;
    block[14] = 0u;
    block[15] = bit_length;

    return block;
}

@compute @workgroup_size(32)
fn main(@builtin(global_invocation_id) global_id: vec3<u32>) {
    let index = global_id.x;
    if (index >= params.candidate_count) {
        return;
    }

    let candidate = candidates[index];

    // derive_key(room_name) = SHA-256("#" + room_name)[0..16]
    let key_block = pad_single_block(candidate.bytes, candidate.length);
    let key_digest = sha256_single_block(key_block);

    // channel_hash(key) = SHA-256(key)[31], el byte menos significativo.
    var key_words: array<u32, 6>;
    key_words[0] = key_digest[0];
    key_words[1] = key_digest[1];
    key_words[2] = key_digest[2];
    key_words[3] = key_digest[3];
    key_words[4] = 0u;
    key_words[5] = 0u;
    let hash_block = pad_single_block(key_words, 16u);
    let hash_digest = sha256_single_block(hash_block);
    let channel_hash_byte = hash_digest[7] & 0xffu;

    if (channel_hash_byte == params.target_channel_hash) {
        let slot = atomicAdd(&match_count, 1u);
        match_indices[slot] = index;
    }
}
"#;

/// Backend de fuerza bruta acelerado por `wgpu`.
///
/// `init()` (via [`GpuExecutor::try_new`]) prueba silenciosamente si un
/// adaptador esta disponible; si no lo hay, el orquestador recurre al
/// backend portable sin que el fallo llegue nunca a quien invoca la API
/// publica (ver el diseño de manejo de errores de tres vias).
pub struct GpuExecutor {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    pipeline: wgpu::ComputePipeline,
    tuner: BatchSizeTuner,
}

impl GpuExecutor {
    /// Intenta inicializar el backend acelerado. Retorna `None` si ningun
    /// adaptador de `wgpu` esta disponible en este host.
    ///
    /// `gpu_dispatch_ms` es la duracion objetivo del primer despacho que el
    /// [`BatchSizeTuner`] interno usa para escalar `initial_batch_size`
    /// (ver `CrackOptions::gpu_dispatch_ms`).
    #[must_use]
    pub fn try_new(initial_batch_size: usize, gpu_dispatch_ms: u64) -> Option<Self> {
        let instance = wgpu::Instance::default();
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("meshtag-accelerator-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
            },
            None,
        ))
        .ok()?;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("meshtag-candidate-filter-shader"),
            source: wgpu::ShaderSource::Wgsl(CANDIDATE_FILTER_SHADER.into()),
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("meshtag-candidate-filter-pipeline"),
            layout: None,
            module: &shader,
            entry_point: "main",
            compilation_options: Default::default(),
            cache: None,
        });

        info!("🚀 [ACCELERATOR]: GPU adapter acquired, candidate filter kernel compiled.");

        Some(Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
            pipeline,
            tuner: BatchSizeTuner::with_target_millis(initial_batch_size, gpu_dispatch_ms),
        })
    }

    /// `true` si un backend acelerado se pudo inicializar en este host.
    #[must_use]
    pub fn is_available() -> bool {
        Self::try_new(32, DEFAULT_TARGET_DISPATCH_MILLIS).is_some()
    }

    fn pack_candidate(candidate: &str) -> ([u32; 6], u32) {
        let mut prefixed = Vec::with_capacity(candidate.len() + 1);
        prefixed.push(b'#');
        prefixed.extend_from_slice(candidate.as_bytes());
        prefixed.truncate(MAX_CANDIDATE_BYTES);

        let mut words = [0u32; 6];
        for (i, chunk) in prefixed.chunks(4).enumerate() {
            let mut word_bytes = [0u8; 4];
            word_bytes[..chunk.len()].copy_from_slice(chunk);
            words[i] = u32::from_be_bytes(word_bytes);
        }

        (words, prefixed.len() as u32)
    }
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct GpuCandidate {
    bytes: [u32; 6],
    length: u32,
    _padding: u32,
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct GpuParams {
    candidate_count: u32,
    target_channel_hash: u32,
}

impl BatchExecutor for GpuExecutor {
    fn execute_batch(
        &mut self,
        candidates: &[String],
        packet: &Packet,
    ) -> Result<Vec<String>, CrackerError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let dispatch_started = Instant::now();

        let gpu_candidates: Vec<GpuCandidate> = candidates
            .iter()
            .map(|c| {
                let (bytes, length) = Self::pack_candidate(c);
                GpuCandidate {
                    bytes,
                    length,
                    _padding: 0,
                }
            })
            .collect();

        let params = GpuParams {
            candidate_count: candidates.len() as u32,
            target_channel_hash: packet.channel_hash as u32,
        };

        let candidate_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("meshtag-candidates"),
                contents: bytemuck::cast_slice(&gpu_candidates),
                usage: wgpu::BufferUsages::STORAGE,
            });

        let params_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("meshtag-params"),
                contents: bytemuck::bytes_of(&params),
                usage: wgpu::BufferUsages::UNIFORM,
            });

        let match_count_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("meshtag-match-count"),
                contents: bytemuck::bytes_of(&0u32),
                usage: wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::COPY_SRC
                    | wgpu::BufferUsages::COPY_DST,
            });

        let match_indices_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("meshtag-match-indices"),
            size: (MAX_MATCHES_PER_BATCH as u64) * 4,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let bind_group_layout = self.pipeline.get_bind_group_layout(0);
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("meshtag-candidate-filter-bind-group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: candidate_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: match_count_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: match_indices_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: params_buffer.as_entire_binding(),
                },
            ],
        });

        let count_staging = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("meshtag-count-staging"),
            size: 4,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let indices_staging = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("meshtag-indices-staging"),
            size: (MAX_MATCHES_PER_BATCH as u64) * 4,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("meshtag-candidate-filter-encoder"),
            });
        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("meshtag-candidate-filter-pass"),
                timestamp_writes: None,
            });
            compute_pass.set_pipeline(&self.pipeline);
            compute_pass.set_bind_group(0, &bind_group, &[]);
            let workgroups = (candidates.len() as u32).div_ceil(32);
            compute_pass.dispatch_workgroups(workgroups, 1, 1);
        }
        encoder.copy_buffer_to_buffer(&match_count_buffer, 0, &count_staging, 0, 4);
        encoder.copy_buffer_to_buffer(
            &match_indices_buffer,
            0,
            &indices_staging,
            0,
            (MAX_MATCHES_PER_BATCH as u64) * 4,
        );
        self.queue.submit(Some(encoder.finish()));

        let count_slice = count_staging.slice(..);
        count_slice.map_async(wgpu::MapMode::Read, |_| {});
        self.device.poll(wgpu::Maintain::Wait);
        let match_count = {
            let mapped = count_slice.get_mapped_range();
            let count: u32 = bytemuck::pod_read_unaligned(&mapped);
            count
        };
        count_staging.unmap();

        let matched_indices: Vec<u32> = if match_count > 0 {
            let indices_slice = indices_staging.slice(..(match_count as u64 * 4));
            indices_slice.map_async(wgpu::MapMode::Read, |_| {});
            self.device.poll(wgpu::Maintain::Wait);
            let indices = {
                let mapped = indices_slice.get_mapped_range();
                bytemuck::cast_slice::<u8, u32>(&mapped).to_vec()
            };
            indices_staging.unmap();
            indices
        } else {
            Vec::new()
        };

        if !self.tuner.is_frozen() {
            self.tuner.observe(dispatch_started.elapsed());
        }

        let channel_hash_survivors: Vec<&String> = matched_indices
            .iter()
            .filter_map(|&index| candidates.get(index as usize))
            .collect();

        // El kernel solo filtra por hash de canal (barato, 1 byte); el tag
        // de 2 bytes se verifica aqui en el host sobre el puñado de
        // sobrevivientes.
        let tag_survivors: Vec<String> = channel_hash_survivors
            .into_iter()
            .filter(|candidate| {
                let key = derive_key(candidate);
                compute_tag(&key, &packet.ciphertext) == packet.tag
            })
            .cloned()
            .collect();

        if tag_survivors.len() > (MAX_MATCHES_PER_BATCH / 2) as usize {
            warn!("⚠️ [ACCELERATOR]: unexpectedly high channel-hash match rate this batch");
        }

        Ok(tag_survivors)
    }

    fn backend(&self) -> BackendUsed {
        BackendUsed::Gpu
    }

    fn batch_size(&self) -> usize {
        self.tuner.current_size()
    }
}
