//! Canonical 44-byte RIFF/WAVE container for raw PCM.

/// Sample rate of the speech model's PCM output.
pub const SAMPLE_RATE: u32 = 24_000;
/// Channel count of the speech model's PCM output.
pub const CHANNELS: u16 = 1;
/// Bits per sample of the speech model's PCM output.
pub const BITS_PER_SAMPLE: u16 = 16;
/// Length of the canonical header.
pub const HEADER_LEN: usize = 44;

/// Layout of a linear PCM stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WavSpec {
    /// Samples per second
    pub sample_rate: u32,
    /// Interleaved channels
    pub channels: u16,
    /// Bits per sample
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    /// 24 kHz mono 16-bit, as returned by the speech model.
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            channels: CHANNELS,
            bits_per_sample: BITS_PER_SAMPLE,
        }
    }
}

impl WavSpec {
    /// Bytes per sample frame across all channels, saturating at `u16::MAX`.
    pub fn block_align(&self) -> u16 {
        self.channels.saturating_mul(self.bits_per_sample / 8)
    }

    /// Bytes of audio per second, saturating at `u32::MAX`.
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate.saturating_mul(u32::from(self.block_align()))
    }

    /// Playback length of `data_len` bytes of PCM, in seconds.
    pub fn duration_seconds(&self, data_len: usize) -> f32 {
        match self.byte_rate() {
            0 => 0.0,
            rate => data_len as f32 / rate as f32,
        }
    }
}

/// Header for `data_len` bytes of PCM. All fields little-endian.
///
/// Sizes saturate at `u32::MAX`, the format's limit.
pub fn wav_header(spec: WavSpec, data_len: usize) -> [u8; HEADER_LEN] {
    let data_size = u32::try_from(data_len).unwrap_or(u32::MAX);
    let file_size = data_size.saturating_add(36);

    let mut header = [0u8; HEADER_LEN];
    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&file_size.to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");
    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&1u16.to_le_bytes());
    header[22..24].copy_from_slice(&spec.channels.to_le_bytes());
    header[24..28].copy_from_slice(&spec.sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&spec.byte_rate().to_le_bytes());
    header[32..34].copy_from_slice(&spec.block_align().to_le_bytes());
    header[34..36].copy_from_slice(&spec.bits_per_sample.to_le_bytes());
    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_size.to_le_bytes());
    header
}

/// Wrap speech-model PCM in a WAV container.
///
/// # Examples
///
/// ```
/// use storyboard_narrative::encode_wav;
///
/// let wav = encode_wav(&[0u8; 10]);
/// assert_eq!(wav.len(), 54);
/// assert_eq!(&wav[0..4], b"RIFF");
/// assert_eq!(u32::from_le_bytes([wav[4], wav[5], wav[6], wav[7]]), 46);
/// ```
pub fn encode_wav(pcm: &[u8]) -> Vec<u8> {
    encode_wav_with(WavSpec::default(), pcm)
}

/// Wrap PCM of an explicit layout in a WAV container.
pub fn encode_wav_with(spec: WavSpec, pcm: &[u8]) -> Vec<u8> {
    let mut wav = Vec::with_capacity(HEADER_LEN + pcm.len());
    wav.extend_from_slice(&wav_header(spec, pcm.len()));
    wav.extend_from_slice(pcm);
    wav
}
