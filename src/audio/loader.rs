//! Audio decoding.
//!
//! WAV goes through hound, FLAC through claxon and Ogg Vorbis through lewton.
//! Anything else is handed to symphonia's prober (MP3, MP4/AAC, ALAC).

use crate::error::{MelgramError, MelgramResult};
use crate::types::Waveform;
use std::io::Cursor;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Interleaved PCM as it came out of the decoder.
#[derive(Clone, Debug)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
    pub format: &'static str,
}

/// Load an audio file as a mono waveform at its native sample rate.
pub fn load_audio(path: impl AsRef<Path>) -> MelgramResult<Waveform> {
    let path = path.as_ref();
    let name = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|e| MelgramError::audio_load(&name, e))?;
    let ext = path.extension().and_then(|e| e.to_str());
    let decoded = decode_named(&bytes, ext, &name)?;
    log::debug!(
        "{name}: {} {} Hz, {} ch, {} frames",
        decoded.format,
        decoded.sample_rate,
        decoded.channels,
        decoded.samples.len() / decoded.channels.max(1) as usize
    );
    Ok(to_mono(&decoded))
}

/// Decode an in-memory audio file as a mono waveform at its native sample rate.
///
/// `ext_hint` is only consulted for formats that lack a recognizable magic
/// number (e.g. raw MP3 without ID3).
pub fn decode_audio_bytes(bytes: &[u8], ext_hint: Option<&str>) -> MelgramResult<Waveform> {
    let decoded = decode_named(bytes, ext_hint, "<memory>")?;
    Ok(to_mono(&decoded))
}

fn decode_named(bytes: &[u8], ext_hint: Option<&str>, name: &str) -> MelgramResult<DecodedAudio> {
    if bytes.is_empty() {
        return Err(MelgramError::audio_load(name, "file is empty"));
    }
    let decoded = match bytes.get(0..4) {
        Some(b"RIFF") => decode_wav(bytes),
        Some(b"fLaC") => decode_flac(bytes),
        Some(b"OggS") => decode_ogg(bytes),
        _ => decode_symphonia(bytes, ext_hint),
    }
    .map_err(|reason| MelgramError::audio_load(name, reason))?;

    if decoded.sample_rate == 0 {
        return Err(MelgramError::audio_load(name, "sample rate is 0"));
    }
    if decoded.channels == 0 {
        return Err(MelgramError::audio_load(name, "no audio channels"));
    }
    Ok(decoded)
}

fn decode_wav(bytes: &[u8]) -> Result<DecodedAudio, String> {
    let reader = hound::WavReader::new(Cursor::new(bytes)).map_err(|e| format!("WAV: {e}"))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("WAV samples: {e}"))?,
        hound::SampleFormat::Int => {
            let scale = int_scale(spec.bits_per_sample);
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| format!("WAV samples: {e}"))?
        }
    };

    Ok(DecodedAudio {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        format: "wav",
    })
}

fn decode_flac(bytes: &[u8]) -> Result<DecodedAudio, String> {
    let mut reader = claxon::FlacReader::new(Cursor::new(bytes)).map_err(|e| format!("FLAC: {e}"))?;
    let info = reader.streaminfo();
    let scale = int_scale(info.bits_per_sample as u16);

    let samples = reader
        .samples()
        .map(|s| s.map(|v| v as f32 / scale))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("FLAC samples: {e}"))?;

    Ok(DecodedAudio {
        samples,
        sample_rate: info.sample_rate,
        channels: info.channels as u16,
        format: "flac",
    })
}

fn decode_ogg(bytes: &[u8]) -> Result<DecodedAudio, String> {
    let mut reader = lewton::inside_ogg::OggStreamReader::new(Cursor::new(bytes))
        .map_err(|e| format!("Ogg: {e}"))?;
    let sample_rate = reader.ident_hdr.audio_sample_rate;
    let channels = reader.ident_hdr.audio_channels as u16;

    let mut samples = Vec::new();
    while let Some(packet) = reader
        .read_dec_packet_itl()
        .map_err(|e| format!("Ogg packet: {e}"))?
    {
        samples.extend(packet.iter().map(|&s| s as f32 / 32768.0));
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
        format: "ogg",
    })
}

fn decode_symphonia(bytes: &[u8], ext_hint: Option<&str>) -> Result<DecodedAudio, String> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());
    let mut hint = Hint::new();
    if let Some(ext) = ext_hint {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| format!("unrecognized audio format: {e}"))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or("no decodable audio track")?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels = track.codec_params.channels.map(|c| c.count() as u16).unwrap_or(0);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| format!("unsupported codec: {e}"))?;

    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(format!("reading packet: {e}")),
        };
        if packet.track_id() != track_id {
            continue;
        }
        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = spec.rate;
                channels = spec.channels.count() as u16;
                let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buf.samples());
            }
            Err(SymphoniaError::DecodeError(msg)) => {
                log::warn!("skipping corrupt packet: {msg}");
            }
            Err(e) => return Err(format!("decoding: {e}")),
        }
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
        format: "symphonia",
    })
}

/// Full-scale value of a signed integer sample of the given width.
fn int_scale(bits_per_sample: u16) -> f32 {
    (1u64 << (bits_per_sample.clamp(1, 32) - 1)) as f32
}

/// Average interleaved channels into a mono waveform.
pub fn to_mono(audio: &DecodedAudio) -> Waveform {
    let channels = audio.channels.max(1) as usize;
    if channels == 1 {
        return Waveform::new(audio.samples.clone(), audio.sample_rate);
    }

    let samples = audio
        .samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect();
    Waveform::new(samples, audio.sample_rate)
}
