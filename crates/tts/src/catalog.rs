//! Shaping of the engine's voice catalog for `/voices` and `/v1/models`

use indexmap::IndexMap;
use serde::Serialize;

use crate::types::{ModelList, ModelObject, VoiceDescriptor, VoiceQuery, VoiceSummary};

/// Owner reported for every model derived from the voice catalog
pub const MODEL_OWNER: &str = "microsoft";

/// Keep voices whose locale contains `filter` (case-sensitive substring)
///
/// An absent or empty filter keeps everything. Relative order is preserved.
pub fn filter_by_locale(voices: Vec<VoiceDescriptor>, filter: Option<&str>) -> Vec<VoiceDescriptor> {
    match filter {
        Some(filter) if !filter.is_empty() => voices
            .into_iter()
            .filter(|voice| voice.locale.contains(filter))
            .collect(),
        _ => voices,
    }
}

/// Body of `GET /voices`
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum VoiceListing<'a> {
    /// Default listing: `{"voices": [{"LocalName", "ShortName"}]}`
    Summary { voices: Vec<VoiceSummary<'a>> },
    /// `d` present: entries exactly as the engine reported them
    Detailed { voices: &'a [VoiceDescriptor] },
    /// `f=1`: `{"voices": {"<ShortName>": "<LocalName>"}}` in catalog order
    NameMap { voices: IndexMap<&'a str, &'a str> },
}

impl<'a> VoiceListing<'a> {
    /// Project already filtered voices according to the query
    pub fn new(voices: &'a [VoiceDescriptor], query: &VoiceQuery) -> Self {
        if query.f.as_deref() == Some("1") {
            return Self::NameMap {
                voices: voices
                    .iter()
                    .map(|v| (v.short_name.as_str(), v.local_name.as_str()))
                    .collect(),
            };
        }

        if query.d.is_some() {
            return Self::Detailed { voices };
        }

        Self::Summary {
            voices: voices
                .iter()
                .map(|v| VoiceSummary {
                    local_name: &v.local_name,
                    short_name: &v.short_name,
                })
                .collect(),
        }
    }
}

/// Content type of the `f=0` speaker sheet
pub const SPEAKER_SHEET_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

const DEFAULT_SAMPLE_RATE: &str = "24000";

/// `f=0`: the catalog as a `MultiTTS` speaker list, one YAML entry per voice
pub fn speaker_sheet(voices: &[VoiceDescriptor]) -> String {
    voices.iter().map(speaker_entry).collect::<Vec<_>>().join("\n")
}

fn speaker_entry(voice: &VoiceDescriptor) -> String {
    let gender = if extra_text(voice, "Gender").as_deref() == Some("Female") {
        0
    } else {
        1
    };
    let wpm = extra_text(voice, "WordsPerMinute").unwrap_or_default();
    let sample_rate = extra_text(voice, "SampleRateHertz").unwrap_or_else(|| DEFAULT_SAMPLE_RATE.to_string());

    format!(
        "- !!org.nobody.multitts.tts.speaker.Speaker
  avatar: ''
  code: {code}
  desc: ''
  extendUI: ''
  gender: {gender}
  name: {name}
  note: 'wpm: {wpm}'
  param: ''
  sampleRate: {sample_rate}
  speed: 1.5
  type: 1
  volume: 1",
        code = voice.short_name,
        name = voice.local_name,
    )
}

/// A vendor field as text; the engine reports some numbers as strings
fn extra_text(voice: &VoiceDescriptor, key: &str) -> Option<String> {
    match voice.extra.get(key)? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Present every voice as an `OpenAI` model stamped with `created`
pub fn models_from_voices(voices: Vec<VoiceDescriptor>, created: i64) -> ModelList {
    ModelList {
        object: "list".to_string(),
        data: voices
            .into_iter()
            .map(|voice| ModelObject {
                id: voice.short_name,
                object: "model".to_string(),
                created,
                owned_by: MODEL_OWNER.to_string(),
            })
            .collect(),
    }
}
