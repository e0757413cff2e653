//! YouTube caption fetching.

use super::TranscriptSource;
use crate::config::YoutubeSettings;
use crate::error::{Result, ToolbeltError};
use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const CAPTION_TRACKS_KEY: &str = "\"captionTracks\":";

/// One caption line with its timing in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
    #[serde(default)]
    kind: Option<String>,
}

/// Transcript source reading caption tracks from YouTube watch pages.
pub struct YoutubeTranscripts {
    http: reqwest::Client,
    base_url: String,
    languages: Vec<String>,
    video_id_regex: Regex,
}

impl YoutubeTranscripts {
    pub fn new(http: reqwest::Client, settings: &YoutubeSettings) -> Result<Self> {
        // Matches various YouTube URL formats and bare video IDs
        let video_id_regex = Regex::new(
            r"(?x)
            (?:
                (?:https?://)?
                (?:www\.|m\.)?
                (?:youtube\.com/watch\?(?:.*&)?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/shorts/)
                ([a-zA-Z0-9_-]{11})
            )
            |
            ^([a-zA-Z0-9_-]{11})$
        ",
        )
        .map_err(|e| ToolbeltError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            languages: settings.languages.clone(),
            video_id_regex,
        })
    }

    /// Extract video ID from a YouTube URL or bare ID.
    pub fn extract_video_id(&self, input: &str) -> Option<String> {
        let caps = self.video_id_regex.captures(input.trim())?;

        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
    }

    async fn caption_tracks(&self, video_id: &str) -> Result<Vec<CaptionTrack>> {
        let html = self
            .http
            .get(format!("{}/watch", self.base_url))
            .query(&[("v", video_id)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let start = html
            .find(CAPTION_TRACKS_KEY)
            .ok_or_else(|| ToolbeltError::Transcript(format!("No captions for video {}", video_id)))?;

        // The track list is embedded in a larger JSON blob; read just the array.
        let rest = &html[start + CAPTION_TRACKS_KEY.len()..];
        let tracks: Vec<CaptionTrack> = serde_json::Deserializer::from_str(rest)
            .into_iter::<Vec<CaptionTrack>>()
            .next()
            .ok_or_else(|| ToolbeltError::Transcript(format!("No captions for video {}", video_id)))??;
        if tracks.is_empty() {
            return Err(ToolbeltError::Transcript(format!("No captions for video {}", video_id)));
        }
        Ok(tracks)
    }

    /// Pick a track in the first preferred language, favouring manual
    /// captions over auto-generated ones.
    fn choose_track<'a>(&self, tracks: &'a [CaptionTrack]) -> Option<&'a CaptionTrack> {
        for language in &self.languages {
            let mut matching = tracks
                .iter()
                .filter(|t| t.language_code == *language || t.language_code.starts_with(&format!("{}-", language)));
            let first = matching.clone().find(|t| t.kind.as_deref() != Some("asr"));
            if let Some(track) = first.or_else(|| matching.next()) {
                return Some(track);
            }
        }
        tracks.first()
    }

    fn absolute(&self, url: &str) -> String {
        if url.starts_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            url.to_string()
        }
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscripts {
    #[instrument(skip(self))]
    async fn transcript(&self, video: &str) -> Result<Vec<TranscriptSegment>> {
        let video_id = self.extract_video_id(video).ok_or_else(|| {
            ToolbeltError::InvalidInput(format!("Invalid YouTube video ID or URL: {}", video))
        })?;

        let tracks = self.caption_tracks(&video_id).await?;
        let track = self
            .choose_track(&tracks)
            .ok_or_else(|| ToolbeltError::Transcript(format!("No captions for video {}", video_id)))?;

        debug!("Using caption track {} for {}", track.language_code, video_id);

        let xml = self
            .http
            .get(self.absolute(&track.base_url))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_timed_text(&xml)
    }
}

/// Decode the timed-text XML format into caption segments.
pub fn parse_timed_text(xml: &str) -> Result<Vec<TranscriptSegment>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut segments = Vec::new();
    let mut current: Option<TranscriptSegment> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"text" => {
                let mut segment = TranscriptSegment {
                    text: String::new(),
                    start: 0.0,
                    duration: 0.0,
                };
                for attr in e.attributes() {
                    let attr = attr.map_err(|e| ToolbeltError::Transcript(e.to_string()))?;
                    let value = attr
                        .unescape_value()
                        .map_err(|e| ToolbeltError::Transcript(e.to_string()))?;
                    match attr.key.as_ref() {
                        b"start" => segment.start = value.parse().unwrap_or(0.0),
                        b"dur" => segment.duration = value.parse().unwrap_or(0.0),
                        _ => {}
                    }
                }
                current = Some(segment);
            }
            Ok(Event::Text(t)) => {
                if let Some(segment) = current.as_mut() {
                    let once = t.unescape().map_err(|e| ToolbeltError::Transcript(e.to_string()))?;
                    // Caption bodies are escaped twice.
                    let text = quick_xml::escape::unescape(&once)
                        .map(|s| s.into_owned())
                        .unwrap_or_else(|_| once.into_owned());
                    segment.text.push_str(&text.replace('\n', " "));
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"text" => {
                if let Some(segment) = current.take() {
                    segments.push(segment);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(ToolbeltError::Transcript(format!("Malformed caption XML: {}", e))),
        }
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TIMED_TEXT: &str = r#"<?xml version="1.0" encoding="utf-8" ?><transcript>
        <text start="0.0" dur="1.5">Hello there</text>
        <text start="1.5" dur="2.25">it&amp;#39;s a
test</text>
        </transcript>"#;

    fn source(base_url: &str) -> YoutubeTranscripts {
        YoutubeTranscripts::new(
            reqwest::Client::new(),
            &YoutubeSettings {
                base_url: base_url.to_string(),
                languages: vec!["en".to_string()],
            },
        )
        .unwrap()
    }

    #[test]
    fn test_extract_video_id() {
        let yt = source("https://www.youtube.com");

        assert_eq!(
            yt.extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            yt.extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            yt.extract_video_id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(yt.extract_video_id("dQw4w9WgXcQ"), Some("dQw4w9WgXcQ".to_string()));

        assert_eq!(yt.extract_video_id("xyz"), None);
        assert_eq!(yt.extract_video_id(""), None);
    }

    #[test]
    fn test_parse_timed_text() {
        let segments = parse_timed_text(TIMED_TEXT).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "Hello there");
        assert_eq!(segments[0].start, 0.0);
        assert_eq!(segments[1].text, "it's a test");
        assert_eq!(segments[1].duration, 2.25);
    }

    #[test]
    fn test_choose_track_prefers_manual_captions() {
        let yt = source("https://www.youtube.com");
        let tracks = vec![
            CaptionTrack {
                base_url: "de".to_string(),
                language_code: "de".to_string(),
                kind: None,
            },
            CaptionTrack {
                base_url: "en-asr".to_string(),
                language_code: "en".to_string(),
                kind: Some("asr".to_string()),
            },
            CaptionTrack {
                base_url: "en-gb".to_string(),
                language_code: "en-GB".to_string(),
                kind: None,
            },
        ];
        assert_eq!(yt.choose_track(&tracks).unwrap().base_url, "en-gb");
    }

    #[tokio::test]
    async fn test_fetch_transcript() {
        let server = MockServer::start().await;
        let watch_page = format!(
            r#"<html><script>var ytInitialPlayerResponse = {{"captions":{{"playerCaptionsTracklistRenderer":{{"captionTracks":[{{"baseUrl":"{}/api/timedtext?v=dQw4w9WgXcQ&lang=en","languageCode":"en"}}],"audioTracks":[]}}}}}};</script></html>"#,
            server.uri()
        );

        Mock::given(method("GET"))
            .and(path("/watch"))
            .and(query_param("v", "dQw4w9WgXcQ"))
            .respond_with(ResponseTemplate::new(200).set_body_string(watch_page))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/timedtext"))
            .and(query_param("lang", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_string(TIMED_TEXT))
            .mount(&server)
            .await;

        let segments = source(&server.uri())
            .transcript("https://youtu.be/dQw4w9WgXcQ")
            .await
            .unwrap();
        assert_eq!(segments.len(), 2);
    }

    #[tokio::test]
    async fn test_video_without_captions() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/watch"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>no captions here</html>"))
            .mount(&server)
            .await;

        let err = source(&server.uri()).transcript("dQw4w9WgXcQ").await.unwrap_err();
        assert!(matches!(err, ToolbeltError::Transcript(_)));
    }
}
