//! Video source parsing and embed URL construction.

use url::Url;

use crate::domain::{error::DomainError, types::VideoProvider};

const YOUTUBE_ID_LEN: usize = 11;
const MAX_VIMEO_ID_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSource {
    pub provider: VideoProvider,
    pub video_id: String,
}

impl VideoSource {
    fn youtube(id: &str) -> Self {
        Self {
            provider: VideoProvider::Youtube,
            video_id: id.to_string(),
        }
    }

    fn vimeo(id: &str) -> Self {
        Self {
            provider: VideoProvider::Vimeo,
            video_id: id.to_string(),
        }
    }
}

/// Resolve a pasted video URL (or a bare YouTube id) into a provider and id.
pub fn parse_video_source(input: &str) -> Result<VideoSource, DomainError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("video URL is required"));
    }

    if is_youtube_id(trimmed) {
        return Ok(VideoSource::youtube(trimmed));
    }

    let url = Url::parse(trimmed)
        .map_err(|err| DomainError::validation(format!("`{trimmed}` is not a valid URL: {err}")))?;

    let host = url
        .host_str()
        .unwrap_or_default()
        .trim_start_matches("www.")
        .trim_start_matches("m.");
    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    let source = match host {
        "youtube.com" | "youtube-nocookie.com" => {
            let candidate = if url.path() == "/watch" {
                url.query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned())
            } else {
                match segments.as_slice() {
                    ["embed" | "shorts" | "live" | "v", id, ..] => Some((*id).to_string()),
                    _ => None,
                }
            };
            candidate
                .filter(|id| is_youtube_id(id))
                .map(|id| VideoSource::youtube(&id))
        }
        "youtu.be" => segments
            .first()
            .filter(|id| is_youtube_id(id))
            .map(|id| VideoSource::youtube(id)),
        "vimeo.com" | "player.vimeo.com" => segments
            .last()
            .filter(|id| is_vimeo_id(id))
            .map(|id| VideoSource::vimeo(id)),
        _ => {
            return Err(DomainError::validation(format!(
                "unsupported video host `{host}`"
            )));
        }
    };

    source.ok_or_else(|| {
        DomainError::validation(format!("could not find a video id in `{trimmed}`"))
    })
}

pub fn embed_url(provider: VideoProvider, video_id: &str) -> String {
    match provider {
        VideoProvider::Youtube => format!("https://www.youtube-nocookie.com/embed/{video_id}"),
        VideoProvider::Vimeo => format!("https://player.vimeo.com/video/{video_id}"),
    }
}

pub fn watch_url(provider: VideoProvider, video_id: &str) -> String {
    match provider {
        VideoProvider::Youtube => format!("https://www.youtube.com/watch?v={video_id}"),
        VideoProvider::Vimeo => format!("https://vimeo.com/{video_id}"),
    }
}

fn is_youtube_id(candidate: &str) -> bool {
    candidate.len() == YOUTUBE_ID_LEN
        && candidate
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

fn is_vimeo_id(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate.len() <= MAX_VIMEO_ID_LEN
        && candidate.chars().all(|ch| ch.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_youtube_urls() {
        let expected = VideoSource::youtube("dQw4w9WgXcQ");
        for input in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?t=42",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://youtube.com/shorts/dQw4w9WgXcQ",
            "  dQw4w9WgXcQ  ",
        ] {
            assert_eq!(parse_video_source(input), Ok(expected.clone()), "{input}");
        }
    }

    #[test]
    fn parses_vimeo_urls() {
        let expected = VideoSource::vimeo("76979871");
        assert_eq!(
            parse_video_source("https://vimeo.com/76979871"),
            Ok(expected.clone())
        );
        assert_eq!(
            parse_video_source("https://player.vimeo.com/video/76979871"),
            Ok(expected)
        );
    }

    #[test]
    fn rejects_unknown_hosts_and_missing_ids() {
        assert!(parse_video_source("").is_err());
        assert!(parse_video_source("https://example.com/watch?v=dQw4w9WgXcQ").is_err());
        assert!(parse_video_source("https://www.youtube.com/watch?v=short").is_err());
        assert!(parse_video_source("https://vimeo.com/channels/staffpicks").is_err());
        assert!(parse_video_source("not a url").is_err());
    }

    #[test]
    fn builds_privacy_friendly_embed_urls() {
        assert_eq!(
            embed_url(VideoProvider::Youtube, "dQw4w9WgXcQ"),
            "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ"
        );
        assert_eq!(
            embed_url(VideoProvider::Vimeo, "76979871"),
            "https://player.vimeo.com/video/76979871"
        );
    }
}
