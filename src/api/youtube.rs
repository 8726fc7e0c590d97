//! YouTube Data API client for fetching videos and comments
//!
//! This module provides functionality to:
//! - Enumerate the videos published by a channel
//! - Collect all top-level comments on a video
//! - Follow continuation tokens until a listing is exhausted

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";

/// Errors that can occur when interacting with the YouTube Data API
#[derive(Error, Debug)]
pub enum YouTubeError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API key is missing or empty")]
    MissingApiKey,

    #[error("API returned error: {code} - {message}")]
    Api { code: u16, message: String },
}

/// One page of a paginated listing
pub(crate) struct Page<T> {
    pub items: Vec<T>,
    pub next_page_token: Option<String>,
}

/// Drain a paginated listing by re-issuing the request with each
/// continuation token until a page arrives without one.
///
/// Items are accumulated in page order; an error from any page aborts
/// the walk and is returned as-is.
pub(crate) fn collect_paginated<T, F>(mut fetch_page: F) -> Result<Vec<T>, YouTubeError>
where
    F: FnMut(Option<&str>) -> Result<Page<T>, YouTubeError>,
{
    let mut collected = Vec::new();
    let mut token: Option<String> = None;

    loop {
        let page = fetch_page(token.as_deref())?;
        collected.extend(page.items);

        match page.next_page_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    Ok(collected)
}

/// YouTube Data API client
///
/// Uses a static API key supplied at construction; all requests are
/// synchronous and block the calling thread.
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl YouTubeClient {
    /// Create a new client with the given API key
    ///
    /// Fails with [`YouTubeError::MissingApiKey`] when the key is empty,
    /// so a missing credential is caught at process start rather than on
    /// the first request.
    pub fn new(api_key: impl Into<String>) -> Result<Self, YouTubeError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(YouTubeError::MissingApiKey);
        }

        Ok(Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
        })
    }

    /// List the ids of all videos published by a channel
    ///
    /// Issues a paginated search query scoped to the channel, requesting
    /// video-type results only, and accumulates ids until no continuation
    /// token is returned. An invalid or unknown channel id is reported by
    /// the API as a request rejection and recovered here as an empty list;
    /// transport failures propagate as hard errors.
    pub fn list_channel_videos(&self, channel_id: &str) -> Result<Vec<String>, YouTubeError> {
        let result = collect_paginated(|token| {
            let page: SearchPage = self.get_page(
                "/youtube/v3/search",
                &[
                    ("channelId", channel_id),
                    ("part", "id"),
                    ("type", "video"),
                    ("maxResults", "50"),
                ],
                token,
            )?;

            let items = page
                .items
                .into_iter()
                .filter_map(|item| item.id.video_id)
                .collect();

            Ok(Page {
                items,
                next_page_token: page.next_page_token,
            })
        });

        match result {
            Ok(videos) => {
                log::debug!("channel {}: found {} videos", channel_id, videos.len());
                Ok(videos)
            }
            Err(YouTubeError::Api { code, message }) if is_request_rejection(code) => {
                log::warn!(
                    "video listing rejected for channel {}: {} ({})",
                    channel_id,
                    message,
                    code
                );
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    /// List the display text of all top-level comments on a video
    ///
    /// Issues a paginated comment-thread query and accumulates the
    /// top-level comment text across pages until no continuation token is
    /// returned. Disabled comments and invalid video ids are reported by
    /// the API as request rejections and recovered here as an empty list;
    /// transport failures propagate as hard errors.
    pub fn list_video_comments(&self, video_id: &str) -> Result<Vec<String>, YouTubeError> {
        let result = collect_paginated(|token| {
            let page: CommentThreadPage = self.get_page(
                "/youtube/v3/commentThreads",
                &[
                    ("videoId", video_id),
                    ("part", "snippet"),
                    ("textFormat", "plainText"),
                    ("maxResults", "100"),
                ],
                token,
            )?;

            let items = page
                .items
                .into_iter()
                .map(|thread| thread.snippet.top_level_comment.snippet.text_display)
                .collect();

            Ok(Page {
                items,
                next_page_token: page.next_page_token,
            })
        });

        match result {
            Ok(comments) => {
                log::debug!("video {}: collected {} comments", video_id, comments.len());
                Ok(comments)
            }
            Err(YouTubeError::Api { code, message }) if is_request_rejection(code) => {
                log::warn!(
                    "comment listing rejected for video {}: {} ({})",
                    video_id,
                    message,
                    code
                );
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    /// Issue one GET request and deserialize a page of the response
    fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        page_token: Option<&str>,
    ) -> Result<T, YouTubeError> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(params);

        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = request.send()?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json()?);
        }

        let message = response
            .json::<ErrorEnvelope>()
            .map(|body| body.error.message)
            .unwrap_or_else(|_| format!("HTTP status {}", status));

        Err(YouTubeError::Api {
            code: status.as_u16(),
            message,
        })
    }
}

/// Statuses the API uses to reject a request for a bad identifier or a
/// resource with comments disabled, as opposed to a transient failure
fn is_request_rejection(code: u16) -> bool {
    matches!(code, 400 | 403 | 404)
}

// ============= API Response Types =============

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchResultId,
}

#[derive(Debug, Deserialize)]
struct SearchResultId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentThreadPage {
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
    #[serde(default)]
    items: Vec<CommentThread>,
}

#[derive(Debug, Deserialize)]
struct CommentThread {
    snippet: CommentThreadSnippet,
}

#[derive(Debug, Deserialize)]
struct CommentThreadSnippet {
    #[serde(rename = "topLevelComment")]
    top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
struct CommentSnippet {
    #[serde(rename = "textDisplay")]
    text_display: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(items: &[&str], next: Option<&str>) -> Page<String> {
        Page {
            items: items.iter().map(|s| s.to_string()).collect(),
            next_page_token: next.map(String::from),
        }
    }

    #[test]
    fn pagination_collects_all_pages_in_order() {
        let mut calls = 0;
        let result = collect_paginated(|token| {
            calls += 1;
            match token {
                None => Ok(page(&["a", "b"], Some("t1"))),
                Some("t1") => Ok(page(&["c"], Some("t2"))),
                Some("t2") => Ok(page(&["d"], None)),
                Some(other) => panic!("unexpected token {}", other),
            }
        })
        .unwrap();

        assert_eq!(result, vec!["a", "b", "c", "d"]);
        assert_eq!(calls, 3);
    }

    #[test]
    fn pagination_terminates_on_single_page() {
        let mut calls = 0;
        let result = collect_paginated(|token| {
            calls += 1;
            assert!(token.is_none());
            Ok(page(&["only"], None))
        })
        .unwrap();

        assert_eq!(result, vec!["only"]);
        assert_eq!(calls, 1);
    }

    #[test]
    fn pagination_propagates_mid_walk_errors() {
        let result: Result<Vec<String>, _> = collect_paginated(|token| match token {
            None => Ok(page(&["a"], Some("t1"))),
            Some(_) => Err(YouTubeError::Api {
                code: 500,
                message: "backend error".to_string(),
            }),
        });

        assert!(matches!(result, Err(YouTubeError::Api { code: 500, .. })));
    }

    #[test]
    fn empty_api_key_is_rejected() {
        assert!(matches!(
            YouTubeClient::new(""),
            Err(YouTubeError::MissingApiKey)
        ));
        assert!(matches!(
            YouTubeClient::new("   "),
            Err(YouTubeError::MissingApiKey)
        ));
    }

    #[test]
    fn request_rejection_statuses() {
        assert!(is_request_rejection(400));
        assert!(is_request_rejection(403));
        assert!(is_request_rejection(404));
        assert!(!is_request_rejection(429));
        assert!(!is_request_rejection(500));
    }
}
