//! Video library management
//!
//! The library is held in memory; persistence lives in the catalog service.

use http::StatusCode;
use reelhub_core::{ApiError, Json, Path, State};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A training video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// Library-assigned identifier
    pub id: u64,
    /// Display title
    pub title: String,
    /// Running time
    pub duration_seconds: u32,
}

/// Body of `POST /api/content/videos`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVideo {
    /// Display title, must not be blank
    pub title: String,
    /// Running time
    #[serde(default)]
    pub duration_seconds: u32,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    videos: BTreeMap<u64, Video>,
}

/// Shared in-memory video store
#[derive(Debug, Clone, Default)]
pub struct VideoLibrary {
    inner: Arc<RwLock<Inner>>,
}

impl VideoLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// All videos, ordered by id
    pub async fn list(&self) -> Vec<Video> {
        self.inner.read().await.videos.values().cloned().collect()
    }

    /// Number of videos
    pub async fn len(&self) -> usize {
        self.inner.read().await.videos.len()
    }

    /// Whether the library is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Add a video and return it with its new id
    pub async fn add(&self, title: String, duration_seconds: u32) -> Video {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let video = Video {
            id: inner.next_id,
            title,
            duration_seconds,
        };
        inner.videos.insert(video.id, video.clone());
        video
    }

    /// Remove a video, returning it if it existed
    pub async fn remove(&self, id: u64) -> Option<Video> {
        self.inner.write().await.videos.remove(&id)
    }
}

/// `GET /api/content/videos`
pub async fn list_videos(State(library): State<VideoLibrary>) -> Json<Value> {
    Json(json!({ "success": true, "videos": library.list().await }))
}

/// `POST /api/content/videos`
pub async fn create_video(
    State(library): State<VideoLibrary>,
    Json(body): Json<NewVideo>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let title = body.title.trim();
    if title.is_empty() {
        return Err(ApiError::bad_request("Title is required"));
    }

    let video = library.add(title.to_string(), body.duration_seconds).await;
    tracing::info!(video_id = video.id, "Video created");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "video": video })),
    ))
}

/// `DELETE /api/content/videos/{id}`
pub async fn delete_video(
    State(library): State<VideoLibrary>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiError> {
    match library.remove(id).await {
        Some(_) => {
            tracing::info!(video_id = id, "Video deleted");
            Ok(Json(json!({ "success": true })))
        }
        None => Err(ApiError::not_found("Video not found")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_library_add_and_remove() {
        let library = VideoLibrary::new();
        assert!(library.is_empty().await);

        let first = library.add("Morning mobility".into(), 600).await;
        let second = library.add("Core basics".into(), 900).await;
        assert_eq!((first.id, second.id), (1, 2));
        assert_eq!(library.len().await, 2);

        let first_id = first.id;
        assert_eq!(library.remove(first_id).await, Some(first));
        assert_eq!(library.remove(first_id).await, None);
        assert_eq!(library.list().await, vec![second]);
    }

    #[test]
    fn test_video_serializes_camel_case() {
        let video = Video {
            id: 7,
            title: "Stretch".into(),
            duration_seconds: 300,
        };
        assert_eq!(
            serde_json::to_value(&video).unwrap(),
            json!({ "id": 7, "title": "Stretch", "durationSeconds": 300 })
        );
    }
}
