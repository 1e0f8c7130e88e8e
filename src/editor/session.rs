//! Load/edit/save state machine for one article at a time
//!
//! The session mirrors what an editing UI holds in memory: parsed front
//! matter, the body text, and the media list, plus a dirty flag. All network
//! effects go through the storage gateways; a failed save or upload leaves
//! every unsaved edit in place.

use std::sync::Arc;

use crate::content::front_matter::{self, FieldValue, FrontMatter};
use crate::content::media;
use crate::store::{
    ArticleReader, MediaLister, MediaUploader, PersistenceGateway, StoreError, StoreResult,
};

/// Front-matter key receiving the path of the last uploaded image
const HEADER_IMAGE_KEY: &str = "header-image";

/// Front-matter key holding the declared media list
const MEDIA_KEY: &str = "media";

/// Lifecycle of the document held by an [`EditorSession`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing loaded yet
    Idle,
    /// A load is in flight
    Loading,
    /// Document loaded, no unsaved changes
    Loaded,
    /// Document has unsaved changes
    Editing,
    /// A save is in flight
    Saving,
    /// The last save failed; all edits are retained
    SaveError,
}

#[derive(Debug, Clone)]
struct Document {
    category: String,
    slug: String,
    front_matter: FrontMatter,
    body: String,
    media: Vec<String>,
}

/// Client-visible editing session for a single article.
///
/// Sessions do not coordinate with each other: two sessions may save the
/// same article concurrently, and the version-token check inside the
/// persistence gateway is the only conflict arbiter.
pub struct EditorSession {
    reader: Arc<dyn ArticleReader>,
    media_lister: Arc<dyn MediaLister>,
    persistence: PersistenceGateway,
    uploader: Arc<dyn MediaUploader>,
    /// Remote path prefix of the content tree (e.g. `texts`)
    content_root: String,
    state: SessionState,
    dirty: bool,
    document: Option<Document>,
}

impl EditorSession {
    pub fn new(
        reader: Arc<dyn ArticleReader>,
        media_lister: Arc<dyn MediaLister>,
        persistence: PersistenceGateway,
        uploader: Arc<dyn MediaUploader>,
        content_root: impl Into<String>,
    ) -> Self {
        Self {
            reader,
            media_lister,
            persistence,
            uploader,
            content_root: content_root.into(),
            state: SessionState::Idle,
            dirty: false,
            document: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Front matter of the loaded document
    pub fn front_matter(&self) -> Option<&FrontMatter> {
        self.document.as_ref().map(|doc| &doc.front_matter)
    }

    /// Body of the loaded document
    pub fn body(&self) -> Option<&str> {
        self.document.as_ref().map(|doc| doc.body.as_str())
    }

    /// Media list of the loaded document (empty when nothing is loaded)
    pub fn media(&self) -> &[String] {
        self.document
            .as_ref()
            .map(|doc| doc.media.as_slice())
            .unwrap_or_default()
    }

    /// Fetch an article and its media listing, replacing whatever the
    /// session held before.
    ///
    /// When either fetch fails the session keeps its previous document and
    /// returns to its previous state.
    pub async fn load(&mut self, category: &str, slug: &str) -> StoreResult<()> {
        let previous = self.state;
        self.state = SessionState::Loading;

        let raw = match self.reader.get(category, slug).await {
            Ok(raw) => raw,
            Err(e) => {
                self.state = previous;
                return Err(e);
            }
        };
        let listed = match self.media_lister.list(category, slug).await {
            Ok(listed) => listed,
            Err(e) => {
                self.state = previous;
                return Err(e);
            }
        };

        let (fm, body) = front_matter::parse(&raw);
        let declared = fm.list(MEDIA_KEY).unwrap_or_default();
        let merged = media::merge(declared, listed);

        self.document = Some(Document {
            category: category.to_string(),
            slug: slug.to_string(),
            media: merged,
            front_matter: fm,
            body,
        });
        self.dirty = false;
        self.state = SessionState::Loaded;
        Ok(())
    }

    /// Overwrite one front-matter field. No validation is applied to the
    /// value. Ignored when nothing is loaded.
    pub fn edit_field(&mut self, key: &str, value: FieldValue) {
        if let Some(doc) = self.document.as_mut() {
            doc.front_matter.set(key, value);
            self.dirty = true;
            self.state = SessionState::Editing;
        }
    }

    /// Replace the body text. Ignored when nothing is loaded.
    pub fn edit_body(&mut self, text: impl Into<String>) {
        if let Some(doc) = self.document.as_mut() {
            doc.body = text.into();
            self.dirty = true;
            self.state = SessionState::Editing;
        }
    }

    /// Persist the current document through the persistence gateway.
    ///
    /// Clean sessions return without touching the store. On failure the
    /// session moves to [`SessionState::SaveError`] with every edit intact,
    /// ready to resubmit after a reload.
    pub async fn save(&mut self) -> StoreResult<()> {
        if !self.dirty {
            return Ok(());
        }
        let Some(doc) = self.document.as_ref() else {
            return Ok(());
        };

        let path = format!(
            "{}/{}/{}/{}.md",
            self.content_root, doc.category, doc.slug, doc.slug
        );
        let content = front_matter::serialize(&doc.front_matter, &doc.body);

        self.state = SessionState::Saving;
        match self.persistence.commit(&path, &content).await {
            Ok(()) => {
                self.dirty = false;
                self.state = SessionState::Loaded;
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::SaveError;
                Err(e)
            }
        }
    }

    /// Upload a media file for the loaded article and reference it: the
    /// returned path is appended to the media list (including the declared
    /// front-matter list, so it survives the save round trip) and becomes
    /// the header image. A failed upload changes nothing.
    pub async fn upload_media(&mut self, filename: &str, bytes: &[u8]) -> StoreResult<String> {
        let Some(doc) = self.document.as_mut() else {
            return Err(StoreError::BadRequest("no article loaded".to_string()));
        };

        let path = self
            .uploader
            .store(&doc.category, &doc.slug, filename, bytes)
            .await?;

        if !doc.media.contains(&path) {
            doc.media.push(path.clone());
        }
        let mut declared: Vec<String> = doc
            .front_matter
            .list(MEDIA_KEY)
            .unwrap_or_default()
            .to_vec();
        if !declared.contains(&path) {
            declared.push(path.clone());
        }
        doc.front_matter.set(MEDIA_KEY, FieldValue::List(declared));
        doc.front_matter
            .set(HEADER_IMAGE_KEY, FieldValue::Text(path.clone()));
        self.dirty = true;
        self.state = SessionState::Editing;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::VersionedStore;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MockReader {
        articles: HashMap<(String, String), String>,
    }

    #[async_trait]
    impl ArticleReader for MockReader {
        async fn get(&self, category: &str, slug: &str) -> StoreResult<String> {
            self.articles
                .get(&(category.to_string(), slug.to_string()))
                .cloned()
                .ok_or(StoreError::NotFound)
        }
    }

    struct MockLister {
        media: Vec<String>,
    }

    #[async_trait]
    impl MediaLister for MockLister {
        async fn list(&self, _category: &str, _slug: &str) -> StoreResult<Vec<String>> {
            Ok(self.media.clone())
        }
    }

    struct MockVersionedStore {
        stale: bool,
        commits: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl VersionedStore for MockVersionedStore {
        async fn fetch_version_token(&self, _path: &str) -> StoreResult<String> {
            Ok("sha-1".to_string())
        }

        async fn commit(&self, path: &str, content: &str, _token: &str) -> StoreResult<()> {
            if self.stale {
                return Err(StoreError::Upstream("409 Conflict".to_string()));
            }
            self.commits
                .lock()
                .unwrap()
                .push((path.to_string(), content.to_string()));
            Ok(())
        }
    }

    struct MockUploader {
        fail: bool,
    }

    #[async_trait]
    impl MediaUploader for MockUploader {
        async fn store(
            &self,
            category: &str,
            slug: &str,
            filename: &str,
            _bytes: &[u8],
        ) -> StoreResult<String> {
            if self.fail {
                return Err(StoreError::Upstream("disk full".to_string()));
            }
            Ok(format!("/media/{}/{}/{}", category, slug, filename))
        }
    }

    const RAW: &str = "---\ntitle: Test\nmedia: [/texts/Bascule/my-slug/a.jpg]\n---\n# Test\ncontent body";

    fn session_with(
        stale: bool,
        upload_fails: bool,
    ) -> (EditorSession, Arc<MockVersionedStore>) {
        let mut articles = HashMap::new();
        articles.insert(
            ("Bascule".to_string(), "my-slug".to_string()),
            RAW.to_string(),
        );

        let store = Arc::new(MockVersionedStore {
            stale,
            commits: Mutex::new(Vec::new()),
        });
        let session = EditorSession::new(
            Arc::new(MockReader { articles }),
            Arc::new(MockLister {
                media: vec![
                    "/texts/Bascule/my-slug/a.jpg".to_string(),
                    "/texts/Bascule/my-slug/b.jpg".to_string(),
                ],
            }),
            PersistenceGateway::new(store.clone()),
            Arc::new(MockUploader { fail: upload_fails }),
            "texts",
        );
        (session, store)
    }

    #[tokio::test]
    async fn test_load_parses_and_merges_media() {
        let (mut session, _) = session_with(false, false);

        session.load("Bascule", "my-slug").await.unwrap();

        assert_eq!(session.state(), SessionState::Loaded);
        assert!(!session.is_dirty());
        assert_eq!(session.front_matter().unwrap().text("title"), Some("Test"));
        assert_eq!(session.body(), Some("# Test\ncontent body"));
        assert_eq!(
            session.media(),
            [
                "/texts/Bascule/my-slug/a.jpg",
                "/texts/Bascule/my-slug/b.jpg"
            ]
        );
    }

    #[tokio::test]
    async fn test_load_failure_keeps_previous_state() {
        let (mut session, _) = session_with(false, false);

        let result = session.load("Bascule", "missing").await;
        assert!(matches!(result, Err(StoreError::NotFound)));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.body().is_none());

        // A loaded document survives a later failed load
        session.load("Bascule", "my-slug").await.unwrap();
        session.edit_body("draft");
        let result = session.load("Bascule", "missing").await;
        assert!(result.is_err());
        assert_eq!(session.state(), SessionState::Editing);
        assert_eq!(session.body(), Some("draft"));
    }

    #[tokio::test]
    async fn test_edits_mark_dirty() {
        let (mut session, _) = session_with(false, false);
        session.load("Bascule", "my-slug").await.unwrap();

        session.edit_field("author", FieldValue::Text("Jane".to_string()));
        assert!(session.is_dirty());
        assert_eq!(session.state(), SessionState::Editing);

        session.edit_body("rewritten");
        assert_eq!(session.body(), Some("rewritten"));
    }

    #[tokio::test]
    async fn test_edit_before_load_is_ignored() {
        let (mut session, _) = session_with(false, false);
        session.edit_body("nothing to edit");
        assert!(!session.is_dirty());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_save_noop_when_clean() {
        let (mut session, store) = session_with(false, false);
        session.load("Bascule", "my-slug").await.unwrap();

        session.save().await.unwrap();
        assert!(store.commits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_serializes_and_clears_dirty() {
        let (mut session, store) = session_with(false, false);
        session.load("Bascule", "my-slug").await.unwrap();
        session.edit_body("# Test\nnew body");

        session.save().await.unwrap();

        assert!(!session.is_dirty());
        assert_eq!(session.state(), SessionState::Loaded);

        let commits = store.commits.lock().unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].0, "texts/Bascule/my-slug/my-slug.md");
        assert!(commits[0].1.contains("title: Test"));
        assert!(commits[0].1.contains("media: [/texts/Bascule/my-slug/a.jpg]"));
        assert!(commits[0].1.ends_with("# Test\nnew body"));
    }

    #[tokio::test]
    async fn test_stale_token_save_keeps_edits() {
        let (mut session, _) = session_with(true, false);
        session.load("Bascule", "my-slug").await.unwrap();
        session.edit_body("edited and unsaved");

        let result = session.save().await;

        assert!(matches!(result, Err(StoreError::Upstream(_))));
        assert_eq!(session.state(), SessionState::SaveError);
        assert!(session.is_dirty());
        assert_eq!(session.body(), Some("edited and unsaved"));
    }

    #[tokio::test]
    async fn test_upload_appends_media_and_sets_header() {
        let (mut session, _) = session_with(false, false);
        session.load("Bascule", "my-slug").await.unwrap();

        let path = session.upload_media("photo.png", b"bytes").await.unwrap();

        assert_eq!(path, "/media/Bascule/my-slug/photo.png");
        assert!(session.media().contains(&path));
        // The declared list carries the upload so a save persists it
        let declared = session.front_matter().unwrap().list("media").unwrap();
        assert!(declared.contains(&path));
        assert_eq!(
            session.front_matter().unwrap().text("header-image"),
            Some(path.as_str())
        );
        assert!(session.is_dirty());
    }

    #[tokio::test]
    async fn test_uploaded_media_survives_save() {
        let (mut session, store) = session_with(false, false);
        session.load("Bascule", "my-slug").await.unwrap();

        let path = session.upload_media("photo.png", b"bytes").await.unwrap();
        session.save().await.unwrap();

        let commits = store.commits.lock().unwrap();
        assert!(commits[0].1.contains(&path));
    }

    #[tokio::test]
    async fn test_upload_failure_changes_nothing() {
        let (mut session, _) = session_with(false, true);
        session.load("Bascule", "my-slug").await.unwrap();
        let media_before = session.media().to_vec();

        let result = session.upload_media("photo.png", b"bytes").await;

        assert!(matches!(result, Err(StoreError::Upstream(_))));
        assert_eq!(session.media(), media_before);
        assert!(!session.is_dirty());
        assert_eq!(session.state(), SessionState::Loaded);
        assert!(session.front_matter().unwrap().text("header-image").is_none());
    }

    #[tokio::test]
    async fn test_upload_without_document_is_rejected() {
        let (mut session, _) = session_with(false, false);
        let result = session.upload_media("photo.png", b"bytes").await;
        assert!(matches!(result, Err(StoreError::BadRequest(_))));
    }
}
