//! Draft lifecycle: seed -> AI expand -> publish.
//!
//! Every mutating entry point checks the owner before touching any state.

use std::{path::Path, sync::Arc};

use tracing::{info, warn};

use crate::{
    assets::AssetStore,
    domain::{DraftId, PostId, UserId},
    drafts::{Draft, DraftIdGenerator, DraftStore},
    errors::Error,
    messaging::{
        callback::CallbackAction,
        types::{InlineButton, InlineKeyboard, PhotoAttachment, RepliedMessage},
    },
    ports::{DescriptionSource, FileLocator, Publisher, TextGenerator},
    prompt::{build_prompt, FALLBACK_DESCRIPTION},
    security::is_owner,
    Result,
};

pub const SEND_REPO_URL: &str = "Send repo URL";
pub const SEND_TEXT_TO_PROCESS: &str = "Send text to process";
pub const SEND_TEXT_TO_POST: &str = "Send text to post";

/// A freshly created draft and the prompt shown to the owner.
#[derive(Clone, Debug)]
pub struct Seeded {
    pub draft_id: DraftId,
    pub prompt: String,
}

impl Seeded {
    pub fn keyboard(&self) -> InlineKeyboard {
        InlineKeyboard::single(InlineButton::callback(
            "Proceed",
            CallbackAction::Proceed(self.draft_id.clone()).encode(),
        ))
    }
}

#[derive(Clone, Debug)]
pub struct Expanded {
    pub draft_id: DraftId,
    pub text: String,
}

impl Expanded {
    pub fn keyboard(&self) -> InlineKeyboard {
        InlineKeyboard::single(InlineButton::callback(
            "Post to LinkedIn",
            CallbackAction::Post(self.draft_id.clone()).encode(),
        ))
    }
}

#[derive(Clone, Debug)]
pub struct Published {
    pub post_id: PostId,
    pub url: String,
}

impl Published {
    fn new(post_id: PostId) -> Self {
        let url = post_id.url();
        Self { post_id, url }
    }

    pub fn keyboard(&self) -> InlineKeyboard {
        InlineKeyboard::single(InlineButton::url("Link", self.url.clone()))
    }
}

pub struct DraftController {
    owner: UserId,
    drafts: DraftStore,
    ids: DraftIdGenerator,
    assets: AssetStore,
    ai: Arc<dyn TextGenerator>,
    publisher: Arc<dyn Publisher>,
    descriptions: Arc<dyn DescriptionSource>,
    files: Arc<dyn FileLocator>,
}

impl DraftController {
    pub fn new(
        owner: UserId,
        assets: AssetStore,
        ai: Arc<dyn TextGenerator>,
        publisher: Arc<dyn Publisher>,
        descriptions: Arc<dyn DescriptionSource>,
        files: Arc<dyn FileLocator>,
    ) -> Self {
        Self {
            owner,
            drafts: DraftStore::new(),
            ids: DraftIdGenerator::new(),
            assets,
            ai,
            publisher,
            descriptions,
            files,
        }
    }

    pub fn drafts(&self) -> &DraftStore {
        &self.drafts
    }

    pub fn authorize(&self, sender: Option<UserId>) -> Result<()> {
        if is_owner(sender, self.owner) {
            Ok(())
        } else {
            Err(Error::Unauthorized)
        }
    }

    /// Create a draft holding a generation prompt for `query`, with an optional image.
    pub async fn seed(
        &self,
        sender: Option<UserId>,
        query: &str,
        photo: Option<&PhotoAttachment>,
    ) -> Result<Seeded> {
        self.authorize(sender)?;
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::MissingArgument(SEND_REPO_URL));
        }

        let local_image = match photo {
            Some(p) => Some(self.fetch_image(p).await?),
            None => None,
        };

        let description = self
            .descriptions
            .describe(query)
            .await
            .unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string());
        let prompt = build_prompt(query, &description);

        let draft_id = self.ids.next_id();
        let mut draft = Draft::seeded(draft_id.clone(), prompt.clone());
        if let (Some(p), Some(path)) = (photo, local_image) {
            draft = draft.with_image(p.file_id.clone(), path);
        }

        let image = draft.local_image.clone();
        if let Err(e) = self.drafts.create(draft) {
            if let Some(path) = image {
                self.assets.discard(&path).await;
            }
            return Err(e);
        }

        info!(draft_id = %draft_id, with_image = photo.is_some(), "draft seeded");
        Ok(Seeded { draft_id, prompt })
    }

    /// Replace the draft text with the AI completion of its current text.
    ///
    /// The draft is untouched if the AI call fails. Concurrent expansions of the
    /// same draft are last-write-wins.
    pub async fn expand(&self, id: &DraftId) -> Result<Expanded> {
        let draft = self.drafts.get(id).ok_or(Error::Expired)?;

        let text = self.ai.complete(&draft.text).await?;
        self.drafts.update(id, |d| d.expand(text.clone()))?;

        info!(draft_id = %id, "draft expanded");
        Ok(Expanded {
            draft_id: id.clone(),
            text,
        })
    }

    /// Take the draft out of the store and publish it.
    ///
    /// The draft is gone whatever the outcome; a failed publish cannot be retried
    /// under the same id.
    pub async fn publish(&self, id: &DraftId) -> Result<Published> {
        let draft = self.drafts.take(id).ok_or(Error::Expired)?;

        let res = self
            .publish_content(&draft.text, draft.local_image.as_deref())
            .await;
        match &res {
            Ok(p) => info!(
                draft_id = %id,
                post = %p.post_id.0,
                age_secs = draft.age_secs(),
                "draft published"
            ),
            Err(e) => warn!(
                draft_id = %id,
                age_secs = draft.age_secs(),
                error = %e,
                "draft publish failed"
            ),
        }
        res
    }

    /// `/post`: publish immediately without a draft.
    ///
    /// Replied-to text wins over the command argument; a replied-to photo is attached.
    pub async fn publish_direct(
        &self,
        sender: Option<UserId>,
        args: &str,
        reply: Option<&RepliedMessage>,
    ) -> Result<Published> {
        self.authorize(sender)?;

        let text = direct_post_text(args, reply);
        let photo = reply.and_then(|r| r.photo.as_ref());
        if text.trim().is_empty() && photo.is_none() {
            return Err(Error::MissingArgument(SEND_TEXT_TO_POST));
        }

        let local_image = match photo {
            Some(p) => Some(self.fetch_image(p).await?),
            None => None,
        };

        let res = self.publish_content(&text, local_image.as_deref()).await;
        if let Ok(p) = &res {
            info!(post = %p.post_id.0, "direct post published");
        }
        res
    }

    /// `/ai`: one-shot completion.
    pub async fn complete(&self, sender: Option<UserId>, query: &str) -> Result<String> {
        self.authorize(sender)?;
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::MissingArgument(SEND_TEXT_TO_PROCESS));
        }
        self.ai.complete(query).await
    }

    async fn fetch_image(&self, photo: &PhotoAttachment) -> Result<std::path::PathBuf> {
        let url = self.files.download_url(&photo.file_id).await?;
        self.assets.download(&url).await
    }

    /// The local image, if any, is deleted exactly once after the attempt.
    async fn publish_content(&self, text: &str, image: Option<&Path>) -> Result<Published> {
        let post_id = match image {
            Some(path) => {
                let res = self.publisher.create_image_post(text, path).await;
                self.assets.discard(path).await;
                res?
            }
            None => self.publisher.create_text_post(text).await?,
        };
        Ok(Published::new(post_id))
    }
}

fn direct_post_text(args: &str, reply: Option<&RepliedMessage>) -> String {
    match reply.and_then(|r| r.text.as_deref()) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => args.trim().to_string(),
    }
}
