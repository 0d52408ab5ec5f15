//! Fakes for the ports, shared by the controller and router tests.

use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use wiremock::{matchers::method, Mock, MockServer, ResponseTemplate};

use crate::{
    assets::AssetStore,
    domain::{ChatId, MessageRef, PostId, UserId},
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{ChatAction, InlineKeyboard},
    },
    ports::{DescriptionSource, FileLocator, Publisher, TextGenerator},
    workflow::DraftController,
    Result,
};

#[derive(Default)]
pub(crate) struct FakeAi {
    pub calls: AtomicUsize,
    fail_next: Mutex<bool>,
}

impl FakeAi {
    pub fn fail_next(&self) {
        *self.fail_next.lock().unwrap() = true;
    }
}

#[async_trait]
impl TextGenerator for FakeAi {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if std::mem::take(&mut *self.fail_next.lock().unwrap()) {
            return Err(Error::EmptyResponse);
        }
        Ok(format!("AI: {}", prompt.trim()))
    }
}

#[derive(Clone, Debug)]
pub(crate) struct ImagePost {
    pub text: String,
    pub path: PathBuf,
    pub existed_during_call: bool,
}

#[derive(Default)]
pub(crate) struct FakePublisher {
    pub text_posts: Mutex<Vec<String>>,
    pub image_posts: Mutex<Vec<ImagePost>>,
    next_id: AtomicUsize,
    fail_with: Mutex<Option<fn() -> Error>>,
}

impl FakePublisher {
    pub fn fail_with(&self, make: fn() -> Error) {
        *self.fail_with.lock().unwrap() = Some(make);
    }

    pub fn total_calls(&self) -> usize {
        self.text_posts.lock().unwrap().len() + self.image_posts.lock().unwrap().len()
    }

    async fn outcome(&self) -> Result<PostId> {
        // Yield so concurrent publishers actually interleave.
        tokio::task::yield_now().await;
        if let Some(make) = *self.fail_with.lock().unwrap() {
            return Err(make());
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(PostId(format!("urn:li:share:{n}")))
    }
}

#[async_trait]
impl Publisher for FakePublisher {
    async fn create_text_post(&self, text: &str) -> Result<PostId> {
        self.text_posts.lock().unwrap().push(text.to_string());
        self.outcome().await
    }

    async fn create_image_post(&self, text: &str, image: &Path) -> Result<PostId> {
        self.image_posts.lock().unwrap().push(ImagePost {
            text: text.to_string(),
            path: image.to_path_buf(),
            existed_during_call: image.exists(),
        });
        self.outcome().await
    }
}

pub(crate) struct FakeDescriptions {
    pub calls: AtomicUsize,
    value: Mutex<Option<String>>,
}

impl FakeDescriptions {
    pub fn set(&self, value: Option<&str>) {
        *self.value.lock().unwrap() = value.map(str::to_string);
    }
}

impl Default for FakeDescriptions {
    fn default() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            value: Mutex::new(Some("A test project.".to_string())),
        }
    }
}

#[async_trait]
impl DescriptionSource for FakeDescriptions {
    async fn describe(&self, _query: &str) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.value.lock().unwrap().clone()
    }
}

/// Resolves file ids to URLs on a local mock server that serves image bytes.
pub(crate) struct FakeFiles {
    base: String,
}

#[async_trait]
impl FileLocator for FakeFiles {
    async fn download_url(&self, file_id: &str) -> Result<String> {
        Ok(format!("{}/file/photos/{file_id}.jpg", self.base))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Sent {
    Reply {
        to: MessageRef,
        text: String,
        keyboard: Option<InlineKeyboard>,
    },
    Edit {
        msg: MessageRef,
        text: String,
        keyboard: Option<InlineKeyboard>,
    },
    EditKeyboard {
        msg: MessageRef,
        keyboard: InlineKeyboard,
    },
    Answer {
        callback_id: String,
        text: Option<String>,
        show_alert: bool,
    },
}

#[derive(Default)]
pub(crate) struct FakeMessenger {
    sent: Mutex<Vec<Sent>>,
    next_id: AtomicUsize,
}

impl FakeMessenger {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn reply_texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Reply { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl MessagingPort for FakeMessenger {
    async fn reply_text(
        &self,
        to: MessageRef,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<MessageRef> {
        self.sent.lock().unwrap().push(Sent::Reply {
            to,
            text: text.to_string(),
            keyboard,
        });
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i32 + 1000;
        Ok(MessageRef {
            chat_id: to.chat_id,
            message_id: crate::domain::MessageId(id),
        })
    }

    async fn edit_text(
        &self,
        msg: MessageRef,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<()> {
        self.sent.lock().unwrap().push(Sent::Edit {
            msg,
            text: text.to_string(),
            keyboard,
        });
        Ok(())
    }

    async fn edit_keyboard(&self, msg: MessageRef, keyboard: InlineKeyboard) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push(Sent::EditKeyboard { msg, keyboard });
        Ok(())
    }

    async fn send_chat_action(&self, _chat_id: ChatId, _action: ChatAction) -> Result<()> {
        Ok(())
    }

    async fn answer_callback_query(
        &self,
        callback_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<()> {
        self.sent.lock().unwrap().push(Sent::Answer {
            callback_id: callback_id.to_string(),
            text: text.map(str::to_string),
            show_alert,
        });
        Ok(())
    }
}

/// A controller wired to fakes, plus handles to inspect them.
pub(crate) struct Harness {
    pub controller: Arc<DraftController>,
    pub ai: Arc<FakeAi>,
    pub publisher: Arc<FakePublisher>,
    pub descriptions: Arc<FakeDescriptions>,
    pub downloads: PathBuf,
    _server: MockServer,
    _tmp: tempfile::TempDir,
}

impl Harness {
    pub async fn new(owner: UserId) -> Self {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0]))
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let downloads = tmp.path().join("downloads");

        let ai = Arc::new(FakeAi::default());
        let publisher = Arc::new(FakePublisher::default());
        let descriptions = Arc::new(FakeDescriptions::default());
        let files = Arc::new(FakeFiles { base: server.uri() });

        let controller = Arc::new(DraftController::new(
            owner,
            AssetStore::new(&downloads),
            ai.clone(),
            publisher.clone(),
            descriptions.clone(),
            files,
        ));

        Self {
            controller,
            ai,
            publisher,
            descriptions,
            downloads,
            _server: server,
            _tmp: tmp,
        }
    }
}
