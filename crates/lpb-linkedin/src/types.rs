//! Typed payloads for the LinkedIn v2 `assets` and `ugcPosts` endpoints.

use serde::{Deserialize, Serialize};

const FEEDSHARE_IMAGE_RECIPE: &str = "urn:li:digitalmediaRecipe:feedshare-image";
const USER_GENERATED_CONTENT: &str = "urn:li:userGeneratedContent";

// ============== Register upload ==============

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUploadRequest {
    pub register_upload_request: RegisterUploadSpec,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUploadSpec {
    pub owner: String,
    pub recipes: Vec<&'static str>,
    pub service_relationships: Vec<ServiceRelationship>,
    pub supported_upload_mechanism: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRelationship {
    pub identifier: &'static str,
    pub relationship_type: &'static str,
}

impl RegisterUploadRequest {
    /// Synchronous upload of one feed-share image owned by `owner`.
    pub fn feed_image(owner: impl Into<String>) -> Self {
        Self {
            register_upload_request: RegisterUploadSpec {
                owner: owner.into(),
                recipes: vec![FEEDSHARE_IMAGE_RECIPE],
                service_relationships: vec![ServiceRelationship {
                    identifier: USER_GENERATED_CONTENT,
                    relationship_type: "OWNER",
                }],
                supported_upload_mechanism: vec!["SYNCHRONOUS_UPLOAD"],
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterUploadResponse {
    pub value: RegisterUploadValue,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUploadValue {
    pub upload_mechanism: UploadMechanism,
    pub asset: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadMechanism {
    #[serde(rename = "com.linkedin.digitalmedia.uploading.MediaUploadHttpRequest")]
    pub http_request: MediaUploadHttpRequest,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaUploadHttpRequest {
    pub upload_url: String,
}

// ============== Post creation ==============

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UgcPost {
    pub author: String,
    pub lifecycle_state: &'static str,
    pub specific_content: SpecificContent,
    pub visibility: Visibility,
}

#[derive(Debug, Serialize)]
pub struct SpecificContent {
    #[serde(rename = "com.linkedin.ugc.ShareContent")]
    pub share_content: ShareContent,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareContent {
    pub share_commentary: TextValue,
    pub share_media_category: MediaCategory,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<ShareMedia>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MediaCategory {
    None,
    Image,
}

#[derive(Debug, Serialize)]
pub struct ShareMedia {
    pub status: &'static str,
    pub description: TextValue,
    pub media: String,
    pub title: TextValue,
}

#[derive(Debug, Serialize)]
pub struct TextValue {
    pub text: String,
}

impl TextValue {
    fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Serialize)]
pub struct Visibility {
    #[serde(rename = "com.linkedin.ugc.MemberNetworkVisibility")]
    pub member_network_visibility: &'static str,
}

impl UgcPost {
    /// Public, published text-only post.
    pub fn text(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            lifecycle_state: "PUBLISHED",
            specific_content: SpecificContent {
                share_content: ShareContent {
                    share_commentary: TextValue::new(text),
                    share_media_category: MediaCategory::None,
                    media: Vec::new(),
                },
            },
            visibility: Visibility {
                member_network_visibility: "PUBLIC",
            },
        }
    }

    /// Public, published post carrying one uploaded image asset.
    pub fn image(author: impl Into<String>, text: impl Into<String>, asset: impl Into<String>) -> Self {
        let mut post = Self::text(author, text);
        let content = &mut post.specific_content.share_content;
        content.share_media_category = MediaCategory::Image;
        content.media.push(ShareMedia {
            status: "READY",
            description: TextValue::new("Image description"),
            media: asset.into(),
            title: TextValue::new("Image Title"),
        });
        post
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UgcPostResponse {
    pub id: Option<String>,
}
