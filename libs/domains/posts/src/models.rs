use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{PostError, PostResult};

/// A single question on a form post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormQuestion {
    pub question: String,
    /// Rendering hint for the client, e.g. "text" or "checkbox"
    pub input_type: String,
    /// Maximum selections, kept as free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_sel: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: Vec<String>,
}

/// The question block of a vote post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VoteQuestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// Post document as stored in the `posts` collection.
///
/// Dates are stored as native BSON datetimes. Exactly one of
/// `form_questions` / `vote_questions` is meaningful, selected by `kind`;
/// nothing enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Hex copy of `id`
    #[serde(rename = "postID", default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    /// Empty when the stored document has none; dispatch rejects it
    #[serde(default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assign_to: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub public: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(with = "bson_datetime")]
    pub post_date: DateTime<Utc>,
    #[serde(default, with = "bson_datetime::option")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub form_questions: Vec<FormQuestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_questions: Option<VoteQuestion>,
}

/// Reads an explicit `null` the same way as a missing field.
///
/// Documents written by older clients store empty lists and unset scalars
/// as BSON `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Event document from the `events` collection. Only the post list is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(rename = "postList", default)]
    pub post_list: Option<Vec<ObjectId>>,
}

impl Event {
    pub fn post_ids(&self) -> &[ObjectId] {
        self.post_list.as_deref().unwrap_or_default()
    }
}

/// Post body as submitted over HTTP.
///
/// Identifiers are hex strings; `_id` may be omitted, in which case one
/// is generated on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostInput {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "65a1b2c3d4e5f60718293a4b")]
    pub id: Option<String>,
    #[serde(rename = "postID", default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    #[validate(length(min = 1, message = "kind must not be empty"))]
    #[schema(example = "vote")]
    pub kind: String,
    #[serde(default)]
    pub assign_to: Vec<String>,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub post_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub form_questions: Vec<FormQuestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_questions: Option<VoteQuestion>,
}

impl PostInput {
    /// Builds the stored document, generating an id when `_id` is absent,
    /// empty or all zeros. `postID` defaults to the hex id.
    pub fn into_post(self) -> PostResult<Post> {
        let id = match self.id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => {
                ObjectId::parse_str(raw).map_err(|_| PostError::InvalidId("updatedPost._id"))?
            }
            None => ObjectId::new(),
        };
        let id = if id.bytes() == [0u8; 12] {
            ObjectId::new()
        } else {
            id
        };

        let post_id = self
            .post_id
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| id.to_hex());

        Ok(Post {
            id,
            post_id: Some(post_id),
            kind: self.kind,
            assign_to: self.assign_to,
            public: self.public,
            title: self.title,
            description: self.description,
            post_date: self.post_date,
            end_date: self.end_date,
            author: self.author,
            markdown: self.markdown,
            form_questions: self.form_questions,
            vote_questions: self.vote_questions,
        })
    }
}

impl From<&Post> for PostInput {
    fn from(post: &Post) -> Self {
        Self {
            id: Some(post.id.to_hex()),
            post_id: post.post_id.clone(),
            kind: post.kind.clone(),
            assign_to: post.assign_to.clone(),
            public: post.public,
            title: post.title.clone(),
            description: post.description.clone(),
            post_date: post.post_date,
            end_date: post.end_date,
            author: post.author.clone(),
            markdown: post.markdown.clone(),
            form_questions: post.form_questions.clone(),
            vote_questions: post.vote_questions.clone(),
        }
    }
}

/// Body of `POST /posts`; also echoed back as the response data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePostRequest {
    #[serde(rename = "eventID")]
    #[schema(example = "65a1b2c3d4e5f60718293a4c")]
    pub event_id: String,
    #[serde(rename = "updatedPost")]
    #[validate(nested)]
    pub updated_post: PostInput,
}

/// Serde adapter storing `chrono` timestamps as BSON datetimes (millisecond precision).
pub(crate) mod bson_datetime {
    use chrono::{DateTime, Utc};
    use mongodb::bson;
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};

    pub fn to_bson(dt: &DateTime<Utc>) -> bson::DateTime {
        bson::DateTime::from_millis(dt.timestamp_millis())
    }

    pub fn from_bson(dt: bson::DateTime) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(dt.timestamp_millis())
    }

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        to_bson(dt).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = bson::DateTime::deserialize(deserializer)?;
        from_bson(raw).ok_or_else(|| D::Error::custom("datetime out of range"))
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            dt: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            dt.as_ref().map(to_bson).serialize(serializer)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<bson::DateTime>::deserialize(deserializer)? {
                Some(raw) => from_bson(raw)
                    .map(Some)
                    .ok_or_else(|| D::Error::custom("datetime out of range")),
                None => Ok(None),
            }
        }
    }
}
