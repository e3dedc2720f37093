//! Response shapes selected by a post's `kind`.

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::Serialize;
use strum::{Display, EnumString};
use thiserror::Error;
use utoipa::ToSchema;

use crate::models::{FormQuestion, Post, VoteQuestion};

/// Recognized post kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum PostKind {
    Post,
    Vote,
    Form,
}

/// A stored post whose `kind` is not one of [`PostKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("post {id} has unrecognized kind '{kind}'")]
pub struct UnrecognizedKind {
    pub id: ObjectId,
    pub kind: String,
}

/// Fields shared by every response variant.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    #[serde(rename = "_id")]
    #[schema(example = "65a1b2c3d4e5f60718293a4b")]
    pub id: String,
    #[serde(rename = "postID", skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    pub assign_to: Vec<String>,
    pub public: bool,
    pub title: String,
    pub description: String,
    pub post_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    /// True once `endDate` has passed. Computed per response.
    pub time_up: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VotePost {
    #[serde(flatten)]
    pub summary: PostSummary,
    pub vote_questions: Option<VoteQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormPost {
    #[serde(flatten)]
    pub summary: PostSummary,
    pub form_questions: Vec<FormQuestion>,
}

/// A post projected for a response, tagged by `kind` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PostVariant {
    Post(PostSummary),
    Vote(VotePost),
    Form(FormPost),
}

/// `endDate` set and not after `now`.
pub fn is_time_up(end_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    end_date.is_some_and(|end| end <= now)
}

impl PostVariant {
    /// Selects the variant for `post.kind`. Pure apart from reading `now`.
    pub fn dispatch(post: Post, now: DateTime<Utc>) -> Result<Self, UnrecognizedKind> {
        let Ok(kind) = post.kind.parse::<PostKind>() else {
            return Err(UnrecognizedKind {
                id: post.id,
                kind: post.kind,
            });
        };

        let summary = PostSummary {
            id: post.id.to_hex(),
            post_id: post.post_id,
            assign_to: post.assign_to,
            public: post.public,
            title: post.title,
            description: post.description,
            post_date: post.post_date,
            end_date: post.end_date,
            author: post.author,
            markdown: post.markdown,
            time_up: is_time_up(post.end_date, now),
        };

        Ok(match kind {
            PostKind::Post => PostVariant::Post(summary),
            PostKind::Vote => PostVariant::Vote(VotePost {
                summary,
                vote_questions: post.vote_questions,
            }),
            PostKind::Form => PostVariant::Form(FormPost {
                summary,
                form_questions: post.form_questions,
            }),
        })
    }

    pub fn kind(&self) -> PostKind {
        match self {
            PostVariant::Post(_) => PostKind::Post,
            PostVariant::Vote(_) => PostKind::Vote,
            PostVariant::Form(_) => PostKind::Form,
        }
    }

    pub fn summary(&self) -> &PostSummary {
        match self {
            PostVariant::Post(summary) => summary,
            PostVariant::Vote(vote) => &vote.summary,
            PostVariant::Form(form) => &form.summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn post(kind: &str) -> Post {
        Post {
            id: ObjectId::parse_str("65a1b2c3d4e5f60718293a4b").unwrap(),
            post_id: Some("65a1b2c3d4e5f60718293a4b".to_string()),
            kind: kind.to_string(),
            assign_to: vec!["year1".to_string()],
            public: true,
            title: "Sports day".to_string(),
            description: String::new(),
            post_date: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            end_date: None,
            author: "club".to_string(),
            markdown: None,
            form_questions: vec![FormQuestion {
                question: "Team?".to_string(),
                input_type: "radio".to_string(),
                max_sel: None,
                options: vec!["red".to_string(), "blue".to_string()],
            }],
            vote_questions: Some(VoteQuestion {
                question: Some("Which sport?".to_string()),
                options: Some(vec!["football".to_string(), "chess".to_string()]),
            }),
        }
    }

    #[test]
    fn test_dispatch_selects_variant_by_kind() {
        let now = Utc::now();
        for (kind, expected) in [
            ("post", PostKind::Post),
            ("vote", PostKind::Vote),
            ("form", PostKind::Form),
        ] {
            let variant = PostVariant::dispatch(post(kind), now).unwrap();
            assert_eq!(variant.kind(), expected);
            assert_eq!(variant.summary().id, "65a1b2c3d4e5f60718293a4b");
            assert_eq!(variant.summary().title, "Sports day");
        }
    }

    #[test]
    fn test_dispatch_unrecognized_kind() {
        let err = PostVariant::dispatch(post("poll"), Utc::now()).unwrap_err();
        assert_eq!(err.kind, "poll");
        assert_eq!(err.id.to_hex(), "65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn test_dispatch_kind_is_case_sensitive() {
        assert!(PostVariant::dispatch(post("Vote"), Utc::now()).is_err());
        assert!(PostVariant::dispatch(post(""), Utc::now()).is_err());
    }

    #[test]
    fn test_time_up() {
        let now = Utc::now();
        assert!(!is_time_up(None, now));
        assert!(is_time_up(Some(now), now));
        assert!(is_time_up(Some(now - Duration::hours(1)), now));
        assert!(!is_time_up(Some(now + Duration::hours(1)), now));
    }

    #[test]
    fn test_vote_variant_wire_shape() {
        let variant = PostVariant::dispatch(post("vote"), Utc::now()).unwrap();
        let value = serde_json::to_value(&variant).unwrap();

        assert_eq!(value["kind"], "vote");
        assert_eq!(value["_id"], "65a1b2c3d4e5f60718293a4b");
        assert_eq!(value["timeUp"], false);
        assert_eq!(
            value["voteQuestions"],
            json!({"question": "Which sport?", "options": ["football", "chess"]})
        );
        assert!(value.get("formQuestions").is_none());
    }

    #[test]
    fn test_plain_post_omits_kind_payloads() {
        let variant = PostVariant::dispatch(post("post"), Utc::now()).unwrap();
        let value = serde_json::to_value(&variant).unwrap();

        assert_eq!(value["kind"], "post");
        assert!(value.get("voteQuestions").is_none());
        assert!(value.get("formQuestions").is_none());
        assert!(value.get("endDate").is_none());
    }

    #[test]
    fn test_form_variant_carries_questions() {
        let mut expired = post("form");
        expired.end_date = Some(Utc::now() - Duration::minutes(5));

        let value = serde_json::to_value(PostVariant::dispatch(expired, Utc::now()).unwrap()).unwrap();
        assert_eq!(value["kind"], "form");
        assert_eq!(value["timeUp"], true);
        assert_eq!(value["formQuestions"][0]["inputType"], "radio");
    }
}
