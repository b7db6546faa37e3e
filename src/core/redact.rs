use crate::core::keys::sanitize_key;
use crate::domain::model::{Platform, REDACTED};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Identifying keys shared by most platform exports.
pub const COMMON_PII: &[&str] = &[
    "id",
    "uuid",
    "name",
    "full_name",
    "username",
    "userName",
    "email",
    "emailAddress",
    "phone",
    "phone_number",
    "telephoneNumber",
    "birthDate",
    "date_of_birth",
    "device_id",
    "deviceModel",
    "os_version",
    "location",
    "hometown",
    "current_city",
    "external_url",
    "created_at",
    "registration_time",
];

const TIKTOK_KEYS: &[&str] = &[
    "uid",
    "unique_id",
    "nickname",
    "profilePhoto",
    "profileVideo",
    "bioDescription",
    "likesReceived",
    "From",
    "Content",
    "email",
    "phone_number",
    "date_of_birth",
];

const INSTAGRAM_KEYS: &[&str] = &[
    "username",
    "full_name",
    "biography",
    "profile_picture",
    "email",
    "phone_number",
    "gender",
    "birthday",
    "external_url",
    "account_creation_date",
];

const FACEBOOK_KEYS: &[&str] = &[
    "name",
    "birthday",
    "gender",
    "relationship_status",
    "hometown",
    "current_city",
    "emails",
    "phones",
    "friend_count",
    "friends",
    "posts",
    "story",
    "comments",
    "likes",
];

const TWITTER_KEYS: &[&str] = &[
    "accountId",
    "username",
    "accountDisplayName",
    "description",
    "website",
    "location",
    "avatarMediaUrl",
    "headerMediaUrl",
    "email",
    "in_reply_to_user_id",
    "source",
    "retweet_count",
    "favorite_count",
];

const REDDIT_KEYS: &[&str] = &[
    "username",
    "email",
    "karma",
    "subreddit",
    "author",
    "body",
    "selftext",
    "post_id",
    "title",
    "created_utc",
    "ip_address",
];

impl Platform {
    pub fn sensitive_keys(&self) -> &'static [&'static str] {
        match self {
            Platform::TikTok => TIKTOK_KEYS,
            Platform::Instagram => INSTAGRAM_KEYS,
            Platform::Facebook => FACEBOOK_KEYS,
            Platform::Twitter => TWITTER_KEYS,
            Platform::Reddit => REDDIT_KEYS,
        }
    }
}

/// The set of sanitized keys whose values are replaced.
#[derive(Debug, Clone, Default)]
pub struct RedactionPolicy {
    keys: HashSet<String>,
}

impl RedactionPolicy {
    pub fn for_platform<I, S>(platform: Platform, extras: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut keys: HashSet<String> = COMMON_PII
            .iter()
            .chain(platform.sensitive_keys())
            .map(|k| k.to_string())
            .collect();
        keys.extend(extras.into_iter().map(Into::into));
        Self { keys }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Copy of `value` with sanitized keys and policy keys replaced by `"REDACTED"`.
///
/// A redacted key hides its whole subtree. When two keys sanitize to the same
/// name the later value wins but keeps the position of the first.
pub fn anonymize(value: &Value, policy: &RedactionPolicy) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (k, v) in map {
                let sk = sanitize_key(k);
                let redacted = if policy.contains(&sk) {
                    Value::String(REDACTED.to_string())
                } else {
                    anonymize(v, policy)
                };
                out.insert(sk, redacted);
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(|i| anonymize(i, policy)).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn no_extras() -> Vec<String> {
        Vec::new()
    }

    #[test]
    fn test_policy_combines_sources() {
        let policy = RedactionPolicy::for_platform(Platform::Reddit, ["favorite_color"]);
        assert!(policy.contains("email"));
        assert!(policy.contains("karma"));
        assert!(policy.contains("favorite_color"));
        assert!(!policy.contains("nickname"));
    }

    #[test]
    fn test_anonymize_redacts_at_any_depth() {
        let policy = RedactionPolicy::for_platform(Platform::TikTok, no_extras());
        let data = json!({
            "Profile": {"Profile Info": {"ProfileMap": {"userName": "dancer", "bioDescription": "hi", "likesReceived": 10}}},
            "Comment": {"Comments": {"CommentsList": [{"date": "2024-01-01 10:00:00", "comment": "nice"}]}}
        });
        let red = anonymize(&data, &policy);
        let map = &red["Profile"]["Profile Info"]["ProfileMap"];
        assert_eq!(map["userName"], json!("REDACTED"));
        assert_eq!(map["bioDescription"], json!("REDACTED"));
        assert_eq!(map["likesReceived"], json!("REDACTED"));
        assert_eq!(
            red["Comment"]["Comments"]["CommentsList"][0]["comment"],
            json!("nice")
        );
    }

    #[test]
    fn test_anonymize_hides_whole_subtree() {
        let policy = RedactionPolicy::for_platform(Platform::Facebook, no_extras());
        let red = anonymize(&json!({"friends": [{"x": 1}]}), &policy);
        assert_eq!(red, json!({"friends": "REDACTED"}));
    }

    #[test]
    fn test_anonymize_renames_pattern_keys_and_redacts_them() {
        let policy = RedactionPolicy::for_platform(Platform::Instagram, ["Chat History With Bob"]);
        let red = anonymize(
            &json!({"Chat History with bob": [1, 2], "comments: hello": {"v": 1}, "bio:": "x"}),
            &policy,
        );
        assert_eq!(
            red,
            json!({"Chat History With Bob": "REDACTED", "Comments": {"v": 1}, "bio": "x"})
        );
    }

    #[test]
    fn test_anonymize_preserves_key_order_and_collisions() {
        let policy = RedactionPolicy::for_platform(Platform::Twitter, no_extras());
        let red = anonymize(&json!({"b": 1, "a:": 2, "c": 3, "a": 4}), &policy);
        let keys: Vec<_> = red.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(red["a"], json!(4));
    }

    #[test]
    fn test_anonymize_is_case_sensitive() {
        let policy = RedactionPolicy::for_platform(Platform::Reddit, no_extras());
        let red = anonymize(&json!({"Email": "a@b.c", "email": "a@b.c"}), &policy);
        assert_eq!(red["Email"], json!("a@b.c"));
        assert_eq!(red["email"], json!("REDACTED"));
    }

    #[test]
    fn test_anonymize_keeps_scalars() {
        let policy = RedactionPolicy::default();
        assert_eq!(anonymize(&json!([1, "a", null]), &policy), json!([1, "a", null]));
    }
}
