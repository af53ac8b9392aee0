use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subscription tier. Gates how many projects a user may keep deployed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Pro,
}

impl Plan {
    /// Demo sign-in rule: any email containing "pro" gets the pro plan.
    pub fn for_email(email: &str) -> Self {
        if email.contains("pro") {
            Plan::Pro
        } else {
            Plan::Free
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Pro => "pro",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub plan: Plan,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stripe_account_id: Option<String>,
}

impl User {
    pub fn new(email: impl Into<String>, plan: Plan) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            plan,
            stripe_account_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_for_email() {
        assert_eq!(Plan::for_email("demo@pro.com"), Plan::Pro);
        assert_eq!(Plan::for_email("demo@free.com"), Plan::Free);
        // Case-sensitive, like the demo page.
        assert_eq!(Plan::for_email("demo@PRO.com"), Plan::Free);
    }

    #[test]
    fn test_user_serializes_camel_case_and_omits_missing_account() {
        let user = User::new("a@b.c", Plan::Pro);
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["plan"], "pro");
        assert!(value.get("stripeAccountId").is_none());

        let mut connected = user.clone();
        connected.stripe_account_id = Some("acct_1".to_string());
        let value = serde_json::to_value(&connected).unwrap();
        assert_eq!(value["stripeAccountId"], "acct_1");
    }
}
