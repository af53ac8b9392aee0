use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The three source strings that make up a generated app.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodeBundle {
    pub html: String,
    pub css: String,
    pub js: String,
}

impl CodeBundle {
    /// Composes a single standalone document for the live preview pane.
    pub fn preview_document(&self) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
             <style>{}</style>\n</head>\n<body>\n{}\n<script>{}</script>\n</body>\n</html>\n",
            self.css, self.html, self.js
        )
    }

    /// Plain-text download bundle offered by the editor.
    pub fn export_text(&self, title: &str, description: &str) -> String {
        let text = format!(
            "Project: {title}\nDescription: {description}\n\n\
             === HTML ===\n{}\n\n=== CSS ===\n{}\n\n=== JavaScript ===\n{}",
            self.html, self.css, self.js
        );
        text.trim().to_string()
    }
}

/// File name for an exported bundle: non-alphanumerics become `_`, lowercased.
pub fn export_file_name(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{stem}.txt")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub prompt: String,
    pub code: CodeBundle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed_url: Option<String>,
    #[serde(default)]
    pub is_deployed: bool,
}

/// A project that has not been saved yet. Saved projects always start undeployed.
#[derive(Debug, Clone)]
pub struct ProjectDraft {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub prompt: String,
    pub code: CodeBundle,
}

impl ProjectDraft {
    pub fn into_project(self, now: DateTime<Utc>) -> Project {
        Project {
            id: Uuid::new_v4(),
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            prompt: self.prompt,
            code: self.code,
            created_at: now,
            updated_at: now,
            deployed_url: None,
            is_deployed: false,
        }
    }
}

/// Deployment state change. Carries the URL and the flag as one value so the
/// two stored fields are always written together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentChange {
    Deployed { url: String },
    Undeployed,
}

/// Shallow partial update. Absent fields keep their stored value.
///
/// Deployment state is not part of the wire format; only the deployment
/// service sets it through [`ProjectPatch::deployed`] / [`ProjectPatch::undeployed`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub prompt: Option<String>,
    pub code: Option<CodeBundle>,
    #[serde(skip)]
    pub deployment: Option<DeploymentChange>,
}

impl ProjectPatch {
    pub fn deployed(url: impl Into<String>) -> Self {
        Self {
            deployment: Some(DeploymentChange::Deployed { url: url.into() }),
            ..Self::default()
        }
    }

    pub fn undeployed() -> Self {
        Self {
            deployment: Some(DeploymentChange::Undeployed),
            ..Self::default()
        }
    }

    /// Merges the set fields over `project` and stamps `updated_at`.
    pub fn apply(self, project: &mut Project, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            project.title = title;
        }
        if let Some(description) = self.description {
            project.description = description;
        }
        if let Some(prompt) = self.prompt {
            project.prompt = prompt;
        }
        if let Some(code) = self.code {
            project.code = code;
        }
        match self.deployment {
            Some(DeploymentChange::Deployed { url }) => {
                project.deployed_url = Some(url);
                project.is_deployed = true;
            }
            Some(DeploymentChange::Undeployed) => {
                project.deployed_url = None;
                project.is_deployed = false;
            }
            None => {}
        }
        project.updated_at = now;
    }
}

/// Payload handed from the generation step to the editor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedApp {
    pub prompt: String,
    pub title: String,
    pub description: String,
    pub code: CodeBundle,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn bundle() -> CodeBundle {
        CodeBundle {
            html: "<h1>Hi</h1>".to_string(),
            css: "h1 { color: red; }".to_string(),
            js: "console.log('hi');".to_string(),
        }
    }

    fn draft() -> ProjectDraft {
        ProjectDraft {
            user_id: Uuid::new_v4(),
            title: "Todo List App".to_string(),
            description: "A todo list built with LaunchAI".to_string(),
            prompt: "Build a todo list app".to_string(),
            code: bundle(),
        }
    }

    #[test]
    fn test_draft_gets_equal_timestamps_and_starts_undeployed() {
        let now = Utc::now();
        let project = draft().into_project(now);
        assert_eq!(project.created_at, now);
        assert_eq!(project.updated_at, now);
        assert!(!project.is_deployed);
        assert!(project.deployed_url.is_none());
    }

    #[test]
    fn test_patch_merges_only_set_fields() {
        let created = Utc::now();
        let mut project = draft().into_project(created);
        let later = created + Duration::seconds(5);

        let patch = ProjectPatch {
            title: Some("Renamed".to_string()),
            ..ProjectPatch::default()
        };
        patch.apply(&mut project, later);

        assert_eq!(project.title, "Renamed");
        assert_eq!(project.prompt, "Build a todo list app");
        assert_eq!(project.code, bundle());
        assert_eq!(project.created_at, created);
        assert_eq!(project.updated_at, later);
    }

    #[test]
    fn test_deployment_patches_set_both_fields() {
        let now = Utc::now();
        let mut project = draft().into_project(now);

        ProjectPatch::deployed("https://app.launchai.dev/x").apply(&mut project, now);
        assert!(project.is_deployed);
        assert_eq!(project.deployed_url.as_deref(), Some("https://app.launchai.dev/x"));

        ProjectPatch::undeployed().apply(&mut project, now);
        assert!(!project.is_deployed);
        assert!(project.deployed_url.is_none());
    }

    #[test]
    fn test_patch_json_ignores_deployment_fields() {
        let patch: ProjectPatch =
            serde_json::from_str(r#"{"title":"t","isDeployed":true,"deployedUrl":"x"}"#).unwrap();
        assert_eq!(patch.title.as_deref(), Some("t"));
        assert!(patch.deployment.is_none());
    }

    #[test]
    fn test_project_wire_shape() {
        let project = draft().into_project(Utc::now());
        let value = serde_json::to_value(&project).unwrap();
        assert!(value.get("userId").is_some());
        assert!(value.get("createdAt").unwrap().is_string());
        assert_eq!(value["isDeployed"], false);
        assert!(value.get("deployedUrl").is_none());
    }

    #[test]
    fn test_revives_browser_style_timestamps() {
        let raw = r#"{
            "id": "5b0c1a9e-8f7a-4a57-9a59-8f1a1e2f9d10",
            "userId": "0f5e4a3b-2c1d-4e6f-8a9b-0c1d2e3f4a5b",
            "title": "Calculator App",
            "description": "A calculator built with LaunchAI",
            "prompt": "calculator",
            "code": {"html": "", "css": "", "js": ""},
            "createdAt": "2024-05-01T12:30:00.000Z",
            "updatedAt": "2024-05-02T08:00:00.000Z",
            "isDeployed": false
        }"#;
        let project: Project = serde_json::from_str(raw).unwrap();
        assert!(project.updated_at > project.created_at);
        assert_eq!(project.created_at.to_rfc3339(), "2024-05-01T12:30:00+00:00");
    }

    #[test]
    fn test_preview_document_places_each_part() {
        let doc = bundle().preview_document();
        assert!(doc.contains("<style>h1 { color: red; }</style>"));
        assert!(doc.contains("<h1>Hi</h1>"));
        assert!(doc.contains("<script>console.log('hi');</script>"));
        assert!(doc.find("<style>").unwrap() < doc.find("<body>").unwrap());
    }

    #[test]
    fn test_export_text_layout() {
        let text = bundle().export_text("My App", "Demo");
        assert!(text.starts_with("Project: My App\nDescription: Demo"));
        assert!(text.contains("=== HTML ===\n<h1>Hi</h1>"));
        assert!(text.contains("=== CSS ===\nh1 { color: red; }"));
        assert!(text.ends_with("=== JavaScript ===\nconsole.log('hi');"));
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("Todo List App"), "todo_list_app.txt");
        assert_eq!(export_file_name("Calc #2!"), "calc__2_.txt");
    }
}
