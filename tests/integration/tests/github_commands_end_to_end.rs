use std::sync::Arc;

use async_trait::async_trait;
use httpmock::prelude::*;
use serde_json::{json, Value};
use tau_github_commands::{
    ChannelMessenger, CommandConfig, CommandContext, FileSubscriptionService,
    FileSubscriptionServiceConfig, GithubApiClient, GithubCommandHandlers, ServiceResult,
    SubscriptionService,
};
use tempfile::TempDir;
use tokio::sync::Mutex as AsyncMutex;

#[derive(Default)]
struct RecordingMessenger {
    sent: AsyncMutex<Vec<(String, String)>>,
}

impl RecordingMessenger {
    async fn take(&self) -> Vec<(String, String)> {
        std::mem::take(&mut *self.sent.lock().await)
    }
}

#[async_trait]
impl ChannelMessenger for RecordingMessenger {
    async fn send_message(&self, channel_id: &str, text: &str) -> ServiceResult<()> {
        self.sent
            .lock()
            .await
            .push((channel_id.to_string(), text.to_string()));
        Ok(())
    }
}

struct Workspace {
    _temp: TempDir,
    store: Arc<FileSubscriptionService>,
    messenger: Arc<RecordingMessenger>,
    handlers: GithubCommandHandlers,
}

fn workspace(api_base: &str) -> Workspace {
    let temp = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(
        FileSubscriptionService::load(FileSubscriptionServiceConfig {
            state_path: temp.path().join("subscriptions.json"),
            oauth_authorize_url: "https://auth.example.test/github".to_string(),
            app_install_url: Some("https://github.com/apps/tau/installations/new".to_string()),
            require_app_installation: false,
        })
        .expect("load store"),
    );
    let messenger = Arc::new(RecordingMessenger::default());
    let github = GithubApiClient::new(api_base, Some("test-token"), 5_000).expect("client");
    let handlers = GithubCommandHandlers {
        issues: Arc::new(github),
        linker: store.clone(),
        subscriptions: store.clone(),
        messenger: messenger.clone(),
        config: CommandConfig::default(),
    };
    Workspace {
        _temp: temp,
        store,
        messenger,
        handlers,
    }
}

fn issue(number: u64, state: &str, pull_request: bool) -> Value {
    let kind = if pull_request { "pull" } else { "issues" };
    let mut value = json!({
        "number": number,
        "html_url": format!("https://github.com/owner/repo/{kind}/{number}"),
        "state": state,
        "title": format!("Item {number}"),
        "user": {"login": format!("user{number}")}
    });
    if pull_request {
        value["pull_request"] = json!({"url": format!("https://api.github.com/repos/owner/repo/pulls/{number}")});
    }
    value
}

#[tokio::test]
async fn integration_gh_issues_lists_issues_from_github_without_pull_requests() {
    let server = MockServer::start();
    let list = server.mock(|when, then| {
        when.method(GET)
            .path("/repos/owner/repo/issues")
            .query_param("state", "all");
        then.status(200).json_body(json!([
            issue(21, "open", false),
            issue(20, "open", true),
            issue(19, "open", false),
            issue(18, "closed", false),
            issue(17, "open", false),
            issue(16, "closed", true),
            issue(15, "closed", false),
            issue(14, "open", false),
        ]));
    });

    let workspace = workspace(&server.base_url());
    let ctx = CommandContext::new("C1", "U1");
    workspace
        .handlers
        .dispatch(&ctx, "/gh_issues owner/repo 5 --state=all")
        .await
        .expect("dispatch");
    list.assert();

    let sent = workspace.messenger.take().await;
    assert_eq!(sent.len(), 1);
    let message = &sent[0].1;
    assert!(message.contains("Recent Issues - owner/repo"));
    let lines = message
        .lines()
        .filter(|line| line.contains("[#"))
        .collect::<Vec<_>>();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines.iter().filter(|line| line.starts_with("🟢")).count(), 3);
    assert_eq!(lines.iter().filter(|line| line.starts_with("🔴")).count(), 2);
    assert!(!message.contains("/pull/"));
}

#[tokio::test]
async fn integration_gh_issues_out_of_bounds_count_skips_github() {
    let server = MockServer::start();
    let list = server.mock(|when, then| {
        when.method(GET).path("/repos/owner/repo/issues");
        then.status(200).json_body(json!([]));
    });

    let workspace = workspace(&server.base_url());
    let ctx = CommandContext::new("C1", "U1");
    workspace
        .handlers
        .dispatch(&ctx, "/gh_issues owner/repo 51")
        .await
        .expect("dispatch");
    list.assert_calls(0);
    let sent = workspace.messenger.take().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1, "❌ Count must be a number between 1 and 50.");
}

#[tokio::test]
async fn integration_subscription_lifecycle_links_subscribes_and_unsubscribes() {
    let workspace = workspace("http://127.0.0.1:9");
    let ctx = CommandContext::new("C1", "U1");

    workspace
        .handlers
        .dispatch(&ctx, "/github subscribe owner/repo --events pr,issues,pr")
        .await
        .expect("dispatch");
    let sent = workspace.messenger.take().await;
    assert!(sent[0].1.contains("GitHub account not linked"));
    assert!(sent[0]
        .1
        .contains("https://auth.example.test/github?user_id=U1&channel_id=C1"));

    workspace.store.link_user("U1").await.expect("link user");
    workspace
        .store
        .record_installation("facebook")
        .await
        .expect("record installation");

    workspace
        .handlers
        .dispatch(&ctx, "/github subscribe Facebook/React --events reviews,pr")
        .await
        .expect("dispatch");
    workspace
        .handlers
        .dispatch(&ctx, "/github subscribe other/lib")
        .await
        .expect("dispatch");
    let sent = workspace.messenger.take().await;
    assert_eq!(sent.len(), 2);
    assert!(sent[0].1.contains("Subscribed to Facebook/React"));
    assert!(sent[0].1.contains("Real-time delivery via webhooks"));
    assert!(sent[1].1.contains("Checking for updates every 5 minutes"));

    workspace
        .handlers
        .dispatch(&ctx, "/github status")
        .await
        .expect("dispatch");
    let sent = workspace.messenger.take().await;
    assert!(sent[0].1.contains("⚡ **Facebook/React** - pr, reviews"));
    assert!(sent[0]
        .1
        .contains("⏱️ **other/lib** - pr, issues, commits, releases"));

    workspace
        .handlers
        .dispatch(&ctx, "/github unsubscribe facebook/react")
        .await
        .expect("dispatch");
    let sent = workspace.messenger.take().await;
    assert_eq!(sent[0].1, "✅ **Unsubscribed from Facebook/React**");

    let remaining = workspace
        .store
        .list_subscriptions("C1")
        .await
        .expect("list subscriptions");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].repo_full_name, "other/lib");
}
