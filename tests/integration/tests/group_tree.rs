//! Group tree paging, search, lazy loading and removal.

use kc_admin_console::{ExpandOutcome, Guard, NodeClass, PromptConfirm};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{group, realm_path, TestEnv};

#[tokio::test]
async fn third_page_starts_at_offset_forty() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.mount_top_level(0, json!([group("g1", "ops", false)]), 45).await;
    env.mount_top_level(
        40,
        json!([group("g41", "zeta", false), group("g42", "Alpha", false)]),
        45,
    )
    .await;
    let mut tree = env.tree();

    tree.reload().await?;
    assert_eq!(tree.pagination().number_of_pages(), 3);

    assert!(tree.set_page(3).await?);
    let names: Vec<_> = tree.root().children().iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "zeta"]);
    assert!(!tree.set_page(3).await?);

    Ok(())
}

#[tokio::test]
async fn search_is_sent_to_list_and_count() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    Mock::given(method("GET"))
        .and(path(realm_path("/groups")))
        .and(query_param("search", "ops"))
        .and(query_param("first", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([group("g1", "ops", false)])))
        .expect(1)
        .mount(&env.server)
        .await;
    Mock::given(method("GET"))
        .and(path(realm_path("/groups/count")))
        .and(query_param("search", "ops"))
        .and(query_param("top", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": 1 })))
        .expect(1)
        .mount(&env.server)
        .await;
    let mut tree = env.tree();

    tree.search(" ops ").await?;

    assert_eq!(tree.search_criteria(), Some("ops"));
    assert_eq!(tree.root().children().len(), 1);
    Ok(())
}

#[tokio::test]
async fn lazy_children_are_attached_once() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.mount_top_level(0, json!([group("g1", "ops", true)]), 1).await;
    env.mount_children(
        "g1",
        json!([group("g2", "sre", false), group("g3", "oncall", false)]),
        1,
    )
    .await;
    let mut tree = env.tree();
    tree.reload().await?;

    assert_eq!(tree.toggle("g1").await?, ExpandOutcome::Attached(2));
    let children: Vec<_> = tree
        .find("g1")
        .map(|n| n.children().iter().map(|c| c.name.clone()).collect())
        .unwrap_or_default();
    assert_eq!(children, vec!["sre", "oncall"]);

    assert_eq!(tree.toggle("g1").await?, ExpandOutcome::Toggled);
    assert_eq!(tree.find("g1").map(|n| n.class()), Some(NodeClass::Collapsed));
    Ok(())
}

#[tokio::test]
async fn empty_children_response_keeps_node_unloaded() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.mount_top_level(0, json!([group("g1", "ops", true)]), 1).await;
    env.mount_children("g1", json!([]), 1).await;
    let mut tree = env.tree();
    tree.reload().await?;

    assert_eq!(tree.toggle("g1").await?, ExpandOutcome::Empty);
    assert_eq!(tree.toggle("g1").await?, ExpandOutcome::Toggled);

    let node = tree.find("g1").expect("node is visible");
    assert!(node.sub_groups.is_none());
    assert!(node.is_leaf());
    Ok(())
}

#[tokio::test]
async fn failed_count_keeps_listing() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    Mock::given(method("GET"))
        .and(path(realm_path("/groups")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([group("g1", "ops", false)])))
        .mount(&env.server)
        .await;
    Mock::given(method("GET"))
        .and(path(realm_path("/groups/count")))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&env.server)
        .await;
    let mut tree = env.tree();

    let err = tree.reload().await.unwrap_err();

    assert!(err.is_fetch());
    assert_eq!(tree.root().children().len(), 1);
    assert_eq!(env.notifier.errors().len(), 1);
    Ok(())
}

#[tokio::test]
async fn group_with_children_is_not_deleted() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.mount_top_level(0, json!([group("g1", "ops", true)]), 1).await;
    Mock::given(method("DELETE"))
        .and(path(realm_path("/groups/g1")))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&env.server)
        .await;
    let mut tree = env.tree();
    tree.reload().await?;

    // The guard fires before the prompt would read stdin.
    let err = tree.remove("g1", &PromptConfirm).await.unwrap_err();

    assert_eq!(err.guard(), Some(&Guard::HasChildren));
    Ok(())
}

#[tokio::test]
async fn created_group_id_comes_from_location() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.mount_top_level(0, json!([group("g1", "ops", false)]), 1).await;
    Mock::given(method("POST"))
        .and(path(realm_path("/groups/g1/children")))
        .respond_with(ResponseTemplate::new(201).insert_header(
            "Location",
            format!("{}{}", env.server.uri(), realm_path("/groups/g9")),
        ))
        .expect(1)
        .mount(&env.server)
        .await;
    let mut tree = env.tree();
    tree.reload().await?;
    tree.select("g1")?;

    let id = tree
        .create_group(kc_admin_client::dto::NewGroup::named("oncall"))
        .await?;

    assert_eq!(id, "g9");
    assert_eq!(
        env.notifier.successes(),
        vec!["The group has been created."]
    );
    Ok(())
}
