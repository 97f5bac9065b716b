use anyhow::Result;
use std::path::Path;
use wallie_core::config::Config;
use wallie_core::ids::ProjectId;
use wallie_core::jira::JiraClient;

use crate::output::{print_json, story_line};

/// Log in, list `project`'s open stories and print them in rank order.
pub fn run(
    config_path: &Path,
    jira_base: Option<&str>,
    project: &str,
    username: &str,
    password: &str,
    json: bool,
) -> Result<()> {
    let project = ProjectId::parse(project)?;
    let config = Config::load(config_path, jira_base)?;
    let jira = JiraClient::new(config.jira_base.clone(), config.point_scheme);

    let rt = tokio::runtime::Runtime::new()?;
    let backlog = rt.block_on(async {
        let cookies = jira.create_session(username, password).await?;
        jira.backlog(&project, &cookies).await
    })?;

    if json {
        return print_json(&backlog);
    }
    for story in &backlog.stories {
        println!("{}", story_line(story));
    }
    Ok(())
}
