//! Loaders that gather everything a screen needs before it renders.
//!
//! Independent requests are issued together and awaited as a group.

use pastus_core::types::{
    AccountDetail, Notification, PostDetail, PostSummary, Tag, UserDashboard,
};
use tracing::warn;

use crate::source::{ApiResult, Services};

/// Number of latest posts shown on the home tab.
pub const HOME_LATEST_COUNT: u32 = 3;

#[derive(Debug, Clone)]
pub struct HomeScreen {
    pub dashboard: UserDashboard,
    pub trending_tags: Vec<String>,
    pub trending_posts: Vec<PostSummary>,
    pub latest_posts: Vec<PostSummary>,
}

#[derive(Debug, Clone)]
pub struct PostScreen {
    pub post: PostDetail,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone)]
pub struct ProfileScreen {
    pub account: AccountDetail,
    pub notifications: Vec<Notification>,
}

/// Fails as soon as any of the four requests fails.
pub async fn load_home(services: &Services) -> ApiResult<HomeScreen> {
    let (dashboard, tags, trending, latest) = futures::try_join!(
        services.users.dashboard(),
        services.posts.trending_tags(),
        services.posts.trending_posts(),
        services.posts.list_posts(0, HOME_LATEST_COUNT),
    )?;
    Ok(HomeScreen {
        dashboard: dashboard.data,
        trending_tags: tags.data,
        trending_posts: trending.data,
        latest_posts: latest.data.content,
    })
}

/// The post is required; its tag list is not.
pub async fn load_post_detail(services: &Services, id: u64) -> ApiResult<PostScreen> {
    let (post, tags) = futures::join!(services.posts.get_post(id), services.posts.post_tags(id));
    let post = post?.data;
    let tags = match tags {
        Ok(envelope) => envelope.data,
        Err(e) => {
            warn!(post_id = id, error = %e, "post tags unavailable");
            Vec::new()
        }
    };
    Ok(PostScreen { post, tags })
}

pub async fn load_profile(services: &Services) -> ApiResult<ProfileScreen> {
    let (account, notifications) = futures::try_join!(
        services.users.account_detail(),
        services.notifications.notifications(),
    )?;
    Ok(ProfileScreen {
        account: account.data,
        notifications: notifications.data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn home_requests_run_concurrently() {
        let services = Services::fixtures(Duration::from_millis(500));
        let started = tokio::time::Instant::now();
        let home = load_home(&services).await.unwrap();
        assert!(started.elapsed() < Duration::from_millis(1000));
        assert_eq!(home.latest_posts.len(), 3);
        assert_eq!(home.trending_tags[0], "군대");
        assert_eq!(home.dashboard.user_name, "테스터");
    }

    #[tokio::test(start_paused = true)]
    async fn missing_post_fails_detail() {
        let services = Services::fixtures(Duration::from_millis(500));
        let err = load_post_detail(&services, 9999).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test(start_paused = true)]
    async fn detail_includes_tags() {
        let services = Services::fixtures(Duration::from_millis(500));
        let screen = load_post_detail(&services, 1).await.unwrap();
        let names: Vec<&str> = screen.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["군대", "취업"]);
    }
}
