use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use serde_json::json;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::application::usercases::rate_limit::RateLimiter;
use crate::domain::entities::notifications::InsertNotificationEntity;
use crate::domain::repositories::{
    notifications::NotificationRepository, profiles::ProfileRepository,
    rate_limit::RateLimitRepository, social::SocialRepository,
};
use crate::domain::value_objects::notifications::FRIEND_ONLINE_TYPE;

const FRIEND_ONLINE_THROTTLE: Duration = Duration::from_secs(15 * 60);

pub struct PresenceUseCase<P, S, N, R>
where
    P: ProfileRepository + Send + Sync + 'static,
    S: SocialRepository + Send + Sync + 'static,
    N: NotificationRepository + Send + Sync + 'static,
    R: RateLimitRepository + Send + Sync + 'static,
{
    profile_repository: Arc<P>,
    social_repository: Arc<S>,
    notification_repository: Arc<N>,
    rate_limiter: Arc<RateLimiter<R>>,
}

impl<P, S, N, R> PresenceUseCase<P, S, N, R>
where
    P: ProfileRepository + Send + Sync + 'static,
    S: SocialRepository + Send + Sync + 'static,
    N: NotificationRepository + Send + Sync + 'static,
    R: RateLimitRepository + Send + Sync + 'static,
{
    pub fn new(
        profile_repository: Arc<P>,
        social_repository: Arc<S>,
        notification_repository: Arc<N>,
        rate_limiter: Arc<RateLimiter<R>>,
    ) -> Self {
        Self {
            profile_repository,
            social_repository,
            notification_repository,
            rate_limiter,
        }
    }

    /// Records a presence ping. The `last_seen` touch is the contract; the
    /// friend-online fan-out is best effort and never fails the ping.
    pub async fn ping(&self, user_id: Uuid) -> Result<()> {
        self.profile_repository.touch_last_seen(user_id).await?;

        let decision = self
            .rate_limiter
            .check(
                &format!("presence:friend_online:{}", user_id),
                1,
                FRIEND_ONLINE_THROTTLE,
            )
            .await;
        if !decision.allowed {
            debug!(%user_id, "presence: friend_online throttled");
            return Ok(());
        }

        if let Err(err) = self.notify_followers(user_id).await {
            warn!(%user_id, error = %err, "presence: friend_online fan-out failed");
        }
        Ok(())
    }

    async fn notify_followers(&self, user_id: Uuid) -> Result<()> {
        let (profile, follower_ids) = tokio::join!(
            self.profile_repository.find_by_id(user_id),
            self.social_repository.follower_ids_of(user_id),
        );
        let follower_ids = follower_ids?;
        if follower_ids.is_empty() {
            return Ok(());
        }

        let display_name = profile?
            .and_then(|p| p.display_name)
            .unwrap_or_else(|| "Seu amigo".to_string());
        let now = Utc::now();

        let notifications = follower_ids
            .into_iter()
            .map(|recipient_id| InsertNotificationEntity {
                recipient_id,
                sender_id: Some(user_id),
                type_: FRIEND_ONLINE_TYPE.to_string(),
                title: "Amigo online".to_string(),
                message: format!("{} entrou no app.", display_name),
                read: false,
                metadata: json!({ "friend_id": user_id }),
                created_at: now,
            })
            .collect();

        let inserted = self.notification_repository.insert_many(notifications).await?;
        debug!(%user_id, inserted, "presence: friend_online notifications queued");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::profiles::ProfileEntity;
    use crate::domain::repositories::{
        notifications::MockNotificationRepository, profiles::MockProfileRepository,
        rate_limit::MockRateLimitRepository, social::MockSocialRepository,
    };
    use crate::domain::value_objects::rate_limit::RateLimitDecision;

    fn allow(max: i32) -> RateLimitDecision {
        RateLimitDecision {
            allowed: true,
            remaining: max - 1,
            reset_at: Utc::now(),
            retry_after_seconds: 0,
        }
    }

    fn deny() -> RateLimitDecision {
        RateLimitDecision {
            allowed: false,
            remaining: 0,
            reset_at: Utc::now(),
            retry_after_seconds: 600,
        }
    }

    fn profile(user_id: Uuid, display_name: &str) -> ProfileEntity {
        ProfileEntity {
            id: user_id,
            display_name: Some(display_name.to_string()),
            email: None,
            role: "user".to_string(),
            last_seen: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn ping_touches_last_seen_and_notifies_followers() {
        let user_id = Uuid::new_v4();
        let follower = Uuid::new_v4();

        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_touch_last_seen()
            .times(1)
            .returning(|_| Box::pin(async { Ok(()) }));
        profiles
            .expect_find_by_id()
            .returning(|id| Box::pin(async move { Ok(Some(profile(id, "Rafa"))) }));

        let mut social = MockSocialRepository::new();
        social
            .expect_follower_ids_of()
            .returning(move |_| Box::pin(async move { Ok(vec![follower]) }));

        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_insert_many()
            .withf(move |batch| {
                batch.len() == 1
                    && batch[0].recipient_id == follower
                    && batch[0].type_ == FRIEND_ONLINE_TYPE
                    && batch[0].message == "Rafa entrou no app."
            })
            .returning(|batch| {
                let count = batch.len();
                Box::pin(async move { Ok(count) })
            });

        let mut rate = MockRateLimitRepository::new();
        rate.expect_consume()
            .returning(|_, max, _| Box::pin(async move { Ok(allow(max)) }));

        PresenceUseCase::new(
            Arc::new(profiles),
            Arc::new(social),
            Arc::new(notifications),
            Arc::new(RateLimiter::new(Arc::new(rate))),
        )
        .ping(user_id)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn throttled_ping_still_touches_last_seen() {
        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_touch_last_seen()
            .times(1)
            .returning(|_| Box::pin(async { Ok(()) }));

        let mut rate = MockRateLimitRepository::new();
        rate.expect_consume()
            .returning(|_, _, _| Box::pin(async { Ok(deny()) }));

        // No social or notification expectations: the fan-out must not run.
        PresenceUseCase::new(
            Arc::new(profiles),
            Arc::new(MockSocialRepository::new()),
            Arc::new(MockNotificationRepository::new()),
            Arc::new(RateLimiter::new(Arc::new(rate))),
        )
        .ping(Uuid::new_v4())
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn fan_out_failures_do_not_fail_the_ping() {
        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_touch_last_seen()
            .returning(|_| Box::pin(async { Ok(()) }));
        profiles
            .expect_find_by_id()
            .returning(|id| Box::pin(async move { Ok(Some(profile(id, "Rafa"))) }));

        let mut social = MockSocialRepository::new();
        social
            .expect_follower_ids_of()
            .returning(|_| Box::pin(async { Err(anyhow::anyhow!("connection reset")) }));

        let mut rate = MockRateLimitRepository::new();
        rate.expect_consume()
            .returning(|_, max, _| Box::pin(async move { Ok(allow(max)) }));

        PresenceUseCase::new(
            Arc::new(profiles),
            Arc::new(social),
            Arc::new(MockNotificationRepository::new()),
            Arc::new(RateLimiter::new(Arc::new(rate))),
        )
        .ping(Uuid::new_v4())
        .await
        .unwrap();
    }
}
