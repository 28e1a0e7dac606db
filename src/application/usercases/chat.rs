use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::usercases::rate_limit::RateLimiter;
use crate::application::usercases::vip_entitlement::VipEntitlementUseCase;
use crate::domain::entities::chat::InsertChatMessageEntity;
use crate::domain::repositories::{
    chat::ChatRepository, plans::PlanRepository, profiles::ProfileRepository,
    rate_limit::RateLimitRepository, subscriptions::SubscriptionRepository,
    vip_usage::VipUsageRepository,
};
use crate::domain::value_objects::chat::{
    ListMessagesFilter, MAX_MESSAGE_CHARS, MarkReadModel, MessageModel, OpenDirectChannelModel,
    SendMessageModel,
};
use crate::domain::value_objects::enums::channel_types::ChannelType;
use crate::domain::value_objects::enums::roles::Role;
use crate::domain::value_objects::pagination::Pagination;
use crate::domain::value_objects::rate_limit::RateLimitExceeded;
use crate::domain::value_objects::vip::VipFeature;

pub struct ChatUseCase<C, P, S, L, U, R>
where
    C: ChatRepository + Send + Sync + 'static,
    P: ProfileRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    L: PlanRepository + Send + Sync + 'static,
    U: VipUsageRepository + Send + Sync + 'static,
    R: RateLimitRepository + Send + Sync + 'static,
{
    chat_repository: Arc<C>,
    profile_repository: Arc<P>,
    vip_entitlement: Arc<VipEntitlementUseCase<P, S, L, U>>,
    rate_limiter: Arc<RateLimiter<R>>,
    send_max_per_minute: i32,
}

impl<C, P, S, L, U, R> ChatUseCase<C, P, S, L, U, R>
where
    C: ChatRepository + Send + Sync + 'static,
    P: ProfileRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    L: PlanRepository + Send + Sync + 'static,
    U: VipUsageRepository + Send + Sync + 'static,
    R: RateLimitRepository + Send + Sync + 'static,
{
    pub fn new(
        chat_repository: Arc<C>,
        profile_repository: Arc<P>,
        vip_entitlement: Arc<VipEntitlementUseCase<P, S, L, U>>,
        rate_limiter: Arc<RateLimiter<R>>,
        send_max_per_minute: i32,
    ) -> Self {
        Self {
            chat_repository,
            profile_repository,
            vip_entitlement,
            rate_limiter,
            send_max_per_minute,
        }
    }

    pub async fn open_direct_channel(
        &self,
        user_id: Uuid,
        model: OpenDirectChannelModel,
    ) -> Result<Uuid> {
        if model.peer_id == user_id {
            return Err(anyhow!("Cannot open a channel with yourself"));
        }
        if self
            .profile_repository
            .find_by_id(model.peer_id)
            .await?
            .is_none()
        {
            return Err(anyhow!("Peer not found"));
        }

        let channel_id = self
            .chat_repository
            .get_or_create_direct_channel(user_id, model.peer_id)
            .await?;
        info!(%user_id, peer_id = %model.peer_id, %channel_id, "chat: direct channel opened");
        Ok(channel_id)
    }

    /// Returns the canonical global channel, creating it when absent and
    /// folding any duplicates into the oldest one. Admin only.
    pub async fn ensure_global_channel(&self, caller_id: Uuid) -> Result<Uuid> {
        let role = self
            .profile_repository
            .find_role(caller_id)
            .await?
            .ok_or_else(|| anyhow!("Profile not found"))?;
        if Role::from_str(&role) != Role::Admin {
            return Err(anyhow!("Forbidden"));
        }

        let mut channels = self.chat_repository.list_global_channels().await?;
        if channels.is_empty() {
            let channel_id = self.chat_repository.create_global_channel().await?;
            info!(%caller_id, %channel_id, "chat: global channel created");
            return Ok(channel_id);
        }

        let canonical = channels.remove(0);
        for duplicate in channels {
            let migrated = self
                .chat_repository
                .migrate_messages(duplicate.id, canonical.id)
                .await?;
            self.chat_repository.delete_channel(duplicate.id).await?;
            info!(
                duplicate_id = %duplicate.id,
                canonical_id = %canonical.id,
                migrated,
                "chat: duplicate global channel folded"
            );
        }
        Ok(canonical.id)
    }

    pub async fn send_message(
        &self,
        user_id: Uuid,
        model: SendMessageModel,
    ) -> Result<MessageModel> {
        let content = model.content.trim().to_string();
        if content.is_empty() {
            return Err(anyhow!("Message content is required"));
        }
        if content.chars().count() > MAX_MESSAGE_CHARS {
            return Err(anyhow!("Message is too long"));
        }

        self.require_channel_access(model.channel_id, user_id)
            .await?;

        let decision = self
            .rate_limiter
            .check(
                &format!("chat:send:{}", user_id),
                self.send_max_per_minute,
                Duration::from_secs(60),
            )
            .await;
        if !decision.allowed {
            return Err(RateLimitExceeded {
                retry_after_seconds: decision.retry_after_seconds,
            }
            .into());
        }

        let access = self
            .vip_entitlement
            .check_feature_access(user_id, VipFeature::ChatDaily)
            .await;
        if !access.allowed {
            return Err(anyhow!("Chat limit reached"));
        }

        let now = Utc::now();
        let message_id = self
            .chat_repository
            .insert_message(InsertChatMessageEntity {
                channel_id: model.channel_id,
                sender_id: user_id,
                content: content.clone(),
                is_read: false,
                created_at: now,
            })
            .await?;
        self.chat_repository
            .touch_last_message(model.channel_id, now)
            .await?;

        if let Err(err) = self
            .vip_entitlement
            .record_usage(user_id, VipFeature::ChatDaily)
            .await
        {
            warn!(%user_id, error = %err, "chat: usage counter update failed");
        }

        Ok(MessageModel {
            id: message_id,
            channel_id: model.channel_id,
            sender_id: user_id,
            content,
            is_read: false,
            created_at: now,
        })
    }

    pub async fn list_messages(
        &self,
        user_id: Uuid,
        filter: ListMessagesFilter,
    ) -> Result<Vec<MessageModel>> {
        self.require_channel_access(filter.channel_id, user_id)
            .await?;

        let limit = Pagination::clamped(filter.limit, None).limit;
        let messages = self
            .chat_repository
            .list_messages(filter.channel_id, limit, filter.before_id)
            .await?;

        // The repository pages newest-first; the wire order is oldest-first.
        let mut models: Vec<MessageModel> = messages
            .into_iter()
            .map(|message| MessageModel {
                id: message.id,
                channel_id: message.channel_id,
                sender_id: message.sender_id,
                content: message.content,
                is_read: message.is_read,
                created_at: message.created_at,
            })
            .collect();
        models.reverse();
        Ok(models)
    }

    pub async fn mark_read(&self, user_id: Uuid, model: MarkReadModel) -> Result<usize> {
        self.require_channel_access(model.channel_id, user_id)
            .await?;
        self.chat_repository
            .mark_read(model.channel_id, user_id)
            .await
    }

    /// Global channels are open to everyone; direct channels only to their
    /// two members.
    async fn require_channel_access(&self, channel_id: Uuid, user_id: Uuid) -> Result<()> {
        let channel = self
            .chat_repository
            .find_channel(channel_id)
            .await?
            .ok_or_else(|| anyhow!("Channel not found"))?;

        if ChannelType::from_str(&channel.type_) == ChannelType::Global {
            return Ok(());
        }
        if self.chat_repository.is_member(channel_id, user_id).await? {
            Ok(())
        } else {
            Err(anyhow!("Forbidden"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::chat::{ChatChannelEntity, ChatMessageEntity};
    use crate::domain::repositories::{
        chat::MockChatRepository, plans::MockPlanRepository, profiles::MockProfileRepository,
        rate_limit::MockRateLimitRepository, subscriptions::MockSubscriptionRepository,
        vip_usage::MockVipUsageRepository,
    };
    use crate::domain::value_objects::rate_limit::RateLimitDecision;
    use std::time::Duration as StdDuration;

    type TestUseCase = ChatUseCase<
        MockChatRepository,
        MockProfileRepository,
        MockSubscriptionRepository,
        MockPlanRepository,
        MockVipUsageRepository,
        MockRateLimitRepository,
    >;

    struct Mocks {
        chat: MockChatRepository,
        profiles: MockProfileRepository,
        subscriptions: MockSubscriptionRepository,
        plans: MockPlanRepository,
        usage: MockVipUsageRepository,
        rate: MockRateLimitRepository,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                chat: MockChatRepository::new(),
                profiles: MockProfileRepository::new(),
                subscriptions: MockSubscriptionRepository::new(),
                plans: MockPlanRepository::new(),
                usage: MockVipUsageRepository::new(),
                rate: MockRateLimitRepository::new(),
            }
        }

        fn vip_user(mut self) -> Self {
            self.profiles
                .expect_find_role()
                .returning(|_| Box::pin(async { Ok(Some("user".to_string())) }));
            self.subscriptions
                .expect_latest_entitling_app_subscription()
                .returning(|user_id| {
                    Box::pin(async move {
                        Ok(Some(
                            crate::domain::entities::subscriptions::AppSubscriptionEntity {
                                id: Uuid::new_v4(),
                                user_id,
                                plan_id: "vip_pro".to_string(),
                                provider: "stripe".to_string(),
                                status: "active".to_string(),
                                valid_until: None,
                                created_at: Utc::now(),
                            },
                        ))
                    })
                });
            self.plans.expect_find_limits().returning(|_| {
                Box::pin(async { Ok(Some(serde_json::json!({ "chat_daily": 50 }))) })
            });
            self.usage
                .expect_usage_on_day()
                .returning(|_, _, _| Box::pin(async { Ok(0) }));
            self.usage
                .expect_increment()
                .returning(|_, _, _| Box::pin(async { Ok(()) }));
            self
        }

        fn allow_rate(mut self) -> Self {
            self.rate.expect_consume().returning(|_, max, _| {
                Box::pin(async move {
                    Ok(RateLimitDecision {
                        allowed: true,
                        remaining: max - 1,
                        reset_at: Utc::now(),
                        retry_after_seconds: 0,
                    })
                })
            });
            self
        }

        fn build(self) -> TestUseCase {
            let profiles = Arc::new(self.profiles);
            let vip = Arc::new(VipEntitlementUseCase::new(
                Arc::clone(&profiles),
                Arc::new(self.subscriptions),
                Arc::new(self.plans),
                Arc::new(self.usage),
                StdDuration::from_secs(30),
            ));
            ChatUseCase::new(
                Arc::new(self.chat),
                profiles,
                vip,
                Arc::new(RateLimiter::new(Arc::new(self.rate))),
                30,
            )
        }
    }

    fn direct_channel(id: Uuid) -> ChatChannelEntity {
        ChatChannelEntity {
            id,
            type_: "direct".to_string(),
            created_at: Utc::now(),
            last_message_at: None,
        }
    }

    fn global_channel(id: Uuid) -> ChatChannelEntity {
        ChatChannelEntity {
            id,
            type_: "global".to_string(),
            created_at: Utc::now(),
            last_message_at: None,
        }
    }

    #[tokio::test]
    async fn open_direct_rejects_self_channels() {
        let user_id = Uuid::new_v4();
        let usecase = Mocks::new().build();

        let err = usecase
            .open_direct_channel(user_id, OpenDirectChannelModel { peer_id: user_id })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("yourself"));
    }

    #[tokio::test]
    async fn send_persists_and_counts_usage() {
        let user_id = Uuid::new_v4();
        let channel_id = Uuid::new_v4();

        let mut mocks = Mocks::new().vip_user().allow_rate();
        mocks.chat.expect_find_channel().returning(move |id| {
            Box::pin(async move { Ok(Some(direct_channel(id))) })
        });
        mocks
            .chat
            .expect_is_member()
            .returning(|_, _| Box::pin(async { Ok(true) }));
        mocks
            .chat
            .expect_insert_message()
            .withf(|message| message.content == "bom treino!")
            .returning(|_| Box::pin(async { Ok(Uuid::new_v4()) }));
        mocks
            .chat
            .expect_touch_last_message()
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(()) }));

        let message = mocks
            .build()
            .send_message(
                user_id,
                SendMessageModel {
                    channel_id,
                    content: "  bom treino!  ".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(message.content, "bom treino!");
        assert_eq!(message.sender_id, user_id);
    }

    #[tokio::test]
    async fn send_rejects_non_members() {
        let channel_id = Uuid::new_v4();

        let mut mocks = Mocks::new();
        mocks.chat.expect_find_channel().returning(move |id| {
            Box::pin(async move { Ok(Some(direct_channel(id))) })
        });
        mocks
            .chat
            .expect_is_member()
            .returning(|_, _| Box::pin(async { Ok(false) }));

        let err = mocks
            .build()
            .send_message(
                Uuid::new_v4(),
                SendMessageModel {
                    channel_id,
                    content: "oi".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Forbidden"));
    }

    #[tokio::test]
    async fn send_is_rate_limited_before_the_vip_gate() {
        let channel_id = Uuid::new_v4();

        let mut mocks = Mocks::new();
        mocks.chat.expect_find_channel().returning(move |id| {
            Box::pin(async move { Ok(Some(global_channel(id))) })
        });
        mocks.rate.expect_consume().returning(|_, _, _| {
            Box::pin(async {
                Ok(RateLimitDecision {
                    allowed: false,
                    remaining: 0,
                    reset_at: Utc::now(),
                    retry_after_seconds: 12,
                })
            })
        });

        let err = mocks
            .build()
            .send_message(
                Uuid::new_v4(),
                SendMessageModel {
                    channel_id,
                    content: "oi".to_string(),
                },
            )
            .await
            .unwrap_err();
        let limited = err.downcast_ref::<RateLimitExceeded>().unwrap();
        assert_eq!(limited.retry_after_seconds, 12);
    }

    #[tokio::test]
    async fn send_enforces_the_chat_daily_limit() {
        let channel_id = Uuid::new_v4();

        let mut mocks = Mocks::new().allow_rate();
        mocks.chat.expect_find_channel().returning(move |id| {
            Box::pin(async move { Ok(Some(global_channel(id))) })
        });
        // Free tier: chat_daily is zero.
        mocks
            .profiles
            .expect_find_role()
            .returning(|_| Box::pin(async { Ok(Some("user".to_string())) }));
        mocks
            .subscriptions
            .expect_latest_entitling_app_subscription()
            .returning(|_| Box::pin(async { Ok(None) }));
        mocks
            .subscriptions
            .expect_latest_entitling_marketplace_subscription()
            .returning(|_| Box::pin(async { Ok(None) }));
        mocks
            .usage
            .expect_usage_on_day()
            .returning(|_, _, _| Box::pin(async { Ok(0) }));

        let err = mocks
            .build()
            .send_message(
                Uuid::new_v4(),
                SendMessageModel {
                    channel_id,
                    content: "oi".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Chat limit reached"));
    }

    #[tokio::test]
    async fn list_returns_messages_oldest_first() {
        let channel_id = Uuid::new_v4();

        fn message(channel_id: Uuid, content: &str, age_minutes: i64) -> ChatMessageEntity {
            ChatMessageEntity {
                id: Uuid::new_v4(),
                channel_id,
                sender_id: Uuid::new_v4(),
                content: content.to_string(),
                is_read: true,
                created_at: Utc::now() - chrono::Duration::minutes(age_minutes),
            }
        }

        let mut mocks = Mocks::new();
        mocks.chat.expect_find_channel().returning(move |id| {
            Box::pin(async move { Ok(Some(global_channel(id))) })
        });
        // The repository pages newest-first.
        mocks.chat.expect_list_messages().returning(|channel_id, _, _| {
            Box::pin(async move {
                Ok(vec![
                    message(channel_id, "segunda", 1),
                    message(channel_id, "primeira", 5),
                ])
            })
        });

        let messages = mocks
            .build()
            .list_messages(
                Uuid::new_v4(),
                ListMessagesFilter {
                    channel_id,
                    limit: None,
                    before_id: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(messages[0].content, "primeira");
        assert_eq!(messages[1].content, "segunda");
        assert!(messages[0].created_at < messages[1].created_at);
    }

    #[tokio::test]
    async fn ensure_global_creates_when_absent() {
        let admin_id = Uuid::new_v4();
        let created_id = Uuid::new_v4();

        let mut mocks = Mocks::new();
        mocks
            .profiles
            .expect_find_role()
            .returning(|_| Box::pin(async { Ok(Some("admin".to_string())) }));
        mocks
            .chat
            .expect_list_global_channels()
            .returning(|| Box::pin(async { Ok(vec![]) }));
        mocks
            .chat
            .expect_create_global_channel()
            .returning(move || Box::pin(async move { Ok(created_id) }));

        let channel_id = mocks.build().ensure_global_channel(admin_id).await.unwrap();
        assert_eq!(channel_id, created_id);
    }

    #[tokio::test]
    async fn ensure_global_folds_duplicates_into_the_oldest() {
        let admin_id = Uuid::new_v4();
        let canonical_id = Uuid::new_v4();
        let duplicate_id = Uuid::new_v4();

        let mut mocks = Mocks::new();
        mocks
            .profiles
            .expect_find_role()
            .returning(|_| Box::pin(async { Ok(Some("admin".to_string())) }));
        mocks.chat.expect_list_global_channels().returning(move || {
            Box::pin(async move {
                Ok(vec![global_channel(canonical_id), global_channel(duplicate_id)])
            })
        });
        mocks
            .chat
            .expect_migrate_messages()
            .withf(move |from, to| *from == duplicate_id && *to == canonical_id)
            .returning(|_, _| Box::pin(async { Ok(3) }));
        mocks
            .chat
            .expect_delete_channel()
            .withf(move |id| *id == duplicate_id)
            .returning(|_| Box::pin(async { Ok(()) }));

        let channel_id = mocks.build().ensure_global_channel(admin_id).await.unwrap();
        assert_eq!(channel_id, canonical_id);
    }

    #[tokio::test]
    async fn ensure_global_requires_the_admin_role() {
        let mut mocks = Mocks::new();
        mocks
            .profiles
            .expect_find_role()
            .returning(|_| Box::pin(async { Ok(Some("teacher".to_string())) }));

        let err = mocks
            .build()
            .ensure_global_channel(Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Forbidden"));
    }
}
